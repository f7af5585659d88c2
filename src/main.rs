use clap::Parser;
use color_eyre::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, error, info, Level};
use user_content_panel::{cli, logging, panel::PanelHandle};

/// Typing this instead of a user name refreshes the users right away.
const REFRESH: &str = ":r";

#[cfg(unix)]
async fn hangup() -> Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    signal(SignalKind::hangup())?.recv().await;
    Ok(())
}

#[cfg(not(unix))]
async fn hangup() -> Result<()> {
    std::future::pending().await
}

async fn handle_line(panel: &PanelHandle, line: &str) -> Result<()> {
    match line {
        "" => {}
        REFRESH => panel.refresh_users()?,
        name => panel.select_user(name).await?,
    }

    Ok(())
}

/// Print the view whenever it changes, select users named on stdin.
async fn run(panel: PanelHandle) -> Result<()> {
    let mut views = panel.subscribe_view();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    println!("{}", *views.borrow_and_update());

    loop {
        tokio::select! {
            changed = views.changed() => {
                changed?;
                println!("\n{}", *views.borrow_and_update());
            }
            line = lines.next_line(), if stdin_open => match line? {
                Some(line) => handle_line(&panel, line.trim()).await?,
                None => {
                    debug!("Stdin closed, only showing updates from now on");
                    stdin_open = false;
                }
            },
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let mut cli = cli::Cli::parse();

    if let Some(command) = cli.command.take() {
        cli::handle_command(command);

        return Ok(());
    }

    logging::init(cli.logging(Some(Level::WARN))).await;

    let config = cli.config()?;
    debug!(?config, "Config");

    let panel = PanelHandle::new(&config)?;

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Ctrl-C, quitting")
        }
        _ = hangup() => {
            info!("Told to hang up, quitting")
        }
        result = run(panel) => {
            error!("Frontend returned");
            result?;
        }
    }

    logging::shutdown();

    Ok(())
}
