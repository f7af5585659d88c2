use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::{error::Error, io, time::Duration};
use tokio::sync::watch;
use tracing::{debug, warn};
use tui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::*,
    Frame, Terminal,
};
use user_content_panel::{
    cli::{self, Cli},
    logging,
    panel::PanelHandle,
    view::View,
};

/// Where the cursor is in the user list.
///
/// Separate from the selection: moving the cursor does not select anybody.
#[derive(Default)]
struct Cursor {
    ui_state: ListState,
}

impl Cursor {
    fn next(&mut self, len: usize) {
        let i = match self.ui_state.selected() {
            _ if len == 0 => None,
            Some(i) if i + 1 >= len => Some(0),
            Some(i) => Some(i + 1),
            None => Some(0),
        };
        self.ui_state.select(i);
    }

    fn previous(&mut self, len: usize) {
        let i = match self.ui_state.selected() {
            _ if len == 0 => None,
            Some(0) | None => Some(len - 1),
            Some(i) => Some((i - 1).min(len - 1)),
        };
        self.ui_state.select(i);
    }

    /// The user list may shrink between polls.
    fn clamp(&mut self, len: usize) {
        if let Some(i) = self.ui_state.selected() {
            self.ui_state
                .select(if len == 0 { None } else { Some(i.min(len - 1)) });
        }
    }

    fn index(&self) -> Option<usize> {
        self.ui_state.selected()
    }
}

struct App {
    panel: PanelHandle,
    views: watch::Receiver<View>,
    view: View,
    cursor: Cursor,
    should_quit: bool,
}

impl App {
    fn new(panel: PanelHandle) -> App {
        let views = panel.subscribe_view();
        let view = views.borrow().clone();
        App {
            view,
            views,
            panel,
            cursor: Cursor::default(),
            should_quit: false,
        }
    }

    fn update_view(&mut self) {
        if self.views.has_changed().unwrap_or(false) {
            self.view = self.views.borrow_and_update().clone();
            self.cursor.clamp(self.view.users.len());
        }
    }

    fn user_under_cursor(&self) -> Option<&str> {
        self.cursor
            .index()
            .and_then(|i| self.view.users.get(i))
            .map(|button| button.name.as_str())
    }

    async fn on_key(&mut self, key: KeyCode) {
        let users = self.view.users.len();

        match key {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Down | KeyCode::Char('j') => self.cursor.next(users),
            KeyCode::Up | KeyCode::Char('k') => self.cursor.previous(users),
            KeyCode::Char('r') => {
                if let Err(e) = self.panel.refresh_users() {
                    warn!(%e, "Could not refresh users");
                }
            }
            KeyCode::Enter => {
                if let Some(name) = self.user_under_cursor().map(ToOwned::to_owned) {
                    if let Err(e) = self.panel.select_user(&name).await {
                        warn!(%e, "Could not select user");
                    }
                    // Show the new label right away.
                    self.update_view();
                }
            }
            _ => {}
        }
    }

    fn users_widget(&self) -> List<'_> {
        let users = self
            .view
            .users
            .iter()
            .map(|button| {
                let style = if button.active {
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                ListItem::new(button.name.as_str()).style(style)
            })
            .collect::<Vec<_>>();

        List::new(users)
            .block(Block::default().borders(Borders::ALL).title("Users [↑↓ ⏎]"))
            .highlight_style(Style::default().bg(Color::DarkGray))
            .highlight_symbol("> ")
    }

    fn content_widget(&self) -> List<'_> {
        let rows = self
            .view
            .content
            .iter()
            .map(|row| ListItem::new(row.name.as_str()))
            .collect::<Vec<_>>();

        List::new(rows).block(Block::default().borders(Borders::ALL).title("Content"))
    }

    fn selected_widget(&self) -> Paragraph<'_> {
        Paragraph::new(Spans::from(vec![Span::styled(
            self.view.selected_label(),
            Style::default().fg(Color::LightGreen),
        )]))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("User Content Panel [r: refresh, q: quit]"),
        )
    }

    fn render<B: Backend>(&mut self, f: &mut Frame<B>, area: Rect) {
        let top_bottom = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)].as_ref())
            .split(area);

        let left_right = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(30), Constraint::Min(0)].as_ref())
            .split(top_bottom[1]);

        f.render_widget(self.selected_widget(), top_bottom[0]);

        let users = self.users_widget();
        let mut cursor = self.cursor.ui_state.clone();
        f.render_stateful_widget(users, left_right[0], &mut cursor);
        self.cursor.ui_state = cursor;

        f.render_widget(self.content_widget(), left_right[1]);
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let mut cli = Cli::parse();

    if let Some(command) = cli.command.take() {
        cli::handle_command(command);
        return Ok(());
    }

    // Stdout belongs to the terminal UI, so only file logging (if asked for).
    if cli.log_dir.is_some() {
        logging::init(cli.logging(None)).await;
    }

    let config = cli.config()?;
    debug!(?config, "Config");

    let panel = PanelHandle::new(&config)?;

    // setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // create app and run it
    let tick_rate = Duration::from_millis(50);
    let app = App::new(panel);
    let res = run_app(&mut terminal, app, tick_rate).await;

    // restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    logging::shutdown();

    if let Err(err) = res {
        println!("{:?}", err)
    }

    Ok(())
}

async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
    tick_rate: Duration,
) -> io::Result<()> {
    loop {
        app.update_view();

        terminal.draw(|f| {
            let area = f.size();
            app.render(f, area)
        })?;

        if event::poll(tick_rate)? {
            if let event::Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key.code).await;
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_wraps() {
        let mut cursor = Cursor::default();

        cursor.next(3);
        assert_eq!(cursor.index(), Some(0));
        cursor.next(3);
        cursor.next(3);
        assert_eq!(cursor.index(), Some(2));
        cursor.next(3);
        assert_eq!(cursor.index(), Some(0));

        cursor.previous(3);
        assert_eq!(cursor.index(), Some(2));
    }

    #[test]
    fn cursor_on_empty_list() {
        let mut cursor = Cursor::default();

        cursor.next(0);
        assert_eq!(cursor.index(), None);
        cursor.previous(0);
        assert_eq!(cursor.index(), None);
    }

    #[test]
    fn cursor_follows_shrinking_list() {
        let mut cursor = Cursor::default();
        cursor.previous(5);
        assert_eq!(cursor.index(), Some(4));

        cursor.clamp(2);
        assert_eq!(cursor.index(), Some(1));

        cursor.clamp(0);
        assert_eq!(cursor.index(), None);
    }
}
