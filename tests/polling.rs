mod common;

use color_eyre::Result;
use common::*;
use pretty_assertions::assert_eq;

#[tokio::test]
async fn users_are_fetched_right_away() -> Result<()> {
    let backend = Backend::default();
    backend.set_users(Reply::names(&["alice", "bob"]));

    // The first poll would be a minute out.
    let panel = start(&backend).await;

    let view = wait_for_view(&panel, |view| !view.users.is_empty()).await;
    assert_eq!(view.user_names(), ["alice", "bob"]);
    assert_eq!(backend.count_requests("/api/users"), 1);

    Ok(())
}

#[tokio::test]
async fn users_are_polled() -> Result<()> {
    let backend = Backend::default();
    backend.set_users(Reply::names(&["alice"]));

    let port = start_backend(backend.clone()).await;
    let panel = panel(port, 50);

    wait_for_view(&panel, |view| view.user_names() == ["alice"]).await;

    backend.set_users(Reply::names(&["alice", "bob"]));
    let view = wait_for_view(&panel, |view| view.users.len() == 2).await;
    assert_eq!(view.user_names(), ["alice", "bob"]);

    backend.wait_for_requests("/api/users", 4).await;

    Ok(())
}

#[tokio::test]
async fn content_is_not_polled() -> Result<()> {
    let backend = Backend::default();
    backend.set_users(Reply::names(&["alice"]));
    backend.set_content("alice", Reply::names(&["a.txt"]));

    let port = start_backend(backend.clone()).await;
    let panel = panel(port, 20);

    panel.select_user("alice").await?;
    wait_for_view(&panel, |view| !view.content.is_empty()).await;

    let polled = backend.count_requests("/api/users");
    backend.wait_for_requests("/api/users", polled + 5).await;

    assert_eq!(backend.count_content_requests(), 1);

    Ok(())
}

#[tokio::test]
async fn manual_refresh_does_not_wait_for_the_period() -> Result<()> {
    let backend = Backend::default();
    let panel = start(&backend).await;

    backend.wait_for_requests("/api/users", 1).await;
    backend.set_users(Reply::names(&["late"]));

    panel.refresh_users()?;

    let view = wait_for_view(&panel, |view| !view.users.is_empty()).await;
    assert_eq!(view.user_names(), ["late"]);

    Ok(())
}

#[tokio::test]
async fn polling_keeps_going_after_failures() -> Result<()> {
    let backend = Backend::default();
    backend.set_users(Reply::Raw("this is not json"));

    let port = start_backend(backend.clone()).await;
    let panel = panel(port, 30);

    backend.wait_for_requests("/api/users", 3).await;
    assert!(panel.view().users.is_empty());

    backend.set_users(Reply::names(&["back"]));
    let view = wait_for_view(&panel, |view| !view.users.is_empty()).await;
    assert_eq!(view.user_names(), ["back"]);

    let polled = backend.count_requests("/api/users");
    backend.wait_for_requests("/api/users", polled + 2).await;

    Ok(())
}
