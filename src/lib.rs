#![deny(missing_docs)]

//! This crate keeps an operator's view of a backend's users and their content.
//!
//! A [`panel::PanelHandle`] starts a panel which polls `GET /api/users` at a fixed interval
//! (every five seconds by default), and one time right away.
//! Selecting a user updates the selected user label and requests
//! `GET /api/content/<user>` in the background.
//!
//! Every change is published as a [`view::View`] which frontends draw.
//! Requests that fail, or are answered with a non-success status, never change the view.
//! They are logged and show up as [`events::Event`]s instead.

/// The panel itself: owns the state, polls, and reacts to selections.
pub mod panel;

/// The HTTP client for the backend.
pub mod client;

/// The command line interface.
pub mod cli;

/// Relates to config files.
pub mod config;

/// Possible errors in this library.
pub mod error;

/// Logging/tracing setup.
pub mod logging;

/// Events the panel emits.
pub mod events;

/// A user of the backend.
pub mod user;

/// Content belonging to a user.
pub mod content;

/// What the panel knows.
pub mod state;

/// What the panel shows.
pub mod view;
