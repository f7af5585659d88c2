use std::{collections::VecDeque, fmt::Display};

use reqwest::StatusCode;
use tokio::sync::broadcast;
use tracing::{info, warn};

use crate::error::Error;

/// Things that happen in a panel.
///
/// This is where fetch failures end up, since they are never shown in the view itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The list of users was replaced. Holds the number of users.
    UsersRefreshed(usize),

    /// The backend replied to the users request with a non-success status.
    UsersIgnored(StatusCode),

    /// The users request failed.
    UsersFailed(Error),

    /// A user was selected.
    UserSelected(String),

    /// The content of a user was requested.
    ContentRequested(String),

    /// The content list was replaced with the content of a user.
    ContentRefreshed {
        /// The user the content was fetched for.
        user: String,

        /// The number of items.
        items: usize,
    },

    /// The backend replied to a content request with a non-success status.
    ContentIgnored {
        /// The user the content was requested for.
        user: String,

        /// The status received.
        status: StatusCode,
    },

    /// A content request failed.
    ContentFailed {
        /// The user the content was requested for.
        user: String,

        /// What went wrong.
        error: Error,
    },
}

impl Event {
    /// Whether the event is about something going wrong.
    pub fn is_failure(&self) -> bool {
        matches!(self, Event::UsersFailed(_) | Event::ContentFailed { .. })
    }
}

impl Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Event::UsersRefreshed(count) => write!(f, "users refreshed ({count})"),
            Event::UsersIgnored(status) => write!(f, "users ignored ({status})"),
            Event::UsersFailed(error) => write!(f, "users failed: {error}"),
            Event::UserSelected(user) => write!(f, "selected {user}"),
            Event::ContentRequested(user) => write!(f, "content requested for {user}"),
            Event::ContentRefreshed { user, items } => {
                write!(f, "content of {user} refreshed ({items})")
            }
            Event::ContentIgnored { user, status } => {
                write!(f, "content of {user} ignored ({status})")
            }
            Event::ContentFailed { user, error } => {
                write!(f, "content of {user} failed: {error}")
            }
        }
    }
}

/// An event and when it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimestampedEvent {
    /// The event.
    pub inner: Event,

    /// When the event happened.
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl TimestampedEvent {
    /// Timestamp an event as happening now.
    pub fn new(event: Event) -> Self {
        Self {
            inner: event,
            timestamp: chrono::Utc::now(),
        }
    }
}

impl Display for TimestampedEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

/// An event logger and broadcaster.
#[derive(Debug)]
pub struct Events {
    log: VecDeque<TimestampedEvent>,
    log_size: usize,

    tx: broadcast::Sender<TimestampedEvent>,
    #[allow(dead_code)]
    rx: broadcast::Receiver<TimestampedEvent>,
}

impl Events {
    /// Create a new events handler.
    /// It will keep a log of at most `log_size` events.
    /// It may be subscribed to to receive any events it sees.
    pub fn new(log_size: usize) -> Self {
        let (tx, rx) = broadcast::channel(100);
        Self {
            tx,
            rx,
            log: VecDeque::new(),
            log_size,
        }
    }

    /// Subscribe to events.
    pub fn subscribe(&self) -> broadcast::Receiver<TimestampedEvent> {
        self.tx.subscribe()
    }

    pub(crate) fn sender(&self) -> broadcast::Sender<TimestampedEvent> {
        self.tx.clone()
    }

    /// The most recent events, newest first.
    pub fn recent(&self) -> impl Iterator<Item = &TimestampedEvent> {
        self.log.iter()
    }

    /// Send an event. This will append it to the log and broadcast it to any subscribers.
    pub fn send_event(&mut self, event: Event) {
        let event = TimestampedEvent::new(event);

        if event.inner.is_failure() {
            warn!(%event, "Storing event");
        } else {
            info!(%event, "Storing event");
        }

        self.log.push_front(event.clone());

        // Truncate removes from the back, which means older events are split off first.
        self.log.truncate(self.log_size);

        self.tx.send(event).expect("Broadcast should work");
    }
}
