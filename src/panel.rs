//! The panel owns the state of the user content panel.
//! It polls the backend for users, and fetches content when
//! a user is selected.
//! Whenever the state changes a new [`View`] is published.

use std::time::Duration;

use futures::{channel::mpsc, StreamExt};
use tokio::{
    sync::{broadcast, oneshot, watch},
    time::{interval_at, Instant, MissedTickBehavior},
};
use tracing::{debug, info, info_span, Instrument};

use crate::{
    client::{ApiClient, Fetch},
    config::Config,
    content::ContentItem,
    error::Error,
    events::{Event, Events, TimestampedEvent},
    state::PanelState,
    user::User,
    view::View,
};

/// Requests from the outside, via a [`PanelHandle`].
#[derive(Debug)]
enum Request {
    SelectUser {
        name: String,
        label_updated: oneshot::Sender<()>,
    },
    RefreshUsers,
    RecentEvents(oneshot::Sender<Vec<TimestampedEvent>>),
}

/// Fetches reporting back to the panel.
#[derive(Debug)]
enum Completion {
    Users(Result<Fetch<User>, Error>),
    Content {
        user: String,
        result: Result<Fetch<ContentItem>, Error>,
    },
}

struct Panel {
    client: ApiClient,
    poll_interval: Duration,
    state: PanelState,

    // Every fetch gets a clone of this.
    completions_tx: mpsc::UnboundedSender<Completion>,

    view: watch::Sender<View>,
    events: Events,
}

impl Panel {
    fn publish(&self) {
        let view = View::render(&self.state);

        self.view.send_if_modified(|current| {
            if *current == view {
                false
            } else {
                *current = view;
                true
            }
        });
    }

    fn refresh_users(&self) {
        let client = self.client.clone();
        let completions = self.completions_tx.clone();

        tokio::spawn(
            async move {
                let result = client.users().await;

                // Only fails if the panel is gone, then nobody cares.
                let _ = completions.unbounded_send(Completion::Users(result));
            }
            .instrument(info_span!("fetch-users")),
        );
    }

    fn refresh_content(&mut self, user: String) {
        self.events.send_event(Event::ContentRequested(user.clone()));

        let client = self.client.clone();
        let completions = self.completions_tx.clone();

        tokio::spawn(
            async move {
                let result = client.content(&user).await;
                let _ = completions.unbounded_send(Completion::Content { user, result });
            }
            .instrument(info_span!("fetch-content")),
        );
    }

    fn select_user(&mut self, name: String) {
        info!(%name, "Selecting user");

        self.state.select(&name);
        self.publish();
        self.events.send_event(Event::UserSelected(name));
    }

    fn handle_request(&mut self, request: Request) {
        match request {
            Request::SelectUser {
                name,
                label_updated,
            } => {
                self.select_user(name.clone());
                let _ = label_updated.send(());

                // Not awaited. Whatever completes last is displayed.
                self.refresh_content(name);
            }
            Request::RefreshUsers => self.refresh_users(),
            Request::RecentEvents(reply) => {
                let _ = reply.send(self.events.recent().cloned().collect());
            }
        }
    }

    fn handle_completion(&mut self, completion: Completion) {
        match completion {
            Completion::Users(Ok(Fetch::Items(users))) => {
                let count = users.len();
                self.state.replace_users(users);
                self.publish();
                self.events.send_event(Event::UsersRefreshed(count));
            }
            Completion::Users(Ok(Fetch::Ignored(status))) => {
                self.events.send_event(Event::UsersIgnored(status))
            }
            Completion::Users(Err(error)) => self.events.send_event(Event::UsersFailed(error)),

            Completion::Content {
                user,
                result: Ok(Fetch::Items(content)),
            } => {
                let items = content.len();
                self.state.replace_content(content);
                self.publish();
                self.events
                    .send_event(Event::ContentRefreshed { user, items });
            }
            Completion::Content {
                user,
                result: Ok(Fetch::Ignored(status)),
            } => self.events.send_event(Event::ContentIgnored { user, status }),
            Completion::Content {
                user,
                result: Err(error),
            } => self.events.send_event(Event::ContentFailed { user, error }),
        }
    }

    async fn run(
        mut self,
        mut requests: mpsc::UnboundedReceiver<Request>,
        mut completions: mpsc::UnboundedReceiver<Completion>,
    ) {
        let mut poll = interval_at(Instant::now() + self.poll_interval, self.poll_interval);
        poll.set_missed_tick_behavior(MissedTickBehavior::Skip);

        // The first view should not wait a whole period for users.
        self.refresh_users();

        loop {
            tokio::select! {
                _ = poll.tick() => {
                    debug!("Polling users");
                    self.refresh_users();
                }
                request = requests.next() => match request {
                    Some(request) => self.handle_request(request),
                    None => {
                        info!("No handles left, stopping");
                        break;
                    }
                },
                Some(completion) = completions.next() => self.handle_completion(completion),
            }
        }
    }
}

/// A handle to a running panel.
///
/// The panel keeps running (and polling) for as long as any clone of its handle is alive.
#[derive(Debug, Clone)]
pub struct PanelHandle {
    requests: mpsc::UnboundedSender<Request>,
    view: watch::Receiver<View>,
    events: broadcast::Sender<TimestampedEvent>,
}

impl PanelHandle {
    /// Start a panel with the given configuration.
    ///
    /// Must be called from within a tokio runtime.
    /// The list of users is requested right away, and then once every poll interval.
    pub fn new(config: &Config) -> Result<Self, Error> {
        config.validate()?;

        let (requests_tx, requests_rx) = mpsc::unbounded();
        let (completions_tx, completions_rx) = mpsc::unbounded();
        let (view_tx, view_rx) = watch::channel(View::default());
        let events = Events::new(config.event_log_size);
        let events_tx = events.sender();

        let panel = Panel {
            client: ApiClient::new(&config.base_url)?,
            poll_interval: config.poll_interval(),
            state: PanelState::default(),
            completions_tx,
            view: view_tx,
            events,
        };

        info!(base_url = %config.base_url, poll_interval = ?config.poll_interval(), "Starting panel");
        tokio::spawn(
            panel
                .run(requests_rx, completions_rx)
                .instrument(info_span!("panel")),
        );

        Ok(Self {
            requests: requests_tx,
            view: view_rx,
            events: events_tx,
        })
    }

    fn request(&self, request: Request) -> Result<(), Error> {
        self.requests
            .unbounded_send(request)
            .map_err(|_| Error::PanelGone)
    }

    /// Select the user with the given name.
    ///
    /// Returns once the selected user label has been updated in the view.
    /// The content of the user is requested, but not awaited.
    pub async fn select_user(&self, name: &str) -> Result<(), Error> {
        let (tx, rx) = oneshot::channel();

        self.request(Request::SelectUser {
            name: name.into(),
            label_updated: tx,
        })?;

        rx.await.map_err(|_| Error::PanelGone)
    }

    /// Request the list of users now, in addition to the periodic polling.
    pub fn refresh_users(&self) -> Result<(), Error> {
        self.request(Request::RefreshUsers)
    }

    /// The most recent events of the panel, newest first.
    pub async fn recent_events(&self) -> Result<Vec<TimestampedEvent>, Error> {
        let (tx, rx) = oneshot::channel();
        self.request(Request::RecentEvents(tx))?;

        rx.await.map_err(|_| Error::PanelGone)
    }

    /// The current view.
    pub fn view(&self) -> View {
        self.view.borrow().clone()
    }

    /// Get notified whenever the view changes.
    pub fn subscribe_view(&self) -> watch::Receiver<View> {
        self.view.clone()
    }

    /// Subscribe to the events of the panel.
    pub fn subscribe_events(&self) -> broadcast::Receiver<TimestampedEvent> {
        self.events.subscribe()
    }
}
