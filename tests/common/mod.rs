#![allow(dead_code)]

use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::{Arc, Mutex},
    time::Duration,
};

use axum::{
    extract::Path,
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Extension, Json, Router,
};
use serde_json::{json, Value};
use tokio::{
    sync::{broadcast, oneshot, Notify},
    time::timeout,
};
use tracing::info;
use user_content_panel::{
    config::Config,
    events::{Event, TimestampedEvent},
    panel::PanelHandle,
    view::View,
};

/// How long any test waits for something to happen before giving up.
pub const PATIENCE: Duration = Duration::from_secs(5);

/// How the fake backend answers a request.
#[derive(Debug, Clone)]
pub enum Reply {
    Json(Value),
    Status(StatusCode),
    Raw(&'static str),
}

impl Default for Reply {
    fn default() -> Self {
        Self::Json(json!([]))
    }
}

impl Reply {
    /// A JSON array of objects with the given names.
    pub fn names(names: &[&str]) -> Self {
        Self::Json(Value::Array(
            names.iter().map(|name| json!({ "name": name })).collect(),
        ))
    }

    fn respond(self) -> Response {
        match self {
            Reply::Json(value) => Json(value).into_response(),
            Reply::Status(status) => status.into_response(),
            Reply::Raw(body) => (StatusCode::OK, body).into_response(),
        }
    }
}

#[derive(Debug, Default)]
struct Inner {
    users: Reply,
    content: HashMap<String, Reply>,
    gates: HashMap<String, Arc<Notify>>,
    requests: Vec<String>,
}

/// A stand-in for the real backend.
/// Records the path of every request it gets.
#[derive(Debug, Clone, Default)]
pub struct Backend(Arc<Mutex<Inner>>);

impl Backend {
    pub fn set_users(&self, reply: Reply) {
        self.0.lock().unwrap().users = reply;
    }

    pub fn set_content(&self, user: &str, reply: Reply) {
        self.0.lock().unwrap().content.insert(user.into(), reply);
    }

    /// Content requests for this user are held back until [`Backend::release`] is called.
    pub fn hold(&self, user: &str) {
        self.0
            .lock()
            .unwrap()
            .gates
            .insert(user.into(), Arc::new(Notify::new()));
    }

    /// Let a held back content request for this user through.
    pub fn release(&self, user: &str) {
        let gate = self.0.lock().unwrap().gates.get(user).cloned();
        gate.expect("User should be held").notify_one();
    }

    /// Paths requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.0.lock().unwrap().requests.clone()
    }

    pub fn count_requests(&self, path: &str) -> usize {
        self.requests().iter().filter(|p| *p == path).count()
    }

    pub fn count_content_requests(&self) -> usize {
        self.requests()
            .iter()
            .filter(|p| p.starts_with("/api/content/"))
            .count()
    }

    /// Wait until the given path has been requested at least `times` times.
    pub async fn wait_for_requests(&self, path: &str, times: usize) {
        let waited = timeout(PATIENCE, async {
            while self.count_requests(path) < times {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await;

        assert!(
            waited.is_ok(),
            "Expected {times} request(s) to {path}, got: {:?}",
            self.requests()
        );
    }

    fn record(&self, uri: &Uri) {
        self.0.lock().unwrap().requests.push(uri.path().to_string());
    }
}

async fn users(uri: Uri, Extension(backend): Extension<Backend>) -> Response {
    backend.record(&uri);

    let reply = backend.0.lock().unwrap().users.clone();
    reply.respond()
}

async fn content(
    uri: Uri,
    Path(user): Path<String>,
    Extension(backend): Extension<Backend>,
) -> Response {
    backend.record(&uri);

    let (reply, gate) = {
        let inner = backend.0.lock().unwrap();
        (
            inner.content.get(&user).cloned().unwrap_or_default(),
            inner.gates.get(&user).cloned(),
        )
    };

    if let Some(gate) = gate {
        info!(%user, "Holding back content");
        gate.notified().await;
    }

    reply.respond()
}

/// Start the fake backend on an arbitrary available port.
pub async fn start_backend(backend: Backend) -> u16 {
    let (port_tx, port_rx) = oneshot::channel();

    let app = Router::new()
        .route("/api/users", get(users))
        .route("/api/content/:user", get(content))
        .layer(Extension(backend));

    tokio::spawn(async move {
        let addr = SocketAddr::from(([127, 0, 0, 1], 0));
        let server = axum::Server::bind(&addr).serve(app.into_make_service());

        port_tx
            .send(server.local_addr().port())
            .expect("The receiver of which port was allocated should not be dropped");

        server.await.expect("Fake backend should keep running");
    });

    port_rx
        .await
        .expect("Fake backend should reply with allocated port")
}

/// A panel talking to the fake backend on the given port.
pub fn panel(port: u16, poll_interval_ms: u64) -> PanelHandle {
    PanelHandle::new(&Config {
        base_url: format!("http://127.0.0.1:{port}"),
        poll_interval_ms,
        ..Default::default()
    })
    .expect("Config should be valid")
}

/// Start a backend and a panel which polls so rarely that
/// any user refresh after the initial one has to be asked for.
pub async fn start(backend: &Backend) -> PanelHandle {
    let port = start_backend(backend.clone()).await;
    panel(port, 60_000)
}

/// Wait until the view satisfies the predicate.
pub async fn wait_for_view(panel: &PanelHandle, f: impl FnMut(&View) -> bool) -> View {
    let mut views = panel.subscribe_view();

    let view = timeout(PATIENCE, views.wait_for(f))
        .await
        .unwrap_or_else(|_| panic!("View never matched, last view: {:?}", panel.view()))
        .expect("Panel should be running");

    View::clone(&view)
}

/// Wait for the next event which satisfies the predicate, skipping others.
pub async fn wait_for_event(
    events: &mut broadcast::Receiver<TimestampedEvent>,
    mut f: impl FnMut(&Event) -> bool,
) -> Event {
    timeout(PATIENCE, async {
        loop {
            let event = events.recv().await.expect("Events should be open").inner;
            if f(&event) {
                return event;
            }
        }
    })
    .await
    .expect("Event should arrive in time")
}
