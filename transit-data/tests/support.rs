//! Canned HTTP service for exercising [`transit_data::HttpTripSource`].
//!
//! An axum router answers every request from a fixed path table on an
//! ephemeral port. Unknown paths get a 404. The server runs on its own
//! current-thread runtime so scenarios can block on their own.

use std::collections::HashMap;
use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use axum::Router;
use axum::extract::State;
use axum::http::{StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use tokio::sync::oneshot;

/// A response served for one path.
#[derive(Debug, Clone)]
pub struct CannedResponse {
    status: u16,
    body: String,
    delay: Duration,
}

impl CannedResponse {
    /// A `200 OK` JSON response.
    pub fn json(body: impl Into<String>) -> Self {
        Self::status(200, body)
    }

    /// A response with an explicit status code.
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            delay: Duration::ZERO,
        }
    }

    /// Wait before answering.
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

impl IntoResponse for CannedResponse {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, [(header::CONTENT_TYPE, "application/json")], self.body).into_response()
    }
}

#[derive(Clone)]
struct CannedState {
    routes: Arc<HashMap<String, CannedResponse>>,
    requests: Arc<Mutex<Vec<String>>>,
}

async fn answer(State(state): State<CannedState>, uri: Uri) -> CannedResponse {
    let path = uri.path().to_owned();
    state
        .requests
        .lock()
        .expect("request log lock")
        .push(path.clone());
    let response = state
        .routes
        .get(&path)
        .cloned()
        .unwrap_or_else(|| CannedResponse::status(404, r#"{"detail":"Not Found"}"#));
    if !response.delay.is_zero() {
        tokio::time::sleep(response.delay).await;
    }
    response
}

/// Background HTTP server answering from a path table.
pub struct CannedServer {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<String>>>,
    shutdown: Option<oneshot::Sender<()>>,
    worker: Option<JoinHandle<()>>,
}

impl CannedServer {
    /// Bind an ephemeral port and start serving `routes`.
    pub fn start(routes: HashMap<String, CannedResponse>) -> Self {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind canned server");
        listener
            .set_nonblocking(true)
            .expect("non-blocking canned listener");
        let addr = listener.local_addr().expect("canned server address");

        let requests = Arc::new(Mutex::new(Vec::new()));
        let app = Router::new().fallback(answer).with_state(CannedState {
            routes: Arc::new(routes),
            requests: Arc::clone(&requests),
        });
        let (shutdown, stop) = oneshot::channel::<()>();

        let worker = thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("canned server runtime");
            runtime.block_on(async move {
                let listener =
                    tokio::net::TcpListener::from_std(listener).expect("adopt canned listener");
                // Dropping the runtime cancels requests still sleeping.
                let serve = axum::serve(listener, app).into_future();
                tokio::select! {
                    served = serve => served.expect("canned server failed"),
                    _ = stop => {}
                }
            });
        });

        Self {
            addr,
            requests,
            shutdown: Some(shutdown),
            worker: Some(worker),
        }
    }

    /// Base URL of the running server.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Raw request paths seen so far, in arrival order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().expect("request log lock").clone()
    }
}

impl Drop for CannedServer {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

/// Two-trip feature collection for `vehicle` on `line`.
pub fn trips_body(vehicle: &str, line: &str) -> String {
    let feature = |start: &str, end: &str| {
        serde_json::json!({
            "type": "Feature",
            "geometry": {
                "type": "LineString",
                "coordinates": [[-73.95, 40.65], [-73.90, 40.70]]
            },
            "properties": {
                "VehicleRef": vehicle,
                "PublishedLineName": line,
                "DirectionRef": 0,
                "OriginName": "Coney Island",
                "DestinationName": "Jamaica",
                "StartTime": start,
                "EndTime": end
            }
        })
    };
    serde_json::json!({
        "type": "FeatureCollection",
        "features": [
            feature("2014-08-01T07:00:00", "2014-08-01T08:10:00"),
            feature("2014-08-01T09:00:00", "2014-08-01T10:05:00"),
        ]
    })
    .to_string()
}

/// Feature collection with no features.
pub const EMPTY_COLLECTION: &str = r#"{"type":"FeatureCollection","features":[]}"#;
