//! Shared test utilities for quickplan tests.
//!
//! - [`sample_plan`] / [`empty_plan`]: fixture plans.
//! - [`FakeProvider`]: a scripted [`PlanProvider`] that counts its calls.
//! - [`StubEndpoint`]: an in-process HTTP server on an ephemeral port that
//!   answers every request with a fixed response and records what it saw.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use quickplan_core::plan::{HowToWin, StrategicPlan, Strategy, TitledItem};
use quickplan_core::provider::{PlanProvider, ProviderError, ProviderRequest};

// ---------------------------------------------------------------------------
// Fixture plans
// ---------------------------------------------------------------------------

/// A fully populated plan for a clean-water nonprofit.
pub fn sample_plan() -> StrategicPlan {
    StrategicPlan {
        direction: "Become the leading provider of affordable clean water \
                    systems in rural East Africa within five years."
            .to_owned(),
        how_to_win: HowToWin {
            strategy: Strategy::Price,
            justification: "Low-cost filtration built from local materials \
                            undercuts imported systems."
                .to_owned(),
        },
        capabilities: vec![
            "Local manufacturing".to_owned(),
            "Community training programs".to_owned(),
        ],
        leadership: "Servant leadership that empowers local teams.".to_owned(),
        goals: vec![TitledItem::new(
            "Expand reach",
            "Serve 500 villages by the end of year three.",
        )],
        objectives: vec![TitledItem::new(
            "Reduce unit cost",
            "Cut the cost per filter by 30% in 18 months.",
        )],
        initiatives: vec![TitledItem::new(
            "Regional workshops",
            "Open three assembly workshops in Kenya and Uganda.",
        )],
        tasks: vec![
            TitledItem::new("Hire workshop leads", "Recruit three regional managers."),
            TitledItem::new("Source materials", "Sign contracts with local suppliers."),
        ],
    }
}

/// A plan whose every list is empty.
pub fn empty_plan() -> StrategicPlan {
    StrategicPlan {
        capabilities: Vec::new(),
        goals: Vec::new(),
        objectives: Vec::new(),
        initiatives: Vec::new(),
        tasks: Vec::new(),
        ..sample_plan()
    }
}

/// JSON text of [`sample_plan`], as a provider would return it.
pub fn sample_plan_json() -> String {
    serde_json::to_string(&sample_plan()).expect("sample plan serializes")
}

// ---------------------------------------------------------------------------
// FakeProvider
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
enum Scripted {
    Text(String),
    Fail(String),
}

/// A [`PlanProvider`] that returns a scripted response and records every
/// call it receives.
#[derive(Debug, Clone)]
pub struct FakeProvider {
    response: Scripted,
    calls: Arc<Mutex<Vec<(String, ProviderRequest)>>>,
}

impl FakeProvider {
    /// Respond with `text` to every call.
    pub fn returning(text: impl Into<String>) -> Self {
        Self {
            response: Scripted::Text(text.into()),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Respond with the JSON of [`sample_plan`].
    pub fn with_sample_plan() -> Self {
        Self::returning(sample_plan_json())
    }

    /// Fail every call with a 500 [`ProviderError::Api`] carrying `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            response: Scripted::Fail(message.into()),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Number of `generate` calls so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().expect("calls lock").len()
    }

    /// `(api_key, request)` pairs received so far.
    pub fn calls(&self) -> Vec<(String, ProviderRequest)> {
        self.calls.lock().expect("calls lock").clone()
    }
}

#[async_trait]
impl PlanProvider for FakeProvider {
    fn name(&self) -> &str {
        "fake"
    }

    async fn generate(
        &self,
        api_key: &str,
        request: &ProviderRequest,
    ) -> Result<String, ProviderError> {
        self.calls
            .lock()
            .expect("calls lock")
            .push((api_key.to_owned(), request.clone()));
        match &self.response {
            Scripted::Text(text) => Ok(text.clone()),
            Scripted::Fail(message) => Err(ProviderError::Api {
                status: 500,
                message: message.clone(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// StubEndpoint
// ---------------------------------------------------------------------------

/// One request seen by a [`StubEndpoint`].
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    /// Body parsed as JSON.
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("recorded body is JSON")
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

#[derive(Clone)]
struct StubState {
    status: StatusCode,
    body: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// An HTTP server answering every path and method with a fixed status and
/// JSON body. Shut down when dropped.
pub struct StubEndpoint {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    handle: JoinHandle<()>,
}

impl StubEndpoint {
    /// Bind `127.0.0.1:0` and start serving.
    pub async fn start(status: u16, body: impl Into<String>) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = StubState {
            status: StatusCode::from_u16(status).expect("valid status code"),
            body: body.into(),
            requests: Arc::clone(&requests),
        };
        let app = Router::new().fallback(record).with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind stub endpoint");
        let addr = listener.local_addr().expect("stub endpoint address");
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            addr,
            requests,
            handle,
        }
    }

    /// Base URL, e.g. `http://127.0.0.1:41234`.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().expect("requests lock").clone()
    }
}

impl Drop for StubEndpoint {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn record(
    State(state): State<StubState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    state
        .requests
        .lock()
        .expect("requests lock")
        .push(RecordedRequest {
            method,
            path: uri.path().to_owned(),
            query: uri.query().map(str::to_owned),
            headers,
            body: body.to_vec(),
        });
    (
        state.status,
        [(axum::http::header::CONTENT_TYPE, "application/json")],
        state.body,
    )
        .into_response()
}
