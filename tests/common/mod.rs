//! Shared test fixtures.
//!
//! `FakeOnboarding` is a local stand-in for the sensor onboarding endpoint.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use parking_lot::Mutex;
use serde::Deserialize;
use tokio::net::TcpListener;

/// Body posted by the registrar.
#[derive(Debug, Clone, Deserialize)]
pub struct OnboardingBody {
    pub deveui: String,
}

#[derive(Default)]
struct Inner {
    status: Option<StatusCode>,
    requests: Vec<OnboardingBody>,
}

/// Fake onboarding service recording every request.
#[derive(Clone)]
pub struct FakeOnboarding {
    inner: Arc<Mutex<Inner>>,
    url: String,
}

impl FakeOnboarding {
    /// Start the fake endpoint on an ephemeral port. Responds `200` until told
    /// otherwise.
    pub async fn start() -> Self {
        let inner = Arc::new(Mutex::new(Inner::default()));

        let app = Router::new()
            .route("/onboard", post(onboard))
            .with_state(Arc::clone(&inner));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("Failed to get local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Server failed");
        });

        Self {
            inner,
            url: format!("http://{addr}/onboard"),
        }
    }

    pub fn url(&self) -> String {
        self.url.clone()
    }

    /// Respond with a fixed status.
    pub fn respond_with(&self, status: StatusCode) {
        self.inner.lock().status = Some(status);
    }

    /// Report every DevEUI as already registered.
    pub fn reject_all(&self) {
        self.respond_with(StatusCode::UNPROCESSABLE_ENTITY);
    }

    /// Fail every request.
    pub fn fail_all(&self) {
        self.respond_with(StatusCode::INTERNAL_SERVER_ERROR);
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<OnboardingBody> {
        self.inner.lock().requests.clone()
    }
}

async fn onboard(
    State(inner): State<Arc<Mutex<Inner>>>,
    Json(body): Json<OnboardingBody>,
) -> StatusCode {
    let mut inner = inner.lock();
    inner.requests.push(body);
    inner.status.unwrap_or(StatusCode::OK)
}
