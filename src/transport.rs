use std::fmt::{self, Display};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, instrument};

use crate::classifier::TransportFailure;

// =============================================================================
// 1. THE REQUEST/RESPONSE SHAPE
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        };
        f.write_str(name)
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// A request relative to the API base URL, e.g. `GET /produtos`.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self { method: Method::Get, path: path.into(), body: None }
    }

    pub fn post(path: impl Into<String>, body: serde_json::Value) -> Self {
        Self { method: Method::Post, path: path.into(), body: Some(body) }
    }

    pub fn put(path: impl Into<String>, body: serde_json::Value) -> Self {
        Self { method: Method::Put, path: path.into(), body: Some(body) }
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self { method: Method::Delete, path: path.into(), body: None }
    }
}

/// Whatever the server answered, success or not.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

pub type Response = oneshot::Sender<Result<ApiResponse, TransportFailure>>;

#[derive(Debug)]
pub struct TransportRequest {
    pub request: ApiRequest,
    pub respond_to: Response,
}

// =============================================================================
// 2. THE HTTP SERVICE
// =============================================================================

/// Owns the HTTP client and executes requests sent through a [`TransportClient`].
///
/// Each request runs on its own task so a slow call never holds up the others.
/// The service stops once every client handle has been dropped.
pub struct HttpTransport {
    receiver: mpsc::Receiver<TransportRequest>,
    http: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(
        buffer_size: usize,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<(Self, TransportClient), reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        let (sender, receiver) = mpsc::channel(buffer_size);
        let service = Self {
            receiver,
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        };
        Ok((service, TransportClient::new(sender)))
    }

    #[instrument(name = "http_transport", skip(self), fields(base_url = %self.base_url))]
    pub async fn run(mut self) {
        info!("HttpTransport starting");
        while let Some(TransportRequest { request, respond_to }) = self.receiver.recv().await {
            let http = self.http.clone();
            let url = format!("{}{}", self.base_url, request.path);
            tokio::spawn(async move {
                debug!(method = %request.method, url = %url, "Executing request");
                let result = execute(&http, &url, request).await;
                let _ = respond_to.send(result);
            });
        }
        info!("HttpTransport stopped");
    }
}

async fn execute(
    http: &reqwest::Client,
    url: &str,
    request: ApiRequest,
) -> Result<ApiResponse, TransportFailure> {
    let mut builder = http.request(request.method.into(), url);
    if let Some(body) = &request.body {
        builder = builder.json(body);
    }

    let response = builder
        .send()
        .await
        .map_err(|e| TransportFailure::NoResponse(e.to_string()))?;
    let status = response.status().as_u16();
    let body = response
        .text()
        .await
        .map_err(|e| TransportFailure::Status { status, message: e.to_string() })?;

    debug!(status, "Response received");
    Ok(ApiResponse { status, body })
}

// =============================================================================
// 3. THE CLIENT HANDLE
// =============================================================================

#[derive(Clone)]
pub struct TransportClient {
    sender: mpsc::Sender<TransportRequest>,
}

impl TransportClient {
    pub fn new(sender: mpsc::Sender<TransportRequest>) -> Self {
        Self { sender }
    }

    pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportFailure> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(TransportRequest { request, respond_to })
            .await
            .map_err(|_| TransportFailure::NoResponse("Transport closed".to_string()))?;
        response
            .await
            .map_err(|_| TransportFailure::NoResponse("Transport dropped".to_string()))?
    }
}
