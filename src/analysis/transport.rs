//! HTTP transport for analysis requests and basemap tiles.
//!
//! Uses channel-based communication to bridge async requests with egui's
//! synchronous update loop. Each submission becomes one independent task;
//! there is no timeout, retry or cancellation.

use super::types::{AnalysisRequest, AnalysisResponse, ErrorBody};
use crate::geo::{decode_tile, TileChannel, TileError, TileId, TileSettlement, TileSource};
use eframe::egui;
use std::future::Future;
use std::sync::mpsc::{channel, Receiver, Sender};

/// Failure of a single analysis request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The request never produced an HTTP response.
    #[error("network error: {0}")]
    Network(String),

    /// The service answered with a non-2xx status.
    #[error("backend returned HTTP {status}")]
    Status {
        status: u16,
        /// The `error` field of the body, when present
        message: Option<String>,
    },

    /// A 2xx response whose body is not the expected JSON.
    #[error("malformed response body: {0}")]
    MalformedBody(String),
}

impl TransportError {
    /// Explanation supplied by the backend, if any.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

/// A request handed to the transport, tagged with its generation.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestTicket {
    pub generation: u64,
    pub request: AnalysisRequest,
}

/// The settled outcome of one ticket.
#[derive(Debug, Clone)]
pub struct Settlement {
    pub generation: u64,
    pub result: Result<AnalysisResponse, TransportError>,
}

/// Something that can carry an analysis request to the backend.
///
/// `send` must not block; the outcome is delivered later as a
/// [`Settlement`].
pub trait Transport {
    fn send(&self, ticket: RequestTicket);
}

/// Channel carrying settlements back to the UI thread.
pub struct AnalysisChannel {
    sender: Sender<Settlement>,
    receiver: Receiver<Settlement>,
}

impl Default for AnalysisChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalysisChannel {
    pub fn new() -> Self {
        let (sender, receiver) = channel();
        Self { sender, receiver }
    }

    pub fn sender(&self) -> Sender<Settlement> {
        self.sender.clone()
    }

    /// Non-blocking check for a settled request.
    pub fn try_recv(&self) -> Option<Settlement> {
        self.receiver.try_recv().ok()
    }
}

/// `reqwest`-backed transport posting JSON to the analysis endpoint and
/// fetching basemap tiles.
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
    sender: Sender<Settlement>,
    tile_sender: Sender<TileSettlement>,
    ctx: egui::Context,

    #[cfg(not(target_arch = "wasm32"))]
    runtime: tokio::runtime::Runtime,
}

impl HttpTransport {
    #[cfg(target_arch = "wasm32")]
    pub fn new(
        endpoint: String,
        channel: &AnalysisChannel,
        tiles: &TileChannel,
        ctx: egui::Context,
    ) -> std::io::Result<Self> {
        Ok(Self {
            client: reqwest::Client::new(),
            endpoint,
            sender: channel.sender(),
            tile_sender: tiles.sender(),
            ctx,
        })
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn new(
        endpoint: String,
        channel: &AnalysisChannel,
        tiles: &TileChannel,
        ctx: egui::Context,
    ) -> std::io::Result<Self> {
        Ok(Self {
            client: reqwest::Client::new(),
            endpoint,
            sender: channel.sender(),
            tile_sender: tiles.sender(),
            ctx,
            runtime: tokio::runtime::Runtime::new()?,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    #[cfg(target_arch = "wasm32")]
    fn spawn(&self, task: impl Future<Output = ()> + 'static) {
        wasm_bindgen_futures::spawn_local(task);
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn spawn(&self, task: impl Future<Output = ()> + Send + 'static) {
        self.runtime.spawn(task);
    }
}

impl Transport for HttpTransport {
    fn send(&self, ticket: RequestTicket) {
        let client = self.client.clone();
        let endpoint = self.endpoint.clone();
        let sender = self.sender.clone();
        let ctx = self.ctx.clone();

        let task = async move {
            let started = web_time::Instant::now();
            let result = post_analysis(&client, &endpoint, &ticket.request).await;
            log::debug!(
                "Request #{} settled after {:.1?} ({})",
                ticket.generation,
                started.elapsed(),
                if result.is_ok() { "ok" } else { "failed" }
            );
            let _ = sender.send(Settlement {
                generation: ticket.generation,
                result,
            });
            ctx.request_repaint();
        };

        self.spawn(task);
    }
}

impl TileSource for HttpTransport {
    fn request_tile(&self, tile: TileId, url: String) {
        let client = self.client.clone();
        let sender = self.tile_sender.clone();
        let ctx = self.ctx.clone();

        self.spawn(async move {
            let result = fetch_tile(&client, &url).await;
            let _ = sender.send(TileSettlement { tile, result });
            ctx.request_repaint();
        });
    }
}

/// Downloads and decodes one basemap tile.
async fn fetch_tile(client: &reqwest::Client, url: &str) -> Result<egui::ColorImage, TileError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| TileError::Network(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(TileError::Status(status.as_u16()));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| TileError::Network(e.to_string()))?;
    decode_tile(&bytes)
}

/// Performs the POST and interprets the response.
async fn post_analysis(
    client: &reqwest::Client,
    endpoint: &str,
    request: &AnalysisRequest,
) -> Result<AnalysisResponse, TransportError> {
    let response = client
        .post(endpoint)
        .json(request)
        .send()
        .await
        .map_err(|e| TransportError::Network(e.to_string()))?;

    let status = response.status().as_u16();
    let body = response
        .text()
        .await
        .map_err(|e| TransportError::Network(e.to_string()))?;

    parse_response(status, &body)
}

/// Maps an HTTP status and body onto the analysis response contract.
pub fn parse_response(status: u16, body: &str) -> Result<AnalysisResponse, TransportError> {
    if !(200..300).contains(&status) {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .map(|body| body.error);
        return Err(TransportError::Status { status, message });
    }

    serde_json::from_str(body).map_err(|e| TransportError::MalformedBody(e.to_string()))
}
