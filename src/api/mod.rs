//! REST Gateway Bindings
//!
//! Thin async wrappers over the remote inventory/rental API, organized by
//! domain. One function per endpoint; no dispatch indirection.

mod items;
mod rentals;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::config::API_BASE;

pub use items::*;
pub use rentals::*;

/// Failure of a gateway call. `Clone` so a shared in-flight fetch can hand
/// the same failure to every caller that joined it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request never produced a response (refused, offline, CORS).
    #[error("network error: {0}")]
    Transport(String),
    /// The server answered with a non-2xx status. `message` carries the
    /// server-provided text when the body had one.
    #[error("server error ({status}): {message}")]
    Status { status: u16, message: String },
    /// The response body did not match the expected shape.
    #[error("malformed response: {0}")]
    Decode(String),
}

fn url(path: &str) -> String {
    format!("{API_BASE}{path}")
}

/// Rejects non-2xx responses, pulling the `message` field out of a JSON error
/// body when the server sends one.
async fn check(resp: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_owned))
        .unwrap_or(body);
    web_sys::console::warn_1(&format!("[API] request failed ({status}): {message}").into());
    Err(ApiError::Status {
        status: status.as_u16(),
        message,
    })
}

async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ApiError> {
    resp.json::<T>()
        .await
        .map_err(|e| ApiError::Decode(e.to_string()))
}

async fn send(method: Method, path: &str) -> Result<reqwest::Response, ApiError> {
    let resp = reqwest::Client::new()
        .request(method, url(path))
        .send()
        .await
        .map_err(|e| ApiError::Transport(e.to_string()))?;
    check(resp).await
}

async fn send_body<B: Serialize + ?Sized>(
    method: Method,
    path: &str,
    body: &B,
) -> Result<reqwest::Response, ApiError> {
    let resp = reqwest::Client::new()
        .request(method, url(path))
        .json(body)
        .send()
        .await
        .map_err(|e| ApiError::Transport(e.to_string()))?;
    check(resp).await
}

pub(crate) async fn get_json<T: DeserializeOwned>(path: &str) -> Result<T, ApiError> {
    decode(send(Method::GET, path).await?).await
}

pub(crate) async fn post_json<T: DeserializeOwned>(path: &str) -> Result<T, ApiError> {
    decode(send(Method::POST, path).await?).await
}

pub(crate) async fn send_json<T: DeserializeOwned, B: Serialize + ?Sized>(
    method: Method,
    path: &str,
    body: &B,
) -> Result<T, ApiError> {
    decode(send_body(method, path, body).await?).await
}

pub(crate) async fn delete(path: &str) -> Result<(), ApiError> {
    send(Method::DELETE, path).await.map(|_| ())
}
