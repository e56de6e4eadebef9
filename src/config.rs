//! Client Configuration
//!
//! Compile-time tunables shared across the gateway, cache and push layers.

/// Base path of the REST gateway. Relative, so the browser resolves it
/// against the page origin.
pub const API_BASE: &str = "/api";

/// Path of the push-channel WebSocket endpoint on the same host.
pub const PUSH_ENDPOINT: &str = "/ws";

/// Cached query results older than this are reloaded on the next fetch.
pub const STALE_AFTER_MS: f64 = 5.0 * 60.0 * 1000.0;

/// Rows per page in the rental list.
pub const PAGE_SIZE: usize = 5;

/// Delay before the push listener retries a dropped connection.
pub const RECONNECT_DELAY_MS: u32 = 5_000;

/// How long a toast stays on screen before it dismisses itself.
pub const NOTICE_TTL_MS: u32 = 4_000;
