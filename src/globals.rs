//! Shared HTTP client
//!
//! Every search dispatch goes through one pooled reqwest client so repeated
//! queries against the same API host reuse connections.

use reqwest::Client;
use std::sync::OnceLock;
use std::time::Duration;

/// Global HTTP client - reuses connections across requests
static HTTP_CLIENT: OnceLock<Client> = OnceLock::new();

/// Get or create the global HTTP client
///
/// Features:
/// - Connection pooling (reuses TCP connections)
/// - Gzip/Brotli decompression
/// - TCP and HTTP/2 keepalive
/// - Transport timeouts (the orchestrator adds none of its own)
/// - Proper User-Agent
pub fn get_http_client() -> &'static Client {
    HTTP_CLIENT.get_or_init(|| {
        Client::builder()
            // Timeouts
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(20))
            .read_timeout(Duration::from_secs(15))
            // Connection pooling
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(120))
            // TCP/HTTP keepalive
            .tcp_keepalive(Some(Duration::from_secs(60)))
            .http2_keep_alive_interval(Some(Duration::from_secs(30)))
            .http2_keep_alive_timeout(Duration::from_secs(10))
            // Compression
            .gzip(true)
            .brotli(true)
            .user_agent(concat!(
                "Mozilla/5.0 (compatible; newssearch-tui/",
                env!("CARGO_PKG_VERSION"),
                "; +https://github.com/user/newssearch-tui)"
            ))
            .build()
            .expect("Failed to create HTTP client")
    })
}
