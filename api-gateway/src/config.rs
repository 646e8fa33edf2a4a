//! API gateway configuration.
//!
//! This configures the HTTP listen address and the registration-ledger
//! location; embedding parameters stay with the clients that call the
//! watermark library directly.

use std::net::SocketAddr;

use watermark::RegistryConfig;

/// Configuration for the API gateway HTTP server.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Address to bind the HTTP server to.
    pub listen_addr: SocketAddr,
    /// Registration-ledger backing file.
    pub registry: RegistryConfig,
}

impl Default for ApiConfig {
    fn default() -> Self {
        // Safe to unwrap: fixed, valid address literal.
        // Bind to all interfaces so a container port mapping is
        // reachable from the host.
        let addr: SocketAddr = "0.0.0.0:8000"
            .parse()
            .expect("hard-coded API listen address should parse");
        Self {
            listen_addr: addr,
            registry: RegistryConfig::default(),
        }
    }
}
