//! Peer link configuration.

use crate::error::{HubError, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Configuration for the UDP peer link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkConfig {
    /// Local address to bind the link socket to
    pub bind_addr: String,
    /// The fixed remote measurement board
    pub peer_addr: String,
    /// Bounded wait for a snapshot response, in milliseconds
    pub response_wait_ms: u64,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            bind_addr: crate::DEFAULT_BIND_ADDR.to_string(),
            peer_addr: crate::DEFAULT_PEER_ADDR.to_string(),
            response_wait_ms: crate::DEFAULT_RESPONSE_WAIT_MS,
        }
    }
}

impl LinkConfig {
    /// Create a new link configuration with custom bind and peer addresses.
    pub fn new(bind_addr: impl Into<String>, peer_addr: impl Into<String>) -> Self {
        Self {
            bind_addr: bind_addr.into(),
            peer_addr: peer_addr.into(),
            ..Default::default()
        }
    }

    /// Set the local bind address.
    pub fn with_bind_addr(mut self, bind_addr: impl Into<String>) -> Self {
        self.bind_addr = bind_addr.into();
        self
    }

    /// Set the fixed peer address.
    pub fn with_peer_addr(mut self, peer_addr: impl Into<String>) -> Self {
        self.peer_addr = peer_addr.into();
        self
    }

    /// Set the bounded response wait.
    pub fn with_response_wait_ms(mut self, response_wait_ms: u64) -> Self {
        self.response_wait_ms = response_wait_ms;
        self
    }

    /// Parse the bind address.
    pub fn bind_address(&self) -> Result<SocketAddr> {
        self.bind_addr
            .parse()
            .map_err(|e| HubError::config_error(format!("Invalid bind address: {}", e)))
    }

    /// Parse the peer address.
    pub fn peer_address(&self) -> Result<SocketAddr> {
        self.peer_addr
            .parse()
            .map_err(|e| HubError::config_error(format!("Invalid peer address: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_pattern() {
        let config = LinkConfig::default()
            .with_bind_addr("127.0.0.1:0")
            .with_peer_addr("127.0.0.1:47701")
            .with_response_wait_ms(250);

        assert_eq!(config.bind_addr, "127.0.0.1:0");
        assert_eq!(config.peer_addr, "127.0.0.1:47701");
        assert_eq!(config.response_wait_ms, 250);
        assert!(config.bind_address().is_ok());
        assert!(config.peer_address().is_ok());
    }

    #[test]
    fn test_invalid_addresses_are_config_errors() {
        let config = LinkConfig::new("not-an-address", "also-bad");
        assert!(matches!(config.bind_address(), Err(HubError::Config(_))));
        assert!(matches!(config.peer_address(), Err(HubError::Config(_))));
    }
}
