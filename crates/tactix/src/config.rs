//! Runtime configuration for the relay.

/// Addresses the server binds at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address of the WebSocket game listener.
    pub bind_addr: String,

    /// Address of the plain-HTTP liveness listener.
    pub health_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:4000".to_string(),
            health_addr: "0.0.0.0:4001".to_string(),
        }
    }
}

impl ServerConfig {
    /// Builds a config from the environment.
    ///
    /// `PORT` picks the game port (hosting platforms inject it);
    /// `TACTIX_ADDR` overrides the full game address and wins over
    /// `PORT`; `TACTIX_HEALTH_ADDR` overrides the liveness address.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(port) = std::env::var("PORT") {
            config.bind_addr = format!("0.0.0.0:{port}");
        }
        if let Ok(addr) = std::env::var("TACTIX_ADDR") {
            config.bind_addr = addr;
        }
        if let Ok(addr) = std::env::var("TACTIX_HEALTH_ADDR") {
            config.health_addr = addr;
        }
        config
    }
}
