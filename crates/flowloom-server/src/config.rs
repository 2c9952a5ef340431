use std::net::SocketAddr;

use flowloom_llm::LlmConfig;

const DEFAULT_PORT: u16 = 5000;

/// Process configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub llm: LlmConfig,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_PORT);
        Self {
            port,
            llm: LlmConfig::from_env(),
        }
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from(([127, 0, 0, 1], self.port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listen_addr_uses_port() {
        let config = ServerConfig {
            port: 8123,
            llm: LlmConfig::default(),
        };
        assert_eq!(config.listen_addr().to_string(), "127.0.0.1:8123");
    }
}
