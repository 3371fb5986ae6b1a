use async_trait::async_trait;
use reqwest::Url;
use std::time::Duration;
use tokio::net::TcpStream;

use crate::error::{Result, WeatherError};

use super::NetworkRepository;

/// Reports the network as available when a TCP connection to the API host succeeds.
#[derive(Debug, Clone)]
pub struct TcpNetworkProbe {
    host: String,
    port: u16,
    timeout: Duration,
}

impl TcpNetworkProbe {
    pub fn new(host: impl Into<String>, port: u16, timeout: Duration) -> Self {
        Self {
            host: host.into(),
            port,
            timeout,
        }
    }

    /// Probe the host serving `url`, on its explicit or scheme-default port.
    pub fn for_url(url: &str, timeout: Duration) -> Result<Self> {
        let parsed = Url::parse(url)
            .map_err(|err| WeatherError::Config(format!("invalid URL '{url}': {err}")))?;

        let host = parsed
            .host_str()
            .ok_or_else(|| WeatherError::Config(format!("URL '{url}' has no host")))?;
        let port = parsed
            .port_or_known_default()
            .ok_or_else(|| WeatherError::Config(format!("URL '{url}' has no known port")))?;

        Ok(Self::new(host, port, timeout))
    }
}

#[async_trait]
impl NetworkRepository for TcpNetworkProbe {
    async fn is_network_available(&self) -> Result<bool> {
        let connect = TcpStream::connect((self.host.as_str(), self.port));

        let available = match tokio::time::timeout(self.timeout, connect).await {
            Ok(Ok(_)) => true,
            Ok(Err(err)) => {
                tracing::debug!(host = %self.host, port = self.port, %err, "network probe failed");
                false
            }
            Err(_) => {
                tracing::debug!(host = %self.host, port = self.port, "network probe timed out");
                false
            }
        };

        Ok(available)
    }
}
