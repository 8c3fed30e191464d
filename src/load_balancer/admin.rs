//! HAProxy runtime API client.
//!
//! # Responsibilities
//! - Send one command per connection to the admin socket (TCP)
//! - Read the reply until HAProxy closes the connection
//! - Answer status probes from the `show servers conn` table
//!
//! # Design Decisions
//! - Non-interactive mode: write the command, half-close, read to EOF
//! - The whole exchange (connect + write + read) shares one deadline
//! - A server missing from the table reads as stopped, but is logged

use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time;

use crate::config::LoadBalancerConfig;
use crate::load_balancer::backend::BackendStatus;
use crate::load_balancer::servers::ServerTable;
use crate::load_balancer::{ProbeError, StatusProbe};

/// Status probe backed by the HAProxy admin socket.
#[derive(Debug, Clone)]
pub struct AdminSocketProbe {
    address: String,
    group: String,
    timeout: Duration,
}

impl AdminSocketProbe {
    pub fn new(address: impl Into<String>, group: impl Into<String>, timeout: Duration) -> Self {
        Self {
            address: address.into(),
            group: group.into(),
            timeout,
        }
    }

    pub fn from_config(config: &LoadBalancerConfig, timeout: Duration) -> Self {
        Self::new(&config.admin_address, &config.backend_group, timeout)
    }

    /// Run a single runtime API command and return the raw reply.
    pub async fn query(&self, command: &str) -> Result<String, ProbeError> {
        let exchange = async {
            let mut stream = TcpStream::connect(&self.address)
                .await
                .map_err(ProbeError::Connect)?;

            stream
                .write_all(format!("{}\n", command).as_bytes())
                .await
                .map_err(ProbeError::Io)?;
            stream.shutdown().await.map_err(ProbeError::Io)?;

            let mut reply = String::new();
            stream
                .read_to_string(&mut reply)
                .await
                .map_err(ProbeError::Io)?;
            Ok(reply)
        };

        time::timeout(self.timeout, exchange)
            .await
            .map_err(|_| ProbeError::Timeout(self.timeout))?
    }

    /// Fetch the connection table for the configured backend group.
    pub async fn show_servers(&self) -> Result<ServerTable, ProbeError> {
        let reply = self
            .query(&format!("show servers conn {}", self.group))
            .await?;
        ServerTable::parse(&reply)
    }
}

impl StatusProbe for AdminSocketProbe {
    async fn status(&self, backend: &str) -> Result<BackendStatus, ProbeError> {
        tracing::debug!(backend, admin = %self.address, "Querying admin socket");
        let table = self.show_servers().await?;

        match table.find(&self.group, backend) {
            Some(row) => Ok(row.status()),
            None => {
                tracing::warn!(
                    backend,
                    group = %self.group,
                    "Server not present in load balancer table, treating as stopped"
                );
                Ok(BackendStatus::Stopped)
            }
        }
    }
}
