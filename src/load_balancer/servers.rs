//! Parser for the HAProxy `show servers conn <backend>` table.
//!
//! ```text
//! # bkname/svname bkid/svid addr port - purge_delay used_cur used_max ...
//! web/web1 3/1 172.18.0.3 8080 - 5000 0 1 ...
//! web/web2 3/2 - 8080 - 5000 0 0 ...
//! ```
//!
//! Only the qualified name (column 1) and the address (column 3) matter.

use crate::load_balancer::backend::BackendStatus;
use crate::load_balancer::ProbeError;

/// Address placeholder for a server with no address assigned.
const UNASSIGNED: &str = "-";

/// One row of the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerRow {
    pub group: String,
    pub server: String,
    pub address: String,
}

impl ServerRow {
    pub fn status(&self) -> BackendStatus {
        if self.address == UNASSIGNED {
            BackendStatus::Stopped
        } else {
            BackendStatus::Running {
                address: self.address.clone(),
            }
        }
    }
}

/// Parsed `show servers conn` response.
#[derive(Debug, Clone, Default)]
pub struct ServerTable {
    rows: Vec<ServerRow>,
}

impl ServerTable {
    /// Parse a full response.
    ///
    /// Anything without the `#` header line is an error reply from HAProxy
    /// (unknown command, unknown backend, permission denied).
    pub fn parse(response: &str) -> Result<Self, ProbeError> {
        let mut lines = response.lines().map(str::trim).filter(|l| !l.is_empty());

        match lines.next() {
            Some(header) if header.starts_with('#') => {}
            Some(other) => return Err(ProbeError::Malformed(other.to_string())),
            None => return Err(ProbeError::Malformed("empty response".to_string())),
        }

        let mut rows = Vec::new();
        for line in lines {
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() < 3 {
                return Err(ProbeError::Malformed(line.to_string()));
            }
            let Some((group, server)) = fields[0].split_once('/') else {
                return Err(ProbeError::Malformed(line.to_string()));
            };
            rows.push(ServerRow {
                group: group.to_string(),
                server: server.to_string(),
                address: fields[2].to_string(),
            });
        }

        Ok(Self { rows })
    }

    /// Find the row for `group/server` by exact name.
    pub fn find(&self, group: &str, server: &str) -> Option<&ServerRow> {
        self.rows
            .iter()
            .find(|row| row.group == group && row.server == server)
    }

    pub fn rows(&self) -> &[ServerRow] {
        &self.rows
    }
}
