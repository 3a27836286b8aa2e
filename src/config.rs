use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{
    error::{HubError, Result},
    validation::UrlValidator,
};

pub const SERVER_SOFTWARE_VAR: &str = "SERVER_SOFTWARE";
pub const VALID_PORTS_VAR: &str = "VALID_PORTS";

const DEV_MARKER: &str = "Dev";

/// Returns true if the server software indicator names a development server.
pub fn is_dev_env(server_software: &str) -> bool {
    server_software.contains(DEV_MARKER)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HubConfig {
    #[serde(default)]
    pub server_software: String,
    #[serde(default)]
    pub valid_ports: BTreeSet<u16>,
}

impl HubConfig {
    pub fn new(server_software: impl Into<String>, valid_ports: impl IntoIterator<Item = u16>) -> Self {
        Self {
            server_software: server_software.into(),
            valid_ports: valid_ports.into_iter().collect(),
        }
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from an arbitrary variable source. Missing variables read as empty.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let server_software = lookup(SERVER_SOFTWARE_VAR).unwrap_or_default();
        let valid_ports = parse_valid_ports(&lookup(VALID_PORTS_VAR).unwrap_or_default())?;
        Ok(Self {
            server_software,
            valid_ports,
        })
    }

    pub fn is_dev_env(&self) -> bool {
        is_dev_env(&self.server_software)
    }

    pub fn url_validator(&self) -> UrlValidator {
        UrlValidator::new(self.valid_ports.iter().copied(), self.is_dev_env())
    }
}

/// Parses a comma separated port list such as `"80, 443,8080"`.
pub fn parse_valid_ports(raw: &str) -> Result<BTreeSet<u16>> {
    raw.split(',')
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(|value| {
            value.parse::<u16>().map_err(|_| HubError::InvalidPort {
                value: value.to_string(),
            })
        })
        .collect()
}

/// Installs a `tracing` fmt subscriber. `RUST_LOG` wins over the defaults.
pub fn init_logger(config: &HubConfig) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if config.is_dev_env() {
            EnvFilter::new("hub_utils=debug,hub_selfcheck=debug")
        } else {
            EnvFilter::new("hub_utils=info,hub_selfcheck=info")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
