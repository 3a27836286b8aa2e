use std::cell::Cell;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    challenge::get_random_challenge,
    config::HubConfig,
    encoding::unicode_to_iri,
    error::Result,
    hashing::{get_hash_key_name, sha1_hmac},
    validation::{Rejection, UrlValidator},
};

pub const SAMPLE_VALUE: &str = "hub selfcheck";
pub const SAMPLE_SECRET: &str = "hub-selfcheck-secret";
pub const SAMPLE_IRI: &str = "http://exämple.com/ünïcode path";

/// Probe URLs and the verdict expected outside dev mode with an empty allow-list.
pub const PROBE_URLS: [(&str, bool); 6] = [
    ("http://example.com/path", true),
    ("https://example.com/callback?x=1", true),
    ("ftp://example.com", false),
    ("http://example.com/path#frag", false),
    ("http://example.com:9999/path", false),
    ("not a url", false),
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UrlProbe {
    pub url: String,
    pub valid: bool,
    pub rejection: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelfcheckReport {
    pub checked_at: DateTime<Utc>,
    pub config: HubConfig,
    pub dev_env: bool,
    pub challenge: String,
    pub hash_key_name: String,
    pub hmac: String,
    pub iri: String,
    pub probes: Vec<UrlProbe>,
}

impl SelfcheckReport {
    pub fn collect(config: &HubConfig) -> Result<Self> {
        let validator = config.url_validator();
        let probes = PROBE_URLS
            .iter()
            .map(|(url, _)| probe(&validator, url))
            .collect();

        Ok(Self {
            checked_at: Utc::now(),
            config: config.clone(),
            dev_env: config.is_dev_env(),
            challenge: get_random_challenge()?,
            hash_key_name: get_hash_key_name(SAMPLE_VALUE),
            hmac: sha1_hmac(SAMPLE_SECRET, SAMPLE_VALUE),
            iri: unicode_to_iri(SAMPLE_IRI)?,
            probes,
        })
    }
}

fn probe(validator: &UrlValidator, url: &str) -> UrlProbe {
    let rejection: Cell<Option<Rejection>> = Cell::new(None);
    let valid = validator.is_valid_url_with(url, &|reason: Rejection, url: &str| {
        tracing::debug!(url, "{reason}");
        rejection.set(Some(reason));
    });
    UrlProbe {
        url: url.to_string(),
        valid,
        rejection: rejection.get().map(|reason| reason.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn production_probes_match_expectations() {
        let report = SelfcheckReport::collect(&HubConfig::default()).unwrap();
        assert!(!report.dev_env);
        for (probe, (url, expected)) in report.probes.iter().zip(PROBE_URLS) {
            assert_eq!(probe.url, url);
            assert_eq!(probe.valid, expected, "{url}");
            assert_eq!(probe.rejection.is_none(), expected, "{url}");
        }
    }

    #[test]
    fn dev_mode_accepts_odd_port() {
        let config = HubConfig::new("Development/1.0", []);
        let report = SelfcheckReport::collect(&config).unwrap();
        let port_probe = report
            .probes
            .iter()
            .find(|probe| probe.url == "http://example.com:9999/path")
            .unwrap();
        assert!(port_probe.valid);
    }

    #[test]
    fn serializes_to_json() {
        let report = SelfcheckReport::collect(&HubConfig::new("", [8080])).unwrap();
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["config"]["valid_ports"], serde_json::json!([8080]));
        assert_eq!(value["challenge"].as_str().unwrap().len(), 128);
        assert_eq!(value["iri"], "http://ex%C3%A4mple.com/%C3%BCn%C3%AFcode%20path");
        assert!(value["hash_key_name"].as_str().unwrap().starts_with("hash_"));
    }
}
