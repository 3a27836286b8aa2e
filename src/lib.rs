pub mod challenge;
pub mod config;
pub mod encoding;
pub mod error;
pub mod hashing;
pub mod report;
pub mod validation;

pub use challenge::get_random_challenge;
pub use config::{HubConfig, is_dev_env};
pub use encoding::{unicode_to_iri, utf8encoded};
pub use error::{HubError, Result};
pub use hashing::{get_hash_key_name, sha1_hash, sha1_hmac};
pub use validation::{DiagnosticSink, Rejection, TracingSink, UrlValidator, is_valid_url};
