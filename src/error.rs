use thiserror::Error;

#[derive(Debug, Error)]
pub enum HubError {
    #[error("no scheme separator found in {input:?}")]
    MissingScheme { input: String },

    #[error("invalid port in VALID_PORTS: {value:?}")]
    InvalidPort { value: String },

    #[error("read random bytes: {0}")]
    Random(#[from] getrandom::Error),
}

pub type Result<T> = std::result::Result<T, HubError>;
