use std::{collections::BTreeSet, fmt};

use url::Url;

const ALLOWED_SCHEMES: [&str; 2] = ["http", "https"];

/// Why a URL was turned down. Only ever handed to a [`DiagnosticSink`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    Unparseable,
    Scheme,
    Port,
    Fragment,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::Unparseable => "URL could not be parsed",
            Self::Scheme => "URL scheme is invalid",
            Self::Port => "URL port is invalid",
            Self::Fragment => "URL includes fragment",
        };
        f.write_str(msg)
    }
}

/// Receives a note for every URL that fails validation.
pub trait DiagnosticSink {
    fn rejected(&self, reason: Rejection, url: &str);
}

impl<F> DiagnosticSink for F
where
    F: Fn(Rejection, &str),
{
    fn rejected(&self, reason: Rejection, url: &str) {
        self(reason, url)
    }
}

/// Emits each rejection as a `tracing` debug event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn rejected(&self, reason: Rejection, url: &str) {
        tracing::debug!(url, "{reason}");
    }
}

/// URL checks for hub callbacks and topics.
///
/// `dev_env` turns off the port allow-list so local servers on arbitrary
/// ports pass. Never enable it for a deployment reachable from outside.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlValidator {
    valid_ports: BTreeSet<u16>,
    dev_env: bool,
}

impl UrlValidator {
    pub fn new(valid_ports: impl IntoIterator<Item = u16>, dev_env: bool) -> Self {
        Self {
            valid_ports: valid_ports.into_iter().collect(),
            dev_env,
        }
    }

    pub fn valid_ports(&self) -> &BTreeSet<u16> {
        &self.valid_ports
    }

    pub fn is_dev_env(&self) -> bool {
        self.dev_env
    }

    pub fn is_valid_url(&self, url: &str) -> bool {
        self.is_valid_url_with(url, &TracingSink)
    }

    pub fn is_valid_url_with(&self, url: &str, sink: &dyn DiagnosticSink) -> bool {
        match self.check(url) {
            Ok(()) => true,
            Err(reason) => {
                sink.rejected(reason, url);
                false
            }
        }
    }

    fn check(&self, url: &str) -> Result<(), Rejection> {
        let (without_port, port) = split_port(url);
        let parsed = Url::parse(&without_port).map_err(|_| Rejection::Unparseable)?;
        if !ALLOWED_SCHEMES.contains(&parsed.scheme()) {
            return Err(Rejection::Scheme);
        }

        if let Some(port) = port {
            if !self.dev_env && !self.is_allowed_port(port) {
                return Err(Rejection::Port);
            }
        }

        if parsed.fragment().is_some_and(|fragment| !fragment.is_empty()) {
            return Err(Rejection::Fragment);
        }

        Ok(())
    }

    fn is_allowed_port(&self, port: &str) -> bool {
        port.bytes().all(|byte| byte.is_ascii_digit())
            && port
                .parse::<u16>()
                .is_ok_and(|port| self.valid_ports.contains(&port))
    }
}

/// Cuts the port text off the network location, splitting on its last colon.
///
/// Returns the URL without that `:port` and the raw port text. Default ports
/// and anything after a colon in userinfo count as port text too. A colon
/// inside an IPv6 literal (`[::1]`) is not a port separator.
fn split_port(url: &str) -> (String, Option<&str>) {
    let Some(scheme_end) = url.find("://") else {
        return (url.to_string(), None);
    };
    if url[..scheme_end].contains(|ch: char| matches!(ch, '/' | '?' | '#')) {
        return (url.to_string(), None);
    }

    let netloc_start = scheme_end + 3;
    let netloc_end = url[netloc_start..]
        .find(|ch: char| matches!(ch, '/' | '\\' | '?' | '#'))
        .map_or(url.len(), |offset| netloc_start + offset);
    let netloc = &url[netloc_start..netloc_end];

    let Some(colon) = netloc.rfind(':') else {
        return (url.to_string(), None);
    };
    if netloc.rfind(']').is_some_and(|bracket| bracket > colon) {
        return (url.to_string(), None);
    }

    let port = &netloc[colon + 1..];
    let without_port = format!("{}{}", &url[..netloc_start + colon], &url[netloc_end..]);
    (without_port, (!port.is_empty()).then_some(port))
}

/// Returns true if `url` is an acceptable http(s) URL. Rejections are logged at debug level.
pub fn is_valid_url(url: &str, valid_ports: &BTreeSet<u16>, dev_env: bool) -> bool {
    UrlValidator::new(valid_ports.iter().copied(), dev_env).is_valid_url(url)
}
