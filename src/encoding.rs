use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

use crate::error::{HubError, Result};

/// Printable ASCII outside the RFC 3986 unreserved and reserved sets.
/// Non-ASCII bytes are always encoded.
const IRI_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'\\')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Returns the UTF-8 bytes of `data`, passing `None` through.
pub fn utf8encoded(data: Option<&str>) -> Option<Vec<u8>> {
    data.map(|text| text.as_bytes().to_vec())
}

/// Converts a URL that may contain non-ASCII characters into an IRI (RFC 3987).
///
/// The scheme is kept verbatim; everything after the first `:` is percent-encoded.
pub fn unicode_to_iri(url: &str) -> Result<String> {
    let Some((scheme, rest)) = url.split_once(':') else {
        return Err(HubError::MissingScheme {
            input: url.to_string(),
        });
    };
    let encoded = utf8_percent_encode(rest, IRI_ENCODE_SET);
    Ok(format!("{scheme}:{encoded}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8encoded_passes_none_through() {
        assert_eq!(utf8encoded(None), None);
    }

    #[test]
    fn utf8encoded_round_trips_text() {
        for text in ["", "plain", "exämple", "日本語", "emoji 🚀"] {
            let bytes = utf8encoded(Some(text)).unwrap();
            assert_eq!(String::from_utf8(bytes).unwrap(), text);
        }
    }

    #[test]
    fn iri_encodes_non_ascii_host() {
        let iri = unicode_to_iri("http://exämple.com/").unwrap();
        assert_eq!(iri, "http://ex%C3%A4mple.com/");
        assert!(iri.is_ascii());
    }

    #[test]
    fn iri_keeps_reserved_and_unreserved() {
        let url = "https://user@host:8080/a-b_c.d~e/f?q=1&r=[2]#frag!$'()*+,;";
        assert_eq!(unicode_to_iri(url).unwrap(), url);
    }

    #[test]
    fn iri_encodes_space_and_percent() {
        assert_eq!(
            unicode_to_iri("http://host/a b%20c").unwrap(),
            "http://host/a%20b%2520c"
        );
    }

    #[test]
    fn iri_splits_on_first_colon_only() {
        assert_eq!(
            unicode_to_iri("urn:isbn:ü").unwrap(),
            "urn:isbn:%C3%BC"
        );
    }

    #[test]
    fn iri_keeps_scheme_verbatim() {
        assert_eq!(unicode_to_iri("HTTP://ä").unwrap(), "HTTP://%C3%A4");
    }

    #[test]
    fn iri_without_colon_fails() {
        let err = unicode_to_iri("example.com/path").unwrap_err();
        assert!(matches!(err, HubError::MissingScheme { ref input } if input == "example.com/path"));
    }
}
