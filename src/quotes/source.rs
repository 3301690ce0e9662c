//! Remote quote source
//!
//! `QuoteSource` is the seam between the fetch loop and the network.
//! `HttpQuoteSource` performs a single `GET` against the configured endpoint.

use async_trait::async_trait;
use serde::{Deserialize, Deserializer};
use thiserror::Error;

/// Author shown when the API omits one
pub const UNKNOWN_AUTHOR: &str = "Unknown";

/// Why a single attempt failed
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP {0}")]
    Status(u16),

    #[error("malformed payload: {0}")]
    Malformed(String),

    #[error("attempt timed out after {0} ms")]
    Timeout(u64),
}

/// Response body of the quotes endpoint (`{ quote, author }`, extra fields ignored)
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct QuotePayload {
    #[serde(default)]
    pub quote: Option<String>,
    #[serde(default, deserialize_with = "lenient_author")]
    pub author: Option<String>,
}

/// Accept a non-string author (`42`, `true`) as its text instead of
/// rejecting the whole payload; null and structured values count as absent
fn lenient_author<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        Some(serde_json::Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

/// A payload that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawQuote {
    pub text: String,
    pub author: Option<String>,
}

impl RawQuote {
    /// `"<text> – <author>"`, with `Unknown` for a missing or empty author
    pub fn formatted(&self) -> String {
        let author = self
            .author
            .as_deref()
            .filter(|a| !a.is_empty())
            .unwrap_or(UNKNOWN_AUTHOR);
        format!("{} – {}", self.text, author)
    }

    /// Trimmed author, empty when absent
    pub fn author_trimmed(&self) -> &str {
        self.author.as_deref().unwrap_or_default().trim()
    }
}

impl TryFrom<QuotePayload> for RawQuote {
    type Error = FetchError;

    fn try_from(payload: QuotePayload) -> Result<Self, Self::Error> {
        match payload.quote {
            Some(text) if !text.is_empty() => Ok(RawQuote {
                text,
                author: payload.author,
            }),
            _ => Err(FetchError::Malformed("missing quote text".into())),
        }
    }
}

#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// Fetch one random quote. Timeouts are applied by the caller.
    async fn random_quote(&self) -> Result<RawQuote, FetchError>;
}

/// Quote source backed by an HTTP JSON endpoint
pub struct HttpQuoteSource {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpQuoteSource {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("quotebox/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl QuoteSource for HttpQuoteSource {
    async fn random_quote(&self) -> Result<RawQuote, FetchError> {
        let resp = self.client.get(&self.endpoint).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let payload: QuotePayload = resp
            .json()
            .await
            .map_err(|e| FetchError::Malformed(e.to_string()))?;

        RawQuote::try_from(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    fn payload(json: &str) -> QuotePayload {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_formatted_quote() {
        let raw = RawQuote::try_from(payload(r#"{"quote":"Life is short","author":"Anon"}"#)).unwrap();
        assert_eq!(raw.formatted(), "Life is short – Anon");
    }

    #[test]
    fn test_missing_author_is_unknown() {
        let raw = RawQuote::try_from(payload(r#"{"id":3,"quote":"Be kind"}"#)).unwrap();
        assert_eq!(raw.formatted(), "Be kind – Unknown");

        let raw = RawQuote::try_from(payload(r#"{"quote":"Be kind","author":""}"#)).unwrap();
        assert_eq!(raw.formatted(), "Be kind – Unknown");
        assert_eq!(raw.author_trimmed(), "");
    }

    #[test]
    fn test_missing_quote_is_malformed() {
        assert!(matches!(
            RawQuote::try_from(payload(r#"{"author":"Anon"}"#)),
            Err(FetchError::Malformed(_))
        ));
        assert!(matches!(
            RawQuote::try_from(payload(r#"{"quote":"","author":"Anon"}"#)),
            Err(FetchError::Malformed(_))
        ));
    }

    #[test]
    fn test_non_string_author_keeps_quote() {
        let raw = RawQuote::try_from(payload(r#"{"quote":"Hi","author":42}"#)).unwrap();
        assert_eq!(raw.formatted(), "Hi – 42");

        let raw = RawQuote::try_from(payload(r#"{"quote":"Hi","author":null}"#)).unwrap();
        assert_eq!(raw.formatted(), "Hi – Unknown");

        let raw = RawQuote::try_from(payload(r#"{"quote":"Hi","author":{"name":"x"}}"#)).unwrap();
        assert_eq!(raw.formatted(), "Hi – Unknown");
    }

    #[test]
    fn test_client_creation() {
        let source = HttpQuoteSource::new("https://dummyjson.com/quotes/random");
        assert!(source.is_ok());
    }

    /// Serve one canned HTTP response on a local port and return its URL
    fn serve_once(status: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = [0u8; 4096];
            let mut request = Vec::new();
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).unwrap();
        });

        format!("http://{}/quotes/random", addr)
    }

    #[tokio::test]
    async fn test_http_error_status() {
        let source = HttpQuoteSource::new(serve_once("503 Service Unavailable", "")).unwrap();
        assert!(matches!(source.random_quote().await, Err(FetchError::Status(503))));
    }

    #[tokio::test]
    async fn test_http_undecodable_body() {
        let source = HttpQuoteSource::new(serve_once("200 OK", "not json")).unwrap();
        assert!(matches!(source.random_quote().await, Err(FetchError::Malformed(_))));
    }

    #[tokio::test]
    async fn test_http_success_ignores_extra_fields() {
        let source = HttpQuoteSource::new(serve_once(
            "200 OK",
            r#"{"id":7,"quote":"Hi","author":"Anon"}"#,
        ))
        .unwrap();
        let raw = source.random_quote().await.unwrap();
        assert_eq!(raw.formatted(), "Hi – Anon");
    }
}
