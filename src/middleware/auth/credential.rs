//! Bearer credential lookup.
//!
//! Sources, first match wins:
//! 1. `Authorization` header, raw bytes, whenever it is non-empty
//! 2. `token` query parameter, as `Bearer <value>`
//! 3. session cookie, as `Bearer <value>`
//!
//! The query fallback puts tokens in URLs, which proxies and access logs keep.
use axum::body::Bytes;
use axum::http::{HeaderMap, Uri, header};
use cookie::Cookie;

pub const TOKEN_QUERY_PARAM: &str = "token";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    Header,
    Query,
    Cookie,
}

impl CredentialSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Header => "header",
            Self::Query => "query",
            Self::Cookie => "cookie",
        }
    }
}

/// A bearer-formatted credential for a single request.
///
/// `value` keeps raw bytes so a header that is not visible ASCII still wins
/// and reaches the identity provider untouched.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub value: Bytes,
    pub source: CredentialSource,
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // token itself stays out of logs
        f.debug_struct("Credential")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

pub fn extract_credential(headers: &HeaderMap, uri: &Uri, cookie_name: &str) -> Option<Credential> {
    if let Some(value) = headers
        .get(header::AUTHORIZATION)
        .filter(|v| !v.as_bytes().is_empty())
    {
        return Some(Credential {
            value: Bytes::copy_from_slice(value.as_bytes()),
            source: CredentialSource::Header,
        });
    }

    if let Some(token) = query_token(uri) {
        return Some(Credential {
            value: Bytes::from(format!("Bearer {}", token)),
            source: CredentialSource::Query,
        });
    }

    cookie_value(headers, cookie_name).map(|token| Credential {
        value: Bytes::from(format!("Bearer {}", token)),
        source: CredentialSource::Cookie,
    })
}

fn query_token(uri: &Uri) -> Option<String> {
    let query = uri.query()?;
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == TOKEN_QUERY_PARAM)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| Cookie::split_parse(v))
        .filter_map(Result::ok)
        .find(|c| c.name() == name)
        .map(|c| c.value_trimmed().to_string())
        .filter(|value| !value.is_empty())
}
