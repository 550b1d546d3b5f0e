// ──────────────────────────────────────────────────────────────────────────────
// nextcloud-client · request
// ──────────────────────────────────────────────────────────────────────────────
// Request values handed from the endpoint wrappers to a `Requester`:
//  • `Endpoint` – base path + the OCS status code meaning success
//  • `OcsRequest` / `Fields` – one OCS call, fields in order
//  • `DavRequest` / `DavReply` – one WebDAV call below /remote.php/dav
// ──────────────────────────────────────────────────────────────────────────────

use crate::error::{NcResult, NextcloudError};
use async_trait::async_trait;
use nextcloud_types::OcsResponse;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::Method;
use std::fmt::Display;
use std::time::Duration;

/// Root of every WebDAV path.
pub const DAV_ROOT: &str = "/remote.php/dav";

/// Characters escaped inside a single URL path segment.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// An OCS endpoint group: where it lives and which `meta.statuscode`
/// counts as success (100 for `/ocs/v1.php`, 200 for `/ocs/v2.php`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    pub base: &'static str,
    pub success_code: u32,
}

impl Endpoint {
    pub const fn new(base: &'static str, success_code: u32) -> Self {
        Self { base, success_code }
    }

    pub fn request(self, method: Method, path: impl Into<String>) -> OcsRequest {
        OcsRequest {
            endpoint: self,
            method,
            path: path.into(),
            fields: Fields::new(),
            timeout: None,
        }
    }

    pub fn get(self, path: impl Into<String>) -> OcsRequest {
        self.request(Method::GET, path)
    }

    pub fn post(self, path: impl Into<String>) -> OcsRequest {
        self.request(Method::POST, path)
    }

    pub fn put(self, path: impl Into<String>) -> OcsRequest {
        self.request(Method::PUT, path)
    }

    pub fn delete(self, path: impl Into<String>) -> OcsRequest {
        self.request(Method::DELETE, path)
    }
}

/// One OCS call.
#[derive(Debug, Clone, PartialEq)]
pub struct OcsRequest {
    pub endpoint: Endpoint,
    pub method: Method,
    /// Relative to `endpoint.base`; empty addresses the base itself.
    pub path: String,
    pub fields: Fields,
    /// Overrides the client-wide timeout for this call only.
    pub timeout: Option<Duration>,
}

impl OcsRequest {
    pub fn fields(mut self, fields: Fields) -> Self {
        self.fields = fields;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Absolute path below the server root.
    pub fn url_path(&self) -> String {
        let path = self.path.trim_matches('/');
        if path.is_empty() {
            self.endpoint.base.to_string()
        } else {
            format!("{}/{}", self.endpoint.base.trim_end_matches('/'), path)
        }
    }

    /// GET and HEAD carry their fields in the query string.
    pub fn sends_query(&self) -> bool {
        self.method == Method::GET || self.method == Method::HEAD
    }
}

/// Ordered form/query fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fields(Vec<(String, String)>);

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(mut self, key: &str, value: impl Display) -> Self {
        self.0.push((key.to_string(), value.to_string()));
        self
    }

    pub fn push_opt<V: Display>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.push(key, v),
            None => self,
        }
    }

    /// `1` / `0`
    pub fn push_flag(self, key: &str, value: bool) -> Self {
        self.push(key, u8::from(value))
    }

    /// `true` / `false`
    pub fn push_bool(self, key: &str, value: bool) -> Self {
        self.push(key, value)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn as_slice(&self) -> &[(String, String)] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// One WebDAV call.
#[derive(Debug, Clone, PartialEq)]
pub struct DavRequest {
    pub method: Method,
    /// Relative to [`DAV_ROOT`], already percent-encoded.
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
    /// Target of MOVE / COPY, relative to [`DAV_ROOT`]; the requester
    /// turns it into the absolute URL the `Destination` header needs.
    pub destination: Option<String>,
}

impl DavRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: Vec::new(),
            body: None,
            destination: None,
        }
    }

    pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((name.to_string(), value.into()));
        self
    }

    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn destination(mut self, path: impl Into<String>) -> Self {
        self.destination = Some(path.into());
        self
    }

    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A successful WebDAV reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DavReply {
    pub status: u16,
    pub body: Vec<u8>,
}

impl DavReply {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Transport seam between the wrappers and the HTTP client.
#[async_trait]
pub trait Requester: Send + Sync {
    /// Perform an OCS call; `Ok` only when `meta.statuscode` equals the
    /// endpoint's success code.
    async fn ocs(&self, request: OcsRequest) -> NcResult<OcsResponse<serde_json::Value>>;

    /// Perform a WebDAV call; `Ok` only for 2xx replies.
    async fn dav(&self, request: DavRequest) -> NcResult<DavReply>;
}

/// Percent-encode one path segment (ids, tokens, user names, file names).
pub fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, SEGMENT).to_string()
}

/// Percent-encode each segment of a slash-separated path, dropping
/// empty segments.
pub fn encode_path(path: &str) -> String {
    path.split('/')
        .filter(|s| !s.is_empty())
        .map(encode_segment)
        .collect::<Vec<_>>()
        .join("/")
}

/// Build a WebDAV extension verb (PROPFIND, MKCOL, ...).
pub fn dav_method(name: &str) -> NcResult<Method> {
    Method::from_bytes(name.as_bytes())
        .map_err(|e| NextcloudError::invalid(format!("bad method {name}: {e}")))
}
