// ──────────────────────────────────────────────────────────────────────────────
// nextcloud-client · client
// ──────────────────────────────────────────────────────────────────────────────
// reqwest-backed `Requester` shared by every endpoint wrapper:
//  • OCS calls: basic auth, `OCS-APIRequest`, `format=json`, envelope checks
//  • WebDAV calls below /remote.php/dav
//  • Retry logic with exponential back-off & 429 handling
// ──────────────────────────────────────────────────────────────────────────────

use crate::config::ClientConfig;
use crate::error::{body_snippet, NcResult, NextcloudError};
use crate::request::{DavReply, DavRequest, OcsRequest, Requester, DAV_ROOT};
use async_trait::async_trait;
use log::{debug, warn};
use nextcloud_types::OcsResponse;
use reqwest::{header, Client, Method, RequestBuilder, Response, StatusCode};
use std::time::Duration;

const INITIAL_BACKOFF_MS: u64 = 500;
/// Upper bound for any single wait between attempts.
const MAX_BACKOFF_MS: u64 = 30_000;

/// Low-level Nextcloud HTTP client.
#[derive(Debug, Clone)]
pub struct NextcloudClient {
    http: Client,
    config: ClientConfig,
}

impl NextcloudClient {
    // ── Constructors ─────────────────────────────────────────────────────

    pub fn new(config: ClientConfig) -> NcResult<Self> {
        config.validate()?;
        let http = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()?;
        Ok(Self { http, config })
    }

    pub fn with_credentials(base_url: &str, username: &str, password: &str) -> NcResult<Self> {
        Self::new(ClientConfig::new(base_url, username, password))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn base_url(&self) -> &str {
        self.config.base_url()
    }

    pub fn username(&self) -> &str {
        &self.config.user
    }

    // ── URL builders ─────────────────────────────────────────────────────

    pub fn ocs_url(&self, request: &OcsRequest) -> String {
        format!("{}{}", self.base_url(), request.url_path())
    }

    /// Absolute URL of a path relative to `/remote.php/dav`.
    pub fn dav_url(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        if path.is_empty() {
            format!("{}{}", self.base_url(), DAV_ROOT)
        } else {
            format!("{}{}/{}", self.base_url(), DAV_ROOT, path)
        }
    }

    fn apply_auth(&self, req: RequestBuilder) -> RequestBuilder {
        req.basic_auth(&self.config.user, Some(&self.config.password))
    }

    // ── Retry engine ─────────────────────────────────────────────────────

    async fn send_with_retry(&self, req: RequestBuilder) -> NcResult<Response> {
        let request = req.build()?;
        let max_retries = self.config.max_retries;
        let mut attempt = 0u32;

        loop {
            // Streaming bodies cannot be replayed; send those once.
            let Some(cloned) = request.try_clone() else {
                return Ok(self.http.execute(request).await?);
            };

            match self.http.execute(cloned).await {
                Ok(resp) => {
                    let status = resp.status();
                    if !is_transient(request.method(), status) || attempt >= max_retries {
                        return Ok(resp);
                    }
                    let asked = if status == StatusCode::TOO_MANY_REQUESTS {
                        retry_after_ms(&resp)
                    } else {
                        None
                    };
                    let wait = match asked {
                        Some(ms) if ms > MAX_BACKOFF_MS => {
                            warn!(
                                "{} {} → {}, server asks to wait {}ms; not retrying",
                                request.method(),
                                request.url(),
                                status,
                                ms
                            );
                            return Ok(resp);
                        }
                        Some(ms) => ms,
                        None => backoff_ms(attempt),
                    };
                    warn!(
                        "{} {} → {}, retrying in {}ms (attempt {}/{})",
                        request.method(),
                        request.url(),
                        status,
                        wait,
                        attempt + 1,
                        max_retries
                    );
                    tokio::time::sleep(Duration::from_millis(wait)).await;
                }
                Err(e) => {
                    if !e.is_connect() || attempt >= max_retries {
                        return Err(e.into());
                    }
                    let wait = backoff_ms(attempt);
                    debug!("connect error, retrying in {}ms: {}", wait, e);
                    tokio::time::sleep(Duration::from_millis(wait)).await;
                }
            }
            attempt += 1;
        }
    }
}

#[async_trait]
impl Requester for NextcloudClient {
    async fn ocs(&self, request: OcsRequest) -> NcResult<OcsResponse<serde_json::Value>> {
        let url = self.ocs_url(&request);
        debug!("OCS {} {}", request.method, url);

        let mut req = self
            .http
            .request(request.method.clone(), &url)
            .header("OCS-APIRequest", "true")
            .header(header::ACCEPT, "application/json")
            .query(&[("format", "json")]);
        if request.sends_query() {
            req = req.query(request.fields.as_slice());
        } else if !request.fields.is_empty() {
            req = req.form(request.fields.as_slice());
        }
        if let Some(timeout) = request.timeout {
            req = req.timeout(timeout);
        }

        let resp = self.send_with_retry(self.apply_auth(req)).await?;
        parse_ocs_reply(resp, &request, &url).await
    }

    async fn dav(&self, request: DavRequest) -> NcResult<DavReply> {
        let DavRequest {
            method,
            path,
            headers,
            body,
            destination,
        } = request;
        let url = self.dav_url(&path);
        debug!("DAV {} {}", method, url);

        let mut req = self
            .http
            .request(method.clone(), &url)
            .header("OCS-APIRequest", "true");
        for (name, value) in &headers {
            req = req.header(name.as_str(), value.as_str());
        }
        if let Some(dest) = destination {
            req = req.header("Destination", self.dav_url(&dest));
        }
        if let Some(body) = body {
            req = req.body(body);
        }

        let resp = self.send_with_retry(self.apply_auth(req)).await?;
        let status = resp.status();
        let bytes = resp.bytes().await?;

        if status.is_success() {
            Ok(DavReply {
                status: status.as_u16(),
                body: bytes.to_vec(),
            })
        } else {
            Err(NextcloudError::Status {
                status: status.as_u16(),
                method: method.to_string(),
                url,
                body: body_snippet(&String::from_utf8_lossy(&bytes)),
            })
        }
    }
}

// ── Free-standing helpers ────────────────────────────────────────────────────

/// 429 and 503 mean the request was turned away and is safe to resend.
/// A 502 or 504 may hide a request the server already carried out, so
/// those are only retried for idempotent methods.
fn is_transient(method: &Method, status: StatusCode) -> bool {
    match status {
        StatusCode::TOO_MANY_REQUESTS | StatusCode::SERVICE_UNAVAILABLE => true,
        StatusCode::BAD_GATEWAY | StatusCode::GATEWAY_TIMEOUT => method.is_idempotent(),
        _ => false,
    }
}

fn backoff_ms(attempt: u32) -> u64 {
    INITIAL_BACKOFF_MS
        .saturating_mul(2u64.saturating_pow(attempt))
        .min(MAX_BACKOFF_MS)
}

/// Numeric `Retry-After` in milliseconds.
fn retry_after_ms(resp: &Response) -> Option<u64> {
    resp.headers()
        .get(header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(|s| s.saturating_mul(1000))
}

/// Map an OCS reply onto the envelope or an error.
async fn parse_ocs_reply(
    resp: Response,
    request: &OcsRequest,
    url: &str,
) -> NcResult<OcsResponse<serde_json::Value>> {
    let status = resp.status();
    let success_code = request.endpoint.success_code;

    // Long-polling chat answers 304 when nothing new arrived.
    if status == StatusCode::NOT_MODIFIED {
        return Ok(OcsResponse::empty(success_code));
    }

    let text = resp.text().await?;
    match serde_json::from_str::<OcsResponse<serde_json::Value>>(&text) {
        Ok(envelope) if envelope.meta().is_success(success_code) => Ok(envelope),
        Ok(envelope) => {
            let meta = envelope.meta();
            Err(NextcloudError::Ocs {
                http_status: status.as_u16(),
                statuscode: meta.statuscode,
                message: meta.message.clone().unwrap_or_default(),
            })
        }
        Err(e) if status.is_success() => {
            debug!("OCS body did not parse: {}", body_snippet(&text));
            Err(NextcloudError::Decode(e))
        }
        Err(_) => Err(NextcloudError::Status {
            status: status.as_u16(),
            method: request.method.to_string(),
            url: url.to_string(),
            body: body_snippet(&text),
        }),
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::Endpoint;

    fn client() -> NextcloudClient {
        NextcloudClient::with_credentials("https://cloud.example.com/", "alice", "pw").unwrap()
    }

    #[test]
    fn rejects_invalid_config() {
        let err = NextcloudClient::with_credentials("cloud.example.com", "alice", "pw").unwrap_err();
        assert!(matches!(err, NextcloudError::Config(_)));
    }

    #[test]
    fn ocs_url_building() {
        let c = client();
        let ep = Endpoint::new("/ocs/v1.php/cloud/users", 100);
        assert_eq!(c.ocs_url(&ep.get("")), "https://cloud.example.com/ocs/v1.php/cloud/users");
        assert_eq!(
            c.ocs_url(&ep.put("bob/disable")),
            "https://cloud.example.com/ocs/v1.php/cloud/users/bob/disable"
        );
    }

    #[test]
    fn dav_url_building() {
        let c = client();
        assert_eq!(c.dav_url(""), "https://cloud.example.com/remote.php/dav");
        assert_eq!(
            c.dav_url("files/alice/Docs"),
            "https://cloud.example.com/remote.php/dav/files/alice/Docs"
        );
        assert_eq!(
            c.dav_url("/files/alice"),
            "https://cloud.example.com/remote.php/dav/files/alice"
        );
    }

    #[test]
    fn accessors() {
        let c = client();
        assert_eq!(c.base_url(), "https://cloud.example.com");
        assert_eq!(c.username(), "alice");
        assert_eq!(c.config().max_retries, 3);
    }

    #[test]
    fn backoff_increases_exponentially() {
        assert_eq!(backoff_ms(0), 500);
        assert_eq!(backoff_ms(1), 1000);
        assert_eq!(backoff_ms(2), 2000);
        assert_eq!(backoff_ms(3), 4000);
    }

    #[test]
    fn backoff_is_capped() {
        assert_eq!(backoff_ms(6), MAX_BACKOFF_MS);
        assert_eq!(backoff_ms(64), MAX_BACKOFF_MS);
        assert_eq!(backoff_ms(u32::MAX), MAX_BACKOFF_MS);
    }

    #[test]
    fn transient_statuses() {
        assert!(is_transient(&Method::POST, StatusCode::TOO_MANY_REQUESTS));
        assert!(is_transient(&Method::POST, StatusCode::SERVICE_UNAVAILABLE));
        assert!(is_transient(&Method::GET, StatusCode::BAD_GATEWAY));
        assert!(is_transient(&Method::DELETE, StatusCode::GATEWAY_TIMEOUT));
        assert!(!is_transient(&Method::POST, StatusCode::BAD_GATEWAY));
        assert!(!is_transient(&Method::POST, StatusCode::GATEWAY_TIMEOUT));
        assert!(!is_transient(&Method::GET, StatusCode::INTERNAL_SERVER_ERROR));
        assert!(!is_transient(&Method::GET, StatusCode::NOT_FOUND));
    }
}
