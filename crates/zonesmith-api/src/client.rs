// Hand-crafted async HTTP client for the NetBox IPAM API.
//
// Base path: /api/
// Auth: `Authorization: Token <key>` header

use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::Error;
use crate::types;

/// Page size requested from list endpoints. Large enough that one page holds
/// a full IPAM export.
const PAGE_LIMIT: u32 = 2000;

// ── Error response shape from NetBox ─────────────────────────────────

#[derive(serde::Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    detail: Option<String>,
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the NetBox IPAM API.
///
/// Uses token authentication and communicates via JSON REST endpoints
/// under `/api/`.
pub struct NetboxClient {
    http: reqwest::Client,
    base_url: Url,
}

impl NetboxClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from a base URL and an API token.
    ///
    /// Injects `Authorization: Token <key>` as a default header on every
    /// request.
    pub fn from_token(base_url: &str, token: &secrecy::SecretString) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        let mut token_value = HeaderValue::from_str(&format!("Token {}", token.expose_secret()))
            .map_err(|e| Error::Authentication {
                message: format!("invalid token header value: {e}"),
            })?;
        token_value.set_sensitive(true);
        headers.insert(reqwest::header::AUTHORIZATION, token_value);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;
        let base_url = Self::normalize_base_url(base_url)?;

        Ok(Self { http, base_url })
    }

    /// Build the base URL, ensuring it ends with `/api/`.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;

        let path = url.path().trim_end_matches('/').to_owned();
        if path.ends_with("/api") {
            url.set_path(&format!("{path}/"));
        } else {
            url.set_path(&format!("{path}/api/"));
        }

        Ok(url)
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join a relative path (e.g. `"ipam/prefixes/"`) onto the base URL.
    fn url(&self, path: &str) -> Url {
        // base_url always ends with `/api/`, so joining `ipam/…` works.
        self.base_url
            .join(path)
            .expect("path should be valid relative URL")
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        let url = self.url(path);
        debug!("GET {url} params={params:?}");

        let resp = self.http.get(url).query(params).send().await?;
        self.handle_response(resp, path).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
        endpoint: &str,
    ) -> Result<T, Error> {
        let status = resp.status();
        if !status.is_success() {
            return Err(self.parse_error(status, resp).await);
        }

        let body = resp.text().await?;
        if body.trim().is_empty() {
            return Err(Error::EmptyResponse {
                endpoint: endpoint.to_owned(),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            let preview = &body[..body.len().min(200)];
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body,
            }
        })
    }

    async fn parse_error(&self, status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Error::InvalidToken;
        }

        let raw = resp.text().await.unwrap_or_default();

        if let Some(detail) = serde_json::from_str::<ErrorResponse>(&raw)
            .ok()
            .and_then(|err| err.detail)
        {
            return Error::Api {
                status: status.as_u16(),
                message: detail,
            };
        }

        Error::Api {
            status: status.as_u16(),
            message: if raw.is_empty() {
                status.to_string()
            } else {
                raw
            },
        }
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    // ── Prefixes ─────────────────────────────────────────────────────

    /// List every prefix known to NetBox.
    pub async fn list_prefixes(&self) -> Result<Vec<types::Prefix>, Error> {
        let page: types::Page<types::Prefix> = self
            .get("ipam/prefixes/", &[("limit", PAGE_LIMIT.to_string())])
            .await?;
        Ok(page.results)
    }

    // ── IP addresses ─────────────────────────────────────────────────

    /// List all addresses contained in `parent` (CIDR notation).
    pub async fn list_addresses(&self, parent: &str) -> Result<Vec<types::IpAddress>, Error> {
        let page: types::Page<types::IpAddress> = self
            .get(
                "ipam/ip-addresses/",
                &[
                    ("parent", parent.to_owned()),
                    ("limit", PAGE_LIMIT.to_string()),
                ],
            )
            .await?;
        Ok(page.results)
    }
}
