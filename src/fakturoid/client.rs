//! Blocking Fakturoid API v3 client (OAuth client credentials flow).

use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::Deserialize;
use std::time::Duration;

use crate::core::{FetchWindow, FilingError, InvoiceRecord, InvoiceSource};

/// Production API root.
pub const API_BASE: &str = "https://app.fakturoid.cz/api/v3";

/// Records per page of the invoice listing; a shorter page is the last.
pub const PAGE_SIZE: usize = 40;

const TIMEOUT: Duration = Duration::from_secs(60);

/// API credentials of a Fakturoid OAuth application.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    /// Fakturoid requires a `User-Agent` naming the app and a contact.
    pub user_agent: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UserResponse {
    default_account: Option<String>,
    #[serde(default)]
    accounts: Vec<AccountRef>,
}

#[derive(Debug, Deserialize)]
struct AccountRef {
    slug: String,
}

/// An authenticated session bound to one account.
#[derive(Debug, Clone)]
pub struct FakturoidClient {
    http: Client,
    base_url: String,
    user_agent: String,
    access_token: String,
    account_slug: String,
}

impl FakturoidClient {
    /// Authenticate against the production API.
    ///
    /// Without `account_slug` the user's default (or first) account is used.
    pub fn connect(creds: &Credentials, account_slug: Option<&str>) -> Result<Self, FilingError> {
        Self::connect_to(API_BASE, creds, account_slug)
    }

    /// Authenticate against an API root other than production.
    pub fn connect_to(
        base_url: &str,
        creds: &Credentials,
        account_slug: Option<&str>,
    ) -> Result<Self, FilingError> {
        let http = Client::builder()
            .timeout(TIMEOUT)
            .build()
            .map_err(|e| FilingError::Upstream(e.to_string()))?;
        let base_url = base_url.trim_end_matches('/').to_string();

        let access_token = request_token(&http, &base_url, creds)?;
        tracing::info!("access token obtained");

        let mut client = Self {
            http,
            base_url,
            user_agent: creds.user_agent.clone(),
            access_token,
            account_slug: String::new(),
        };
        client.account_slug = match account_slug.filter(|s| !s.is_empty()) {
            Some(slug) => slug.to_string(),
            None => client.discover_account()?,
        };
        tracing::info!(account = %client.account_slug, "using account");
        Ok(client)
    }

    pub fn account_slug(&self) -> &str {
        &self.account_slug
    }

    fn get(&self, url: &str) -> RequestBuilder {
        self.http
            .get(url)
            .header("User-Agent", &self.user_agent)
            .header("Accept", "application/json")
            .bearer_auth(&self.access_token)
    }

    fn discover_account(&self) -> Result<String, FilingError> {
        let url = format!("{}/user.json", self.base_url);
        let body = read_body(self.get(&url).send())?;
        parse_account_slug(&body)
    }

    fn invoices_page(
        &self,
        window: &FetchWindow,
        page: u32,
    ) -> Result<Vec<InvoiceRecord>, FilingError> {
        let url = invoices_url(&self.base_url, &self.account_slug);
        let request = self.get(&url).query(&[
            ("since", window.since_param()),
            ("until", window.until_param()),
            ("page", page.to_string()),
            ("document_type", "regular".to_string()),
        ]);
        let body = read_body(request.send())?;
        parse_invoice_page(&body)
    }
}

impl InvoiceSource for FakturoidClient {
    fn fetch_invoices(&self, window: &FetchWindow) -> Result<Vec<InvoiceRecord>, FilingError> {
        let mut invoices = Vec::new();
        let mut page = 1;
        loop {
            let batch = self.invoices_page(window, page)?;
            let len = batch.len();
            tracing::debug!(page, len, "invoice page fetched");
            invoices.extend(batch);
            if is_last_page(len) {
                break;
            }
            page += 1;
        }
        Ok(invoices)
    }
}

fn request_token(http: &Client, base_url: &str, creds: &Credentials) -> Result<String, FilingError> {
    let resp = http
        .post(format!("{base_url}/oauth/token"))
        .basic_auth(&creds.client_id, Some(&creds.client_secret))
        .header("User-Agent", &creds.user_agent)
        .header("Accept", "application/json")
        .json(&serde_json::json!({ "grant_type": "client_credentials" }))
        .send()
        .map_err(|e| FilingError::UpstreamAuth(e.to_string()))?;

    let status = resp.status();
    let body = resp
        .text()
        .map_err(|e| FilingError::UpstreamAuth(e.to_string()))?;
    if !status.is_success() {
        return Err(FilingError::UpstreamAuth(format!("HTTP {status}: {body}")));
    }
    parse_token_response(&body)
}

fn read_body(sent: reqwest::Result<Response>) -> Result<String, FilingError> {
    let resp = sent.map_err(|e| FilingError::Upstream(e.to_string()))?;
    let status = resp.status();
    let url = resp.url().to_string();
    let body = resp
        .text()
        .map_err(|e| FilingError::Upstream(e.to_string()))?;
    if !status.is_success() {
        return Err(FilingError::Upstream(format!("GET {url}: HTTP {status}: {body}")));
    }
    Ok(body)
}

/// `{base}/accounts/{slug}/invoices.json`.
pub fn invoices_url(base_url: &str, slug: &str) -> String {
    format!("{}/accounts/{slug}/invoices.json", base_url.trim_end_matches('/'))
}

/// Whether a page with `len` records ends the listing.
pub fn is_last_page(len: usize) -> bool {
    len < PAGE_SIZE
}

/// Extract the access token from a token endpoint response.
pub fn parse_token_response(body: &str) -> Result<String, FilingError> {
    let resp: TokenResponse = serde_json::from_str(body)
        .map_err(|e| FilingError::UpstreamAuth(format!("Token error: {e}: {body}")))?;
    resp.access_token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| FilingError::UpstreamAuth(format!("Token error: {body}")))
}

/// Pick the account from a `/user.json` response: default, else first.
pub fn parse_account_slug(body: &str) -> Result<String, FilingError> {
    let user: UserResponse = serde_json::from_str(body)
        .map_err(|e| FilingError::Upstream(format!("cannot parse /user.json: {e}")))?;
    if let Some(slug) = user.default_account.filter(|s| !s.is_empty()) {
        return Ok(slug);
    }
    user.accounts
        .into_iter()
        .next()
        .map(|a| a.slug)
        .ok_or_else(|| FilingError::Upstream("No accounts found on /user.json".into()))
}

/// Decode one page of the invoice listing. An empty body is an empty page.
pub fn parse_invoice_page(body: &str) -> Result<Vec<InvoiceRecord>, FilingError> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }
    let page: Option<Vec<InvoiceRecord>> = serde_json::from_str(body)
        .map_err(|e| FilingError::Upstream(format!("cannot parse invoice page: {e}")))?;
    Ok(page.unwrap_or_default())
}
