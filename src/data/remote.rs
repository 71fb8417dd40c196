use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use log::warn;
use serde::Deserialize;

use crate::{config::RemoteConfig, models::Company};

pub const COMPANIES_TABLE: &str = "companies";

/// Fixed storage namespace for company logos.
pub const LOGO_BUCKET: &str = "company-logos";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Row shape returned by the hosted Postgres REST endpoint. Columns are
/// snake_case on the wire; `Company` serializes camelCase toward the
/// webview, so the two are kept apart and mapped here.
#[derive(Debug, Deserialize)]
struct CompanyRow {
    id: String,
    name: String,
    #[serde(default)]
    description: Option<String>,
    valuation: f64,
    #[serde(default)]
    image_path: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CompanyRow> for Company {
    fn from(row: CompanyRow) -> Self {
        Company {
            id: row.id,
            name: row.name,
            description: row.description.unwrap_or_default(),
            valuation: row.valuation,
            image_path: row.image_path,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Clone)]
pub struct RemoteClient {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
}

impl RemoteClient {
    /// Returns `None` when the HTTP client cannot be constructed; callers
    /// treat that exactly like missing configuration.
    pub fn connect(config: &RemoteConfig) -> Option<Self> {
        let http = match reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build() {
            Ok(client) => client,
            Err(err) => {
                warn!("Failed to construct HTTP client: {err}");
                return None;
            }
        };

        Some(Self {
            http,
            base_url: config.base_url.clone(),
            anon_key: config.anon_key.clone(),
        })
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, COMPANIES_TABLE)
    }

    fn table_request(&self) -> reqwest::RequestBuilder {
        self.http
            .get(self.table_url())
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
    }

    /// The full candidate set, ordered by name.
    pub async fn fetch_all(&self) -> Result<Vec<Company>> {
        let response = self
            .table_request()
            .query(&[("select", "*"), ("order", "name.asc")])
            .send()
            .await
            .context("company list request failed")?;
        let response = ensure_success(response).await?;

        let rows: Vec<CompanyRow> = response
            .json()
            .await
            .context("invalid company list payload")?;
        Ok(rows.into_iter().map(Company::from).collect())
    }

    /// Total row count, taken from the `content-range` header.
    pub async fn fetch_count(&self) -> Result<usize> {
        let response = self
            .table_request()
            .query(&[("select", "id")])
            .header("Prefer", "count=exact")
            .header("Range", "0-0")
            .send()
            .await
            .context("company count request failed")?;
        let response = ensure_success(response).await?;

        let content_range = response
            .headers()
            .get("content-range")
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| anyhow!("count response missing content-range header"))?;
        parse_total(content_range)
    }

    /// A single row at the given position in name order.
    pub async fn fetch_at_offset(&self, offset: usize) -> Result<Option<Company>> {
        let offset = offset.to_string();
        let response = self
            .table_request()
            .query(&[
                ("select", "*"),
                ("order", "name.asc"),
                ("limit", "1"),
                ("offset", offset.as_str()),
            ])
            .send()
            .await
            .context("company row request failed")?;
        let response = ensure_success(response).await?;

        let rows: Vec<CompanyRow> = response
            .json()
            .await
            .context("invalid company row payload")?;
        Ok(rows.into_iter().next().map(Company::from))
    }

    /// Public URL for an object stored under the logo bucket.
    pub fn public_object_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url,
            LOGO_BUCKET,
            path.trim_start_matches('/')
        )
    }

    /// Uploads an object into the logo bucket and returns its public URL.
    pub async fn upload_object(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String> {
        let url = format!(
            "{}/storage/v1/object/{}/{}",
            self.base_url,
            LOGO_BUCKET,
            path.trim_start_matches('/')
        );
        let response = self
            .http
            .post(&url)
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .header("Content-Type", content_type)
            .body(bytes)
            .send()
            .await
            .context("object upload request failed")?;
        ensure_success(response).await?;

        Ok(self.public_object_url(path))
    }
}

async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(anyhow!("backend responded {status}: {body}"))
}

/// `content-range` arrives as `0-0/57`; the figure after the slash is the
/// total row count.
fn parse_total(content_range: &str) -> Result<usize> {
    content_range
        .rsplit('/')
        .next()
        .and_then(|total| total.parse::<usize>().ok())
        .ok_or_else(|| anyhow!("unparseable content-range '{content_range}'"))
}
