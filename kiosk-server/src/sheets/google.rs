//! Google Sheets v4 REST backend

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, Url};
use serde::{Deserialize, Serialize};

use super::{CellRef, ServiceAccountAuth, SheetRange, SheetStore, StoreError, StoreResult, Table};

const DEFAULT_BASE_URL: &str = "https://sheets.googleapis.com";

#[derive(Debug, Default, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

#[derive(Debug, Serialize)]
struct ValuesBody<'a> {
    values: [&'a [String]; 1],
}

/// Spreadsheet store backed by a Google spreadsheet
#[derive(Debug)]
pub struct GoogleSheetsStore {
    client: reqwest::Client,
    auth: ServiceAccountAuth,
    base_url: Url,
    spreadsheet_id: String,
    registrations: SheetRange,
    orders: SheetRange,
}

impl GoogleSheetsStore {
    pub fn new(
        spreadsheet_id: &str,
        client_email: &str,
        private_key: &str,
        registrations: SheetRange,
        orders: SheetRange,
        timeout: Duration,
    ) -> StoreResult<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        let auth = ServiceAccountAuth::new(client_email, private_key, client.clone())?;
        let base_url = Url::parse(DEFAULT_BASE_URL)
            .map_err(|e| StoreError::InvalidRange(format!("{DEFAULT_BASE_URL}: {e}")))?;

        Ok(Self {
            client,
            auth,
            base_url,
            spreadsheet_id: spreadsheet_id.to_string(),
            registrations,
            orders,
        })
    }

    /// Point the store at a different API host
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }

    fn range(&self, table: Table) -> &SheetRange {
        match table {
            Table::Registrations => &self.registrations,
            Table::Orders => &self.orders,
        }
    }

    /// `{base}/v4/spreadsheets/{id}/values/{last}`
    fn values_url(&self, last: &str) -> StoreResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| StoreError::InvalidRange(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(["v4", "spreadsheets", &self.spreadsheet_id, "values", last]);
        Ok(url)
    }

    async fn send(&self, method: Method, url: Url, body: Option<&ValuesBody<'_>>) -> StoreResult<reqwest::Response> {
        let token = self.auth.access_token().await?;
        let mut req = self.client.request(method, url).bearer_auth(token);
        if let Some(body) = body {
            req = req.json(body);
        }

        let resp = req.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(StoreError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(resp)
    }
}

#[async_trait]
impl SheetStore for GoogleSheetsStore {
    fn backend_name(&self) -> &'static str {
        "google"
    }

    async fn fetch_rows(&self, table: Table) -> StoreResult<Vec<Vec<String>>> {
        let url = self.values_url(self.range(table).as_str())?;
        let resp = self.send(Method::GET, url, None).await?;
        let range: ValueRange = resp.json().await?;

        Ok(range
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_text).collect())
            .collect())
    }

    async fn update_cell(&self, table: Table, cell: CellRef, value: &str) -> StoreResult<()> {
        let address = self.range(table).cell_address(cell);
        let mut url = self.values_url(&address)?;
        url.query_pairs_mut().append_pair("valueInputOption", "RAW");

        let row = [value.to_string()];
        let body = ValuesBody { values: [row.as_slice()] };
        self.send(Method::PUT, url, Some(&body)).await?;
        tracing::debug!(table = %table, address = %address, "Updated cell");
        Ok(())
    }

    async fn append_row(&self, table: Table, values: Vec<String>) -> StoreResult<()> {
        let mut url = self.values_url(&format!("{}:append", self.range(table).as_str()))?;
        url.query_pairs_mut()
            .append_pair("valueInputOption", "RAW")
            .append_pair("insertDataOption", "INSERT_ROWS");

        let body = ValuesBody { values: [values.as_slice()] };
        self.send(Method::POST, url, Some(&body)).await?;
        tracing::debug!(table = %table, "Appended row");
        Ok(())
    }
}

/// Formatted values come back as strings; anything else is rendered as text.
fn cell_text(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}
