//! PostgREST client for the hosted table service.
//!
//! Uses a blocking reqwest client with `apikey` + bearer auth. Every table
//! lives at `<base_url>/rest/v1/<table>`.

use super::remote::{Order, RemoteError, RemoteStore, Table};
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde_json::Value;
use std::time::Duration;

pub struct RestRemote {
    client: Client,
    base_url: String,
    api_key: String,
}

impl RestRemote {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self, RemoteError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RemoteError::Transport(format!("cannot build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    fn table_url(&self, table: Table) -> String {
        format!("{}/rest/v1/{}", self.base_url, table.name())
    }

    fn authed(&self, req: RequestBuilder) -> RequestBuilder {
        req.header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Content-Type", "application/json")
    }

    fn send(&self, req: RequestBuilder) -> Result<Response, RemoteError> {
        let resp = self
            .authed(req)
            .send()
            .map_err(|e| RemoteError::Transport(e.to_string()))?;

        if resp.status().is_success() {
            return Ok(resp);
        }

        let status = resp.status().as_u16();
        let text = resp.text().unwrap_or_default();
        Err(RemoteError::Api {
            status,
            message: error_message(&text),
        })
    }
}

/// PostgREST errors are JSON objects with a `message` field; fall back to the
/// raw body otherwise.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}

impl RemoteStore for RestRemote {
    fn select(&self, table: Table, order: &Order) -> Result<Vec<Value>, RemoteError> {
        let direction = if order.ascending { "asc" } else { "desc" };
        let order_param = format!("{}.{}", order.column, direction);

        let resp = self.send(
            self.client
                .get(self.table_url(table))
                .query(&[("select", "*"), ("order", order_param.as_str())]),
        )?;

        resp.json::<Vec<Value>>()
            .map_err(|e| RemoteError::Decode(e.to_string()))
    }

    fn upsert(&self, table: Table, row: Value) -> Result<(), RemoteError> {
        self.send(
            self.client
                .post(self.table_url(table))
                .header("Prefer", "resolution=merge-duplicates,return=minimal")
                .json(&row),
        )?;
        Ok(())
    }

    fn delete(&self, table: Table, id: &str) -> Result<(), RemoteError> {
        let filter = format!("eq.{}", id);
        self.send(
            self.client
                .delete(self.table_url(table))
                .query(&[("id", filter.as_str())]),
        )?;
        Ok(())
    }
}
