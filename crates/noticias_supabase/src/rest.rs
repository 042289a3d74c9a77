use noticias_core::{Error, Result};
use serde_json::Value;
use tracing::debug;

use crate::SupabaseClient;

impl SupabaseClient {
    /// Selects rows from a PostgREST table. `query` is the raw query
    /// string, e.g. `select=*&order=fecha.desc`.
    pub async fn select(&self, table: &str, query: &str) -> Result<Vec<Value>> {
        let url = format!("{}/rest/v1/{}?{}", self.base_url(), table, query);
        debug!("select {}", url);
        let res = self.authed(self.http().get(&url)).send().await?;
        if !res.status().is_success() {
            return Err(Error::Storage(format!(
                "select on {} failed: {}",
                table,
                res.status()
            )));
        }
        let rows: Vec<Value> = res.json().await?;
        Ok(rows)
    }

    /// Inserts a row and returns the stored representation.
    pub async fn insert(&self, table: &str, row: &Value) -> Result<Value> {
        let url = format!("{}/rest/v1/{}", self.base_url(), table);
        let res = self
            .authed(self.http().post(&url))
            .header("Prefer", "return=representation")
            .json(row)
            .send()
            .await?;
        if !res.status().is_success() {
            return Err(Error::Storage(format!(
                "insert into {} failed: {}",
                table,
                res.status()
            )));
        }
        let mut rows: Vec<Value> = res.json().await?;
        rows.pop()
            .ok_or_else(|| Error::Storage(format!("insert into {} returned no row", table)))
    }

    /// Updates the row with the given id.
    pub async fn update(&self, table: &str, id: &str, row: &Value) -> Result<()> {
        let url = format!("{}/rest/v1/{}?id=eq.{}", self.base_url(), table, id);
        let res = self.authed(self.http().patch(&url)).json(row).send().await?;
        if !res.status().is_success() {
            return Err(Error::Storage(format!(
                "update of {}/{} failed: {}",
                table,
                id,
                res.status()
            )));
        }
        Ok(())
    }

    /// Deletes the row with the given id.
    pub async fn delete(&self, table: &str, id: &str) -> Result<()> {
        let url = format!("{}/rest/v1/{}?id=eq.{}", self.base_url(), table, id);
        let res = self.authed(self.http().delete(&url)).send().await?;
        if !res.status().is_success() {
            return Err(Error::Storage(format!(
                "delete of {}/{} failed: {}",
                table,
                id,
                res.status()
            )));
        }
        Ok(())
    }
}
