use serde_json::Value;

use super::{error_from_response, Supabase, SupabaseError};

/// Thin builder over the PostgREST data API. Only the operators this API
/// actually uses are modeled: `eq` filters, ascending order, row limit and
/// column projection.
pub struct Query<'a> {
    client: &'a Supabase<'a>,
    table: String,
    select: Option<String>,
    filters: Vec<(String, String)>,
    order: Option<String>,
    limit: Option<u32>,
}

impl<'a> Supabase<'a> {
    pub fn from(&'a self, table: &str) -> Query<'a> {
        Query {
            client: self,
            table: table.to_string(),
            select: None,
            filters: Vec::new(),
            order: None,
            limit: None,
        }
    }
}

impl<'a> Query<'a> {
    pub fn select(mut self, columns: &str) -> Self {
        self.select = Some(columns.to_string());
        self
    }

    pub fn eq(mut self, column: &str, value: impl ToString) -> Self {
        self.filters
            .push((column.to_string(), format!("eq.{}", value.to_string())));
        self
    }

    pub fn order_asc(mut self, column: &str) -> Self {
        self.order = Some(format!("{}.asc", column));
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    fn url(&self) -> String {
        format!("{}/rest/v1/{}", self.client.base_url(), self.table)
    }

    fn params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(select) = &self.select {
            params.push(("select".to_string(), select.clone()));
        }
        params.extend(self.filters.iter().cloned());
        if let Some(order) = &self.order {
            params.push(("order".to_string(), order.clone()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        params
    }

    /// Execute as a read; returns the matching rows.
    pub async fn fetch(self) -> Result<Vec<Value>, SupabaseError> {
        let request = self
            .client
            .authorize(self.client.http().get(self.url()).query(&self.params()));
        let response = request.send().await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }
        response
            .json::<Vec<Value>>()
            .await
            .map_err(|e| SupabaseError::Decode(e.to_string()))
    }

    /// Insert exactly one row, returning the stored representation.
    pub async fn insert(self, row: Value) -> Result<Value, SupabaseError> {
        let request = self
            .client
            .authorize(self.client.http().post(self.url()).query(&self.params()))
            .header("Prefer", "return=representation")
            .json(&row);
        let response = request.send().await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }
        let mut rows = response
            .json::<Vec<Value>>()
            .await
            .map_err(|e| SupabaseError::Decode(e.to_string()))?;
        if rows.is_empty() {
            return Err(SupabaseError::Decode("insert returned no rows".to_string()));
        }
        Ok(rows.remove(0))
    }

    /// Patch the filtered rows, returning the updated representations.
    /// An empty result means the target row did not exist; the caller maps
    /// that to its own 404 message.
    pub async fn update(self, patch: Value) -> Result<Vec<Value>, SupabaseError> {
        let request = self
            .client
            .authorize(self.client.http().patch(self.url()).query(&self.params()))
            .header("Prefer", "return=representation")
            .json(&patch);
        let response = request.send().await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }
        response
            .json::<Vec<Value>>()
            .await
            .map_err(|e| SupabaseError::Decode(e.to_string()))
    }

    /// Delete the filtered rows.
    pub async fn delete(self) -> Result<(), SupabaseError> {
        let request = self
            .client
            .authorize(self.client.http().delete(self.url()).query(&self.params()));
        let response = request.send().await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }
        Ok(())
    }
}
