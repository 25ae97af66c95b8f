use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::time::Duration;
use tracing::debug;

use crate::client::{http_client, truncate_body};
use crate::error::{Error, Result};
use crate::model::StudyMaterial;

const CLOTHES_TABLE: &str = "clothes";
const STUDY_TABLE: &str = "study_materials";
const CLOTHES_COLUMNS: &str = "id,name,category,image_url";

/// Supabase REST (PostgREST) client for the two tables the backend owns.
/// Each call authenticates with the service key via both the `apikey` and
/// `Authorization` headers.
#[derive(Debug, Clone)]
pub struct StoreClient {
    base_url: String,
    api_key: String,
    http: Client,
}

/// A `clothes` row as stored, before category validation.
#[derive(Debug, Clone, Deserialize)]
pub struct ClothesRow {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub image_url: String,
}

/// Insert payload for `study_materials`; `created_at` is stamped by the
/// caller.
#[derive(Debug, Clone, Serialize)]
pub struct StudyMaterialInsert {
    pub title: String,
    pub content: String,
    pub category: String,
    pub created_at: String,
}

/// Patch payload for `study_materials`. Only present fields reach the
/// store; `updated_at` always does.
#[derive(Debug, Clone, Serialize)]
pub struct StudyMaterialPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub updated_at: String,
}

impl StoreClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        Ok(Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            http: http_client(timeout)?,
        })
    }

    /// Read the full clothing catalog.
    pub async fn list_clothes(&self) -> Result<Vec<ClothesRow>> {
        let res = self
            .get(CLOTHES_TABLE)
            .query(&[("select", CLOTHES_COLUMNS)])
            .send()
            .await
            .map_err(|e| {
                Error::CatalogUnavailable(format!("failed to query the clothes table: {e}"))
            })?;

        let rows: Vec<ClothesRow> = decode(res, Error::CatalogUnavailable).await?;
        debug!(rows = rows.len(), "clothes loaded");
        Ok(rows)
    }

    /// List every study material.
    pub async fn list_study_materials(&self) -> Result<Vec<StudyMaterial>> {
        let res = self
            .get(STUDY_TABLE)
            .query(&[("select", "*")])
            .send()
            .await
            .map_err(|e| Error::StoreUnavailable(format!("failed to query study materials: {e}")))?;

        decode(res, Error::StoreUnavailable).await
    }

    /// Search study materials, optionally narrowing by a title substring
    /// and an exact category.
    pub async fn search_study_materials(
        &self,
        title_query: Option<&str>,
        category: Option<&str>,
    ) -> Result<Vec<StudyMaterial>> {
        let mut params = vec![("select".to_string(), "*".to_string())];
        if let Some(q) = title_query {
            params.push(("title".to_string(), format!("ilike.*{q}*")));
        }
        if let Some(category) = category {
            params.push(("category".to_string(), format!("eq.{category}")));
        }

        let res = self
            .get(STUDY_TABLE)
            .query(&params)
            .send()
            .await
            .map_err(|e| {
                Error::StoreUnavailable(format!("failed to search study materials: {e}"))
            })?;

        decode(res, Error::StoreUnavailable).await
    }

    /// Insert one study material and return the stored row.
    pub async fn insert_study_material(&self, row: &StudyMaterialInsert) -> Result<StudyMaterial> {
        let res = self
            .request(reqwest::Method::POST, STUDY_TABLE)
            .header("Prefer", "return=representation")
            .json(row)
            .send()
            .await
            .map_err(|e| Error::StoreUnavailable(format!("failed to insert study material: {e}")))?;

        let mut rows: Vec<StudyMaterial> = decode(res, Error::StoreUnavailable).await?;
        if rows.is_empty() {
            return Err(Error::StoreUnavailable(
                "the store returned no row for the insert".to_string(),
            ));
        }
        Ok(rows.remove(0))
    }

    /// Patch one study material by id and return the stored row.
    pub async fn update_study_material(
        &self,
        id: i64,
        patch: &StudyMaterialPatch,
    ) -> Result<StudyMaterial> {
        let res = self
            .request(reqwest::Method::PATCH, STUDY_TABLE)
            .header("Prefer", "return=representation")
            .query(&[("id", format!("eq.{id}"))])
            .json(patch)
            .send()
            .await
            .map_err(|e| Error::StoreUnavailable(format!("failed to update study material: {e}")))?;

        let mut rows: Vec<StudyMaterial> = decode(res, Error::StoreUnavailable).await?;
        if rows.is_empty() {
            return Err(Error::StoreUnavailable(format!(
                "no study material matched id {id}"
            )));
        }
        Ok(rows.remove(0))
    }

    /// Delete one study material by id.
    pub async fn delete_study_material(&self, id: i64) -> Result<()> {
        let res = self
            .request(reqwest::Method::DELETE, STUDY_TABLE)
            .query(&[("id", format!("eq.{id}"))])
            .send()
            .await
            .map_err(|e| Error::StoreUnavailable(format!("failed to delete study material: {e}")))?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(Error::StoreUnavailable(format!(
                "delete failed with status {status}: {}",
                truncate_body(&body),
            )));
        }
        Ok(())
    }

    fn get(&self, table: &str) -> RequestBuilder {
        self.request(reqwest::Method::GET, table)
    }

    fn request(&self, method: reqwest::Method, table: &str) -> RequestBuilder {
        let url = format!("{}/rest/v1/{table}", self.base_url.trim_end_matches('/'));
        self.http
            .request(method, url)
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
    }
}

async fn decode<T: DeserializeOwned>(res: Response, wrap: fn(String) -> Error) -> Result<T> {
    let status = res.status();
    let body = res
        .text()
        .await
        .map_err(|e| wrap(format!("failed to read store response body: {e}")))?;

    if !status.is_success() {
        return Err(wrap(format!(
            "store request failed with status {status}: {}",
            truncate_body(&body),
        )));
    }

    serde_json::from_str(&body).map_err(|e| {
        wrap(format!("failed to parse store JSON: {e}; body: {}", truncate_body(&body)))
    })
}
