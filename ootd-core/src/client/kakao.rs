use anyhow::{Context, Result, anyhow};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::warn;

use crate::client::{http_client, truncate_body};
use crate::model::Coordinate;

const DEFAULT_BASE_URL: &str = "https://dapi.kakao.com";

/// Sentinel shown when the lookup succeeds but carries no address.
pub const ADDRESS_NOT_FOUND: &str = "주소 정보를 찾을 수 없습니다.";
/// Sentinel shown when the lookup itself fails.
pub const ADDRESS_LOOKUP_FAILED: &str = "주소 정보를 가져오는 중 오류가 발생했습니다.";

/// Kakao coord2address client. Address resolution is decoration on top of
/// the weather data, so it soft-fails: callers always get a string back.
#[derive(Debug, Clone)]
pub struct GeocodeClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl GeocodeClient {
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> crate::error::Result<Self> {
        Ok(Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            http: http_client(timeout)?,
        })
    }

    /// Point the client at a different endpoint. Used by tests.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Resolve a coordinate to a human-readable Korean address, preferring
    /// the road address over the lot-number one. Never fails; problems are
    /// logged and replaced with a sentinel.
    pub async fn resolve_address(&self, coord: Coordinate) -> String {
        match self.fetch_address(coord).await {
            Ok(Some(address)) => address,
            Ok(None) => {
                warn!(lat = coord.lat(), lon = coord.lon(), "no address for coordinate");
                ADDRESS_NOT_FOUND.to_string()
            }
            Err(err) => {
                warn!(error = %err, "reverse geocoding failed");
                ADDRESS_LOOKUP_FAILED.to_string()
            }
        }
    }

    async fn fetch_address(&self, coord: Coordinate) -> Result<Option<String>> {
        let url = format!("{}/v2/local/geo/coord2address.json", self.base_url);

        let res = self
            .http
            .get(&url)
            .header("Authorization", format!("KakaoAK {}", self.api_key))
            .query(&[("x", coord.lon().to_string()), ("y", coord.lat().to_string())])
            .send()
            .await
            .context("Failed to send request to Kakao local API")?;

        let status = res.status();
        let body = res.text().await.context("Failed to read Kakao response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "Kakao request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        let parsed: KakaoResponse =
            serde_json::from_str(&body).context("Failed to parse Kakao JSON")?;

        Ok(parsed.documents.into_iter().next().and_then(pick_address))
    }
}

fn pick_address(doc: KakaoDocument) -> Option<String> {
    doc.road_address
        .map(|a| a.address_name)
        .or(doc.address.map(|a| a.address_name))
}

#[derive(Debug, Deserialize)]
struct KakaoResponse {
    #[serde(default)]
    documents: Vec<KakaoDocument>,
}

#[derive(Debug, Deserialize)]
struct KakaoDocument {
    road_address: Option<KakaoAddress>,
    address: Option<KakaoAddress>,
}

#[derive(Debug, Deserialize)]
struct KakaoAddress {
    address_name: String,
}
