use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::client::{http_client, truncate_body};
use crate::error::{Error, Result};
use crate::model::{Coordinate, WeatherSnapshot};

const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

/// Substitutions for fields OpenWeather may omit. Client-facing strings,
/// kept exactly as the frontend expects them.
pub const DEFAULT_DESCRIPTION: &str = "날씨 정보 없음";
pub const DEFAULT_CITY_NAME: &str = "알 수 없음";
pub const DEFAULT_ICON: &str = "01d";

const DEFAULT_FAILURE_MESSAGE: &str = "날씨 정보를 가져오는 데 실패했습니다.";

#[derive(Debug, Clone)]
pub struct WeatherClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl WeatherClient {
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
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

    /// Fetch the current weather for a coordinate, in Celsius with Korean
    /// descriptions.
    pub async fn fetch_current(&self, coord: Coordinate) -> Result<WeatherSnapshot> {
        let url = format!("{}/weather", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(&[
                ("lat", coord.lat().to_string()),
                ("lon", coord.lon().to_string()),
                ("appid", self.api_key.clone()),
                ("units", "metric".to_string()),
                ("lang", "kr".to_string()),
            ])
            .send()
            .await
            .map_err(|e| {
                Error::WeatherUnavailable(format!("failed to send request to OpenWeather: {e}"))
            })?;

        let status = res.status();
        let body = res.text().await.map_err(|e| {
            Error::WeatherUnavailable(format!("failed to read OpenWeather response body: {e}"))
        })?;

        let parsed: OwCurrentResponse = serde_json::from_str(&body).map_err(|e| {
            Error::WeatherUnavailable(format!(
                "failed to parse OpenWeather JSON (status {status}): {e}; body: {}",
                truncate_body(&body),
            ))
        })?;

        // OpenWeather reports errors in-band: `cod` is 200 on success and a
        // number-or-string error code otherwise.
        if !cod_is_ok(parsed.cod.as_ref()) {
            let message =
                parsed.message.unwrap_or_else(|| DEFAULT_FAILURE_MESSAGE.to_string());
            return Err(Error::WeatherUnavailable(message));
        }

        debug!(city = ?parsed.name, "current weather fetched");

        Ok(parsed.into_snapshot())
    }
}

fn cod_is_ok(cod: Option<&Value>) -> bool {
    match cod {
        Some(Value::Number(n)) => n.as_i64() == Some(200),
        Some(Value::String(s)) => s == "200",
        _ => false,
    }
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    cod: Option<Value>,
    message: Option<String>,
    #[serde(default)]
    weather: Vec<OwWeather>,
    main: Option<OwMain>,
    name: Option<String>,
    timezone: Option<i64>,
    dt: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: Option<String>,
    icon: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct OwMain {
    temp: Option<f64>,
    feels_like: Option<f64>,
}

impl OwCurrentResponse {
    fn into_snapshot(self) -> WeatherSnapshot {
        let (description, icon) = match self.weather.into_iter().next() {
            Some(w) => (
                w.description.unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
                w.icon.unwrap_or_else(|| DEFAULT_ICON.to_string()),
            ),
            None => (DEFAULT_DESCRIPTION.to_string(), DEFAULT_ICON.to_string()),
        };

        let main = self.main.unwrap_or_default();

        WeatherSnapshot {
            description,
            temp: main.temp.unwrap_or(0.0),
            feels_like: main.feels_like.unwrap_or(0.0),
            city_name: self.name.unwrap_or_else(|| DEFAULT_CITY_NAME.to_string()),
            timezone: self.timezone.unwrap_or(0),
            observed_at: self.dt.unwrap_or(0),
            icon: Some(icon),
            detailed_address: None,
        }
    }
}
