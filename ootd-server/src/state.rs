use std::time::Duration;

use ootd_core::{
    Config, GeminiClient, GeocodeClient, Recommender, StoreClient, StudyMaterials, WeatherClient,
};

/// Everything the handlers need, built once at startup and shared behind an
/// `Arc`.
#[derive(Debug)]
pub struct AppState {
    pub recommender: Recommender,
    pub study: StudyMaterials,
}

impl AppState {
    pub fn from_config(config: &Config) -> ootd_core::Result<Self> {
        let timeout = Duration::from_secs(config.http_timeout_secs);

        let weather = WeatherClient::new(&config.openweather_api_key, timeout)?;
        let geocode = GeocodeClient::new(&config.kakao_rest_api_key, timeout)?;
        let store = StoreClient::new(&config.supabase_url, &config.supabase_key, timeout)?;
        let gemini = GeminiClient::new(&config.gemini_api_key, timeout)?;

        Ok(Self {
            study: StudyMaterials::new(store.clone()),
            recommender: Recommender::new(weather, geocode, store, Box::new(gemini)),
        })
    }
}
