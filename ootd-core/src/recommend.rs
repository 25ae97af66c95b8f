use serde_json::Value;
use tracing::{debug, info};

use crate::catalog::CategorizedCatalog;
use crate::client::{GeocodeClient, StoreClient, TextGenerator, WeatherClient};
use crate::error::{Error, Result};
use crate::model::{Coordinate, OutfitSet, Recommendation, WeatherSnapshot};
use crate::prompt;

/// Runs one recommendation request end to end: weather, address, catalog,
/// prompt, model, validation, assembly. Strictly sequential; the first hard
/// failure aborts the request. Collaborators are injected so tests can
/// substitute any of them.
#[derive(Debug)]
pub struct Recommender {
    weather: WeatherClient,
    geocode: GeocodeClient,
    store: StoreClient,
    generator: Box<dyn TextGenerator>,
}

impl Recommender {
    pub fn new(
        weather: WeatherClient,
        geocode: GeocodeClient,
        store: StoreClient,
        generator: Box<dyn TextGenerator>,
    ) -> Self {
        Self { weather, geocode, store, generator }
    }

    /// Current weather with the resolved address merged in. Backs the
    /// weather probe endpoint.
    pub async fn current_weather(&self, coord: Coordinate) -> Result<WeatherSnapshot> {
        let mut snapshot = self.weather.fetch_current(coord).await?;
        snapshot.detailed_address = Some(self.geocode.resolve_address(coord).await);
        Ok(snapshot)
    }

    /// The full pipeline.
    pub async fn recommend(&self, coord: Coordinate) -> Result<Recommendation> {
        let mut weather = self.weather.fetch_current(coord).await?;
        debug!(
            city = %weather.city_name,
            temp = weather.temp,
            feels_like = weather.feels_like,
            "weather resolved"
        );

        weather.detailed_address = Some(self.geocode.resolve_address(coord).await);

        let rows = self.store.list_clothes().await?;
        let catalog = CategorizedCatalog::partition(rows)?;

        let prompt = prompt::compose(&weather, &catalog)?;
        let reply = self.generator.generate(&prompt).await?;
        let recommendations = parse_recommendations(&reply, &catalog)?;

        info!(sets = recommendations.len(), city = %weather.city_name, "recommendation assembled");
        Ok(Recommendation { weather, recommendations })
    }
}

/// Interpret the model's raw reply as outfit sets. Three failure classes,
/// in order: no parseable JSON, missing `recommendations` key, wrong shape
/// or an item id the catalog never contained.
pub fn parse_recommendations(reply: &str, catalog: &CategorizedCatalog) -> Result<Vec<OutfitSet>> {
    let payload = extract_json(reply).ok_or_else(|| {
        Error::ModelResponseMalformed("the reply contains no JSON object".to_string())
    })?;

    let value: Value = serde_json::from_str(payload)
        .map_err(|e| Error::ModelResponseMalformed(format!("JSON parsing failed: {e}")))?;

    let recommendations = value.get("recommendations").ok_or_else(|| {
        Error::ModelResponseIncomplete("the reply lacks the 'recommendations' key".to_string())
    })?;

    let sets: Vec<OutfitSet> = serde_json::from_value(recommendations.clone())
        .map_err(|e| Error::ModelResponseInvalid(format!("unexpected recommendation shape: {e}")))?;

    for set in &sets {
        for (category, item) in set.items.refs() {
            if !catalog.contains_id(item.id) {
                return Err(Error::ModelResponseInvalid(format!(
                    "recommended {category} item id {} is not in the catalog",
                    item.id
                )));
            }
        }
    }

    Ok(sets)
}

/// Slice the JSON object out of a reply that may be wrapped in markdown
/// fences or prose: everything from the first `{` to the last `}`.
fn extract_json(reply: &str) -> Option<&str> {
    let start = reply.find('{')?;
    let end = reply.rfind('}')?;
    (end >= start).then(|| &reply[start..=end])
}
