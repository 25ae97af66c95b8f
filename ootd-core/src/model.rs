use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// A validated pair of WGS84 coordinates. Construction is the only place
/// range checks happen; everything downstream can rely on them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    lat: f64,
    lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Result<Self> {
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return Err(Error::InvalidCoordinate(format!(
                "coordinates out of range: lat={lat}, lon={lon}"
            )));
        }
        Ok(Self { lat, lon })
    }

    /// Parse raw query-string values.
    pub fn parse(lat: &str, lon: &str) -> Result<Self> {
        let lat = lat.trim().parse::<f64>().map_err(|_| {
            Error::InvalidCoordinate(format!("latitude is not a number: {lat:?}"))
        })?;
        let lon = lon.trim().parse::<f64>().map_err(|_| {
            Error::InvalidCoordinate(format!("longitude is not a number: {lon:?}"))
        })?;
        Self::new(lat, lon)
    }

    /// Parse JSON values that clients may send either as numbers or as
    /// numeric strings.
    pub fn from_json(lat: &Value, lon: &Value) -> Result<Self> {
        let lat = json_number(lat).ok_or_else(|| {
            Error::InvalidCoordinate(format!("latitude is not a number: {lat}"))
        })?;
        let lon = json_number(lon).ok_or_else(|| {
            Error::InvalidCoordinate(format!("longitude is not a number: {lon}"))
        })?;
        Self::new(lat, lon)
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }
}

fn json_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Current weather for one coordinate, normalized from the provider
/// response. `observed_at` keeps the provider's Unix timestamp and is
/// serialized under its wire name `dt`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub description: String,
    pub temp: f64,
    pub feels_like: f64,
    pub city_name: String,
    pub timezone: i64,
    #[serde(rename = "dt")]
    pub observed_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detailed_address: Option<String>,
}

/// The clothing categories an outfit is assembled from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Top,
    Bottom,
    Outer,
    Shoes,
}

impl Category {
    pub const fn all() -> [Category; 4] {
        [Self::Top, Self::Bottom, Self::Outer, Self::Shoes]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Outer => "outer",
            Self::Shoes => "shoes",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Category {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "top" => Ok(Self::Top),
            "bottom" => Ok(Self::Bottom),
            "outer" => Ok(Self::Outer),
            "shoes" => Ok(Self::Shoes),
            other => Err(Error::InvalidInput(format!("unknown category: {other:?}"))),
        }
    }
}

/// One wearable item from the catalog.
#[derive(Debug, Clone, Serialize)]
pub struct ClothingItem {
    pub id: i64,
    pub name: String,
    pub category: Category,
    pub image_url: String,
}

/// An item reference inside a model-proposed outfit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutfitItemRef {
    pub id: i64,
    pub name: String,
    pub image_url: String,
}

/// The per-category slots of one outfit. `outer` is optional; the model is
/// only told to fill it in chilly weather.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutfitItems {
    pub top: OutfitItemRef,
    pub bottom: OutfitItemRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outer: Option<OutfitItemRef>,
    pub shoes: OutfitItemRef,
}

impl OutfitItems {
    /// Iterate the filled slots with their categories.
    pub fn refs(&self) -> impl Iterator<Item = (Category, &OutfitItemRef)> + '_ {
        let mut slots = vec![
            (Category::Top, &self.top),
            (Category::Bottom, &self.bottom),
            (Category::Shoes, &self.shoes),
        ];
        if let Some(outer) = &self.outer {
            slots.push((Category::Outer, outer));
        }
        slots.into_iter()
    }
}

/// One outfit proposed by the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutfitSet {
    pub style_description: String,
    pub items: OutfitItems,
}

/// The assembled recommendation payload returned to clients.
#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub weather: WeatherSnapshot,
    pub recommendations: Vec<OutfitSet>,
}

/// A study-material row as stored. Timestamps pass through untouched as the
/// store formatted them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudyMaterial {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Validated input for creating a study material.
#[derive(Debug, Clone)]
pub struct NewStudyMaterial {
    pub title: String,
    pub content: String,
    pub category: String,
}

impl NewStudyMaterial {
    /// Check the required fields one by one so the caller learns which one
    /// is missing.
    pub fn from_value(body: &Value) -> Result<Self> {
        Ok(Self {
            title: required_string(body, "title")?,
            content: required_string(body, "content")?,
            category: required_string(body, "category")?,
        })
    }
}

fn required_string(body: &Value, name: &str) -> Result<String> {
    let value = body
        .get(name)
        .ok_or_else(|| Error::InvalidInput(format!("missing required field: {name}")))?;
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| Error::InvalidInput(format!("field {name} must be a string")))
}

/// Partial update for a study material. Absent fields are left untouched.
#[derive(Debug, Clone, Deserialize)]
pub struct StudyMaterialUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
}
