//! Core library for the OOTD recommendation backend.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Clients for the external services (weather, geocoding, store, model)
//! - The recommendation pipeline and study-material operations
//!
//! It is used by `ootd-server`, but can also be reused by other binaries or services.

pub mod catalog;
pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod prompt;
pub mod recommend;
pub mod study;

pub use catalog::CategorizedCatalog;
pub use client::{GeminiClient, GeocodeClient, StoreClient, TextGenerator, WeatherClient};
pub use config::Config;
pub use error::{Error, Result};
pub use model::{Coordinate, Recommendation, StudyMaterial, WeatherSnapshot};
pub use recommend::Recommender;
pub use study::StudyMaterials;
