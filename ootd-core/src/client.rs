use async_trait::async_trait;
use reqwest::Client;
use std::{fmt::Debug, time::Duration};

use crate::error::{Error, Result};

pub mod gemini;
pub mod kakao;
pub mod openweather;
pub mod supabase;

pub use gemini::GeminiClient;
pub use kakao::GeocodeClient;
pub use openweather::WeatherClient;
pub use supabase::StoreClient;

/// A text-in, text-out language model. The recommendation pipeline only
/// ever sends one prompt and reads back one reply, so this is the whole
/// surface; tests substitute canned generators through it.
#[async_trait]
pub trait TextGenerator: Send + Sync + Debug {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Build an HTTP client with the shared per-call timeout.
pub(crate) fn http_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| Error::Internal(format!("failed to build HTTP client: {e}")))
}

/// Shorten a response body for error messages. Counts characters, not
/// bytes, so multi-byte text never splits mid-character.
pub(crate) fn truncate_body(body: &str) -> String {
    const MAX_CHARS: usize = 200;
    match body.char_indices().nth(MAX_CHARS) {
        Some((index, _)) => format!("{}...", &body[..index]),
        None => body.to_string(),
    }
}
