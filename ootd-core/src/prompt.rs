use serde::Serialize;

use crate::catalog::CategorizedCatalog;
use crate::error::{Error, Result};
use crate::model::WeatherSnapshot;

/// Feels-like temperature (Celsius) at or below which the prompt demands
/// outerwear in every set.
pub const OUTER_THRESHOLD_C: f64 = 10.0;

const INTRO: &str = "당신은 패션 스타일리스트입니다. 아래의 날씨 정보와 보유 의상 리스트를 보고, 날씨에 가장 잘 어울리는 옷 3세트를 추천해주세요.\n\
각 세트는 'top', 'bottom', 'shoes' 카테고리로 구성되어야 합니다.\n";

pub(crate) const OUTER_RULE: &str =
    "날씨가 쌀쌀하다면 (체감 온도 10도 이하) 'outer'도 필수로 포함해주세요.\n";

const OUTPUT_RULES: &str = "결과는 반드시 옷의 'id', 'name', 'image_url'을 포함하는 JSON 형식으로만 응답해야 합니다. 각 세트에 대한 스타일 설명도 덧붙여주세요.\n\
제시된 의상 리스트 내에서만 선택해야 합니다.\n";

const EXAMPLE: &str = r#"### JSON 출력 형식 예시 (이 구조를 반드시 지켜주세요. 'items' 내에 'outer'는 필수가 아님):
{
  "recommendations": [
    {
      "style_description": "화창한 날에 어울리는 캐주얼한 스타일입니다.",
      "items": {
        "top": { "id": 1, "name": "흰색 반팔티", "image_url": "url..." },
        "bottom": { "id": 5, "name": "청바지", "image_url": "url..." },
        "shoes": { "id": 8, "name": "흰색 스니커즈", "image_url": "url..." }
      }
    },
    {
      "style_description": "쌀쌀한 날씨에 대비한 따뜻한 스타일입니다.",
      "items": {
        "top": { "id": 2, "name": "긴팔 니트", "image_url": "url..." },
        "bottom": { "id": 6, "name": "슬랙스", "image_url": "url..." },
        "outer": { "id": 10, "name": "가디건", "image_url": "url..." },
        "shoes": { "id": 9, "name": "운동화", "image_url": "url..." }
      }
    }
  ]
}"#;

/// The weather fields the model sees, serialized in this declaration
/// order. The resolved address stays out of the prompt.
#[derive(Serialize)]
struct PromptWeather<'a> {
    description: &'a str,
    temp: f64,
    feels_like: f64,
    city_name: &'a str,
    timezone: i64,
    dt: i64,
}

/// Build the stylist prompt for one request. Pure; the outerwear rule is
/// emitted only when the weather actually calls for it.
pub fn compose(weather: &WeatherSnapshot, catalog: &CategorizedCatalog) -> Result<String> {
    let weather_json = serde_json::to_string(&PromptWeather {
        description: &weather.description,
        temp: weather.temp,
        feels_like: weather.feels_like,
        city_name: &weather.city_name,
        timezone: weather.timezone,
        dt: weather.observed_at,
    })
    .map_err(|e| Error::Internal(format!("failed to serialize weather for the prompt: {e}")))?;

    let clothes_json = serde_json::to_string(catalog.items())
        .map_err(|e| Error::Internal(format!("failed to serialize the catalog: {e}")))?;

    let mut prompt = String::with_capacity(2048 + clothes_json.len());
    prompt.push_str(INTRO);
    if weather.feels_like <= OUTER_THRESHOLD_C {
        prompt.push_str(OUTER_RULE);
    }
    prompt.push_str(OUTPUT_RULES);
    prompt.push_str("\n### 현재 날씨:\n");
    prompt.push_str(&weather_json);
    prompt.push_str("\n\n### 보유 의상 리스트:\n");
    prompt.push_str(&clothes_json);
    prompt.push_str("\n\n");
    prompt.push_str(EXAMPLE);

    Ok(prompt)
}
