use std::time::Duration;

use serde_json::{Value, json};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ootd_core::client::kakao::{ADDRESS_LOOKUP_FAILED, ADDRESS_NOT_FOUND};
use ootd_core::client::openweather::{DEFAULT_CITY_NAME, DEFAULT_DESCRIPTION};
use ootd_core::client::supabase::{StudyMaterialInsert, StudyMaterialPatch};
use ootd_core::{
    Coordinate, Error, GeminiClient, GeocodeClient, StoreClient, TextGenerator, WeatherClient,
};

fn timeout() -> Duration {
    Duration::from_secs(5)
}

fn seoul() -> Coordinate {
    Coordinate::new(37.5665, 126.978).unwrap()
}

#[tokio::test]
async fn weather_request_carries_coordinates_units_and_language() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("lat", "37.5665"))
        .and(query_param("lon", "126.978"))
        .and(query_param("appid", "owm-key"))
        .and(query_param("units", "metric"))
        .and(query_param("lang", "kr"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "cod": 200,
            "weather": [{ "description": "맑음", "icon": "01d" }],
            "main": { "temp": 21.5, "feels_like": 20.1 },
            "name": "Seoul",
            "timezone": 32400,
            "dt": 1_700_000_000
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = WeatherClient::new("owm-key", timeout()).unwrap().with_base_url(server.uri());
    let snapshot = client.fetch_current(seoul()).await.unwrap();

    assert_eq!(snapshot.description, "맑음");
    assert_eq!(snapshot.temp, 21.5);
    assert_eq!(snapshot.feels_like, 20.1);
    assert_eq!(snapshot.city_name, "Seoul");
    assert_eq!(snapshot.timezone, 32400);
    assert_eq!(snapshot.observed_at, 1_700_000_000);
    assert_eq!(snapshot.icon.as_deref(), Some("01d"));
    assert!(snapshot.detailed_address.is_none());
}

#[tokio::test]
async fn weather_in_band_error_surfaces_the_provider_message() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "cod": 401,
            "message": "Invalid API key"
        })))
        .mount(&server)
        .await;

    let client = WeatherClient::new("owm-key", timeout()).unwrap().with_base_url(server.uri());
    let err = client.fetch_current(seoul()).await.unwrap_err();

    match err {
        Error::WeatherUnavailable(details) => assert_eq!(details, "Invalid API key"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn weather_handles_string_cod() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "cod": "404",
            "message": "city not found"
        })))
        .mount(&server)
        .await;

    let client = WeatherClient::new("owm-key", timeout()).unwrap().with_base_url(server.uri());
    let err = client.fetch_current(seoul()).await.unwrap_err();

    assert!(matches!(err, Error::WeatherUnavailable(details) if details == "city not found"));
}

#[tokio::test]
async fn weather_defaults_fill_sparse_responses() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "cod": "200" })))
        .mount(&server)
        .await;

    let client = WeatherClient::new("owm-key", timeout()).unwrap().with_base_url(server.uri());
    let snapshot = client.fetch_current(seoul()).await.unwrap();

    assert_eq!(snapshot.description, DEFAULT_DESCRIPTION);
    assert_eq!(snapshot.city_name, DEFAULT_CITY_NAME);
    assert_eq!(snapshot.temp, 0.0);
    assert_eq!(snapshot.observed_at, 0);
}

#[tokio::test]
async fn kakao_sends_the_rest_key_and_swapped_axes() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/local/geo/coord2address.json"))
        .and(header("Authorization", "KakaoAK kakao-key"))
        .and(query_param("x", "126.978"))
        .and(query_param("y", "37.5665"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "documents": [{
                "road_address": { "address_name": "서울특별시 중구 세종대로 110" },
                "address": { "address_name": "서울 중구 태평로1가 31" }
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = GeocodeClient::new("kakao-key", timeout()).unwrap().with_base_url(server.uri());
    let address = client.resolve_address(seoul()).await;

    assert_eq!(address, "서울특별시 중구 세종대로 110");
}

#[tokio::test]
async fn kakao_empty_documents_yield_the_not_found_sentinel() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/local/geo/coord2address.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "documents": [] })))
        .mount(&server)
        .await;

    let client = GeocodeClient::new("kakao-key", timeout()).unwrap().with_base_url(server.uri());
    assert_eq!(client.resolve_address(seoul()).await, ADDRESS_NOT_FOUND);
}

#[tokio::test]
async fn kakao_failures_yield_the_lookup_failed_sentinel() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/local/geo/coord2address.json"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .mount(&server)
        .await;

    let client = GeocodeClient::new("kakao-key", timeout()).unwrap().with_base_url(server.uri());
    assert_eq!(client.resolve_address(seoul()).await, ADDRESS_LOOKUP_FAILED);
}

#[tokio::test]
async fn store_lists_clothes_with_projection_and_auth() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/clothes"))
        .and(query_param("select", "id,name,category,image_url"))
        .and(header("apikey", "store-key"))
        .and(header("Authorization", "Bearer store-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "name": "흰색 반팔티", "category": "top", "image_url": "http://img/1" },
            { "id": 5, "name": "청바지", "category": "bottom", "image_url": "http://img/5" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = StoreClient::new(server.uri(), "store-key", timeout()).unwrap();
    let rows = client.list_clothes().await.unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].id, 1);
    assert_eq!(rows[0].category, "top");
    assert_eq!(rows[1].name, "청바지");
}

#[tokio::test]
async fn store_error_status_maps_to_catalog_unavailable() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/clothes"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "message": "bad key" })))
        .mount(&server)
        .await;

    let client = StoreClient::new(server.uri(), "store-key", timeout()).unwrap();
    let err = client.list_clothes().await.unwrap_err();

    assert!(matches!(err, Error::CatalogUnavailable(_)));
}

#[tokio::test]
async fn store_insert_asks_for_the_stored_row_back() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/study_materials"))
        .and(header("Prefer", "return=representation"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([{
            "id": 7,
            "title": "문법 정리",
            "content": "내용",
            "category": "grammar",
            "created_at": "2026-08-24T12:00:00+00:00"
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let client = StoreClient::new(server.uri(), "store-key", timeout()).unwrap();
    let row = StudyMaterialInsert {
        title: "문법 정리".into(),
        content: "내용".into(),
        category: "grammar".into(),
        created_at: "2026-08-24T12:00:00+00:00".into(),
    };
    let stored = client.insert_study_material(&row).await.unwrap();

    assert_eq!(stored.id, 7);
    assert_eq!(stored.title, "문법 정리");

    let requests = server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["title"], "문법 정리");
    assert_eq!(body["created_at"], "2026-08-24T12:00:00+00:00");
}

#[tokio::test]
async fn store_update_targets_one_row_by_id() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/study_materials"))
        .and(query_param("id", "eq.7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": 7,
            "title": "새 제목",
            "content": "내용",
            "category": "grammar",
            "created_at": "2026-08-24T12:00:00+00:00",
            "updated_at": "2026-08-25T09:30:00+00:00"
        }])))
        .mount(&server)
        .await;

    let client = StoreClient::new(server.uri(), "store-key", timeout()).unwrap();
    let patch = StudyMaterialPatch {
        title: Some("새 제목".into()),
        content: None,
        category: None,
        updated_at: "2026-08-25T09:30:00+00:00".into(),
    };
    let stored = client.update_study_material(7, &patch).await.unwrap();

    assert_eq!(stored.title, "새 제목");
    assert_eq!(stored.updated_at.as_deref(), Some("2026-08-25T09:30:00+00:00"));

    let requests = server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert!(body.get("content").is_none());
    assert!(body.get("category").is_none());
}

#[tokio::test]
async fn store_update_with_no_match_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/study_materials"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let client = StoreClient::new(server.uri(), "store-key", timeout()).unwrap();
    let patch = StudyMaterialPatch {
        title: None,
        content: None,
        category: None,
        updated_at: "2026-08-25T09:30:00+00:00".into(),
    };
    let err = client.update_study_material(42, &patch).await.unwrap_err();

    assert!(matches!(err, Error::StoreUnavailable(details) if details.contains("42")));
}

#[tokio::test]
async fn store_delete_filters_by_id() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/study_materials"))
        .and(query_param("id", "eq.3"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = StoreClient::new(server.uri(), "store-key", timeout()).unwrap();
    client.delete_study_material(3).await.unwrap();
}

#[tokio::test]
async fn store_search_builds_ilike_and_eq_filters() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/study_materials"))
        .and(query_param("select", "*"))
        .and(query_param("title", "ilike.*문법*"))
        .and(query_param("category", "eq.grammar"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": 7,
            "title": "문법 정리",
            "content": "내용",
            "category": "grammar"
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let client = StoreClient::new(server.uri(), "store-key", timeout()).unwrap();
    let rows = client.search_study_materials(Some("문법"), Some("grammar")).await.unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].title, "문법 정리");
    assert!(rows[0].created_at.is_none());
}

#[tokio::test]
async fn gemini_sends_the_prompt_and_returns_the_text() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-1.5-flash:generateContent"))
        .and(query_param("key", "gemini-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": { "parts": [{ "text": "```json\n{\"recommendations\": []}\n```" }] }
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = GeminiClient::new("gemini-key", timeout()).unwrap().with_base_url(server.uri());
    let reply = client.generate("날씨에 맞는 옷을 추천해주세요.").await.unwrap();

    assert_eq!(reply, "```json\n{\"recommendations\": []}\n```");

    let requests = server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["contents"][0]["parts"][0]["text"], "날씨에 맞는 옷을 추천해주세요.");
}

#[tokio::test]
async fn gemini_http_errors_map_to_model_unavailable() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-1.5-flash:generateContent"))
        .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
        .mount(&server)
        .await;

    let client = GeminiClient::new("gemini-key", timeout()).unwrap().with_base_url(server.uri());
    let err = client.generate("prompt").await.unwrap_err();

    assert!(matches!(err, Error::ModelUnavailable(details) if details.contains("429")));
}

#[tokio::test]
async fn gemini_empty_candidates_map_to_model_unavailable() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-1.5-flash:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
        .mount(&server)
        .await;

    let client = GeminiClient::new("gemini-key", timeout()).unwrap().with_base_url(server.uri());
    let err = client.generate("prompt").await.unwrap_err();

    assert!(matches!(err, Error::ModelUnavailable(_)));
}
