//! Integration tests for the read-only configuration endpoints.

use easel_backend::api::BackendApi;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn model_limits_deserialize_and_clamp() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/config/limits"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model_limits": { "wan2.6-t2i": 2, "z-image-turbo": 4 }
        })))
        .mount(&server)
        .await;

    let limits = BackendApi::new(server.uri()).model_limits().await.unwrap();
    assert_eq!(limits.clamp_count("wan2.6-t2i", 10), 2);
    assert_eq!(limits.clamp_count("z-image-turbo", 10), 4);
}

#[tokio::test]
async fn global_config_defaults_missing_fields_to_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/config/global"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "common_subject": "雨夜都市" })),
        )
        .mount(&server)
        .await;

    let config = BackendApi::new(server.uri()).global_config().await.unwrap();
    assert_eq!(config.common_subject, "雨夜都市");
    assert_eq!(config.global_style, "");
    assert_eq!(config.negative_prompt, "");
}

#[tokio::test]
async fn prompts_map_is_unwrapped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/prompts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "prompts": { "环境": "宏大的地貌景观", "人物": "特写肖像" }
        })))
        .mount(&server)
        .await;

    let prompts = BackendApi::new(server.uri()).prompts().await.unwrap();
    assert_eq!(prompts["环境"], "宏大的地貌景观");
    assert_eq!(prompts.len(), 2);
}

#[tokio::test]
async fn model_catalog_tolerates_sparse_entries() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/models"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "models": [
                { "model_name": "wan2.6-t2i", "name": "Wan 2.6", "provider": "wan", "max_limit": 2 },
                { "model_name": "z-image-turbo" }
            ]
        })))
        .mount(&server)
        .await;

    let models = BackendApi::new(server.uri()).models().await.unwrap();
    assert_eq!(models.len(), 2);
    assert_eq!(models[0].max_limit, Some(2));
    assert_eq!(models[1].name, "");
    assert_eq!(models[1].provider, None);
}

#[tokio::test]
async fn categories_list_is_unwrapped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/categories"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "categories": ["环境", "人物"] })),
        )
        .mount(&server)
        .await;

    let categories = BackendApi::new(server.uri()).categories().await.unwrap();
    assert_eq!(categories, vec!["环境", "人物"]);
}
