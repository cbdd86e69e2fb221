// API Integration Tests
//
// Purpose: Exercise every endpoint against a gzip dataset written to a temp dir
// Run with: cargo test --features api --test api_integration_tests

#[cfg(feature = "api")]
mod api_tests {
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use flate2::{write::GzEncoder, Compression};
    use plant_catalog::{create_router, AppState, CatalogConfig, SourceLocation};
    use serde_json::Value;
    use std::io::Write;
    use tempfile::TempDir;
    use tower::ServiceExt; // for oneshot

    const LIGHT_JSON: &str = r#"{
        "rosa-rugosa": {"f":"Rosa rugosa","c":["Beach Rose"],"t":["Shrub"],"z":["2","3","4"],"l":["Full sun"],"m":"Low"},
        "Acer x freemanii 'Jeffersred'": {"f":"Acer x freemanii 'Jeffersred'","c":["Autumn Blaze Maple"],"t":["Tree"],"z":["4a","7b"],"l":["Full sun","Partial Shade"],"m":["Medium"]},
        "abies-alba": {"f":"Abies alba","c":["Silver Fir"],"t":["Tree"],"z":["4","6"],"l":["Partial Shade"],"m":"High","p":["Adelgids"]}
    }"#;

    fn gzip(text: &str) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(text.as_bytes()).unwrap();
        encoder.finish().unwrap()
    }

    // Helper: write the dataset layout to a temp dir
    fn write_fixture() -> TempDir {
        let temp = tempfile::tempdir().unwrap();
        let details = temp.path().join("zipped-plants");
        std::fs::create_dir_all(&details).unwrap();

        std::fs::write(temp.path().join("light-weight-data-set.json.gz"), gzip(LIGHT_JSON)).unwrap();
        std::fs::write(
            details.join("rosa-rugosa.gz"),
            gzip(r#"{"full-name":"Rosa rugosa","common-names":["Beach Rose"],"family":"Rosaceae","genus":"Rosa","internal-id":42}"#),
        )
        .unwrap();
        // stored uncompressed on purpose
        std::fs::write(
            details.join("Acer x freemanii 'Jeffersred'.gz"),
            r#"{"full-name":"Acer x freemanii 'Jeffersred'","genus":"Acer","leaf-color":["Green","Red"]}"#,
        )
        .unwrap();
        std::fs::write(details.join("abies-alba.gz"), gzip("{\"genus\": ")).unwrap();
        temp
    }

    // Helper: Create test app over a fixture directory
    async fn create_test_app() -> (TempDir, axum::Router) {
        let temp = write_fixture();
        let config = CatalogConfig {
            source: SourceLocation::Dir(temp.path().to_path_buf()),
            ..CatalogConfig::default()
        };
        let state = AppState::new(&config).await.unwrap();
        (temp, create_router(state))
    }

    // Helper: Parse JSON response
    async fn json_response(response: axum::response::Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read response body");
        serde_json::from_slice(&body).expect("Failed to parse JSON")
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_view(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/view")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn row_keys(page: &Value) -> Vec<String> {
        page["rows"]
            .as_array()
            .unwrap()
            .iter()
            .map(|row| row["key"].as_str().unwrap().to_string())
            .collect()
    }

    // =========================================================================
    // Section 1: Health Check
    // =========================================================================

    #[tokio::test]
    async fn test_health_check() {
        let (_temp, app) = create_test_app().await;

        let response = app.oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_response(response).await;
        assert_eq!(body["status"], "healthy");
        assert!(body["timestamp"].is_string());
        assert_eq!(body["plants"], 3);
    }

    #[tokio::test]
    async fn test_missing_dataset_fails_startup() {
        let temp = tempfile::tempdir().unwrap();
        let config = CatalogConfig {
            source: SourceLocation::Dir(temp.path().to_path_buf()),
            ..CatalogConfig::default()
        };
        assert!(AppState::new(&config).await.is_err());
    }

    // =========================================================================
    // Section 2: Facets
    // =========================================================================

    #[tokio::test]
    async fn test_facet_universes_are_sorted() {
        let (_temp, app) = create_test_app().await;

        let response = app.oneshot(get("/api/facets")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_response(response).await;
        assert_eq!(body["types"], serde_json::json!(["Shrub", "Tree"]));
        assert_eq!(body["zones"], serde_json::json!(["2", "3", "4", "4a", "6", "7b"]));
        assert_eq!(body["light"], serde_json::json!(["Full sun", "Partial Shade"]));
        assert_eq!(body["maintenance"], serde_json::json!(["Low", "Medium", "High"]));
        assert_eq!(body["problems"], serde_json::json!(["Adelgids"]));
    }

    // =========================================================================
    // Section 3: Filtered Views
    // =========================================================================

    #[tokio::test]
    async fn test_empty_view_request_returns_everything() {
        let (_temp, app) = create_test_app().await;

        let response = app.oneshot(post_view(serde_json::json!({}))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let page = json_response(response).await;
        assert_eq!(
            row_keys(&page),
            vec!["rosa-rugosa", "Acer x freemanii 'Jeffersred'", "abies-alba"]
        );
        assert_eq!(page["total"], 3);
        assert_eq!(page["window"], 200);
        assert_eq!(page["has_more"], false);
        assert_eq!(page["rows"][0]["title"], "Rosa rugosa");
        assert_eq!(page["rows"][0]["zone_range"], "2 - 4");
        assert_eq!(page["rows"][1]["zone_range"], "4a - 7b");
    }

    #[tokio::test]
    async fn test_search_and_facets_combine() {
        let (_temp, app) = create_test_app().await;

        let response = app
            .clone()
            .oneshot(post_view(serde_json::json!({ "search": "ma" })))
            .await
            .unwrap();
        assert_eq!(row_keys(&json_response(response).await), vec!["Acer x freemanii 'Jeffersred'"]);

        let response = app
            .clone()
            .oneshot(post_view(serde_json::json!({ "types": ["Tree"], "include_problem_plants": false })))
            .await
            .unwrap();
        assert_eq!(row_keys(&json_response(response).await), vec!["Acer x freemanii 'Jeffersred'"]);

        let response = app
            .oneshot(post_view(serde_json::json!({ "light": [] })))
            .await
            .unwrap();
        let page = json_response(response).await;
        assert_eq!(page["total"], 0);
    }

    // =========================================================================
    // Section 4: Detail Records
    // =========================================================================

    #[tokio::test]
    async fn test_plant_detail_projection() {
        let (_temp, app) = create_test_app().await;

        let response = app.oneshot(get("/api/plants/rosa-rugosa")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_response(response).await;
        assert_eq!(body["title"], "Rosa rugosa");
        assert_eq!(body["common_names"], "Beach Rose");
        assert_eq!(body["sections"][0]["title"], "Basic Information");
        assert_eq!(
            body["sections"][0]["fields"],
            serde_json::json!([
                { "label": "Family", "value": "Rosaceae" },
                { "label": "Genus", "value": "Rosa" }
            ])
        );
        assert!(!body.to_string().contains("internal-id"));
    }

    #[tokio::test]
    async fn test_plant_detail_with_encoded_key_and_plain_payload() {
        let (_temp, app) = create_test_app().await;

        let response = app
            .oneshot(get("/api/plants/Acer%20x%20freemanii%20%27Jeffersred%27"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_response(response).await;
        assert_eq!(body["title"], "Acer x freemanii 'Jeffersred'");
        assert_eq!(body["sections"][1]["fields"][0]["value"], "Green, Red");
    }

    #[tokio::test]
    async fn test_plant_detail_not_found() {
        let (_temp, app) = create_test_app().await;

        let response = app.oneshot(get("/api/plants/no-such-plant")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = json_response(response).await;
        assert!(body["error"].as_str().unwrap().contains("no-such-plant"));
    }

    #[tokio::test]
    async fn test_malformed_detail_is_bad_gateway() {
        let (_temp, app) = create_test_app().await;

        let response = app.oneshot(get("/api/plants/abies-alba")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert!(json_response(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn test_plant_detail_is_cached() {
        let (temp, app) = create_test_app().await;

        let response = app.clone().oneshot(get("/api/plants/rosa-rugosa")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        std::fs::remove_file(temp.path().join("zipped-plants").join("rosa-rugosa.gz")).unwrap();

        let response = app.oneshot(get("/api/plants/rosa-rugosa")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_response(response).await["title"], "Rosa rugosa");
    }
}
