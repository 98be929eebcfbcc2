//! # End-to-End HTTP Flows
//!
//! Full client journeys through the router and the file-backed store:
//!
//! 1. **Upload → read → download**: normalization, id assignment, headers
//! 2. **Edit → undo**: one-step restore, second undo refused
//! 3. **Rejection**: invalid documents never reach disk but still arm undo

#[cfg(test)]
mod tests {
    use crate::integration::harness::{get, multipart, TestGateway};
    use axum::http::header::CONTENT_DISPOSITION;
    use axum::http::StatusCode;
    use doc_gateway::domain::config::LimitsConfig;
    use serde_json::json;
    use tower::ServiceExt;

    // =============================================================================
    // UPLOAD → READ → DOWNLOAD
    // =============================================================================

    #[tokio::test]
    async fn test_upload_normalizes_then_reads_back() {
        let gw = TestGateway::new();

        let id = gw.upload(br#"[{"a":1},{"b":2}]"#).await;
        assert_eq!(id.len(), 16);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));

        let (status, stored) = gw.get(&id).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(stored, json!([{ "a": 1, "b": null }, { "a": null, "b": 2 }]));
    }

    #[tokio::test]
    async fn test_upload_pads_nested_tables() {
        let gw = TestGateway::new();
        let table = json!([
            { "name": "Alpha", "kpis": [{ "metric": "Revenue", "value": 1 }, { "metric": "Cost" }] },
            { "name": "Beta" }
        ]);

        let id = gw.upload(table.to_string().as_bytes()).await;
        let (_, stored) = gw.get(&id).await;

        assert_eq!(
            stored,
            json!([
                {
                    "name": "Alpha",
                    "kpis": [
                        { "metric": "Revenue", "value": 1 },
                        { "metric": "Cost", "value": null }
                    ]
                },
                { "name": "Beta", "kpis": [] }
            ])
        );
    }

    #[tokio::test]
    async fn test_upload_without_normalization_keeps_rows() {
        let gw = TestGateway::with_limits(LimitsConfig::default(), false);
        let id = gw.upload(br#"[{"a":1},{"b":2}]"#).await;
        let (_, stored) = gw.get(&id).await;
        assert_eq!(stored, json!([{ "a": 1 }, { "b": 2 }]));
    }

    #[tokio::test]
    async fn test_each_upload_gets_a_new_id() {
        let gw = TestGateway::new();
        let first = gw.upload(b"[]").await;
        let second = gw.upload(b"[]").await;
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_download_after_upload() {
        let gw = TestGateway::new();
        let id = gw.upload(br#"[{"k":"v"}]"#).await;

        let response = gw
            .router
            .clone()
            .oneshot(get(&format!("/api/download?id={id}")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[CONTENT_DISPOSITION],
            format!("attachment; filename=data_{id}.json").as_str()
        );
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(text.contains("\n  {\n"), "expected pretty output: {text}");
        assert_eq!(serde_json::from_str::<serde_json::Value>(&text).unwrap(), json!([{ "k": "v" }]));
    }

    #[tokio::test]
    async fn test_upload_does_not_arm_undo() {
        let gw = TestGateway::new();
        let id = gw.upload(b"[1, 2]").await;

        let (status, body) = gw.undo(&id).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "No undo available");
    }

    // =============================================================================
    // EDIT → UNDO
    // =============================================================================

    #[tokio::test]
    async fn test_edit_undo_journey() {
        let gw = TestGateway::new();

        let (status, _) = gw.get("sheet").await;
        assert_eq!(status, StatusCode::OK);

        gw.replace("sheet", &json!([{ "v": 1 }])).await;
        gw.replace("sheet", &json!([{ "v": 2 }])).await;
        gw.replace("sheet", &json!([{ "v": 3 }])).await;

        let (status, _) = gw.undo("sheet").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(gw.get("sheet").await.1, json!([{ "v": 2 }]));

        // Only one step is kept.
        let (status, _) = gw.undo("sheet").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(gw.get("sheet").await.1, json!([{ "v": 2 }]));
    }

    #[tokio::test]
    async fn test_undo_of_first_write_restores_empty_table() {
        let gw = TestGateway::new();
        gw.replace("fresh", &json!([{ "x": 1 }])).await;
        gw.undo("fresh").await;
        assert_eq!(gw.get("fresh").await.1, json!([]));
    }

    // =============================================================================
    // REJECTION
    // =============================================================================

    #[tokio::test]
    async fn test_too_many_keys_is_rejected_and_not_stored() {
        let limits = LimitsConfig {
            max_keys_per_object: 2,
            ..LimitsConfig::default()
        };
        let gw = TestGateway::with_limits(limits, true);
        gw.replace("t", &json!([{ "a": 1, "b": 2 }])).await;

        let (status, body) = gw.replace("t", &json!([{ "a": 1, "b": 2, "c": 3 }])).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["message"],
            "Validation Error: object has 3 keys, maximum allowed is 2"
        );
        assert_eq!(gw.get("t").await.1, json!([{ "a": 1, "b": 2 }]));
    }

    #[tokio::test]
    async fn test_rejected_edit_still_arms_undo() {
        let gw = TestGateway::new();
        gw.replace("t", &json!([{ "v": 1 }])).await;
        gw.replace("t", &json!([{ "v": 2 }])).await;

        let (status, _) = gw.replace("t", &json!({ "a": { "b": { "c": 1 } } })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        // The snapshot taken by the rejected edit is the current content.
        let (status, _) = gw.undo("t").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(gw.get("t").await.1, json!([{ "v": 2 }]));
    }

    #[tokio::test]
    async fn test_upload_rejections() {
        let gw = TestGateway::new();

        let (status, body) = gw.send_json(multipart("file", b"{ broken")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].as_str().unwrap().starts_with("Invalid JSON format"));

        let (status, _) = gw.send_json(multipart("other", b"[]")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let deep = br#"[{"row":{"cell":{"value":1}}}]"#;
        let (status, _) = gw.send_json(multipart("file", deep)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        assert_eq!(std::fs::read_dir(gw.dir.path()).unwrap().count(), 0);
    }
}
