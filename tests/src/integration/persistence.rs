//! # Persistence
//!
//! Behaviour that depends on the data directory outliving the process:
//! restart, on-disk layout, corrupt records and the retention sweep.

#[cfg(test)]
mod tests {
    use crate::integration::harness::TestGateway;
    use axum::http::StatusCode;
    use doc_gateway::domain::config::LimitsConfig;
    use doc_store::{DocumentApi, DocumentId};
    use serde_json::json;
    use std::time::{Duration, SystemTime};

    #[tokio::test]
    async fn test_documents_survive_restart_but_undo_does_not() {
        let gw = TestGateway::new();
        gw.replace("keep", &json!([{ "v": 1 }])).await;
        gw.replace("keep", &json!([{ "v": 2 }])).await;

        let restarted = TestGateway::open(gw.dir, LimitsConfig::default(), true);

        assert_eq!(restarted.get("keep").await.1, json!([{ "v": 2 }]));
        let (status, _) = restarted.undo("keep").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_on_disk_layout() {
        let gw = TestGateway::new();
        gw.replace("layout", &json!({ "a": [1, 2] })).await;

        let text = std::fs::read_to_string(gw.dir.path().join("data_layout.json")).unwrap();
        assert_eq!(text, "{\n  \"a\": [\n    1,\n    2\n  ]\n}");
    }

    #[tokio::test]
    async fn test_corrupt_record_is_a_server_error() {
        let gw = TestGateway::new();
        std::fs::write(gw.dir.path().join("data_broken.json"), b"[{\"a\":").unwrap();

        let (status, body) = gw.get("broken").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["status"], "error");
        assert!(!body["message"].as_str().unwrap().contains("data_broken"));

        // Overwriting repairs the record.
        let (status, _) = gw.replace("broken", &json!([])).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(gw.get("broken").await.1, json!([]));
    }

    #[tokio::test]
    async fn test_retention_sweep_removes_old_files_and_snapshots() {
        let gw = TestGateway::new();
        gw.replace("old", &json!([1])).await;
        gw.replace("old", &json!([2])).await;
        gw.replace("new", &json!([3])).await;

        let old_path = gw.dir.path().join("data_old.json");
        std::fs::File::options()
            .write(true)
            .open(&old_path)
            .unwrap()
            .set_modified(SystemTime::now() - Duration::from_secs(48 * 3600))
            .unwrap();

        let removed = gw.service.sweep_expired(Duration::from_secs(24 * 3600)).unwrap();
        assert_eq!(removed, 1);

        assert!(!old_path.exists());
        assert!(gw.dir.path().join("data_new.json").exists());
        assert!(!gw.service.ledger().has_pending(&DocumentId::parse("old").unwrap()));
        assert_eq!(gw.get("old").await.1, json!([]));
    }

    #[tokio::test]
    async fn test_seed_respects_existing_files() {
        let gw = TestGateway::new();
        gw.replace("demo", &json!([{ "mine": true }])).await;

        let id = DocumentId::parse("demo").unwrap();
        assert!(!gw.service.seed(&id, json!([{ "sample": 1 }])).unwrap());
        assert_eq!(gw.get("demo").await.1, json!([{ "mine": true }]));
    }
}
