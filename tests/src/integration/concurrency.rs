//! # Concurrency
//!
//! Many simultaneous requests through the router:
//!
//! - Same identifier: writes are linearized, every read sees a whole document
//! - Different identifiers: each ends with its own last write
//! - Undo under contention restores some complete earlier write

#[cfg(test)]
mod tests {
    use crate::integration::harness::TestGateway;
    use axum::http::StatusCode;
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_different_ids_are_isolated() {
        let gw = Arc::new(TestGateway::new());

        let mut tasks = Vec::new();
        for n in 0..16 {
            let gw = Arc::clone(&gw);
            tasks.push(tokio::spawn(async move {
                let id = format!("doc-{n}");
                for round in 0..10 {
                    let (status, _) = gw.replace(&id, &json!([{ "owner": n, "round": round }])).await;
                    assert_eq!(status, StatusCode::OK);
                }
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        for n in 0..16 {
            let (_, stored) = gw.get(&format!("doc-{n}")).await;
            assert_eq!(stored, json!([{ "owner": n, "round": 9 }]));
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_same_id_reads_never_see_partial_writes() {
        let gw = Arc::new(TestGateway::new());
        let wide = |n: u64| json!([{ "a": n, "b": n, "c": n, "d": n }]);
        gw.replace("hot", &wide(0)).await;

        let writer = {
            let gw = Arc::clone(&gw);
            tokio::spawn(async move {
                for n in 1..=50 {
                    gw.replace("hot", &wide(n)).await;
                }
            })
        };

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let gw = Arc::clone(&gw);
                tokio::spawn(async move {
                    for _ in 0..50 {
                        let (status, stored) = gw.get("hot").await;
                        assert_eq!(status, StatusCode::OK);
                        let row = &stored[0];
                        assert_eq!(row["a"], row["b"]);
                        assert_eq!(row["b"], row["c"]);
                        assert_eq!(row["c"], row["d"]);
                    }
                })
            })
            .collect();

        writer.await.unwrap();
        for reader in readers {
            reader.await.unwrap();
        }
        assert_eq!(gw.get("hot").await.1, wide(50));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_undo_under_contention_restores_a_complete_write() {
        let gw = Arc::new(TestGateway::new());

        let mut tasks = Vec::new();
        for writer in 0..8 {
            let gw = Arc::clone(&gw);
            tasks.push(tokio::spawn(async move {
                for round in 0..5 {
                    gw.replace("shared", &json!([{ "writer": writer, "round": round }]))
                        .await;
                }
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        let (status, _) = gw.undo("shared").await;
        assert_eq!(status, StatusCode::OK);

        let (_, restored) = gw.get("shared").await;
        let row = &restored[0];
        assert!(row["writer"].as_u64().unwrap() < 8);
        assert!(row["round"].as_u64().unwrap() < 5);

        let (status, _) = gw.undo("shared").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_uploads_all_land() {
        let gw = Arc::new(TestGateway::new());

        let tasks: Vec<_> = (0..20)
            .map(|n| {
                let gw = Arc::clone(&gw);
                tokio::spawn(async move {
                    let id = gw.upload(format!(r#"[{{"n":{n}}}]"#).as_bytes()).await;
                    (n, id)
                })
            })
            .collect();

        for task in tasks {
            let (n, id) = task.await.unwrap();
            assert_eq!(gw.get(&id).await.1, json!([{ "n": n }]));
        }
        assert_eq!(std::fs::read_dir(gw.dir.path()).unwrap().count(), 20);
    }
}
