//! Sample table stored under `demo` on first start.

use anyhow::{Context, Result};
use doc_store::{Document, DocumentApi, DocumentId};
use serde_json::json;
use tracing::info;

pub const DEMO_ID: &str = "demo";

/// Two projects with a nested KPI table each.
pub fn demo_table() -> Document {
    json!([
        {
            "id": 1,
            "name": "Project Alpha",
            "kpis": [
                { "metric": "Revenue", "value": 100 },
                { "metric": "Cost", "value": 50 }
            ],
            "owner": "Alice"
        },
        {
            "id": 2,
            "name": "Project Beta",
            "owner": "Bob",
            "kpis": [
                { "metric": "Revenue", "value": 200 }
            ]
        }
    ])
}

/// Store the demo table unless a `demo` document already exists.
pub fn seed_demo(documents: &dyn DocumentApi) -> Result<bool> {
    let id = DocumentId::parse(DEMO_ID).context("demo identifier")?;
    let written = documents
        .seed(&id, demo_table())
        .context("failed to seed demo document")?;
    if written {
        info!(id = %id, "Demo document created");
    }
    Ok(written)
}
