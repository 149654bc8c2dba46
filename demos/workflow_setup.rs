//! Workflow Setup Example
//!
//! Creates a workflow with a sentiment step and a custom metadata field,
//! uploads a few documents, lists the processed data, then deletes the
//! workflow again.
//!
//! Usage:
//!   MONKEYLEARN_TOKEN=<token> cargo run --example workflow_setup -- <classifier_id>

use monkeylearn_rust::{DataListOptions, MonkeyLearnClient, StepParams, WorkflowParams};
use serde_json::json;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let classifier_id = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "cl_pi3C7JiL".to_string());
    let client = MonkeyLearnClient::new();
    let workflows = client.workflows();

    println!("=== MonkeyLearn Workflow Setup ===\n");

    let params = WorkflowParams {
        description: Some("Sentiment of incoming reviews".to_string()),
        db_name: Some("reviews_sentiment".to_string()),
        ..WorkflowParams::default()
    };
    let created = workflows.create("Review sentiment", &params).await?;
    let workflow_id = created
        .body()
        .and_then(|b| b.get("id"))
        .and_then(|id| id.as_str())
        .ok_or("workflow id missing from response")?
        .to_string();
    println!("Created workflow {workflow_id}");

    let step = StepParams::new("sentiment", classifier_id).input_step("input");
    workflows.steps().create(&workflow_id, &step).await?;
    workflows
        .metadata()
        .create(&workflow_id, "rating", "integer")
        .await?;
    println!("Added step and metadata field");

    let documents = vec![
        json!({"text": "Love it, works perfectly", "rating": 5}),
        json!({"text": "Broke after two days", "rating": 1}),
    ];
    let uploaded = workflows.data().create(&workflow_id, &documents).await?;
    println!(
        "Uploaded {} documents ({} queries remaining)",
        documents.len(),
        uploaded.plan_queries_remaining()
    );

    let listing = workflows
        .data()
        .list(
            &workflow_id,
            &DataListOptions {
                per_page: Some(10),
                ..DataListOptions::default()
            },
        )
        .await?;
    if let Some(body) = listing.body() {
        println!("\nData:\n{}", serde_json::to_string_pretty(body)?);
    }

    workflows.delete(&workflow_id).await?;
    println!("\nDeleted workflow {workflow_id}");
    Ok(())
}
