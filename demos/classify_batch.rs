//! Batched Classification Example
//!
//! Classifies a few hundred texts with one call. The client splits the input
//! into requests of at most `--batch-size` items, waits out any throttling,
//! and folds the envelopes into one result.
//!
//! Usage:
//!   MONKEYLEARN_TOKEN=<token> cargo run --example classify_batch -- <model_id>
//!   RUST_LOG=monkeylearn_rust=debug cargo run --example classify_batch -- <model_id>

use monkeylearn_rust::{ClassifyOptions, ErrorKind, MonkeyLearnClient, ThrottleRetryPolicy};
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("monkeylearn_rust=info".parse()?),
        )
        .init();

    let model_id = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "cl_pi3C7JiL".to_string());

    // Give up on throttling after ten minutes of accumulated waiting.
    let client = MonkeyLearnClient::builder()
        .throttle_retry(ThrottleRetryPolicy::unbounded().with_max_total_wait(Duration::from_secs(600)))
        .build()?;

    let texts: Vec<String> = (1..=450)
        .map(|i| format!("Customer review #{i}: delivery was quick and the product works"))
        .collect();

    println!("=== MonkeyLearn Batch Classification ===\n");
    println!("Classifying {} texts with {}", texts.len(), model_id);

    let options = ClassifyOptions::new().batch_size(200);
    match client.classifiers().classify(&model_id, &texts, &options).await {
        Ok(result) => {
            println!("Requests sent:      {}", result.responses().len());
            println!("Results received:   {}", result.items().len());
            println!("Queries used:       {}", result.request_queries_used());
            println!(
                "Queries remaining:  {}/{}",
                result.plan_queries_remaining(),
                result.plan_queries_allowed()
            );
            if let Some(first) = result.items().first() {
                println!("\nFirst result:\n{}", serde_json::to_string_pretty(first)?);
            }
        }
        Err(e) => match e.kind() {
            Some(kind) if kind.is_a(ErrorKind::ModelNotFound) => {
                println!("Model {model_id} does not exist: {e}");
            }
            Some(kind) if kind.is_rate_limit() => {
                println!("Still throttled after the wait budget: {e}");
            }
            _ => return Err(e.into()),
        },
    }

    Ok(())
}
