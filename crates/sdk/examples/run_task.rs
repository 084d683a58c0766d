//! Run Task Example
//!
//! Creates a task and tracks it to completion.
//!
//! # Usage
//!
//! ```bash
//! HIVECREW_BASE_URL=http://127.0.0.1:8420/api/v1 \
//! HIVECREW_API_KEY=hc_dev_key \
//!     cargo run --example run_task
//! ```

use hivecrew_sdk::{CreateTaskRequest, FileKind, HivecrewClient, TrackerConfig};
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let base_url = std::env::var("HIVECREW_BASE_URL")
        .unwrap_or_else(|_| "http://127.0.0.1:8420/api/v1".to_string());

    let mut builder = HivecrewClient::builder(base_url);
    if let Ok(api_key) = std::env::var("HIVECREW_API_KEY") {
        builder = builder.api_key(api_key);
    }
    let client = builder.build()?;
    let tasks = client.tasks();

    // 1. Submit a task
    println!("1. Submitting task...");
    let task = tasks
        .create(CreateTaskRequest::new(
            "Take a screenshot of the desktop",
            "OpenRouter",
            "anthropic/claude-sonnet-4.5",
        ))
        .await?;
    println!("   ✓ Created: {} ({})\n", task.id, task.status);

    // 2. Track it to a terminal status, giving up after 5 minutes
    println!("2. Waiting for completion...");
    let config = TrackerConfig {
        poll_interval: Duration::from_secs(2),
        timeout: Some(Duration::from_secs(300)),
    };
    let finished = tasks
        .run(
            CreateTaskRequest::new(
                "Open the browser and search for Rust",
                "OpenRouter",
                "anthropic/claude-sonnet-4.5",
            ),
            config,
        )
        .await?;

    println!("   ✓ Finished: {}", finished.status);
    if let Some(summary) = &finished.result_summary {
        println!("     Summary: {summary}");
    }

    // 3. List produced files
    println!("\n3. Listing task files...");
    let files = tasks.list_files(&finished.id).await?;
    for file in &files.output_files {
        println!("   - {} ({} bytes)", file.name, file.size);
    }

    // 4. Download the first output file, if any
    if let Some(file) = files.output_files.first() {
        let dest = tasks
            .download_file(&finished.id, &file.name, "./downloads/", FileKind::Output)
            .await?;
        println!("\n4. Downloaded to {}", dest.display());
    }

    Ok(())
}
