//! Hivecrew CLI - Command-line interface for the Hivecrew task API

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use hivecrew_sdk::{
    CreateTaskRequest, FileKind, HivecrewClient, ListTasksQuery, SortField, SortOrder, Task,
    TaskStatus, TrackerConfig,
};
use std::path::PathBuf;
use std::time::Duration;
use tabled::{Table, Tabled};

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8420/api/v1";

#[derive(Parser)]
#[command(name = "hivecrew")]
#[command(about = "Hivecrew computer-use agent CLI", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// API base URL
    #[arg(long, env = "HIVECREW_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// API key (sent as a bearer token)
    #[arg(long, env = "HIVECREW_API_KEY")]
    api_key: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit a task without waiting for it
    Submit {
        /// Task description/instructions for the agent
        description: String,

        /// AI provider name (e.g., "OpenRouter")
        #[arg(short, long)]
        provider: String,

        /// Model ID (e.g., "anthropic/claude-sonnet-4.5")
        #[arg(short, long)]
        model: String,

        /// Files to upload with the task
        #[arg(short, long)]
        file: Vec<PathBuf>,
    },

    /// Submit a task and wait for it to finish
    Run {
        /// Task description/instructions for the agent
        description: String,

        /// AI provider name (e.g., "OpenRouter")
        #[arg(short, long)]
        provider: String,

        /// Model ID (e.g., "anthropic/claude-sonnet-4.5")
        #[arg(short, long)]
        model: String,

        /// Files to upload with the task
        #[arg(short, long)]
        file: Vec<PathBuf>,

        /// Seconds between status checks
        #[arg(long, default_value = "5")]
        poll_interval: u64,

        /// Give up after this many seconds (the remote task keeps running)
        #[arg(long, default_value = "1200")]
        timeout: u64,

        /// Wait forever
        #[arg(long, conflicts_with = "timeout")]
        no_timeout: bool,
    },

    /// List tasks
    List {
        /// Filter by status (repeatable, e.g. --status running --status queued)
        #[arg(short, long)]
        status: Vec<String>,

        /// Maximum number of results (1-200)
        #[arg(short, long, default_value = "50")]
        limit: u32,

        /// Pagination offset
        #[arg(short, long, default_value = "0")]
        offset: u32,

        /// Sort field
        #[arg(long, value_enum, default_value = "created-at")]
        sort: SortArg,

        /// Sort order
        #[arg(long, value_enum, default_value = "desc")]
        order: OrderArg,
    },

    /// Show a task
    Get {
        /// Task ID
        task_id: String,
    },

    /// Cancel a running or queued task
    Cancel {
        /// Task ID
        task_id: String,
    },

    /// Pause a running task
    Pause {
        /// Task ID
        task_id: String,
    },

    /// Resume a paused task
    Resume {
        /// Task ID
        task_id: String,

        /// Replacement instructions for the agent
        #[arg(short, long)]
        instructions: Option<String>,
    },

    /// Delete a task record
    Delete {
        /// Task ID
        task_id: String,
    },

    /// List files associated with a task
    Files {
        /// Task ID
        task_id: String,
    },

    /// Download a task file
    Download {
        /// Task ID
        task_id: String,

        /// Name of the file to download
        filename: String,

        /// Destination path (directory or full file path)
        #[arg(short, long, default_value = ".")]
        destination: PathBuf,

        /// Which side of the file store to download from
        #[arg(long, value_enum, default_value = "output")]
        kind: FileKindArg,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SortArg {
    CreatedAt,
    StartedAt,
    CompletedAt,
}

impl From<SortArg> for SortField {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::CreatedAt => SortField::CreatedAt,
            SortArg::StartedAt => SortField::StartedAt,
            SortArg::CompletedAt => SortField::CompletedAt,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OrderArg {
    Asc,
    Desc,
}

impl From<OrderArg> for SortOrder {
    fn from(arg: OrderArg) -> Self {
        match arg {
            OrderArg::Asc => SortOrder::Asc,
            OrderArg::Desc => SortOrder::Desc,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FileKindArg {
    Input,
    Output,
}

impl From<FileKindArg> for FileKind {
    fn from(arg: FileKindArg) -> Self {
        match arg {
            FileKindArg::Input => FileKind::Input,
            FileKindArg::Output => FileKind::Output,
        }
    }
}

#[derive(Tabled)]
struct TaskRow {
    id: String,
    status: String,
    created: String,
    summary: String,
}

impl From<&Task> for TaskRow {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id.clone(),
            status: task.status.to_string(),
            created: task
                .created_at
                .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_default(),
            summary: task.result_summary.clone().unwrap_or_default(),
        }
    }
}

fn print_task(task: &Task) {
    let table = Table::new(vec![TaskRow::from(task)]).to_string();
    println!("{table}");
}

/// Statuses pass through verbatim; unknown values become `Unrecognized` and
/// reach the server unchanged, which stays the authority on what is valid.
fn parse_statuses(raw: &[String]) -> Vec<TaskStatus> {
    raw.iter()
        .map(|s| {
            serde_json::from_value(serde_json::Value::String(s.clone()))
                .unwrap_or_else(|_| TaskStatus::Unrecognized(s.clone()))
        })
        .collect()
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let mut builder = HivecrewClient::builder(cli.base_url.as_str());
    if let Some(api_key) = &cli.api_key {
        builder = builder.api_key(api_key.as_str());
    }
    let client = builder.build().context("Failed to create client")?;
    let tasks = client.tasks();

    match cli.command {
        Commands::Submit {
            description,
            provider,
            model,
            file,
        } => {
            let task = tasks
                .create(CreateTaskRequest::new(description, provider, model).with_files(file))
                .await?;

            println!("{}", "✓ Task submitted".green().bold());
            println!();
            print_task(&task);
        }

        Commands::Run {
            description,
            provider,
            model,
            file,
            poll_interval,
            timeout,
            no_timeout,
        } => {
            let config = TrackerConfig {
                poll_interval: Duration::from_secs(poll_interval),
                timeout: (!no_timeout).then(|| Duration::from_secs(timeout)),
            };

            println!("{}", "Running task...".cyan().bold());
            let task = tasks
                .run(
                    CreateTaskRequest::new(description, provider, model).with_files(file),
                    config,
                )
                .await?;

            let headline = match task.status {
                TaskStatus::Completed => "✓ Task completed".green().bold(),
                _ => format!("✗ Task finished: {}", task.status).red().bold(),
            };
            println!("{headline}");
            println!();
            print_task(&task);
        }

        Commands::List {
            status,
            limit,
            offset,
            sort,
            order,
        } => {
            let query = ListTasksQuery {
                status: (!status.is_empty()).then(|| parse_statuses(&status)),
                limit,
                offset,
                sort: sort.into(),
                order: order.into(),
            };

            let list = tasks.list(query).await?;

            if list.tasks.is_empty() {
                println!("{}", "No tasks found".yellow());
            } else {
                let rows: Vec<TaskRow> = list.tasks.iter().map(TaskRow::from).collect();
                println!("{}", Table::new(rows));
                if let Some(total) = list.total {
                    println!();
                    println!(
                        "  Showing {} of {} (offset {})",
                        list.tasks.len(),
                        total,
                        list.offset
                    );
                }
            }
        }

        Commands::Get { task_id } => {
            let task = tasks.get(&task_id).await?;
            print_task(&task);
        }

        Commands::Cancel { task_id } => {
            let task = tasks.cancel(&task_id).await?;
            println!(
                "{}",
                format!("✓ Task {} -> {}", task.id, task.status).green().bold()
            );
        }

        Commands::Pause { task_id } => {
            let task = tasks.pause(&task_id).await?;
            println!(
                "{}",
                format!("✓ Task {} -> {}", task.id, task.status).green().bold()
            );
        }

        Commands::Resume {
            task_id,
            instructions,
        } => {
            let task = tasks.resume(&task_id, instructions.as_deref()).await?;
            println!(
                "{}",
                format!("✓ Task {} -> {}", task.id, task.status).green().bold()
            );
        }

        Commands::Delete { task_id } => {
            tasks.delete(&task_id).await?;
            println!("{}", format!("✓ Task {task_id} deleted").green().bold());
        }

        Commands::Files { task_id } => {
            let files = tasks.list_files(&task_id).await?;

            println!("{}", "Input files".cyan().bold());
            if files.input_files.is_empty() {
                println!("  (none)");
            }
            for file in &files.input_files {
                println!("  {} ({} bytes)", file.name, file.size);
            }

            println!();
            println!("{}", "Output files".cyan().bold());
            if files.output_files.is_empty() {
                println!("  (none)");
            }
            for file in &files.output_files {
                println!("  {} ({} bytes)", file.name, file.size);
            }
        }

        Commands::Download {
            task_id,
            filename,
            destination,
            kind,
        } => {
            let dest = tasks
                .download_file(&task_id, &filename, &destination, kind.into())
                .await?;
            println!(
                "{}",
                format!("✓ Downloaded to {}", dest.display()).green().bold()
            );
        }
    }

    Ok(())
}
