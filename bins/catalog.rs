use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use tracing::info;

use models::service::{ServiceDraft, ServiceStatus};
use service::catalog::filter::CatalogFilter;
use service::catalog::store::{export_file_name, CatalogStore};
use service::storage::file_kv::FileKvStore;

/// Command-line collaborator for the service catalog store.
#[derive(Parser)]
#[command(name = "catalog", about = "Manage the local service catalog")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List services, optionally narrowed by status or name search
    List {
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        search: Option<String>,
    },
    /// Create a service record
    Add {
        #[arg(long)]
        name: String,
        /// One of: web-development, mobile-development, consulting,
        /// maintenance, data-analysis, ux-ui-design
        #[arg(long)]
        category: String,
        #[arg(long)]
        price: f64,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        duration: Option<u32>,
        /// One of: available, in-progress, completed, paused
        #[arg(long)]
        status: Option<String>,
    },
    /// Update an existing service record; omitted flags keep current values
    Update {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        price: Option<f64>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        duration: Option<u32>,
        #[arg(long)]
        status: Option<String>,
    },
    /// Delete a service record (requires --yes)
    Delete {
        id: i64,
        #[arg(long)]
        yes: bool,
    },
    /// Show catalog headline numbers
    Stats,
    /// Write the dated snapshot artifact
    Export {
        #[arg(long)]
        out_dir: Option<String>,
    },
}

fn parse_status(value: Option<String>) -> Result<Option<ServiceStatus>> {
    Ok(match value {
        Some(s) => Some(s.parse::<ServiceStatus>()?),
        None => None,
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    common::utils::logging::init_logging_default();

    let cli = Cli::parse();

    let mut cfg = configs::load_default().unwrap_or_default();
    cfg.normalize_and_validate()?;

    let kv = FileKvStore::new(cfg.storage.data_dir.clone()).await?;
    let store: Arc<CatalogStore> = CatalogStore::open(kv).await?;

    match cli.command {
        Command::List { status, search } => {
            let query = CatalogFilter { status: parse_status(status)?, search };
            for s in store.filter(&query).await {
                println!(
                    "{:>14}  {:<28} {:<20} {:>10.2}  {}",
                    s.id,
                    s.name,
                    s.category.label(),
                    s.price,
                    s.status.label()
                );
            }
        }
        Command::Add { name, category, price, description, duration, status } => {
            let draft = ServiceDraft {
                name,
                category: Some(category.parse()?),
                price,
                description,
                duration_minutes: duration,
                status: parse_status(status)?,
            };
            let created = store.create(draft).await?;
            println!("created {} ({})", created.name, created.id);
        }
        Command::Update { id, name, category, price, description, duration, status } => {
            let current = store.begin_edit(id).await?;
            let draft = ServiceDraft {
                name: name.unwrap_or(current.name),
                category: Some(match category {
                    Some(c) => c.parse()?,
                    None => current.category,
                }),
                price: price.unwrap_or(current.price),
                description: description.unwrap_or(current.description),
                duration_minutes: Some(duration.unwrap_or(current.duration_minutes)),
                status: Some(match status {
                    Some(s) => s.parse()?,
                    None => current.status,
                }),
            };
            let updated = store.update(id, draft).await?;
            println!("updated {} ({})", updated.name, updated.id);
        }
        Command::Delete { id, yes } => {
            if !yes {
                println!("re-run with --yes to delete service {id}");
            } else if store.delete(id).await? {
                println!("deleted {id}");
            } else {
                println!("no service with id {id}");
            }
        }
        Command::Stats => {
            let stats = store.stats().await;
            println!("services: {}", stats.count);
            println!("active:   {}", stats.active_count);
            println!("value:    {:.2}", stats.total_value);
        }
        Command::Export { out_dir } => {
            let snapshot = store.export_snapshot().await?;
            let name = export_file_name(chrono::Utc::now().date_naive());
            let path = Path::new(out_dir.as_deref().unwrap_or(".")).join(name);
            tokio::fs::write(&path, snapshot).await?;
            info!(path = %path.display(), "snapshot_written");
            println!("wrote {}", path.display());
        }
    }

    Ok(())
}
