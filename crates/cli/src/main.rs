//! Workcast CLI - work estimation and scheduling.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;
use workcast_core::{Complexity, PerformerId, Time, WorkItem, WorkItemId, WorkStatus, WorkType};
use workcast_progress::EstimationConfig;
use workcast_storage::JsonStorage;
use workcast_work::{WorkItemSpec, WorkManager};

#[derive(Parser)]
#[command(name = "workcast")]
#[command(about = "Estimate, schedule and learn from units of work", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Storage path for Workcast data
    #[arg(short, long, default_value = ".workcast")]
    storage: std::path::PathBuf,

    /// JSON file with estimation settings
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new work item
    Add {
        /// Title
        title: String,
        /// Work type (coding, research, documentation, ...)
        #[arg(long, default_value = "other")]
        work_type: WorkType,
        /// Complexity, 1-5 or a label
        #[arg(long, default_value = "3")]
        complexity: Complexity,
        /// Description
        #[arg(long, default_value = "")]
        description: String,
        /// Assigned performer
        #[arg(long)]
        performer: Option<String>,
        /// Parent item id
        #[arg(long)]
        parent: Option<WorkItemId>,
        /// Dependency ids
        #[arg(long = "depends-on")]
        depends_on: Vec<WorkItemId>,
    },
    /// Estimate a work item for a performer
    Estimate {
        /// Work item id
        id: WorkItemId,
        /// Estimating performer
        #[arg(long)]
        performer: String,
        /// Confidence level in (0, 1]
        #[arg(long)]
        confidence: Option<f64>,
    },
    /// Schedule an estimated work item
    Schedule {
        /// Work item id
        id: WorkItemId,
        /// Start time (RFC 3339), defaults to now
        #[arg(long)]
        start: Option<Time>,
    },
    /// Change a work item's status
    Status {
        /// Work item id
        id: WorkItemId,
        /// not_started, in_progress, completed, blocked or delayed
        status: WorkStatus,
    },
    /// Assign a work item, or clear the assignment
    Assign {
        /// Work item id
        id: WorkItemId,
        /// Performer; omit to unassign
        performer: Option<String>,
    },
    /// Show work item details
    Show {
        /// Work item id
        id: WorkItemId,
    },
    /// List work items
    List {
        /// Only items assigned to this performer
        #[arg(long)]
        performer: Option<String>,
    },
    /// Show ETA and progress of a work item
    Eta {
        /// Work item id
        id: WorkItemId,
    },
    /// Show a performer profile
    Profile {
        /// Performer
        performer: String,
    },
    /// Show workload for performers
    Workload {
        /// Performers
        #[arg(required = true)]
        performers: Vec<String>,
    },
    /// Compute the critical path through work items
    CriticalPath {
        /// Work item ids
        ids: Vec<WorkItemId>,
    },
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
}

async fn load_config(path: Option<&std::path::Path>) -> Result<EstimationConfig> {
    let Some(path) = path else {
        return Ok(EstimationConfig::default());
    };
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading config {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref()).await?;
    let storage = JsonStorage::new(&cli.storage).await?;
    let mut manager = WorkManager::load(storage, config).await?;

    match cli.command {
        Commands::Add { title, work_type, complexity, description, performer, parent, depends_on } => {
            let mut spec = WorkItemSpec::new(title, work_type, complexity)
                .with_description(description)
                .with_dependencies(depends_on);
            if let Some(performer) = performer {
                spec = spec.with_performer(performer);
            }
            if let Some(parent) = parent {
                spec = spec.with_parent(parent);
            }
            let item = manager.create_work_item(spec);
            println!("Added work item: {} - {}", item.id, item.title);
        }
        Commands::Estimate { id, performer, confidence } => {
            let performer = PerformerId::new(performer);
            let estimate = match confidence {
                Some(level) => manager.estimate(id, performer, level)?,
                None => manager.estimate_default(id, performer)?,
            };
            println!(
                "Estimate for {}: {:.2}h ({:.2}h - {:.2}h at {:.0}% confidence)",
                id,
                estimate.estimated_hours,
                estimate.lower_bound_hours,
                estimate.upper_bound_hours,
                estimate.confidence_level * 100.0
            );
        }
        Commands::Schedule { id, start } => {
            manager.schedule(id, start)?;
            let eta = manager.get_eta(id)?.unwrap_or_else(|| "-".to_string());
            println!("Scheduled {}, ETA {}", id, eta);
        }
        Commands::Status { id, status } => {
            manager.update_status(id, status)?;
            println!("{} is now {}", id, status);
        }
        Commands::Assign { id, performer } => {
            manager.assign(id, performer.map(PerformerId::new))?;
            println!("Updated assignment of {}", id);
        }
        Commands::Show { id } => {
            let Some(item) = manager.get_item(id) else {
                println!("Work item not found");
                return Ok(());
            };
            print_item(item);
        }
        Commands::List { performer } => {
            let items = match performer {
                Some(p) => manager.get_performer_items(&PerformerId::new(p)),
                None => manager.get_all_items(),
            };

            println!("Work items ({})", items.len());
            for item in items {
                println!(
                    "  {} | {} | {} | {} - {}",
                    item.id,
                    item.status,
                    item.work_type,
                    item.assigned_to.as_ref().map_or("-", |p| p.as_str()),
                    item.title,
                );
            }
        }
        Commands::Eta { id } => {
            let eta = manager.get_eta(id)?;
            let progress = manager.get_progress(id)?;
            match (eta, progress) {
                (Some(eta), Some(progress)) => println!("ETA {} ({:.1}% elapsed)", eta, progress),
                _ => println!("{} is not estimated and scheduled yet", id),
            }
        }
        Commands::Profile { performer } => {
            let performer = PerformerId::new(performer);
            match manager.get_profile(&performer) {
                Some(profile) => println!("{}", serde_json::to_string_pretty(profile)?),
                None => println!("No profile for {}", performer),
            }
        }
        Commands::Workload { performers } => {
            let performers: Vec<PerformerId> = performers.into_iter().map(PerformerId::new).collect();
            let workload = manager.get_team_workload(&performers);
            println!("{}", serde_json::to_string_pretty(&workload)?);
        }
        Commands::CriticalPath { ids } => {
            let path = manager.get_critical_path(&ids)?;
            println!("Critical path ({:.2}h)", path.total_hours);
            for id in &path.items {
                let title = manager.get_item(*id).map_or("?", |i| i.title.as_str());
                println!("  {} - {}", id, title);
            }
            if !path.excluded.is_empty() {
                println!("Excluded (dependency cycle): {}", path.excluded.len());
                for id in &path.excluded {
                    println!("  {}", id);
                }
            }
        }
    }

    if manager.is_dirty() {
        if manager.flush().await {
            info!("Saved to {}", cli.storage.display());
        } else {
            anyhow::bail!("changes could not be saved to {}", cli.storage.display());
        }
    }

    Ok(())
}

fn print_item(item: &WorkItem) {
    println!("Work item: {}", item.id);
    println!("  Title: {}", item.title);
    if !item.description.is_empty() {
        println!("  Description: {}", item.description);
    }
    println!("  Type: {}", item.work_type);
    println!("  Complexity: {}", item.complexity);
    println!("  Status: {}", item.status);
    if let Some(performer) = &item.assigned_to {
        println!("  Assigned to: {}", performer);
    }
    if let Some(parent) = item.parent_id {
        println!("  Parent: {}", parent);
    }
    for dep in &item.dependencies {
        println!("  Depends on: {}", dep);
    }
    if let Some(estimate) = &item.estimate {
        println!(
            "  Estimate: {:.2}h [{:.2}, {:.2}] by {}",
            estimate.estimated_hours,
            estimate.lower_bound_hours,
            estimate.upper_bound_hours,
            estimate.performer_id
        );
        if let Some(eta) = estimate.eta() {
            println!("  ETA: {}", eta);
        }
        if let Some(accuracy) = estimate.accuracy() {
            println!("  Accuracy: {:.1}%", accuracy);
        }
    }
    println!("  Created: {}", item.created_at);
}
