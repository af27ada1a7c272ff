use clap::Subcommand;
use dayledger_core::record::{Category, CompletedTask, RecordStore};

use super::checkin::report_save;
use super::{open_vault, today, CmdResult};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a task name to the catalog under a category
    Add {
        /// Category key (bodyHealth, mentalHealth, soulNourishment,
        /// selfImprovement, socialBonds, or a custom category)
        category: String,
        name: String,
    },
    /// Register a custom category
    AddCategory { name: String },
    /// Check off a task for the day, crediting its category bucket
    Complete {
        category: String,
        name: String,
        /// Reward in currency units
        #[arg(long)]
        earnings: f64,
        #[arg(long)]
        date: Option<String>,
    },
    /// List the catalog, or a day's completed tasks with --date
    List {
        #[arg(long)]
        date: Option<String>,
    },
}

pub async fn run(action: TaskAction) -> CmdResult {
    let vault = open_vault().await?;
    let store = RecordStore::new(&vault);

    match action {
        TaskAction::Add { category, name } => {
            let mut catalog = store.load_catalog().await;
            if !catalog.is_known_category(&category) {
                return Err(format!(
                    "unknown category '{category}' (register it with task add-category)"
                )
                .into());
            }
            catalog.add_task(&category, &name)?;
            report_save(&store.save_catalog(&catalog).await);
            println!("Added '{name}' under {category}.");
        }
        TaskAction::AddCategory { name } => {
            let mut catalog = store.load_catalog().await;
            catalog.add_custom_category(&name)?;
            report_save(&store.save_catalog(&catalog).await);
            println!("Registered custom category '{name}'.");
        }
        TaskAction::Complete {
            category,
            name,
            earnings,
            date,
        } => {
            let catalog = store.load_catalog().await;
            if !catalog.is_known_category(&category) {
                return Err(format!("unknown category '{category}'").into());
            }
            let date = date.unwrap_or_else(today);
            let mut record = store.load_or_new(&date).await?;
            let task = CompletedTask::new(&category, &name, earnings, chrono::Utc::now());
            record.record_task(task)?;
            report_save(&store.save(&record).await);
            println!(
                "Completed '{name}' (+{earnings:.2} to {}). Day total: {:.2}",
                Category::bucket_for(&category).label(),
                record.total_earnings.total
            );
        }
        TaskAction::List { date } => match date {
            Some(date) => {
                let record = store.load_or_new(&date).await?;
                if record.completed_tasks.is_empty() {
                    println!("No completed tasks for {date}.");
                }
                for task in &record.completed_tasks {
                    println!(
                        "{}  [{}] {} (+{:.2})",
                        task.date.format("%H:%M"),
                        task.category,
                        task.name,
                        task.earnings
                    );
                }
            }
            None => {
                let catalog = store.load_catalog().await;
                for (category, names) in &catalog.tasks {
                    println!("{category}:");
                    for name in names {
                        println!("  - {name}");
                    }
                }
                if !catalog.custom_categories.is_empty() {
                    println!("custom categories: {}", catalog.custom_categories.join(", "));
                }
            }
        },
    }
    Ok(())
}
