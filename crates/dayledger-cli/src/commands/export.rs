use clap::Subcommand;
use dayledger_core::export::{to_csv, ExportBundle};
use dayledger_core::record::RecordStore;
use dayledger_core::{Settings, StorageTier};

use super::{open_vault, CmdResult};

#[derive(Subcommand)]
pub enum ExportAction {
    /// Full-state JSON bundle
    Json {
        /// Output resource name in the vault
        #[arg(long, default_value = "dayledger-export.json")]
        name: String,
    },
    /// One CSV row per recorded day
    Csv {
        #[arg(long, default_value = "dayledger-export.csv")]
        name: String,
    },
}

pub async fn run(action: ExportAction) -> CmdResult {
    let vault = open_vault().await?;
    let store = RecordStore::new(&vault);

    let (name, content, mime) = match action {
        ExportAction::Json { name } => {
            let bundle = ExportBundle::new(
                store.all().await,
                store.load_catalog().await,
                Settings::load_or_default(),
            );
            (name, bundle.to_json()?, "application/json")
        }
        ExportAction::Csv { name } => (name, to_csv(&store.all().await), "text/csv"),
    };

    let outcome = vault.save_text(&name, &content, mime).await;
    if outcome.ok {
        println!("Exported '{name}' via the {} tier.", outcome.storage);
    } else if outcome.storage == StorageTier::Download {
        println!(
            "Primary storage refused the write; '{name}' was handed off to {}.",
            vault.export_dir().display()
        );
    } else {
        return Err(format!("export '{name}' could not be saved").into());
    }
    Ok(())
}
