use clap::Subcommand;

use super::{open_vault, CmdResult};

#[derive(Subcommand)]
pub enum VaultAction {
    /// Which tier the init protocol selected
    Tier,
    /// All entries, newest first
    List,
    /// Print a resource's content
    Read { name: String },
    /// Delete a resource (absence is not an error)
    Delete { name: String },
    /// Rename a resource (read + write-new + delete-old, not atomic)
    Rename { old_name: String, new_name: String },
}

pub async fn run(action: VaultAction) -> CmdResult {
    let vault = open_vault().await?;

    match action {
        VaultAction::Tier => println!("{}", vault.tier()),
        VaultAction::List => {
            for entry in vault.list().await {
                println!(
                    "{}  {:>8}B  {}  {}",
                    entry.last_modified.format("%Y-%m-%d %H:%M:%S"),
                    entry.size,
                    entry.mime_type,
                    entry.name
                );
            }
        }
        VaultAction::Read { name } => match vault.read(&name).await {
            Some(content) => println!("{content}"),
            None => return Err(format!("'{name}' not found in the vault").into()),
        },
        VaultAction::Delete { name } => {
            if vault.delete(&name).await {
                println!("Deleted '{name}'.");
            } else {
                println!("Nothing stored under '{name}'.");
            }
        }
        VaultAction::Rename { old_name, new_name } => {
            if vault.rename(&old_name, &new_name).await {
                println!("Renamed '{old_name}' -> '{new_name}'.");
            } else {
                return Err(format!("could not rename '{old_name}'").into());
            }
        }
    }
    Ok(())
}
