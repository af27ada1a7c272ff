pub mod checkin;
pub mod config;
pub mod export;
pub mod stats;
pub mod study;
pub mod task;
pub mod vault;

use dayledger_core::{data_dir, Vault, VaultOptions};

pub(crate) type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Open the vault at the application data directory.
///
/// `DAYLEDGER_FORCE_KV=1` marks the context untrusted, skipping the
/// durable tier the way a non-secure origin would.
pub(crate) async fn open_vault() -> Result<Vault, Box<dyn std::error::Error>> {
    let mut opts = VaultOptions::new(data_dir()?);
    if std::env::var("DAYLEDGER_FORCE_KV").is_ok() {
        opts.trusted = false;
    }
    let vault = Vault::open(opts).await?;
    tracing::debug!(tier = %vault.tier(), "vault opened");
    Ok(vault)
}

/// Today's date key in local time.
pub(crate) fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}
