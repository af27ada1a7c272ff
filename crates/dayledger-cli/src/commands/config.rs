use clap::Subcommand;
use dayledger_core::Settings;

use super::CmdResult;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print all settings as TOML
    Show,
    /// Get one settings value
    Get { key: String },
    /// Set one settings value
    Set { key: String, value: String },
}

pub async fn run(action: ConfigAction) -> CmdResult {
    match action {
        ConfigAction::Show => {
            let settings = Settings::load_or_default();
            print!("{}", toml::to_string_pretty(&settings)?);
        }
        ConfigAction::Get { key } => {
            let settings = Settings::load_or_default();
            match settings.get(&key) {
                Some(value) => println!("{value}"),
                None => return Err(format!("unknown configuration key: {key}").into()),
            }
        }
        ConfigAction::Set { key, value } => {
            let mut settings = Settings::load()?;
            settings.set(&key, &value)?;
            println!("{key} = {value}");
        }
    }
    Ok(())
}
