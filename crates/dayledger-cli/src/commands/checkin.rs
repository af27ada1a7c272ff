use clap::{Subcommand, ValueEnum};
use dayledger_core::record::{RecordStore, TimeWindow};

use super::{open_vault, today, CmdResult};

#[derive(Subcommand)]
pub enum CheckinAction {
    /// Record the wake-up time
    Wake {
        /// Date key (defaults to today)
        #[arg(long)]
        date: Option<String>,
    },
    /// Record going to sleep
    SleepStart {
        #[arg(long)]
        date: Option<String>,
    },
    /// Record waking from sleep (derives sleep duration)
    SleepEnd {
        #[arg(long)]
        date: Option<String>,
    },
    /// Configure an early wake/sleep window for the day
    Window {
        kind: WindowKind,
        /// Window start, HH:MM
        start: String,
        /// Window end, HH:MM
        end: String,
        #[arg(long)]
        date: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum WindowKind {
    Wake,
    Sleep,
}

pub async fn run(action: CheckinAction) -> CmdResult {
    let vault = open_vault().await?;
    let store = RecordStore::new(&vault);
    let now = chrono::Utc::now();
    let hhmm = chrono::Local::now().format("%H:%M").to_string();

    match action {
        CheckinAction::Wake { date } => {
            let date = date.unwrap_or_else(today);
            let mut record = store.load_or_new(&date).await?;
            record.set_wakeup(now);
            let within = record
                .early_wake_settings
                .as_ref()
                .map(|w| w.contains(&hhmm));
            report_save(&store.save(&record).await);
            match within {
                Some(true) => println!("Woke up at {hhmm} -- inside the early-wake window."),
                Some(false) => println!("Woke up at {hhmm} -- outside the early-wake window."),
                None => println!("Woke up at {hhmm}."),
            }
        }
        CheckinAction::SleepStart { date } => {
            let date = date.unwrap_or_else(today);
            let mut record = store.load_or_new(&date).await?;
            record.set_sleep_start(now);
            let within = record
                .early_sleep_settings
                .as_ref()
                .map(|w| w.contains(&hhmm));
            report_save(&store.save(&record).await);
            match within {
                Some(true) => println!("Sleep start {hhmm} -- inside the early-sleep window."),
                _ => println!("Sleep start {hhmm}."),
            }
        }
        CheckinAction::SleepEnd { date } => {
            let date = date.unwrap_or_else(today);
            let mut record = store.load_or_new(&date).await?;
            record.set_sleep_end(now);
            report_save(&store.save(&record).await);
            if record.sleep_duration > 0 {
                println!(
                    "Slept {}h {}m.",
                    record.sleep_duration / 60,
                    record.sleep_duration % 60
                );
            } else {
                println!("Sleep end recorded (no sleep start for this record).");
            }
        }
        CheckinAction::Window {
            kind,
            start,
            end,
            date,
        } => {
            let window = TimeWindow::new(&start, &end)?;
            let date = date.unwrap_or_else(today);
            let mut record = store.load_or_new(&date).await?;
            match kind {
                WindowKind::Wake => record.set_early_wake(window),
                WindowKind::Sleep => record.set_early_sleep(window),
            }
            report_save(&store.save(&record).await);
            println!("Window set for {date}: {start}..{end}");
        }
    }
    Ok(())
}

pub(crate) fn report_save(outcome: &dayledger_core::SaveOutcome) {
    if !outcome.ok {
        eprintln!(
            "notice: primary storage write failed; content was handed off via the {} tier",
            outcome.storage
        );
    }
}
