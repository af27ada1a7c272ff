use clap::{Subcommand, ValueEnum};
use dayledger_core::record::RecordStore;
use dayledger_core::timer::{StudyTimer, TimerMode};
use dayledger_core::{Event, Vault};

use super::checkin::report_save;
use super::{open_vault, today, CmdResult};

const TIMER_NAME: &str = "study-timer.json";

#[derive(Subcommand)]
pub enum StudyAction {
    /// Start a session (fresh, or resume from paused)
    Start {
        /// Countdown target in minutes; switches to countdown mode
        #[arg(long)]
        countdown: Option<u64>,
    },
    /// Pause the running session
    Pause,
    /// Resume a paused session
    Resume,
    /// Stop the session early (asks for confirmation)
    Stop {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Print the current timer state as JSON
    Status,
    /// Switch timer mode (only while idle)
    Mode { mode: ModeArg },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ModeArg {
    Stopwatch,
    Countdown,
}

impl From<ModeArg> for TimerMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Stopwatch => TimerMode::Stopwatch,
            ModeArg::Countdown => TimerMode::Countdown,
        }
    }
}

async fn load_timer(vault: &Vault) -> StudyTimer {
    vault.read_json(TIMER_NAME).await.unwrap_or_default()
}

async fn save_timer(vault: &Vault, timer: &StudyTimer) {
    report_save(&vault.save_json(TIMER_NAME, timer).await);
}

/// Fold a completion event into today's record and persist it.
async fn fold_completion(vault: &Vault, event: Option<Event>) -> CmdResult {
    if let Some(Event::TimerCompleted {
        session, natural, ..
    }) = event
    {
        let store = RecordStore::new(vault);
        let date = today();
        let mut record = store.load_or_new(&date).await?;
        let earnings = session.earnings;
        let minutes = session.duration;
        record.record_session(session);
        report_save(&store.save(&record).await);
        let how = if natural { "completed" } else { "stopped early" };
        println!("Session {how}: {minutes} min, +{earnings:.2}. Day total: {:.2}", record.total_earnings.total);
    }
    Ok(())
}

pub async fn run(action: StudyAction) -> CmdResult {
    let vault = open_vault().await?;
    let mut timer = load_timer(&vault).await;

    // A countdown may have reached its target while no process was
    // running; drive the autonomous transition before the command.
    let ticked = timer.tick();
    let auto_completed = ticked.is_some();
    fold_completion(&vault, ticked).await?;

    match action {
        StudyAction::Start { countdown } => {
            if let Some(minutes) = countdown {
                if !timer.set_mode(TimerMode::Countdown) || !timer.set_target_secs(minutes * 60) {
                    return Err("cannot reconfigure the timer while it is active".into());
                }
            }
            match timer.start() {
                Some(Event::TimerStarted { mode, target_secs, .. }) => match mode {
                    TimerMode::Countdown => {
                        println!("Countdown started: {} min.", target_secs / 60)
                    }
                    TimerMode::Stopwatch => println!("Stopwatch started."),
                },
                Some(Event::TimerResumed { elapsed_secs, .. }) => {
                    println!("Resumed at {elapsed_secs}s elapsed.")
                }
                _ => println!("Timer is already running."),
            }
        }
        StudyAction::Pause => match timer.pause() {
            Some(Event::TimerPaused { elapsed_secs, .. }) => {
                println!("Paused at {elapsed_secs}s elapsed.")
            }
            _ => println!("Nothing to pause."),
        },
        StudyAction::Resume => match timer.resume() {
            Some(Event::TimerResumed { elapsed_secs, .. }) => {
                println!("Resumed at {elapsed_secs}s elapsed.")
            }
            _ => println!("Nothing to resume."),
        },
        StudyAction::Stop { yes } => {
            if auto_completed {
                println!("The countdown had already completed.");
            } else if yes || confirm_stop()? {
                fold_completion(&vault, timer.stop_confirmed()).await?;
            } else {
                println!("Stop aborted.");
            }
        }
        StudyAction::Status => {
            println!("{}", serde_json::to_string_pretty(&timer.snapshot())?);
        }
        StudyAction::Mode { mode } => {
            if timer.set_mode(mode.into()) {
                println!("Mode switched; timer reset.");
            } else {
                return Err("mode can only be switched while the timer is idle".into());
            }
        }
    }

    save_timer(&vault, &timer).await;
    Ok(())
}

/// The confirmation step the state machine expects to happen outside it.
fn confirm_stop() -> Result<bool, std::io::Error> {
    use std::io::Write;
    print!("Stop the session early? [y/N] ");
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}
