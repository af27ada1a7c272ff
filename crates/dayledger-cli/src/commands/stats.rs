use clap::Subcommand;
use dayledger_core::record::{Category, DailyRecord, Earnings, RecordStore};

use super::{open_vault, today, CmdResult};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Today's earnings and study time
    Today,
    /// Totals across all recorded days
    All,
}

pub async fn run(action: StatsAction) -> CmdResult {
    let vault = open_vault().await?;
    let store = RecordStore::new(&vault);

    match action {
        StatsAction::Today => {
            let record = store.load_or_new(&today()).await?;
            print_day(&record);
        }
        StatsAction::All => {
            let records = store.all().await;
            let mut totals = Earnings::default();
            let mut study_minutes = 0u64;
            let mut tasks = 0usize;
            for rec in &records {
                for c in Category::ALL {
                    totals.credit(c, rec.total_earnings.get(c));
                }
                study_minutes += rec.study_minutes();
                tasks += rec.completed_tasks.len();
            }
            println!("{} day(s) recorded", records.len());
            print_earnings(&totals);
            println!("study: {study_minutes} min, tasks: {tasks}");
        }
    }
    Ok(())
}

fn print_day(record: &DailyRecord) {
    println!("{}", record.date);
    print_earnings(&record.total_earnings);
    println!(
        "study: {} min across {} session(s), tasks: {}",
        record.study_minutes(),
        record.study_sessions.len(),
        record.completed_tasks.len()
    );
}

fn print_earnings(earnings: &Earnings) {
    for c in Category::ALL {
        println!("  {:<17} {:>8.2}", c.label(), earnings.get(c));
    }
    println!("  {:<17} {:>8.2}", "Total", earnings.total);
}
