mod catalog;
mod daily;
mod earnings;
mod store;

pub use catalog::TaskCatalog;
pub use daily::{CompletedTask, DailyRecord, StudySession, TimeWindow};
pub use earnings::{round2, Category, Earnings};
pub use store::RecordStore;
