mod clock;
mod engine;

pub use clock::{Clock, ClockHandle, ManualClock, SystemClock};
pub use engine::{
    StudyTimer, TimerMode, TimerState, COUNTDOWN_EARLY_RATE_PER_HOUR,
    COUNTDOWN_FULL_RATE_PER_HOUR, MIN_STOPWATCH_MINUTES, STOPWATCH_RATE_PER_HOUR,
};
