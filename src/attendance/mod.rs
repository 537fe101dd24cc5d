//! Attendance rules: excusal resolution, day classification, the
//! upcoming-day gate and the monthly payroll fold.
//!
//! Everything in here is synchronous and free of I/O. Wall-clock time is
//! always passed in by the caller.

pub mod aggregator;
pub mod classifier;
pub mod excusal;
pub mod gate;
pub mod policy;
pub mod punch;

pub use aggregator::MonthlyAggregator;
pub use classifier::{DayClass, LeaveKind, Tone, classify, classify_at};
pub use excusal::ResolvedExcusal;
pub use gate::UpcomingGate;
pub use policy::{DeductionPolicy, RateBasis, ViolationRules};
pub use punch::{PunchFlags, evaluate_punches};
