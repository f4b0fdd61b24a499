//! The incremental aggregation and diff pipeline.
//!
//! - `extract`: schema-free record discovery in tree-shaped responses
//! - `dates`: year inference for year-less calendar labels
//! - `dedup`: stable-identity deduplication
//! - `diff`: partition against the persisted baseline
//! - `schedule`: active/upcoming event classification
//! - `run`: per-source poll-cycle orchestration

pub mod dates;
pub mod dedup;
pub mod diff;
pub mod extract;
pub mod run;
pub mod schedule;

pub use dates::DateRangeResolver;
pub use dedup::{composite_fingerprint, dedup_posts};
pub use diff::{DiffResult, partition_new};
pub use extract::{FieldMatcher, RecordFields, extract_records};
pub use run::{kst_today, report_fatal, run_all, run_board, run_briefing, run_dorm};
pub use schedule::{DaySchedule, ScheduleClassifier, UpcomingEvent};
