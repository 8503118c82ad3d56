pub mod session;

pub use session::{BatchOutcome, ErrorSession, ReportOptions, SkippedDocument};
