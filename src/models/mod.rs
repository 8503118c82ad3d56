pub mod config;
pub mod error;
pub mod index;
pub mod notebook;
pub mod validation;

pub use config::{BatchConfig, LinkConfig, ReviewConfig, CONFIG_FILE};
pub use error::ReviewError;
pub use index::{CostCategory, ExtractedFields, IndexEntry, Links, Objective};
pub use notebook::{Cell, CellKind, Notebook};
pub use validation::{ErrorCode, LinkKind, Violation};
