pub mod manifest;
pub mod objective;

pub use manifest::{load_manifest, parse_manifest, ManifestEntry};
pub use objective::{infer_costs, parse_objective};
