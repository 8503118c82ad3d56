pub mod review;

pub use review::{BatchReviewer, Target};
