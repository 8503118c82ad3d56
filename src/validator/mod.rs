pub mod cursor;
pub mod links;
pub mod sections;
pub mod template;
pub mod text;

pub use cursor::Cursor;
#[cfg(feature = "http-probe")]
pub use links::HttpProbe;
pub use links::{LinkProbe, LinkValidator, OfflineProbe, Reachability};
pub use sections::TEMPLATE;
pub use template::{
    review_notebook, review_with_rules, Heading, NotebookReview, Pass, Presence, SectionRule,
};
