pub mod title;

pub use title::{ParsedTitle, parse_title_labels};
