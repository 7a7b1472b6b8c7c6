//! Index construction for product catalogs: positional title/description
//! indexes, a structured feature index and per-product review statistics.

pub mod builder;
pub mod feature_builder;
pub mod identity;
pub mod index;
pub mod persist;
pub mod record;
pub mod review_builder;
pub mod source;
pub mod text_builder;
pub mod tokenizer;

pub use builder::{BuildStats, IndexBuilder};
pub use feature_builder::FeatureIndexBuilder;
pub use index::*;
pub use review_builder::ReviewIndexBuilder;
pub use text_builder::TextIndexBuilder;
