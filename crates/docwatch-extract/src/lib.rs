pub mod error;
pub mod html;
pub mod normalize;
pub mod strategies;
pub mod types;

pub use error::ExtractError;
pub use normalize::{collapse_whitespace, render_canonical};
pub use strategies::{extract, ExtractOptions};
pub use types::{ExtractionKind, ExtractionResult, StatusRecord, UNAVAILABLE_DIAGNOSTIC};
