//! Parsed chat messages.

mod parse;
mod types;

pub use self::parse::parse;
pub use self::types::ParsedMessage;
