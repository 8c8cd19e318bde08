mod dialect;
mod dispatch;
mod extract;
mod segment;

pub use dialect::{ScriptDialect, StatementClass, VIM, dialect_by_name};
pub use dispatch::{DispatchOutcome, dispatch};
pub use extract::CodeBlockExtractor;
pub use segment::StatementSegmenter;
