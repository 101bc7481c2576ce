//! Parser for the MySQL DDL subset.

mod ddl;
mod error;

pub use ddl::Parser;
pub use error::ParseError;

use crate::ast::Statement;

/// Parses a whole source unit into its statements, in order.
///
/// # Errors
///
/// Returns a [`ParseError`] on malformed input inside a recognized
/// statement; unrecognized statements come back as
/// [`Statement::Unsupported`].
pub fn parse_script(input: &str) -> Result<Vec<Statement>, ParseError> {
    Parser::new(input).parse_script()
}
