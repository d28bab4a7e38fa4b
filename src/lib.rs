//! Front end for Sen, a small language whose keywords are Vietnamese.
//!
//! Source text goes through the [`lexer::Lexer`], which hands tokens one at a
//! time to the [`parser::Parser`]. The parser builds the AST and fills a
//! [`symbol_table::SymbolTable`] as it goes, checking declarations and types
//! inline. The first problem found stops the parse with a [`ParseError`].
//!
//! ```text
//! hàm chính() {
//!     biến x: số nguyên = 5;
//!     trong khi (x > 0) x = x - 1;
//! }
//! ```

pub mod ast;
pub mod config;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod source;
pub mod symbol_table;
pub mod token;
pub mod types;

pub use error::{CompilerError, ErrorKind, ParseError};
pub use lexer::Lexer;
pub use parser::{Parser, Program};

/// Tokenizes and parses a complete program.
pub fn parse_source(source: &str) -> Result<Program, ParseError> {
    Parser::new(Lexer::new(source))?.parse()
}
