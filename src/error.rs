use crate::token::Token;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Lexical,
    Syntax,
    Semantic,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ErrorKind::Lexical => write!(f, "LexingError"),
            ErrorKind::Syntax => write!(f, "SyntaxError"),
            ErrorKind::Semantic => write!(f, "SemanticError"),
        }
    }
}

/// The single error produced by the front end. Line and column are 1-based.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind}: {message} (line {line}, column {column})")]
pub struct ParseError {
    pub kind: ErrorKind,
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl ParseError {
    pub fn new(kind: ErrorKind, message: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            kind,
            message: message.into(),
            line,
            column,
        }
    }

    pub fn from_token(kind: ErrorKind, token: &Token, message: impl Into<String>) -> Self {
        Self::new(kind, message, token.line, token.column)
    }

    pub fn syntax(token: &Token, message: impl Into<String>) -> Self {
        Self::from_token(ErrorKind::Syntax, token, message)
    }

    pub fn semantic(token: &Token, message: impl Into<String>) -> Self {
        Self::from_token(ErrorKind::Semantic, token, message)
    }

    /// Formats the error with the offending source line and a caret under the column.
    pub fn render(&self, path: &Path, source: &str) -> String {
        let mut out = format!(
            "{}: {}\n  --> {}:{}:{}\n",
            self.kind,
            self.message,
            path.display(),
            self.line,
            self.column
        );

        if let Some(snippet) = source.lines().nth(self.line.saturating_sub(1)) {
            let indent = " ".repeat(self.column.saturating_sub(1));
            out.push_str(&format!("  {}\n  {}^\n", snippet, indent));
        }

        out
    }
}

#[derive(Debug, Error)]
pub enum CompilerError {
    #[error("IOError: {path}: {source}")]
    IO {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("EncodingError: {0} is not valid UTF-8")]
    InvalidUtf8(PathBuf),
    #[error("ConfigError: {0}")]
    Config(#[from] serde_json::Error),
    #[error("{0}")]
    Parse(#[from] ParseError),
}
