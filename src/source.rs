use crate::error::CompilerError;
use std::fs;
use std::path::Path;

/// Reads a source file, rejecting anything that is not well-formed UTF-8
/// before it reaches the lexer.
pub fn read_source(path: &Path) -> Result<String, CompilerError> {
    let bytes = fs::read(path).map_err(|source| CompilerError::IO {
        path: path.to_path_buf(),
        source,
    })?;

    String::from_utf8(bytes).map_err(|_| CompilerError::InvalidUtf8(path.to_path_buf()))
}
