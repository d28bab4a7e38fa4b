use serde::{Serialize, Serializer};
use std::fmt;

pub const INTEGER: &str = "số nguyên";
pub const REAL: &str = "số thực";
pub const STRING: &str = "chuỗi";
pub const BOOLEAN: &str = "luận lý";
pub const VOID: &str = "rỗng";

/// A declared or inferred type. Type names that the language does not know
/// about are carried through as `Named` and compared by spelling.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Type {
    Integer,    // số nguyên
    Real,       // số thực
    String,     // chuỗi
    Boolean,    // luận lý
    Void,       // rỗng
    Named(String),
}

impl Type {
    pub fn from_name(name: &str) -> Self {
        match name {
            INTEGER => Type::Integer,
            REAL => Type::Real,
            STRING => Type::String,
            BOOLEAN => Type::Boolean,
            VOID => Type::Void,
            other => Type::Named(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Type::Integer => INTEGER,
            Type::Real => REAL,
            Type::String => STRING,
            Type::Boolean => BOOLEAN,
            Type::Void => VOID,
            Type::Named(name) => name,
        }
    }

    pub fn is_void(&self) -> bool {
        *self == Type::Void
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl Serialize for Type {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_type_names() {
        for ty in [Type::Integer, Type::Real, Type::String, Type::Boolean, Type::Void] {
            assert_eq!(Type::from_name(ty.name()), ty);
        }
        assert_eq!(Type::from_name("số"), Type::Named("số".to_string()));
    }

    #[test]
    fn test_serializes_as_name() {
        let json = serde_json::to_string(&Type::Boolean).unwrap();
        assert_eq!(json, "\"luận lý\"");
    }
}
