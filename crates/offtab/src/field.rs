use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Identifies a struct field independent of library version: "this field,
/// in this struct, in this module".
///
/// Used purely as a lookup key; ordering is lexicographic over
/// (module, struct, field) and gives tables a deterministic sort order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FieldId {
    /// Module or package path, e.g. `golang.org/x/net/http2`
    pub module: String,
    /// Struct name within the module
    #[serde(rename = "struct")]
    pub struct_name: String,
    /// Field name within the struct
    pub field: String,
}

impl FieldId {
    pub fn new(
        module: impl Into<String>,
        struct_name: impl Into<String>,
        field: impl Into<String>,
    ) -> Self {
        Self {
            module: module.into(),
            struct_name: struct_name.into(),
            field: field.into(),
        }
    }

    /// Parse the dotted form produced by `Display`, e.g.
    /// `golang.org/x/net/http2.Framer.r`.
    ///
    /// The module path may itself contain dots and slashes; the last two
    /// dot-separated segments are always the struct and field names.
    pub fn parse(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidFieldId(s.to_string());

        let (rest, field) = s.rsplit_once('.').ok_or_else(invalid)?;
        let (module, struct_name) = rest.rsplit_once('.').ok_or_else(invalid)?;

        if module.is_empty() || struct_name.is_empty() || field.is_empty() {
            return Err(invalid());
        }

        Ok(Self::new(module, struct_name, field))
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.module, self.struct_name, self.field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let id = FieldId::parse("pkg.Conn.buf").unwrap();
        assert_eq!(id, FieldId::new("pkg", "Conn", "buf"));
    }

    #[test]
    fn test_parse_module_with_dots_and_slashes() {
        let id = FieldId::parse("golang.org/x/net/http2.Framer.r").unwrap();
        assert_eq!(id.module, "golang.org/x/net/http2");
        assert_eq!(id.struct_name, "Framer");
        assert_eq!(id.field, "r");
    }

    #[test]
    fn test_display_roundtrip() {
        let id = FieldId::new("google.golang.org/grpc", "ClientConn", "target");
        let parsed = FieldId::parse(&id.to_string()).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(FieldId::parse("nodots").is_err());
        assert!(FieldId::parse("pkg.Conn").is_err());
        assert!(FieldId::parse(".Conn.buf").is_err());
        assert!(FieldId::parse("pkg..buf").is_err());
        assert!(FieldId::parse("pkg.Conn.").is_err());
    }

    #[test]
    fn test_ordering_is_by_module_struct_field() {
        let a = FieldId::new("a", "S", "f");
        let b = FieldId::new("b", "A", "a");
        let c = FieldId::new("b", "A", "b");
        assert!(a < b);
        assert!(b < c);
    }
}
