//! Declaration sequence loading.
//!
//! A front-end dumps one translation unit as a JSON document:
//!
//! ```json
//! { "declarations": [ { "id": 1, "name": "Color", "kind": "enum", ... } ] }
//! ```
//!
//! Declarations appear in traversal order, which is the order the
//! generator consumes them in.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::decl::{DeclId, Declaration};
use crate::error::{DeclError, Result};

/// An ordered sequence of declarations from one translation unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclarationUnit {
    /// Declarations in traversal order.
    #[serde(default)]
    pub declarations: Vec<Declaration>,
}

impl DeclarationUnit {
    pub fn new(declarations: Vec<Declaration>) -> Self {
        Self { declarations }
    }

    /// Parse a declaration unit from a JSON string.
    pub fn parse(input: &str) -> Result<Self> {
        let unit: DeclarationUnit = serde_json::from_str(input)?;
        unit.validate()?;
        Ok(unit)
    }

    /// Parse a declaration unit from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Check that no identity token is shared by differently named declarations.
    ///
    /// Repeated encounters of one node carry the same token and name; a token
    /// reused under another name means the front-end's identities are unstable.
    pub fn validate(&self) -> Result<()> {
        let mut seen: HashMap<DeclId, &str> = HashMap::new();
        for decl in &self.declarations {
            if decl.name.is_empty() {
                return Err(DeclError::InvalidDeclaration {
                    detail: format!("declaration {} has an empty name", decl.id),
                });
            }
            match seen.get(&decl.id) {
                Some(prev) if *prev != decl.name => {
                    return Err(DeclError::InvalidDeclaration {
                        detail: format!(
                            "identity token {} used for both '{}' and '{}'",
                            decl.id, prev, decl.name
                        ),
                    });
                }
                Some(_) => {}
                None => {
                    seen.insert(decl.id, &decl.name);
                }
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Declaration> {
        self.declarations.iter()
    }
}

impl<'a> IntoIterator for &'a DeclarationUnit {
    type Item = &'a Declaration;
    type IntoIter = std::slice::Iter<'a, Declaration>;

    fn into_iter(self) -> Self::IntoIter {
        self.declarations.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decl::DeclKind;

    const COLOR_AND_FN: &str = r#"{
        "declarations": [
            {
                "id": 1,
                "name": "Color",
                "location": "color.h:1:6",
                "kind": "enum",
                "enumerators": [
                    {"name": "RED", "value": 0},
                    {"name": "GREEN", "value": 1}
                ]
            },
            {"id": 2, "name": "RED", "kind": "other"},
            {
                "id": 3,
                "name": "paint",
                "kind": "function",
                "prototype": {"ret": {"named": "void"}, "params": [{"enum": {"name": "Color"}}]}
            }
        ]
    }"#;

    #[test]
    fn parse_unit_in_order() {
        let unit = DeclarationUnit::parse(COLOR_AND_FN).unwrap();
        assert_eq!(unit.len(), 3);
        let names: Vec<&str> = unit.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["Color", "RED", "paint"]);
        assert!(matches!(unit.declarations[0].kind, DeclKind::Enum { .. }));
    }

    #[test]
    fn empty_document() {
        let unit = DeclarationUnit::parse("{}").unwrap();
        assert!(unit.is_empty());
    }

    #[test]
    fn repeated_token_same_name_is_fine() {
        let unit = DeclarationUnit::new(vec![
            Declaration::forward_struct(4, "Item"),
            Declaration::forward_struct(4, "Item"),
        ]);
        assert!(unit.validate().is_ok());
    }

    #[test]
    fn reused_token_is_rejected() {
        let unit = DeclarationUnit::new(vec![
            Declaration::forward_struct(4, "Item"),
            Declaration::forward_struct(4, "Other"),
        ]);
        let err = unit.validate().unwrap_err();
        assert!(err.to_string().contains("identity token #4"));
    }

    #[test]
    fn empty_name_is_rejected() {
        let unit = DeclarationUnit::new(vec![Declaration::forward_struct(1, "")]);
        assert!(unit.validate().is_err());
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            DeclarationUnit::parse("{ not json"),
            Err(DeclError::Json(_))
        ));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("decls.json");
        std::fs::write(&path, COLOR_AND_FN).unwrap();
        let unit = DeclarationUnit::load(&path).unwrap();
        assert_eq!(unit.len(), 3);
    }

    #[test]
    fn load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = DeclarationUnit::load(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, DeclError::Io(_)));
    }
}
