//! Notes and cross reference annotations attached to model components
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Free text `key: value` notes
pub type Notes = IndexMap<String, String>;

/// Cross references keyed by provider (e.g. `chebi`), plus the reserved `sbo` key
pub type Annotation = IndexMap<String, AnnotationValue>;

/// Annotation key holding the SBO term of a component
pub const SBO_KEY: &str = "sbo";

/// Value of an annotation entry
///
/// Serializes as either a plain string or a list, the same shape cobrapy's JSON uses.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnnotationValue {
    /// One entity, with the implicit qualifier `is`
    Single(String),
    /// Several entities, each optionally with a qualifier
    List(Vec<AnnotationItem>),
}

/// Entry of an [`AnnotationValue::List`]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnnotationItem {
    /// An entity with the implicit qualifier `is`
    Bare(String),
    /// A `(qualifier, entity)` pair
    Qualified(String, String),
}

impl AnnotationItem {
    pub fn entity(&self) -> &str {
        match self {
            AnnotationItem::Bare(entity) | AnnotationItem::Qualified(_, entity) => entity,
        }
    }

    pub fn qualifier(&self) -> &str {
        match self {
            AnnotationItem::Bare(_) => "is",
            AnnotationItem::Qualified(qualifier, _) => qualifier,
        }
    }
}

impl AnnotationValue {
    /// Entities in order, ignoring qualifiers
    pub fn entities(&self) -> Vec<&str> {
        match self {
            AnnotationValue::Single(entity) => vec![entity.as_str()],
            AnnotationValue::List(items) => items.iter().map(|i| i.entity()).collect(),
        }
    }

    /// Every entity paired with its qualifier, bare entities get `is`
    pub fn qualified_pairs(&self) -> Vec<(String, String)> {
        match self {
            AnnotationValue::Single(entity) => vec![("is".to_string(), entity.clone())],
            AnnotationValue::List(items) => items
                .iter()
                .map(|i| (i.qualifier().to_string(), i.entity().to_string()))
                .collect(),
        }
    }

    /// Add another entity, a single value becomes a list
    pub fn push(&mut self, entity: String) {
        match self {
            AnnotationValue::Single(first) => {
                let first = std::mem::take(first);
                *self = AnnotationValue::List(vec![
                    AnnotationItem::Bare(first),
                    AnnotationItem::Bare(entity),
                ]);
            }
            AnnotationValue::List(items) => items.push(AnnotationItem::Bare(entity)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_shape() {
        let annotation: Annotation = serde_json::from_str(
            r#"{"chebi": "CHEBI:17234", "kegg": ["C00031", ["isVersionOf", "C00267"]]}"#,
        )
        .unwrap();
        assert_eq!(
            annotation["chebi"],
            AnnotationValue::Single("CHEBI:17234".to_string())
        );
        assert_eq!(
            annotation["kegg"].qualified_pairs(),
            vec![
                ("is".to_string(), "C00031".to_string()),
                ("isVersionOf".to_string(), "C00267".to_string())
            ]
        );
        let json = serde_json::to_string(&annotation).unwrap();
        assert_eq!(
            json,
            r#"{"chebi":"CHEBI:17234","kegg":["C00031",["isVersionOf","C00267"]]}"#
        );
    }

    #[test]
    fn push_promotes() {
        let mut value = AnnotationValue::Single("a".to_string());
        value.push("b".to_string());
        assert_eq!(value.entities(), vec!["a", "b"]);
        assert!(matches!(value, AnnotationValue::List(_)));
    }
}
