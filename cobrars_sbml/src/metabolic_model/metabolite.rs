//! This module provides the metabolite struct representing a metabolite

use std::hash::Hash;

use derive_builder::Builder;

use crate::metabolic_model::annotation::{Annotation, Notes};

/// Represents a metabolite
#[derive(Builder, Debug, Clone, PartialEq)]
pub struct Metabolite {
    /// Used to identify the metabolite (must be unique)
    pub id: String,
    /// Human Readable name of the metabolite
    #[builder(default = "None")]
    pub name: Option<String>,
    /// Which compartment the metabolite is in
    #[builder(default = "None")]
    pub compartment: Option<String>,
    /// Electrical charge of the Metabolite
    #[builder(default = "None")]
    pub charge: Option<i32>,
    /// Chemical Formula of the metabolite
    #[builder(default = "None")]
    pub formula: Option<String>,
    /// Notes about the metabolite
    #[builder(default = "Notes::new()")]
    pub notes: Notes,
    /// Metabolite annotations
    #[builder(default = "Annotation::new()")]
    pub annotation: Annotation,
}

impl Metabolite {
    /// Create a metabolite with only an id
    pub fn new(id: &str) -> Self {
        Metabolite {
            id: id.to_string(),
            name: None,
            compartment: None,
            charge: None,
            formula: None,
            notes: Notes::new(),
            annotation: Annotation::new(),
        }
    }
}

impl Hash for Metabolite {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state); // Hash by id
                             // If the metabolite has an associated compartment, also hash by that
        if let Some(ref compartment) = self.compartment {
            compartment.hash(state)
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let metabolite = MetaboliteBuilder::default()
            .id("glc__D_c".to_string())
            .compartment(Some("c".to_string()))
            .charge(Some(0))
            .build()
            .unwrap();
        assert_eq!(metabolite.formula, None);
        assert!(metabolite.notes.is_empty());
        assert_eq!(metabolite.charge, Some(0));
    }
}
