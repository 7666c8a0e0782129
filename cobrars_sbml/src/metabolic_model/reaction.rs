//! This module provides a struct for representing reactions
use derive_builder::Builder;
use indexmap::IndexMap;

use crate::configuration::{DEFAULT_LOWER_BOUND, DEFAULT_UPPER_BOUND};
use crate::io::gpr_parse::gene_ids;
use crate::metabolic_model::annotation::{Annotation, Notes};

/// Represents a reaction in the metabolic model
#[derive(Builder, Debug, Clone, PartialEq)]
pub struct Reaction {
    /// Used to identify the reaction
    pub id: String,
    /// Metabolite stoichiometry of the reaction
    ///
    /// Negative coefficients are consumed (reactants), positive ones produced (products)
    #[builder(default = "IndexMap::new()")]
    pub metabolites: IndexMap<String, f64>,
    /// Human-readable reaction name
    #[builder(default = "None")]
    pub name: Option<String>,
    /// Gene Protein Reaction rule, e.g. `(b0001 and b0002) or b0003`
    #[builder(default = "String::new()")]
    pub gene_reaction_rule: String,
    /// Lower flux bound
    #[builder(default = "DEFAULT_LOWER_BOUND")]
    pub lower_bound: f64,
    /// Upper flux bound
    #[builder(default = "DEFAULT_UPPER_BOUND")]
    pub upper_bound: f64,
    /// Notes about the reaction
    #[builder(default = "Notes::new()")]
    pub notes: Notes,
    /// Reaction Annotations
    #[builder(default = "Annotation::new()")]
    pub annotation: Annotation,
}

impl Reaction {
    /// Create a reaction with only an id and the default bounds
    pub fn new(id: &str) -> Self {
        Reaction {
            id: id.to_string(),
            metabolites: IndexMap::new(),
            name: None,
            gene_reaction_rule: String::new(),
            lower_bound: DEFAULT_LOWER_BOUND,
            upper_bound: DEFAULT_UPPER_BOUND,
            notes: Notes::new(),
            annotation: Annotation::new(),
        }
    }

    /// Whether the reaction can carry flux in the reverse direction
    pub fn reversibility(&self) -> bool {
        self.lower_bound < 0.
    }

    /// Consumed metabolites with their (negative) coefficients
    pub fn reactants(&self) -> impl Iterator<Item = (&String, f64)> {
        self.metabolites
            .iter()
            .filter(|(_, c)| **c < 0.)
            .map(|(m, c)| (m, *c))
    }

    /// Produced metabolites with their (positive) coefficients
    pub fn products(&self) -> impl Iterator<Item = (&String, f64)> {
        self.metabolites
            .iter()
            .filter(|(_, c)| **c > 0.)
            .map(|(m, c)| (m, *c))
    }

    /// Ids of the genes in the gene reaction rule
    pub fn gene_ids(&self) -> Vec<String> {
        gene_ids(&self.gene_reaction_rule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let reaction = ReactionBuilder::default()
            .id("PGI".to_string())
            .metabolites(IndexMap::from([
                ("g6p_c".to_string(), -1.),
                ("f6p_c".to_string(), 1.),
            ]))
            .build()
            .unwrap();
        assert_eq!(reaction.lower_bound, -1000.);
        assert_eq!(reaction.upper_bound, 1000.);
        assert!(reaction.reversibility());
        assert_eq!(reaction.reactants().collect::<Vec<_>>().len(), 1);
        assert_eq!(reaction.products().next(), Some((&"f6p_c".to_string(), 1.)));
    }

    #[test]
    fn genes_of_rule() {
        let mut reaction = Reaction::new("r");
        reaction.gene_reaction_rule = "(b1 and b2) or b1".to_string();
        assert_eq!(reaction.gene_ids(), vec!["b1".to_string(), "b2".to_string()]);
    }
}
