//! This module provides the Gene struct, representing a gene
use std::fmt::{Display, Formatter};
use std::hash::Hash;

use derive_builder::Builder;

use crate::metabolic_model::annotation::{Annotation, Notes};

/// Structure Representing a Gene
#[derive(Builder, Clone, Debug, PartialEq)]
pub struct Gene {
    /// Used to identify the gene
    pub id: String,
    /// Human Readable Gene Name
    #[builder(default = "None")]
    pub name: Option<String>,
    /// Notes about the gene
    #[builder(default = "Notes::new()")]
    pub notes: Notes,
    /// Gene Annotations
    #[builder(default = "Annotation::new()")]
    pub annotation: Annotation,
}

impl Gene {
    /// Create a gene whose name is its id
    pub fn new(id: &str) -> Gene {
        Gene {
            id: id.to_string(),
            name: Some(id.to_string()),
            notes: Notes::new(),
            annotation: Annotation::new(),
        }
    }

    /// Name of the gene, falling back to the id
    pub fn display_name(&self) -> &str {
        match &self.name {
            Some(name) if !name.is_empty() => name,
            _ => &self.id,
        }
    }
}

impl Display for Gene {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl Hash for Gene {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names() {
        let gene = Gene::new("b0001");
        assert_eq!(gene.display_name(), "b0001");
        let gene = GeneBuilder::default()
            .id("b0002".to_string())
            .build()
            .unwrap();
        assert_eq!(gene.name, None);
        assert_eq!(gene.display_name(), "b0002");
        assert_eq!(gene.to_string(), "b0002");
    }
}
