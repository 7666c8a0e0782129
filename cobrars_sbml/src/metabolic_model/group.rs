//! This module provides the Group struct, a named collection of model components
use derive_builder::Builder;

use crate::metabolic_model::annotation::{Annotation, Notes};

/// A component belonging to a group
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum GroupMember {
    Metabolite(String),
    Reaction(String),
    Gene(String),
}

impl GroupMember {
    /// Id of the member within its own collection
    pub fn id(&self) -> &str {
        match self {
            GroupMember::Metabolite(id) | GroupMember::Reaction(id) | GroupMember::Gene(id) => id,
        }
    }
}

/// Group of metabolites, reactions and genes, e.g. a subsystem
#[derive(Builder, Clone, Debug, PartialEq)]
pub struct Group {
    /// Used to identify the group
    pub id: String,
    /// Human readable name
    #[builder(default = "None")]
    pub name: Option<String>,
    /// Kind of grouping: `collection`, `classification` or `partonomy`
    #[builder(default = "String::from(\"collection\")")]
    pub kind: String,
    /// Members in order
    #[builder(default = "Vec::new()")]
    pub members: Vec<GroupMember>,
    #[builder(default = "Notes::new()")]
    pub notes: Notes,
    #[builder(default = "Annotation::new()")]
    pub annotation: Annotation,
}

impl Group {
    /// Create an empty `collection` group
    pub fn new(id: &str) -> Self {
        Group {
            id: id.to_string(),
            name: None,
            kind: "collection".to_string(),
            members: Vec::new(),
            notes: Notes::new(),
            annotation: Annotation::new(),
        }
    }

    /// Add a member unless it is already part of the group
    pub fn add_member(&mut self, member: GroupMember) {
        if !self.members.contains(&member) {
            self.members.push(member);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn members_are_unique() {
        let mut group = Group::new("glycolysis");
        group.add_member(GroupMember::Reaction("PGI".to_string()));
        group.add_member(GroupMember::Reaction("PGI".to_string()));
        group.add_member(GroupMember::Gene("PGI".to_string()));
        assert_eq!(group.members.len(), 2);
        assert_eq!(group.members[1].id(), "PGI");
        assert_eq!(group.kind, "collection");
    }
}
