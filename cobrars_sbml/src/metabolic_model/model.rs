//! This module provides the Model struct for representing an entire metabolic model
use indexmap::IndexMap;
use thiserror::Error;

use crate::metabolic_model::annotation::{Annotation, Notes};
use crate::metabolic_model::gene::Gene;
use crate::metabolic_model::group::{Group, GroupMember};
use crate::metabolic_model::metabolite::Metabolite;
use crate::metabolic_model::reaction::Reaction;
use crate::optimize::objective::{Objective, ObjectiveSense};

/// Represents a Genome Scale Metabolic Model
#[derive(Clone, Debug, PartialEq)]
pub struct Model {
    /// Id associated with the Model
    pub id: Option<String>,
    /// Human readable name of the Model
    pub name: Option<String>,
    /// Compartments in the model
    ///
    /// An IndexMap<String, String> of {short name: long name}
    pub compartments: IndexMap<String, String>,
    /// Map of metabolite ids to Metabolite Objects
    pub metabolites: IndexMap<String, Metabolite>,
    /// Map of gene ids to Gene Objects
    pub genes: IndexMap<String, Gene>,
    /// Map of reaction ids to Reaction Objects
    pub reactions: IndexMap<String, Reaction>,
    /// Map of group ids to Group Objects
    pub groups: IndexMap<String, Group>,
    /// Linear objective over the reactions
    pub objective: Objective,
    pub notes: Notes,
    pub annotation: Annotation,
    /// Information about the SBML document the model was read from
    pub meta: Option<SbmlMeta>,
}

impl Default for Model {
    fn default() -> Self {
        Model::new_empty()
    }
}

impl Model {
    pub fn new_empty() -> Self {
        Model {
            id: None,
            name: None,
            compartments: IndexMap::new(),
            metabolites: IndexMap::new(),
            genes: IndexMap::new(),
            reactions: IndexMap::new(),
            groups: IndexMap::new(),
            objective: Objective::new_maximize(),
            notes: Notes::new(),
            annotation: Annotation::new(),
            meta: None,
        }
    }

    /// Create an empty model with an id
    pub fn new(id: &str) -> Self {
        Model {
            id: Some(id.to_string()),
            ..Model::new_empty()
        }
    }

    /// Add (or rename) a compartment
    pub fn add_compartment(&mut self, id: &str, name: &str) {
        self.compartments.insert(id.to_string(), name.to_string());
    }

    /// Add a metabolite to the model
    ///
    /// # Parameters
    /// - metabolite: Metabolite to add
    pub fn add_metabolite(&mut self, metabolite: Metabolite) {
        let id = metabolite.id.clone();
        self.metabolites.insert(id, metabolite);
    }

    /// Add a reaction to the model
    ///
    /// Every metabolite of the reaction must already be part of the model. Genes of the
    /// reaction's gene reaction rule which are not yet part of the model are created.
    ///
    /// # Parameters
    /// - reaction: Reaction to add
    ///
    /// # Examples
    /// ```rust
    /// use cobrars_sbml::metabolic_model::model::Model;
    /// use cobrars_sbml::metabolic_model::reaction::{Reaction, ReactionBuilder};
    /// let mut model = Model::new_empty();
    /// let new_reaction = ReactionBuilder::default()
    ///     .id("new_reaction".to_string())
    ///     .gene_reaction_rule("b0001 and b0002".to_string())
    ///     .build()
    ///     .unwrap();
    /// model.add_reaction(new_reaction).unwrap();
    /// assert_eq!(model.genes.len(), 2);
    /// ```
    pub fn add_reaction(&mut self, reaction: Reaction) -> Result<(), ModelError> {
        if let Some(missing) = reaction
            .metabolites
            .keys()
            .find(|m| !self.metabolites.contains_key(*m))
        {
            return Err(ModelError::UnknownMetabolite {
                reaction: reaction.id.clone(),
                metabolite: missing.clone(),
            });
        }
        for gene_id in reaction.gene_ids() {
            if !self.genes.contains_key(&gene_id) {
                self.add_gene(Gene::new(&gene_id));
            }
        }
        let id = reaction.id.clone();
        self.reactions.insert(id, reaction);
        Ok(())
    }

    /// Add a gene to the model
    ///
    /// # Parameters
    /// - gene: Gene to add
    ///
    /// # Examples
    /// ```rust
    /// use cobrars_sbml::metabolic_model::gene::GeneBuilder;
    /// use cobrars_sbml::metabolic_model::model::Model;
    /// let mut model=Model::new_empty();
    /// let new_gene = GeneBuilder::default().id("new_gene".to_string()).build().unwrap();
    /// model.add_gene(new_gene);
    /// ```
    pub fn add_gene(&mut self, gene: Gene) {
        let id = gene.id.clone();
        self.genes.insert(id, gene);
    }

    /// Add a group to the model, every member must already be part of the model
    pub fn add_group(&mut self, group: Group) -> Result<(), ModelError> {
        if let Some(missing) = group.members.iter().find(|m| !self.has_member(m)) {
            return Err(ModelError::UnknownGroupMember {
                group: group.id.clone(),
                member: missing.id().to_string(),
            });
        }
        let id = group.id.clone();
        self.groups.insert(id, group);
        Ok(())
    }

    fn has_member(&self, member: &GroupMember) -> bool {
        match member {
            GroupMember::Metabolite(id) => self.metabolites.contains_key(id),
            GroupMember::Reaction(id) => self.reactions.contains_key(id),
            GroupMember::Gene(id) => self.genes.contains_key(id),
        }
    }

    /// Objective coefficient of a reaction, 0 if the reaction is not part of the objective
    pub fn objective_coefficient(&self, reaction_id: &str) -> f64 {
        self.objective.coefficient(reaction_id)
    }

    /// Replace the objective with the given reaction coefficients
    ///
    /// The objective direction is reset to maximize, use [`Model::set_objective_direction`]
    /// afterwards to change it.
    pub fn set_objective(&mut self, coefficients: IndexMap<String, f64>) -> Result<(), ModelError> {
        if let Some(missing) = coefficients
            .keys()
            .find(|r| !self.reactions.contains_key(*r))
        {
            return Err(ModelError::UnknownReaction(missing.clone()));
        }
        self.objective.set_terms(coefficients);
        Ok(())
    }

    /// Set whether the objective is maximized or minimized
    pub fn set_objective_direction(&mut self, sense: ObjectiveSense) {
        self.objective.set_sense(sense);
    }
}

/// A person who contributed to a model
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Creator {
    pub family_name: Option<String>,
    pub given_name: Option<String>,
    pub organisation: Option<String>,
    pub email: Option<String>,
}

/// Metadata of the SBML document a model came from
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SbmlMeta {
    pub level: u32,
    pub version: u32,
    /// Enabled packages with their versions
    pub packages: IndexMap<String, u32>,
    /// Summary such as `<e_coli_core> SBML L3V1, fbc-v2, groups-v1`
    pub info: String,
    pub creators: Vec<Creator>,
    /// W3CDTF creation date
    pub created: Option<String>,
    /// Notes of the document element
    pub notes: Notes,
    /// Annotation of the document element
    pub annotation: Annotation,
}

#[derive(Error, Debug, PartialEq)]
pub enum ModelError {
    #[error("Reaction {reaction} references metabolite {metabolite} which is not in the model")]
    UnknownMetabolite { reaction: String, metabolite: String },
    #[error("Reaction {0} is not in the model")]
    UnknownReaction(String),
    #[error("Group {group} references member {member} which is not in the model")]
    UnknownGroupMember { group: String, member: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metabolic_model::reaction::ReactionBuilder;

    fn setup_model() -> Model {
        let mut model = Model::new("test");
        model.add_compartment("c", "cytosol");
        model.add_metabolite(Metabolite::new("a"));
        model.add_metabolite(Metabolite::new("b"));
        model
            .add_reaction(
                ReactionBuilder::default()
                    .id("r1".to_string())
                    .metabolites(IndexMap::from([("a".to_string(), -1.), ("b".to_string(), 1.)]))
                    .gene_reaction_rule("g1 or g2".to_string())
                    .build()
                    .unwrap(),
            )
            .unwrap();
        model
    }

    #[test]
    fn add_reaction_creates_genes() {
        let model = setup_model();
        assert_eq!(
            model.genes.keys().collect::<Vec<_>>(),
            vec!["g1", "g2"]
        );
        assert_eq!(model.genes["g1"].name.as_deref(), Some("g1"));
    }

    #[test]
    fn add_reaction_unknown_metabolite() {
        let mut model = setup_model();
        let mut reaction = Reaction::new("r2");
        reaction.metabolites.insert("z".to_string(), 1.);
        assert_eq!(
            model.add_reaction(reaction),
            Err(ModelError::UnknownMetabolite {
                reaction: "r2".to_string(),
                metabolite: "z".to_string()
            })
        );
    }

    #[test]
    fn objective() {
        let mut model = setup_model();
        assert_eq!(model.objective_coefficient("r1"), 0.);
        model.set_objective_direction(ObjectiveSense::Minimize);
        model
            .set_objective(IndexMap::from([("r1".to_string(), 1.)]))
            .unwrap();
        assert_eq!(model.objective_coefficient("r1"), 1.);
        assert_eq!(model.objective.sense(), ObjectiveSense::Maximize);
        assert_eq!(
            model.set_objective(IndexMap::from([("r9".to_string(), 1.)])),
            Err(ModelError::UnknownReaction("r9".to_string()))
        );
    }

    #[test]
    fn groups() {
        let mut model = setup_model();
        let mut group = Group::new("sub");
        group.add_member(GroupMember::Reaction("r1".to_string()));
        group.add_member(GroupMember::Gene("g2".to_string()));
        model.add_group(group).unwrap();
        let mut bad = Group::new("bad");
        bad.add_member(GroupMember::Metabolite("r1".to_string()));
        assert!(matches!(
            model.add_group(bad),
            Err(ModelError::UnknownGroupMember { .. })
        ));
    }
}
