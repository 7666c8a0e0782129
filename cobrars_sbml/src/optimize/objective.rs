//! Provides struct for representing a model's linear objective

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Represents the Objective of a metabolic model
///
/// The objective is a linear combination of reaction fluxes, keyed by reaction id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Objective {
    /// Map of reaction ids to objective coefficients
    terms: IndexMap<String, f64>,
    /// Sense of the objective (maximize, or minimize), see [`ObjectiveSense`]
    sense: ObjectiveSense,
}

impl Default for Objective {
    fn default() -> Self {
        Self::new_maximize()
    }
}

impl Objective {
    /// Create a new empty objective, with a given sense
    pub fn new(sense: ObjectiveSense) -> Self {
        Self {
            terms: IndexMap::new(),
            sense,
        }
    }

    /// Create a new empty maximization objective
    pub fn new_maximize() -> Self {
        Self::new(ObjectiveSense::Maximize)
    }

    /// Create a new empty minimization objective
    pub fn new_minimize() -> Self {
        Self::new(ObjectiveSense::Minimize)
    }

    /// Sense of the objective
    pub fn sense(&self) -> ObjectiveSense {
        self.sense
    }

    /// Change the sense of the objective
    pub fn set_sense(&mut self, sense: ObjectiveSense) {
        self.sense = sense;
    }

    /// Replace the terms of the objective
    ///
    /// Like building a fresh linear expression, this resets the sense to maximize, so set the
    /// sense after the terms.
    pub fn set_terms(&mut self, terms: IndexMap<String, f64>) {
        self.terms = terms;
        self.sense = ObjectiveSense::Maximize;
    }

    /// Add a new Linear term to the objective, replacing any existing coefficient
    pub fn add_linear_term(&mut self, reaction_id: &str, coefficient: f64) {
        self.terms.insert(reaction_id.to_string(), coefficient);
    }

    /// Coefficient of a reaction, 0 if it is not part of the objective
    pub fn coefficient(&self, reaction_id: &str) -> f64 {
        self.terms.get(reaction_id).copied().unwrap_or(0.)
    }

    /// All terms of the objective, in insertion order
    pub fn terms(&self) -> &IndexMap<String, f64> {
        &self.terms
    }

    /// Drop a reaction from the objective
    pub fn remove_term(&mut self, reaction_id: &str) -> Option<f64> {
        self.terms.shift_remove(reaction_id)
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// Represents the sense of the objective, whether it should be maximized or minimized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectiveSense {
    /// The objective should be minimized
    Minimize,
    /// The objective should be maximized
    Maximize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coefficients() {
        let mut objective = Objective::new_minimize();
        objective.add_linear_term("biomass", 1.);
        assert_eq!(objective.coefficient("biomass"), 1.);
        assert_eq!(objective.coefficient("other"), 0.);
        assert_eq!(objective.sense(), ObjectiveSense::Minimize);
    }

    #[test]
    fn set_terms_resets_sense() {
        let mut objective = Objective::new_minimize();
        objective.set_terms(IndexMap::from([("r1".to_string(), 2.)]));
        assert_eq!(objective.sense(), ObjectiveSense::Maximize);
        objective.set_sense(ObjectiveSense::Minimize);
        assert_eq!(objective.sense(), ObjectiveSense::Minimize);
        assert_eq!(objective.remove_term("r1"), Some(2.));
        assert!(objective.is_empty());
    }
}
