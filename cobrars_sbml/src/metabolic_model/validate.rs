//! Semantic checks of a Model which go beyond what the data structures enforce
use crate::metabolic_model::model::Model;

/// Check metabolite compartments and formulas, and reaction bounds
///
/// Returns one message per problem found, an empty vector means the model passed.
/// Problems reported:
/// - a metabolite formula containing anything other than ASCII letters and digits
/// - a metabolite in a compartment the model does not declare
/// - a reaction whose lower bound is larger than its upper bound
pub fn check_metabolite_compartment_formula(model: &Model) -> Vec<String> {
    let mut errors = Vec::new();
    for metabolite in model.metabolites.values() {
        if let Some(formula) = &metabolite.formula {
            if !formula.chars().all(|c| c.is_ascii_alphanumeric()) {
                errors.push(format!(
                    "Metabolite '{}' formula '{}' not alphanumeric",
                    metabolite.id, formula
                ));
            }
        }
        if let Some(compartment) = &metabolite.compartment {
            if !model.compartments.contains_key(compartment) {
                errors.push(format!(
                    "Metabolite '{}' compartment '{}' not found",
                    metabolite.id, compartment
                ));
            }
        }
    }
    for reaction in model.reactions.values() {
        if reaction.lower_bound > reaction.upper_bound {
            errors.push(format!(
                "Reaction '{}' lower bound {} is greater than upper bound {}",
                reaction.id, reaction.lower_bound, reaction.upper_bound
            ));
        }
    }
    errors
}
