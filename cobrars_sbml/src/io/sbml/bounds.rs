//! Flux bound parameters of written SBML models
//!
//! Bounds equal to the configured defaults or to zero share one parameter each, every other
//! bound gets its own parameter named after the reaction.
use crate::configuration::Configuration;
use crate::sbml::{Parameter, SBase, SbmlModel};

pub const LOWER_BOUND_ID: &str = "cobra_default_lb";
pub const UPPER_BOUND_ID: &str = "cobra_default_ub";
pub const ZERO_BOUND_ID: &str = "cobra_0_bound";

/// SBO term of the flux balance framework
pub const SBO_FBA_FRAMEWORK: &str = "SBO:0000624";
/// SBO term of the shared default bound parameters
pub const SBO_DEFAULT_FLUX_BOUND: &str = "SBO:0000626";
/// SBO term of reaction specific bound parameters
pub const SBO_FLUX_BOUND: &str = "SBO:0000625";

/// Which of a reaction's bounds a parameter holds
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoundKind {
    Lower,
    Upper,
}

impl BoundKind {
    /// Suffix of reaction specific parameter ids
    pub fn as_str(&self) -> &'static str {
        match self {
            BoundKind::Lower => "lower_bound",
            BoundKind::Upper => "upper_bound",
        }
    }
}

/// Creates the bound parameters of one SBML model
#[derive(Debug)]
pub struct BoundParameters<'a> {
    configuration: &'a Configuration,
    /// Unit definition id given to every bound parameter
    units: Option<&'a str>,
}

impl<'a> BoundParameters<'a> {
    pub fn new(configuration: &'a Configuration, units: Option<&'a str>) -> Self {
        BoundParameters {
            configuration,
            units,
        }
    }

    /// Add the three shared parameters to `model`
    pub fn create_default_parameters(&self, model: &mut SbmlModel) {
        self.create_parameter(
            model,
            LOWER_BOUND_ID,
            self.configuration.lower_bound,
            SBO_DEFAULT_FLUX_BOUND,
        );
        self.create_parameter(
            model,
            UPPER_BOUND_ID,
            self.configuration.upper_bound,
            SBO_DEFAULT_FLUX_BOUND,
        );
        self.create_parameter(model, ZERO_BOUND_ID, 0., SBO_DEFAULT_FLUX_BOUND);
    }

    /// Id of the parameter holding `value`, creating a reaction specific one if needed
    ///
    /// # Parameters
    /// - `model`: SBML model receiving new parameters
    /// - `reaction_id`: SBML id of the reaction (already prefixed)
    /// - `value`: Value of the bound
    /// - `kind`: Whether `value` is the lower or upper bound
    pub fn resolve_or_create(
        &self,
        model: &mut SbmlModel,
        reaction_id: &str,
        value: f64,
        kind: BoundKind,
    ) -> String {
        if value == self.configuration.lower_bound {
            LOWER_BOUND_ID.to_string()
        } else if value == 0. {
            ZERO_BOUND_ID.to_string()
        } else if value == self.configuration.upper_bound {
            UPPER_BOUND_ID.to_string()
        } else {
            let id = format!("{reaction_id}_{}", kind.as_str());
            self.create_parameter(model, &id, value, SBO_FLUX_BOUND);
            id
        }
    }

    fn create_parameter(&self, model: &mut SbmlModel, id: &str, value: f64, sbo: &str) {
        model.parameters.push(Parameter {
            sbase: SBase {
                sbo_term: Some(sbo.to_string()),
                ..SBase::with_id(id)
            },
            value: Some(value),
            constant: Some(true),
            units: self.units.map(str::to_string),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_parameters() {
        let configuration = Configuration::default();
        let bounds = BoundParameters::new(&configuration, None);
        let mut model = SbmlModel::default();
        bounds.create_default_parameters(&mut model);
        assert_eq!(model.parameters.len(), 3);
        assert_eq!(model.parameter(LOWER_BOUND_ID).unwrap().value, Some(-1000.));
        assert_eq!(model.parameter(UPPER_BOUND_ID).unwrap().value, Some(1000.));
        let zero = model.parameter(ZERO_BOUND_ID).unwrap();
        assert_eq!(zero.value, Some(0.));
        assert_eq!(zero.sbase.sbo_term.as_deref(), Some(SBO_DEFAULT_FLUX_BOUND));
        assert_eq!(zero.units, None);
    }

    #[test]
    fn shared_parameters_are_deduplicated() {
        let configuration = Configuration::default();
        let bounds = BoundParameters::new(&configuration, Some("mmol_per_gDW_per_hr"));
        let mut model = SbmlModel::default();
        bounds.create_default_parameters(&mut model);
        for i in 0..5 {
            let id = bounds.resolve_or_create(&mut model, &format!("R_{i}"), -1000., BoundKind::Lower);
            assert_eq!(id, LOWER_BOUND_ID);
        }
        assert_eq!(
            bounds.resolve_or_create(&mut model, "R_x", 0., BoundKind::Upper),
            ZERO_BOUND_ID
        );
        assert_eq!(model.parameters.len(), 3);

        let id = bounds.resolve_or_create(&mut model, "R_EX_glc", -10., BoundKind::Lower);
        assert_eq!(id, "R_EX_glc_lower_bound");
        let parameter = model.parameter(&id).unwrap();
        assert_eq!(parameter.value, Some(-10.));
        assert_eq!(parameter.constant, Some(true));
        assert_eq!(parameter.units.as_deref(), Some("mmol_per_gDW_per_hr"));
        assert_eq!(parameter.sbase.sbo_term.as_deref(), Some(SBO_FLUX_BOUND));
    }

    #[test]
    fn configured_defaults() {
        let configuration = Configuration {
            lower_bound: -500.,
            upper_bound: 500.,
            ..Default::default()
        };
        let bounds = BoundParameters::new(&configuration, None);
        let mut model = SbmlModel::default();
        assert_eq!(
            bounds.resolve_or_create(&mut model, "R_a", 500., BoundKind::Upper),
            UPPER_BOUND_ID
        );
        assert_eq!(
            bounds.resolve_or_create(&mut model, "R_a", 1000., BoundKind::Upper),
            "R_a_upper_bound"
        );
    }
}
