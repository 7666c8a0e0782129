use thiserror::Error;

use crate::metabolic_model::model::ModelError;
use crate::sbml::DocumentError;

/// Errors translating between SBML documents and models
#[derive(Error, Debug)]
pub enum SbmlError {
    /// Any failure of [`read_sbml_model`](crate::io::sbml::read_sbml_model), wrapping the cause
    #[error(
        "Something went wrong reading the SBML model. Most likely the SBML model is not valid. \
         Please check that your model is valid using `validate_sbml_model`. Cause: {0}"
    )]
    Translation(Box<SbmlError>),
    #[error("Unable to access SBML file")]
    IoError(#[from] std::io::Error),
    #[error(transparent)]
    DocumentError(#[from] DocumentError),
    #[error(transparent)]
    ModelError(#[from] ModelError),
    #[error("No SBML model detected in file")]
    MissingModel,
    #[error("Missing flux bounds on reaction '{reaction}': {reason}")]
    MissingBounds { reaction: String, reason: String },
    #[error("No flux bounds on reaction '{0}'")]
    NoFluxBounds(String),
    #[error("Missing stoichiometry for species '{species}' in reaction '{reaction}'")]
    MissingStoichiometry { reaction: String, species: String },
    #[error("Invalid stoichiometry {value} for species '{species}' in reaction '{reaction}'")]
    InvalidStoichiometry {
        reaction: String,
        species: String,
        value: f64,
    },
    #[error("Objective '{0}' has no type, it must be 'maximize' or 'minimize'")]
    MissingObjectiveType(String),
    #[error("Objective references reaction '{0}' which is not in the model")]
    UnknownObjectiveReaction(String),
    #[error("Missing required attribute '{attribute}' on {element}")]
    MissingAttribute { element: String, attribute: String },
}

impl SbmlError {
    /// Wrap an error as [`SbmlError::Translation`] unless it already is one
    pub fn into_translation(self) -> SbmlError {
        match self {
            SbmlError::Translation(_) => self,
            other => SbmlError::Translation(Box::new(other)),
        }
    }

    /// The underlying error of a [`SbmlError::Translation`]
    pub fn cause(&self) -> &SbmlError {
        match self {
            SbmlError::Translation(inner) => inner.cause(),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translation_wraps_once() {
        let error = SbmlError::MissingModel.into_translation().into_translation();
        assert!(matches!(error.cause(), SbmlError::MissingModel));
        let message = error.to_string();
        assert!(message.contains("validate_sbml_model"));
        assert!(message.ends_with("No SBML model detected in file"));
    }
}
