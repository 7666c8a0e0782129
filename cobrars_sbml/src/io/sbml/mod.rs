//! Reading and writing models as SBML with the FBC and Groups packages
//!
//! [`read_sbml_model`] translates SBML (Level 2 or 3, FBC version 1 or 2, or the legacy
//! COBRA notes encoding) into a [`Model`](crate::metabolic_model::model::Model),
//! [`write_sbml_model`] writes SBML Level 3 Version 1 with FBC version 2, and
//! [`validate_sbml_model`] reports every problem found on the way instead of failing.
pub mod annotation;
pub mod bounds;
pub mod error;
pub mod gpr;
pub mod ids;
pub mod notes;
pub mod reader;
pub mod validate;
pub mod writer;

pub use error::SbmlError;
pub use ids::{IdReplacement, IdReplacements};
pub use reader::{read_sbml_model, sbml_to_model, NumberKind, SbmlReadOptions, SbmlSource};
pub use validate::{validate_sbml_model, ValidationOptions, ValidationReport};
pub use writer::{
    model_to_sbml, write_sbml_model, write_sbml_to_string, write_sbml_to_writer, SbmlWriteOptions,
};
