//! Reading, writing and validating constraint based metabolic models stored as SBML.
//!
//! The [`sbml`] module holds a typed SBML document layer, [`io::sbml`] translates between
//! those documents and [`metabolic_model::model::Model`].

pub mod configuration;
pub mod io;
pub mod metabolic_model;
pub mod optimize;
pub mod sbml;
