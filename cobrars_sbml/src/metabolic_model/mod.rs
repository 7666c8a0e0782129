//! Module representing the metabolic models
pub mod annotation;
pub mod gene;
pub mod group;
pub mod metabolite;
pub mod model;
pub mod reaction;
pub mod validate;
