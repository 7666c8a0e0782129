//! SBML document layer
//!
//! A small typed representation of SBML Level 2/3 documents with the FBC and Groups packages,
//! read from and written to XML through a generic [`xml::XmlElement`] tree.
pub mod document;
mod read;
mod write;
pub mod xml;

use thiserror::Error;

pub use document::*;
pub use read::read_sbml_from_string;

// region Namespaces
pub const SBML_L3V1_NAMESPACE: &str = "http://www.sbml.org/sbml/level3/version1/core";
pub const XHTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";
pub const RDF_NAMESPACE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
pub const DC_NAMESPACE: &str = "http://purl.org/dc/elements/1.1/";
pub const DCTERMS_NAMESPACE: &str = "http://purl.org/dc/terms/";
pub const VCARD_NAMESPACE: &str = "http://www.w3.org/2001/vcard-rdf/3.0#";
pub const BQBIOL_NAMESPACE: &str = "http://biomodels.net/biology-qualifiers/";
pub const BQMODEL_NAMESPACE: &str = "http://biomodels.net/model-qualifiers/";
// endregion Namespaces

const LEVEL3_PREFIX: &str = "http://www.sbml.org/sbml/level3/";

/// Namespace URI of the core of a given SBML level and version
pub fn core_namespace(level: u32, version: u32) -> String {
    match level {
        1 => "http://www.sbml.org/sbml/level1".to_string(),
        2 => format!("http://www.sbml.org/sbml/level2/version{version}"),
        _ => format!("{LEVEL3_PREFIX}version{version}/core"),
    }
}

/// Namespace URI of a Level 3 Version 1 package
pub fn package_namespace(package: &str, package_version: u32) -> String {
    format!("{LEVEL3_PREFIX}version1/{package}/version{package_version}")
}

/// Split a Level 3 package namespace URI into the package name and version
pub fn parse_package_namespace(uri: &str) -> Option<(String, u32)> {
    let rest = uri.strip_prefix(LEVEL3_PREFIX)?;
    let mut parts = rest.split('/');
    let _level_version = parts.next()?;
    let package = parts.next()?;
    let version = parts.next()?.strip_prefix("version")?.parse().ok()?;
    if package == "core" || parts.next().is_some() {
        return None;
    }
    Some((package.to_string(), version))
}

/// Whether a namespace URI belongs to SBML core (any level)
pub fn is_core_namespace(uri: &str) -> bool {
    uri.starts_with("http://www.sbml.org/sbml/level") && parse_package_namespace(uri).is_none()
}

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Unable to read SBML file")]
    IoError(#[from] std::io::Error),
    #[error(transparent)]
    XmlError(#[from] xml::XmlError),
    #[error("Not an SBML document: {0}")]
    NotSbml(String),
    #[error("Invalid SBO term '{0}'")]
    InvalidSboTerm(String),
    #[error("Invalid notes: {0}")]
    InvalidNotes(String),
    #[error("A CV term needs at least one resource")]
    EmptyCvTerm,
    #[error("Invalid value '{value}' for attribute {attribute}")]
    InvalidValue { attribute: String, value: String },
    #[error("Unable to convert FBC version 1 to version 2: {0}")]
    FbcConversion(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn package_namespaces() {
        assert_eq!(
            parse_package_namespace("http://www.sbml.org/sbml/level3/version1/fbc/version2"),
            Some(("fbc".to_string(), 2))
        );
        assert_eq!(
            parse_package_namespace(&package_namespace("groups", 1)),
            Some(("groups".to_string(), 1))
        );
        assert_eq!(parse_package_namespace(SBML_L3V1_NAMESPACE), None);
        assert!(is_core_namespace(SBML_L3V1_NAMESPACE));
        assert!(is_core_namespace(&core_namespace(2, 4)));
        assert!(!is_core_namespace(&package_namespace("fbc", 2)));
    }
}
