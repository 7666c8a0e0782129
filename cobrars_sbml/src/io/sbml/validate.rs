//! Validation of SBML models, collecting every problem instead of failing on the first one
//!
//! The structural document checks are libSBML's consistency checks and need the `libsbml`
//! feature.
use indexmap::IndexMap;

use crate::io::sbml::error::SbmlError;
use crate::io::sbml::reader::{SbmlReadOptions, SbmlReader, SbmlSource};
use crate::metabolic_model::model::Model;
use crate::metabolic_model::validate::check_metabolite_compartment_formula;
use crate::sbml::{read_sbml_from_string, DocumentError};

/// Semantic problems of the translated model
pub const VALIDATOR: &str = "validator";
/// Warnings raised while translating the document
pub const WARNINGS: &str = "warnings";
/// Failures not caused by the SBML content, such as an unreadable file
pub const OTHER: &str = "other";
/// Failures translating the document into a model
pub const SBML_ERRORS: &str = "SBML errors";
pub const SBML_FATAL: &str = "SBML_FATAL";
pub const SBML_ERROR: &str = "SBML_ERROR";
pub const SBML_SCHEMA_ERROR: &str = "SBML_SCHEMA_ERROR";
pub const SBML_WARNING: &str = "SBML_WARNING";

#[derive(Clone, Debug)]
pub struct ValidationOptions {
    /// Run libSBML's consistency checks, reported under the `SBML_*` categories
    pub check_document: bool,
    /// Check formulas, compartments and bounds of the translated model
    pub check_model: bool,
    /// Keep libSBML's internal consistency messages
    pub internal_consistency: bool,
    /// Keep libSBML's unit consistency messages
    pub check_units_consistency: bool,
    /// Keep libSBML's modeling practice messages
    pub check_modeling_practice: bool,
    /// Options for the translation itself
    pub read_options: SbmlReadOptions,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        ValidationOptions {
            check_document: false,
            check_model: true,
            internal_consistency: true,
            check_units_consistency: false,
            check_modeling_practice: false,
            read_options: SbmlReadOptions::default(),
        }
    }
}

/// Messages found during validation, grouped by category
#[derive(Clone, Debug, PartialEq)]
pub struct ValidationReport {
    categories: IndexMap<String, Vec<String>>,
}

impl ValidationReport {
    fn new(check_document: bool) -> Self {
        let mut keys = vec![VALIDATOR, WARNINGS, OTHER, SBML_ERRORS];
        if check_document {
            keys.extend([SBML_FATAL, SBML_ERROR, SBML_SCHEMA_ERROR, SBML_WARNING]);
        }
        ValidationReport {
            categories: keys
                .into_iter()
                .map(|key| (key.to_string(), Vec::new()))
                .collect(),
        }
    }

    fn push(&mut self, category: &str, message: String) {
        self.categories
            .entry(category.to_string())
            .or_default()
            .push(message);
    }

    /// Messages of a category, empty for a category that was not checked
    pub fn get(&self, category: &str) -> &[String] {
        self.categories
            .get(category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Every category with its messages, in report order
    pub fn categories(&self) -> &IndexMap<String, Vec<String>> {
        &self.categories
    }

    /// Whether no category other than `warnings` and `SBML_WARNING` holds a message
    pub fn is_valid(&self) -> bool {
        self.categories
            .iter()
            .filter(|(category, _)| *category != WARNINGS && *category != SBML_WARNING)
            .all(|(_, messages)| messages.is_empty())
    }
}

/// Validate an SBML model, returning the model (if it could be read) and every problem found
///
/// Never fails: problems reading or translating the document end up in the report and no
/// model is returned.
///
/// # Examples
/// ```no_run
/// use cobrars_sbml::io::sbml::{validate_sbml_model, ValidationOptions};
/// let (model, report) = validate_sbml_model("e_coli_core.xml", &ValidationOptions::default());
/// for (category, messages) in report.categories() {
///     println!("{category}: {}", messages.len());
/// }
/// ```
pub fn validate_sbml_model(
    source: impl Into<SbmlSource>,
    options: &ValidationOptions,
) -> (Option<Model>, ValidationReport) {
    let mut report = ValidationReport::new(options.check_document);

    let sbml = match source.into().into_text() {
        Ok(sbml) => sbml,
        Err(e) => {
            report.push(error_category(&e), e.to_string());
            return (None, report);
        }
    };

    if options.check_document {
        check_document(&sbml, options, &mut report);
    }

    let document = match read_sbml_from_string(&sbml) {
        Ok(document) => document,
        Err(e) => {
            let e = SbmlError::from(e);
            report.push(error_category(&e), e.to_string());
            return (None, report);
        }
    };

    let mut reader = SbmlReader::new(&options.read_options);
    let result = reader.read(document);
    for warning in reader.into_warnings() {
        report.push(WARNINGS, warning);
    }
    let model = match result {
        Ok(model) => model,
        Err(e) => {
            report.push(error_category(&e), e.to_string());
            return (None, report);
        }
    };

    if options.check_model {
        for message in check_metabolite_compartment_formula(&model) {
            report.push(VALIDATOR, message);
        }
    }
    (Some(model), report)
}

/// Sort libSBML's consistency messages into the `SBML_*` categories
#[cfg(feature = "libsbml")]
fn check_document(sbml: &str, options: &ValidationOptions, report: &mut ValidationReport) {
    use ::sbml::prelude::SBMLErrorSeverity;
    use ::sbml::reader::SBMLReader;

    let document = SBMLReader::from_xml_string(sbml);
    for error in document.check_consistency().errors {
        if !category_checked(&error.category, options) {
            continue;
        }
        let category = match error.severity {
            SBMLErrorSeverity::Fatal => SBML_FATAL,
            SBMLErrorSeverity::Error if is_schema_category(&error.category) => SBML_SCHEMA_ERROR,
            SBMLErrorSeverity::Error => SBML_ERROR,
            SBMLErrorSeverity::Warning => SBML_WARNING,
            _ => continue,
        };
        report.push(
            category,
            format!("{} (line {}): {}", error.category, error.line, error.message.trim()),
        );
    }
}

#[cfg(not(feature = "libsbml"))]
fn check_document(_sbml: &str, _options: &ValidationOptions, report: &mut ValidationReport) {
    let message = "SBML document checks need the `libsbml` feature, skipping them".to_string();
    log::warn!("{message}");
    report.push(WARNINGS, message);
}

/// Whether messages of a libSBML category were asked for
#[cfg(feature = "libsbml")]
fn category_checked(category: &str, options: &ValidationOptions) -> bool {
    let category = category.to_lowercase();
    if category.contains("unit") {
        options.check_units_consistency
    } else if category.contains("modeling practice") {
        options.check_modeling_practice
    } else if category.contains("internal consistency") {
        options.internal_consistency
    } else {
        true
    }
}

#[cfg(feature = "libsbml")]
fn is_schema_category(category: &str) -> bool {
    let category = category.to_lowercase();
    category.contains("xml") || category.contains("schema")
}

fn error_category(error: &SbmlError) -> &'static str {
    match error.cause() {
        SbmlError::IoError(_) | SbmlError::DocumentError(DocumentError::IoError(_)) => OTHER,
        _ => SBML_ERRORS,
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn test_model_path(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("test_data")
            .join("test_models")
            .join(name)
    }

    #[test]
    fn valid_model() {
        init();
        let (model, report) = validate_sbml_model(
            test_model_path("mini_fbc2.xml"),
            &ValidationOptions::default(),
        );
        assert!(model.is_some());
        assert!(report.is_valid(), "{report:?}");
        assert_eq!(
            report.categories().keys().collect::<Vec<_>>(),
            vec![VALIDATOR, WARNINGS, OTHER, SBML_ERRORS]
        );
        assert!(report.get(SBML_FATAL).is_empty());
    }

    #[test]
    fn missing_bounds() {
        init();
        let options = ValidationOptions {
            check_document: true,
            ..Default::default()
        };
        let (model, report) = validate_sbml_model(test_model_path("missing_bounds.xml"), &options);
        assert!(model.is_none());
        assert_eq!(report.get(SBML_ERRORS).len(), 1);
        assert!(report.get(SBML_ERRORS)[0].contains("R1"));
        assert!(report.categories().contains_key(SBML_SCHEMA_ERROR));
        assert!(!report.is_valid());
    }

    #[test]
    fn legacy_model_warnings() {
        init();
        let (model, report) = validate_sbml_model(
            test_model_path("legacy_notes.xml"),
            &ValidationOptions::default(),
        );
        assert!(model.is_some());
        assert!(!report.get(WARNINGS).is_empty());
        assert!(report
            .get(WARNINGS)
            .iter()
            .any(|w| w.contains("Model does not contain FBC information")));
    }

    const BROKEN: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<sbml xmlns="http://www.sbml.org/sbml/level3/version1/core"
      xmlns:fbc="http://www.sbml.org/sbml/level3/version1/fbc/version2"
      level="3" version="1" fbc:required="false">
  <model id="broken" fbc:strict="true">
    <listOfCompartments>
      <compartment id="c" constant="true"/>
    </listOfCompartments>
    <listOfSpecies>
      <species id="M_a_x" compartment="x" hasOnlySubstanceUnits="false" boundaryCondition="false"
               constant="false" fbc:chemicalFormula="C6-H12"/>
    </listOfSpecies>
    <listOfParameters>
      <parameter id="lb" value="10" constant="true"/>
      <parameter id="ub" value="1" constant="true"/>
    </listOfParameters>
    <listOfReactions>
      <reaction id="R_R1" reversible="false" fast="false" fbc:lowerFluxBound="lb"
                fbc:upperFluxBound="ub">
        <listOfProducts>
          <speciesReference species="M_a_x" stoichiometry="1" constant="true"/>
        </listOfProducts>
      </reaction>
    </listOfReactions>
  </model>
</sbml>"#;

    #[test]
    fn semantic_problems() {
        init();
        let (model, report) = validate_sbml_model(BROKEN, &ValidationOptions::default());
        assert!(model.is_some());
        let validator = report.get(VALIDATOR);
        assert_eq!(validator.len(), 3, "{validator:?}");
        assert!(validator.iter().any(|m| m.contains("not alphanumeric")));
        assert!(validator.iter().any(|m| m.contains("compartment 'x' not found")));
        assert!(validator.iter().any(|m| m.contains("greater than upper bound")));
        assert!(!report.is_valid());
    }

    #[cfg(feature = "libsbml")]
    #[test]
    fn document_problems() {
        init();
        let options = ValidationOptions {
            check_document: true,
            ..Default::default()
        };
        let (model, report) = validate_sbml_model(BROKEN, &options);
        assert!(model.is_some());
        assert!(!report.get(SBML_ERROR).is_empty(), "{report:?}");

        let (_, report) = validate_sbml_model(test_model_path("mini_fbc2.xml"), &options);
        assert!(report.get(SBML_FATAL).is_empty());
        assert!(report.get(SBML_ERROR).is_empty(), "{report:?}");
    }

    #[cfg(feature = "libsbml")]
    #[test]
    fn libsbml_categories() {
        let options = ValidationOptions::default();
        assert!(!category_checked("SBML unit consistency", &options));
        assert!(!category_checked("Modeling practice", &options));
        assert!(category_checked("Internal consistency", &options));
        assert!(category_checked("General SBML conformance", &options));
        let options = ValidationOptions {
            check_units_consistency: true,
            internal_consistency: false,
            ..Default::default()
        };
        assert!(category_checked("SBML unit consistency", &options));
        assert!(!category_checked("Internal consistency", &options));
        assert!(is_schema_category("XML content"));
        assert!(!is_schema_category("SBML component consistency"));
    }

    #[cfg(not(feature = "libsbml"))]
    #[test]
    fn document_check_needs_libsbml() {
        init();
        let options = ValidationOptions {
            check_document: true,
            ..Default::default()
        };
        let (model, report) = validate_sbml_model(test_model_path("mini_fbc2.xml"), &options);
        assert!(model.is_some());
        assert!(report.get(WARNINGS).iter().any(|w| w.contains("libsbml")));
        for category in [SBML_FATAL, SBML_ERROR, SBML_SCHEMA_ERROR, SBML_WARNING] {
            assert!(report.categories().contains_key(category));
            assert!(report.get(category).is_empty());
        }
        assert!(report.is_valid());
    }

    #[test]
    fn unreadable_input() {
        init();
        let (model, report) =
            validate_sbml_model("<notsbml/>", &ValidationOptions::default());
        assert!(model.is_none());
        assert_eq!(report.get(SBML_ERRORS).len(), 1);

        let missing = test_model_path("does_not_exist.xml");
        let (model, report) = validate_sbml_model(missing, &ValidationOptions::default());
        assert!(model.is_none());
        assert_eq!(report.get(OTHER).len(), 1);
    }
}
