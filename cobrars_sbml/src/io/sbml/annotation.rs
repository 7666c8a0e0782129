//! Conversion between SBML SBO terms/CV terms and annotation dictionaries
//!
//! Cross references are stored as identifiers.org URIs,
//! `https://identifiers.org/<provider>/<entity>`.
use crate::metabolic_model::annotation::{Annotation, AnnotationItem, AnnotationValue, SBO_KEY};
use crate::sbml::{BiologicalQualifier, CvTerm, ModelQualifier, Qualifier, SBase};

pub const URL_IDENTIFIERS_PREFIX: &str = "https://identifiers.org";

/// Legacy spelling of [`SBO_KEY`]
const LEGACY_SBO_KEY: &str = "SBO";

/// Prefix marking model qualifiers in annotation items
const MODEL_QUALIFIER_PREFIX: &str = "bqm_";

/// Split an identifiers.org URI into provider and entity
///
/// The URI must consist of exactly five `/` separated tokens with the host
/// `identifiers.org`, e.g. `http://identifiers.org/chebi/CHEBI:17234`.
pub fn parse_identifiers_uri(uri: &str) -> Option<(&str, &str)> {
    let tokens: Vec<&str> = uri.split('/').collect();
    if tokens.len() != 5 || tokens[2] != "identifiers.org" {
        return None;
    }
    Some((tokens[3], tokens[4]))
}

/// Read the annotation of a component
///
/// The SBO term comes first under the `sbo` key, followed by the identifiers.org cross
/// references of every CV term. Qualifiers are not kept. Resources that are not
/// identifiers.org URIs are skipped with a warning.
pub fn parse_annotations(sbase: &SBase) -> Annotation {
    let mut annotation = Annotation::new();
    if let Some(sbo) = &sbase.sbo_term {
        annotation.insert(SBO_KEY.to_string(), AnnotationValue::Single(sbo.clone()));
    }
    for resource in sbase.cv_terms.iter().flat_map(|cv| cv.resources.iter()) {
        let Some((provider, entity)) = parse_identifiers_uri(resource) else {
            log::warn!("{resource} does not conform to http(s)://identifiers.org/collection/id");
            continue;
        };
        match annotation.get_mut(provider) {
            Some(value) => value.push(entity.to_string()),
            None => {
                annotation.insert(
                    provider.to_string(),
                    AnnotationValue::Single(entity.to_string()),
                );
            }
        }
    }
    annotation
}

/// Qualifier for a qualifier name, `bqm_` names are model qualifiers
///
/// Unknown names fall back to `is` of the same class with a warning.
pub fn qualifier_from_name(name: &str) -> Qualifier {
    match name.strip_prefix(MODEL_QUALIFIER_PREFIX) {
        Some(model_name) => Qualifier::Model(
            ModelQualifier::from_element_name(model_name).unwrap_or_else(|| {
                log::warn!("Qualifier type is not supported on annotation: '{name}'");
                ModelQualifier::Is
            }),
        ),
        None => Qualifier::Biological(BiologicalQualifier::from_element_name(name).unwrap_or_else(
            || {
                log::warn!("Qualifier type is not supported on annotation: '{name}'");
                BiologicalQualifier::Is
            },
        )),
    }
}

/// Write an annotation dictionary onto a component
///
/// Sets the meta id to `meta_<id>`. The `sbo` entry becomes the SBO term, every other
/// `(qualifier, entity)` pair becomes one CV term. Nothing happens for an empty
/// annotation.
pub fn set_annotations(sbase: &mut SBase, annotation: &Annotation) {
    if annotation.is_empty() {
        return;
    }
    sbase.meta_id = Some(format!("meta_{}", sbase.id.as_deref().unwrap_or_default()));

    for (provider, value) in annotation {
        let items = normalized_items(value);
        if provider == SBO_KEY || provider == LEGACY_SBO_KEY {
            if provider == LEGACY_SBO_KEY {
                log::warn!("'SBO' provider is deprecated, use 'sbo' provider instead");
            }
            set_sbo(sbase, &items);
            continue;
        }
        for item in items {
            let qualifier = qualifier_from_name(item.qualifier());
            let resource = format!("{URL_IDENTIFIERS_PREFIX}/{provider}/{}", item.entity());
            if let Err(e) = sbase.add_cv_term(CvTerm::new(qualifier, &resource)) {
                log::warn!("Setting cvterm with resource {resource}: {e}");
            }
        }
    }
}

/// Every entry as a list item, a single value is an `is` item
fn normalized_items(value: &AnnotationValue) -> Vec<AnnotationItem> {
    match value {
        AnnotationValue::Single(entity) => vec![AnnotationItem::Bare(entity.clone())],
        AnnotationValue::List(items) => items.clone(),
    }
}

fn set_sbo(sbase: &mut SBase, items: &[AnnotationItem]) {
    let Some(first) = items.first() else {
        return;
    };
    if items.len() > 1 {
        log::warn!(
            "Only the first SBO term of '{}' is written, {} dropped",
            sbase.id.as_deref().unwrap_or_default(),
            items.len() - 1
        );
    }
    if let Err(e) = sbase.set_sbo_term(first.entity()) {
        log::warn!("Setting SBOTerm: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn uri_shapes() {
        assert_eq!(
            parse_identifiers_uri("http://identifiers.org/chebi/CHEBI:17234"),
            Some(("chebi", "CHEBI:17234"))
        );
        assert_eq!(
            parse_identifiers_uri("https://identifiers.org/kegg.compound/C00031"),
            Some(("kegg.compound", "C00031"))
        );
        assert_eq!(parse_identifiers_uri("https://identifiers.org/chebi"), None);
        assert_eq!(parse_identifiers_uri("https://example.org/chebi/CHEBI:1"), None);
        assert_eq!(
            parse_identifiers_uri("https://identifiers.org/ec-code/1/2"),
            None
        );
    }

    #[test]
    fn single_cross_reference() {
        init();
        let annotation = Annotation::from([(
            "chebi".to_string(),
            AnnotationValue::Single("CHEBI:17234".to_string()),
        )]);
        let mut sbase = SBase::with_id("M_glc__D_c");
        set_annotations(&mut sbase, &annotation);
        assert_eq!(sbase.meta_id.as_deref(), Some("meta_M_glc__D_c"));
        assert_eq!(
            sbase.cv_terms,
            vec![CvTerm::new(
                Qualifier::Biological(BiologicalQualifier::Is),
                "https://identifiers.org/chebi/CHEBI:17234"
            )]
        );
        assert_eq!(parse_annotations(&sbase), annotation);
    }

    #[test]
    fn sbo_and_qualifiers() {
        init();
        let annotation = Annotation::from([
            (
                "SBO".to_string(),
                AnnotationValue::Single("SBO:0000247".to_string()),
            ),
            (
                "kegg".to_string(),
                AnnotationValue::List(vec![
                    AnnotationItem::Bare("C00031".to_string()),
                    AnnotationItem::Qualified("bqm_isDescribedBy".to_string(), "C1".to_string()),
                    AnnotationItem::Qualified("madeUp".to_string(), "C2".to_string()),
                ]),
            ),
        ]);
        let mut sbase = SBase::with_id("M_glc");
        set_annotations(&mut sbase, &annotation);
        assert_eq!(sbase.sbo_term.as_deref(), Some("SBO:0000247"));
        let qualifiers: Vec<Qualifier> = sbase.cv_terms.iter().map(|cv| cv.qualifier).collect();
        assert_eq!(
            qualifiers,
            vec![
                Qualifier::Biological(BiologicalQualifier::Is),
                Qualifier::Model(ModelQualifier::IsDescribedBy),
                Qualifier::Biological(BiologicalQualifier::Is),
            ]
        );

        let parsed = parse_annotations(&sbase);
        assert_eq!(parsed.keys().collect::<Vec<_>>(), vec!["sbo", "kegg"]);
        assert_eq!(parsed["kegg"].entities(), vec!["C00031", "C1", "C2"]);
    }

    #[test]
    fn empty_annotation_is_noop() {
        let mut sbase = SBase::with_id("R_PGI");
        set_annotations(&mut sbase, &Annotation::new());
        assert_eq!(sbase, SBase::with_id("R_PGI"));
    }

    #[test]
    fn foreign_resources_skipped() {
        init();
        let mut sbase = SBase::default();
        sbase
            .add_cv_term(CvTerm::new(
                Qualifier::Biological(BiologicalQualifier::Is),
                "urn:miriam:chebi:CHEBI%3A17234",
            ))
            .unwrap();
        assert!(parse_annotations(&sbase).is_empty());
    }
}
