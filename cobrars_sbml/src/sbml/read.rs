//! Interpretation of an XML element tree as an SBML document
use std::str::FromStr;

use crate::sbml::document::*;
use crate::sbml::xml::{nodes_to_string, XmlElement};
use crate::sbml::{
    is_core_namespace, parse_package_namespace, DocumentError, BQBIOL_NAMESPACE,
    BQMODEL_NAMESPACE, DCTERMS_NAMESPACE, DC_NAMESPACE, RDF_NAMESPACE,
};

/// Read an SBML document from a string
///
/// Fails only if the input is not well formed XML or not an `<sbml>` document, problems with
/// individual attributes are recorded in [`SbmlDocument::warnings`].
pub fn read_sbml_from_string(input: &str) -> Result<SbmlDocument, DocumentError> {
    let root = XmlElement::parse(input)?;
    DocumentReader::default().read_document(&root)
}

#[derive(Default)]
struct DocumentReader {
    warnings: Vec<String>,
    level: u32,
}

impl DocumentReader {
    fn read_document(mut self, root: &XmlElement) -> Result<SbmlDocument, DocumentError> {
        if root.local_name() != "sbml" {
            return Err(DocumentError::NotSbml(format!(
                "root element is <{}>",
                root.name
            )));
        }
        let level = required_number(root, "level")?;
        let version = required_number(root, "version")?;
        self.level = level;

        let mut document = SbmlDocument::new(level, version);
        for attr in &root.attributes {
            let Some(prefix) = attr.name.strip_prefix("xmlns:") else {
                continue;
            };
            if let Some((package, package_version)) = parse_package_namespace(&attr.value) {
                let required = root
                    .attribute(&format!("{prefix}:required"))
                    .is_some_and(|v| v == "true" || v == "1");
                document.enable_package(&package, package_version, required);
            }
        }
        document.sbase = self.read_sbase(root, None);

        if let Some(model_element) = root
            .child_elements()
            .find(|c| c.local_name() == "model" && package_of(c).as_deref() == Some("core"))
        {
            let mut model = self.read_model(model_element);
            if document.is_package_enabled("fbc") {
                model.fbc_mut();
            }
            if document.is_package_enabled("groups") {
                model.groups_mut();
            }
            document.model = Some(model);
        }
        document.warnings = self.warnings;
        Ok(document)
    }

    // region Helpers

    fn warn(&mut self, message: String) {
        self.warnings.push(message);
    }

    fn convert<T>(
        &mut self,
        element: &XmlElement,
        attribute: &str,
        raw: Option<&str>,
        parse: fn(&str) -> Option<T>,
    ) -> Option<T> {
        let raw = raw?;
        let parsed = parse(raw.trim());
        if parsed.is_none() {
            self.warn(format!(
                "attribute '{attribute}' of <{}> has invalid value '{raw}'",
                element.name
            ));
        }
        parsed
    }

    fn core_bool(&mut self, element: &XmlElement, attribute: &str) -> Option<bool> {
        self.convert(
            element,
            attribute,
            element.unprefixed_attribute(attribute),
            parse_bool,
        )
    }

    fn core_double(&mut self, element: &XmlElement, attribute: &str) -> Option<f64> {
        self.convert(
            element,
            attribute,
            element.unprefixed_attribute(attribute),
            parse_double,
        )
    }

    fn package_double(
        &mut self,
        element: &XmlElement,
        package: &str,
        attribute: &str,
    ) -> Option<f64> {
        self.convert(
            element,
            attribute,
            package_element_attribute(element, package, attribute),
            parse_double,
        )
    }

    fn package_enum<T: FromStr>(
        &mut self,
        element: &XmlElement,
        package: &str,
        attribute: &str,
    ) -> Option<T> {
        self.convert(
            element,
            attribute,
            package_element_attribute(element, package, attribute),
            |s| s.parse().ok(),
        )
    }

    // endregion Helpers

    // region SBase

    fn read_sbase(&mut self, element: &XmlElement, package: Option<&str>) -> SBase {
        let (id, name) = match package {
            Some(package) => (
                package_element_attribute(element, package, "id"),
                package_element_attribute(element, package, "name"),
            ),
            None => (
                element.unprefixed_attribute("id"),
                element.unprefixed_attribute("name"),
            ),
        };
        let sbo_term = self.convert(
            element,
            "sboTerm",
            element.unprefixed_attribute("sboTerm"),
            |s| is_sbo_term(s).then(|| s.to_string()),
        );

        let mut sbase = SBase {
            id: id.map(str::to_string),
            meta_id: element.unprefixed_attribute("metaid").map(str::to_string),
            name: name.map(str::to_string),
            sbo_term,
            notes: None,
            cv_terms: Vec::new(),
        };
        for child in element.child_elements() {
            if package_of(child).as_deref() != Some("core") {
                continue;
            }
            match child.local_name() {
                "notes" => match nodes_to_string(&child.children) {
                    Ok(notes) if !notes.trim().is_empty() => sbase.notes = Some(notes),
                    Ok(_) => {}
                    Err(err) => self.warn(format!(
                        "unable to read notes of <{}>: {err}",
                        element.name
                    )),
                },
                "annotation" => sbase.cv_terms = self.read_cv_terms(child),
                _ => {}
            }
        }
        sbase
    }

    fn read_cv_terms(&mut self, annotation: &XmlElement) -> Vec<CvTerm> {
        let mut terms = Vec::new();
        for description in rdf_descriptions(annotation) {
            for qualifier_element in description.child_elements() {
                let local = qualifier_element.local_name();
                let qualifier = match qualifier_element.namespace.as_deref() {
                    Some(BQBIOL_NAMESPACE) => {
                        BiologicalQualifier::from_element_name(local).map(Qualifier::Biological)
                    }
                    Some(BQMODEL_NAMESPACE) => {
                        ModelQualifier::from_element_name(local).map(Qualifier::Model)
                    }
                    _ => continue,
                };
                let Some(qualifier) = qualifier else {
                    self.warn(format!(
                        "unknown qualifier <{}> in annotation",
                        qualifier_element.name
                    ));
                    continue;
                };
                let mut resources = Vec::new();
                collect_resources(qualifier_element, &mut resources);
                if !resources.is_empty() {
                    terms.push(CvTerm {
                        qualifier,
                        resources,
                    });
                }
            }
        }
        terms
    }

    // endregion SBase

    // region Core

    fn read_model(&mut self, element: &XmlElement) -> SbmlModel {
        let mut model = SbmlModel {
            sbase: self.read_sbase(element, None),
            ..Default::default()
        };
        model.history = element
            .child_elements()
            .find(|c| c.local_name() == "annotation")
            .and_then(read_history);

        for list in element.child_elements() {
            let package = package_of(list);
            match (package.as_deref(), list.local_name()) {
                (Some("core"), "listOfUnitDefinitions") => {
                    for child in children_named(list, "unitDefinition") {
                        let unit_definition = self.read_unit_definition(child);
                        model.unit_definitions.push(unit_definition);
                    }
                }
                (Some("core"), "listOfCompartments") => {
                    for child in children_named(list, "compartment") {
                        let compartment = Compartment {
                            sbase: self.read_sbase(child, None),
                            constant: self.core_bool(child, "constant"),
                        };
                        model.compartments.push(compartment);
                    }
                }
                (Some("core"), "listOfSpecies") => {
                    for child in children_named(list, "species") {
                        let species = self.read_species(child);
                        model.species.push(species);
                    }
                }
                (Some("core"), "listOfParameters") => {
                    for child in children_named(list, "parameter") {
                        let parameter = Parameter {
                            sbase: self.read_sbase(child, None),
                            value: self.core_double(child, "value"),
                            constant: self.core_bool(child, "constant"),
                            units: child.unprefixed_attribute("units").map(str::to_string),
                        };
                        model.parameters.push(parameter);
                    }
                }
                (Some("core"), "listOfReactions") => {
                    for child in children_named(list, "reaction") {
                        let reaction = self.read_reaction(child);
                        model.reactions.push(reaction);
                    }
                }
                (Some("fbc"), "listOfGeneProducts") => {
                    let gene_products = children_named(list, "geneProduct")
                        .map(|child| GeneProduct {
                            sbase: self.read_sbase(child, Some("fbc")),
                            label: package_element_attribute(child, "fbc", "label")
                                .map(str::to_string),
                        })
                        .collect();
                    model.fbc_mut().gene_products = gene_products;
                }
                (Some("fbc"), "listOfObjectives") => {
                    let objectives = self.read_objectives(list);
                    model.fbc_mut().objectives = Some(objectives);
                }
                (Some("fbc"), "listOfFluxBounds") => {
                    let flux_bounds = children_named(list, "fluxBound")
                        .map(|child| FluxBound {
                            sbase: self.read_sbase(child, Some("fbc")),
                            reaction: package_element_attribute(child, "fbc", "reaction")
                                .map(str::to_string),
                            operation: self.package_enum(child, "fbc", "operation"),
                            value: self.package_double(child, "fbc", "value"),
                        })
                        .collect();
                    model.fbc_mut().flux_bounds = flux_bounds;
                }
                (Some("groups"), "listOfGroups") => {
                    let groups = children_named(list, "group")
                        .map(|child| self.read_group(child))
                        .collect();
                    model.groups_mut().groups = groups;
                }
                _ => {}
            }
        }

        let strict = self.convert(
            element,
            "fbc:strict",
            package_attribute(element, "fbc", "strict"),
            parse_bool,
        );
        if strict.is_some() {
            model.fbc_mut().strict = strict;
        }
        model
    }

    fn read_unit_definition(&mut self, element: &XmlElement) -> UnitDefinition {
        let sbase = self.read_sbase(element, None);
        let mut units = Vec::new();
        for list in children_named(element, "listOfUnits") {
            for unit in children_named(list, "unit") {
                let Some(kind) = unit.unprefixed_attribute("kind") else {
                    self.warn("<unit> without a kind".to_string());
                    continue;
                };
                units.push(Unit {
                    kind: kind.to_string(),
                    exponent: self.core_double(unit, "exponent").unwrap_or(1.),
                    scale: self
                        .convert(unit, "scale", unit.unprefixed_attribute("scale"), |s| {
                            s.parse().ok()
                        })
                        .unwrap_or(0),
                    multiplier: self.core_double(unit, "multiplier").unwrap_or(1.),
                });
            }
        }
        UnitDefinition { sbase, units }
    }

    fn read_species(&mut self, element: &XmlElement) -> Species {
        Species {
            sbase: self.read_sbase(element, None),
            compartment: element
                .unprefixed_attribute("compartment")
                .map(str::to_string),
            charge: self.convert(
                element,
                "charge",
                element.unprefixed_attribute("charge"),
                parse_integer,
            ),
            boundary_condition: self.core_bool(element, "boundaryCondition"),
            constant: self.core_bool(element, "constant"),
            has_only_substance_units: self.core_bool(element, "hasOnlySubstanceUnits"),
            fbc_charge: self.convert(
                element,
                "fbc:charge",
                package_attribute(element, "fbc", "charge"),
                parse_integer,
            ),
            fbc_chemical_formula: package_attribute(element, "fbc", "chemicalFormula")
                .map(str::to_string),
        }
    }

    fn read_reaction(&mut self, element: &XmlElement) -> Reaction {
        let mut reaction = Reaction {
            sbase: self.read_sbase(element, None),
            reversible: self.core_bool(element, "reversible"),
            fast: self.core_bool(element, "fast"),
            lower_flux_bound: package_attribute(element, "fbc", "lowerFluxBound")
                .map(str::to_string),
            upper_flux_bound: package_attribute(element, "fbc", "upperFluxBound")
                .map(str::to_string),
            ..Default::default()
        };
        for child in element.child_elements() {
            match (package_of(child).as_deref(), child.local_name()) {
                (Some("core"), "listOfReactants") => {
                    for reference in children_named(child, "speciesReference") {
                        let reference = self.read_species_reference(reference);
                        reaction.reactants.push(reference);
                    }
                }
                (Some("core"), "listOfProducts") => {
                    for reference in children_named(child, "speciesReference") {
                        let reference = self.read_species_reference(reference);
                        reaction.products.push(reference);
                    }
                }
                (Some("core"), "kineticLaw") => {
                    reaction.kinetic_law = Some(self.read_kinetic_law(child));
                }
                (Some("fbc"), "geneProductAssociation") => {
                    let association = child
                        .child_elements()
                        .next()
                        .and_then(|a| self.read_association(a));
                    reaction.gene_product_association = Some(GeneProductAssociation {
                        sbase: self.read_sbase(child, Some("fbc")),
                        association,
                    });
                }
                _ => {}
            }
        }
        reaction
    }

    fn read_species_reference(&mut self, element: &XmlElement) -> SpeciesReference {
        let mut stoichiometry = self.core_double(element, "stoichiometry");
        // Level 1 and 2 default the stoichiometry to one
        if stoichiometry.is_none() && self.level < 3 {
            stoichiometry = Some(1.);
        }
        SpeciesReference {
            sbase: self.read_sbase(element, None),
            species: element.unprefixed_attribute("species").map(str::to_string),
            stoichiometry,
            constant: self.core_bool(element, "constant"),
        }
    }

    fn read_kinetic_law(&mut self, element: &XmlElement) -> KineticLaw {
        let mut kinetic_law = KineticLaw {
            sbase: self.read_sbase(element, None),
            parameters: Vec::new(),
        };
        for list in element.child_elements() {
            let item = match list.local_name() {
                "listOfParameters" => "parameter",
                "listOfLocalParameters" => "localParameter",
                _ => continue,
            };
            for parameter in children_named(list, item) {
                let parameter = LocalParameter {
                    sbase: self.read_sbase(parameter, None),
                    value: self.core_double(parameter, "value"),
                };
                kinetic_law.parameters.push(parameter);
            }
        }
        kinetic_law
    }

    // endregion Core

    // region Packages

    fn read_association(&mut self, element: &XmlElement) -> Option<Association> {
        match element.local_name() {
            "geneProductRef" => match package_element_attribute(element, "fbc", "geneProduct") {
                Some(id) => Some(Association::GeneProductRef(id.to_string())),
                None => {
                    self.warn("<fbc:geneProductRef> without a geneProduct".to_string());
                    None
                }
            },
            local @ ("and" | "or") => {
                let children: Vec<Association> = element
                    .child_elements()
                    .filter_map(|c| self.read_association(c))
                    .collect();
                if children.is_empty() {
                    self.warn(format!("<{}> without operands", element.name));
                    return None;
                }
                Some(if local == "and" {
                    Association::And(children)
                } else {
                    Association::Or(children)
                })
            }
            _ => {
                self.warn(format!(
                    "unexpected <{}> in a gene product association",
                    element.name
                ));
                None
            }
        }
    }

    fn read_objectives(&mut self, list: &XmlElement) -> ListOfObjectives {
        let mut objectives = ListOfObjectives {
            active_objective: package_element_attribute(list, "fbc", "activeObjective")
                .map(str::to_string),
            objectives: Vec::new(),
        };
        for element in children_named(list, "objective") {
            let mut objective = Objective {
                sbase: self.read_sbase(element, Some("fbc")),
                objective_type: self.package_enum(element, "fbc", "type"),
                flux_objectives: Vec::new(),
            };
            for flux_list in children_named(element, "listOfFluxObjectives") {
                for flux in children_named(flux_list, "fluxObjective") {
                    let flux_objective = FluxObjective {
                        sbase: self.read_sbase(flux, Some("fbc")),
                        reaction: package_element_attribute(flux, "fbc", "reaction")
                            .map(str::to_string),
                        coefficient: self.package_double(flux, "fbc", "coefficient"),
                    };
                    objective.flux_objectives.push(flux_objective);
                }
            }
            objectives.objectives.push(objective);
        }
        objectives
    }

    fn read_group(&mut self, element: &XmlElement) -> Group {
        let mut group = Group {
            sbase: self.read_sbase(element, Some("groups")),
            kind: self.package_enum(element, "groups", "kind"),
            members: Vec::new(),
        };
        for list in children_named(element, "listOfMembers") {
            for member in children_named(list, "member") {
                let member = Member {
                    sbase: self.read_sbase(member, Some("groups")),
                    id_ref: package_element_attribute(member, "groups", "idRef")
                        .map(str::to_string),
                    meta_id_ref: package_element_attribute(member, "groups", "metaIdRef")
                        .map(str::to_string),
                };
                group.members.push(member);
            }
        }
        group
    }

    // endregion Packages
}

/// `"core"` for SBML core elements (or elements without a namespace), the package name for
/// package elements, `None` for anything else
fn package_of(element: &XmlElement) -> Option<String> {
    match element.namespace.as_deref() {
        None => Some("core".to_string()),
        Some(ns) if is_core_namespace(ns) => Some("core".to_string()),
        Some(ns) => parse_package_namespace(ns).map(|(package, _)| package),
    }
}

fn children_named<'a>(
    element: &'a XmlElement,
    local: &'a str,
) -> impl Iterator<Item = &'a XmlElement> + 'a {
    element
        .child_elements()
        .filter(move |c| c.local_name() == local)
}

/// Prefixed attribute in the namespace of `package`
fn package_attribute<'a>(element: &'a XmlElement, package: &str, name: &str) -> Option<&'a str> {
    element.namespaced_attribute(name, |ns| {
        parse_package_namespace(ns).is_some_and(|(p, _)| p == package)
    })
}

/// Attribute of a package element, some writers leave these unprefixed
fn package_element_attribute<'a>(
    element: &'a XmlElement,
    package: &str,
    name: &str,
) -> Option<&'a str> {
    package_attribute(element, package, name).or_else(|| element.unprefixed_attribute(name))
}

fn required_number(root: &XmlElement, attribute: &str) -> Result<u32, DocumentError> {
    let value = root.unprefixed_attribute(attribute).ok_or_else(|| {
        DocumentError::NotSbml(format!("<sbml> has no {attribute} attribute"))
    })?;
    value.trim().parse().map_err(|_| DocumentError::InvalidValue {
        attribute: attribute.to_string(),
        value: value.to_string(),
    })
}

fn rdf_descriptions(annotation: &XmlElement) -> impl Iterator<Item = &XmlElement> {
    annotation
        .child_elements()
        .filter(|e| e.local_name() == "RDF" && e.namespace.as_deref() == Some(RDF_NAMESPACE))
        .flat_map(|rdf| rdf.child_elements())
        .filter(|e| e.local_name() == "Description")
}

fn collect_resources(element: &XmlElement, resources: &mut Vec<String>) {
    if let Some(resource) = element.namespaced_attribute("resource", |ns| ns == RDF_NAMESPACE) {
        resources.push(resource.to_string());
    }
    for child in element.child_elements() {
        collect_resources(child, resources);
    }
}

fn find_descendant<'a>(element: &'a XmlElement, names: &[&str]) -> Option<&'a XmlElement> {
    for child in element.child_elements() {
        if names.contains(&child.local_name()) {
            return Some(child);
        }
        if let Some(found) = find_descendant(child, names) {
            return Some(found);
        }
    }
    None
}

fn descendant_text(element: &XmlElement, names: &[&str]) -> Option<String> {
    find_descendant(element, names)
        .map(|e| e.text().trim().to_string())
        .filter(|t| !t.is_empty())
}

fn read_history(annotation: &XmlElement) -> Option<ModelHistory> {
    let mut history = ModelHistory::default();
    for description in rdf_descriptions(annotation) {
        for child in description.child_elements().filter(|c| {
            matches!(c.namespace.as_deref(), Some(DCTERMS_NAMESPACE | DC_NAMESPACE))
        }) {
            match child.local_name() {
                "creator" => {
                    let entries: Vec<&XmlElement> = child
                        .child_elements()
                        .flat_map(|bag| bag.child_elements())
                        .filter(|li| li.local_name() == "li")
                        .collect();
                    for entry in entries {
                        history.creators.push(read_creator(entry));
                    }
                }
                "created" => history.created = w3cdtf(child),
                _ => {}
            }
        }
    }
    (!history.is_empty()).then_some(history)
}

fn read_creator(entry: &XmlElement) -> ModelCreator {
    ModelCreator {
        family_name: descendant_text(entry, &["Family", "family-name"]),
        given_name: descendant_text(entry, &["Given", "given-name"]),
        organisation: descendant_text(entry, &["Orgname", "organization-name"]),
        email: descendant_text(entry, &["EMAIL", "hasEmail"]),
    }
}

fn w3cdtf(element: &XmlElement) -> Option<String> {
    descendant_text(element, &["W3CDTF"]).or_else(|| {
        let text = element.text().trim().to_string();
        (!text.is_empty()).then_some(text)
    })
}

fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

/// XML Schema doubles, which spell infinity `INF`
fn parse_double(value: &str) -> Option<f64> {
    match value {
        "INF" | "+INF" => Some(f64::INFINITY),
        "-INF" => Some(f64::NEG_INFINITY),
        "NaN" => Some(f64::NAN),
        other => other.parse().ok(),
    }
}

fn parse_integer(value: &str) -> Option<i32> {
    value.parse().ok()
}
