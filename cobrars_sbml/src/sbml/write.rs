//! Serialization of the typed SBML tree to XML
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::sbml::document::*;
use crate::sbml::xml::{XmlElement, XmlNode};
use crate::sbml::{
    core_namespace, package_namespace, DocumentError, BQBIOL_NAMESPACE, BQMODEL_NAMESPACE,
    DCTERMS_NAMESPACE, DC_NAMESPACE, RDF_NAMESPACE, VCARD_NAMESPACE,
};

impl SbmlDocument {
    /// Build the XML element tree of this document
    pub fn to_xml_element(&self) -> Result<XmlElement, DocumentError> {
        let mut packages = self.packages.clone();
        if let Some(model) = &self.model {
            if model.fbc.is_some() && !packages.contains_key("fbc") {
                packages.insert(
                    "fbc".to_string(),
                    SbmlPackage {
                        version: 2,
                        required: false,
                    },
                );
            }
            if model.groups.is_some() && !packages.contains_key("groups") {
                packages.insert(
                    "groups".to_string(),
                    SbmlPackage {
                        version: 1,
                        required: false,
                    },
                );
            }
        }

        let mut root = XmlElement::new("sbml")
            .with_attribute("xmlns", core_namespace(self.level, self.version));
        for (name, package) in &packages {
            root.set_attribute(
                &format!("xmlns:{name}"),
                package_namespace(name, package.version),
            );
        }
        root.set_attribute("level", self.level.to_string());
        root.set_attribute("version", self.version.to_string());
        for (name, package) in &packages {
            root.set_attribute(&format!("{name}:required"), package.required.to_string());
        }
        write_sbase(&mut root, &self.sbase, None, None)?;
        if let Some(model) = &self.model {
            root.push_element(write_model(model, self.level)?);
        }
        Ok(root)
    }

    /// Serialize the document to an indented XML string
    pub fn to_xml_string(&self) -> Result<String, DocumentError> {
        Ok(self.to_xml_element()?.to_xml_document()?)
    }

    /// Serialize the document into `writer`
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<(), DocumentError> {
        writer.write_all(self.to_xml_string()?.as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    /// Serialize the document to a file, replacing its contents
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), DocumentError> {
        let file = File::create(path)?;
        self.write_to(BufWriter::new(file))
    }
}

/// XML Schema representation of a double
fn format_double(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value == f64::INFINITY {
        "INF".to_string()
    } else if value == f64::NEG_INFINITY {
        "-INF".to_string()
    } else {
        value.to_string()
    }
}

fn qualified(package: Option<&str>, name: &str) -> String {
    match package {
        Some(package) => format!("{package}:{name}"),
        None => name.to_string(),
    }
}

fn write_sbase(
    element: &mut XmlElement,
    sbase: &SBase,
    package: Option<&str>,
    history: Option<&ModelHistory>,
) -> Result<(), DocumentError> {
    let history = history.filter(|h| !h.is_empty());
    let needs_annotation = !sbase.cv_terms.is_empty() || history.is_some();
    let meta_id = sbase.meta_id.clone().or_else(|| {
        needs_annotation
            .then(|| sbase.id.as_ref().map(|id| format!("meta_{id}")))
            .flatten()
    });

    element.set_optional_attribute("metaid", meta_id.as_ref());
    element.set_optional_attribute("sboTerm", sbase.sbo_term.as_ref());
    element.set_optional_attribute(&qualified(package, "id"), sbase.id.as_ref());
    element.set_optional_attribute(&qualified(package, "name"), sbase.name.as_ref());

    if let Some(notes) = sbase.notes_string() {
        let mut notes_element = XmlElement::new("notes");
        notes_element.children = XmlElement::parse_fragment(notes, Vec::new())?
            .into_iter()
            .filter(|n| matches!(n, XmlNode::Element(_)))
            .collect();
        element.push_element(notes_element);
    }
    if needs_annotation {
        element.push_element(write_annotation(
            meta_id.as_deref().unwrap_or_default(),
            &sbase.cv_terms,
            history,
        ));
    }
    Ok(())
}

fn write_annotation(meta_id: &str, cv_terms: &[CvTerm], history: Option<&ModelHistory>) -> XmlElement {
    let mut description =
        XmlElement::new("rdf:Description").with_attribute("rdf:about", format!("#{meta_id}"));
    if let Some(history) = history {
        write_history(&mut description, history);
    }
    for term in cv_terms {
        let name = match term.qualifier {
            Qualifier::Biological(q) => format!("bqbiol:{}", q.element_name()),
            Qualifier::Model(q) => format!("bqmodel:{}", q.element_name()),
        };
        let mut bag = XmlElement::new("rdf:Bag");
        for resource in &term.resources {
            bag.push_element(XmlElement::new("rdf:li").with_attribute("rdf:resource", resource));
        }
        let mut qualifier = XmlElement::new(&name);
        qualifier.push_element(bag);
        description.push_element(qualifier);
    }

    let mut rdf = XmlElement::new("rdf:RDF")
        .with_attribute("xmlns:rdf", RDF_NAMESPACE)
        .with_attribute("xmlns:dc", DC_NAMESPACE)
        .with_attribute("xmlns:dcterms", DCTERMS_NAMESPACE)
        .with_attribute("xmlns:vCard", VCARD_NAMESPACE)
        .with_attribute("xmlns:bqbiol", BQBIOL_NAMESPACE)
        .with_attribute("xmlns:bqmodel", BQMODEL_NAMESPACE);
    rdf.push_element(description);
    let mut annotation = XmlElement::new("annotation");
    annotation.push_element(rdf);
    annotation
}

fn text_element(name: &str, text: &str) -> XmlElement {
    let mut element = XmlElement::new(name);
    element.push_text(text);
    element
}

fn resource_element(name: &str) -> XmlElement {
    XmlElement::new(name).with_attribute("rdf:parseType", "Resource")
}

fn write_history(description: &mut XmlElement, history: &ModelHistory) {
    if !history.creators.is_empty() {
        let mut bag = XmlElement::new("rdf:Bag");
        for creator in &history.creators {
            let mut entry = resource_element("rdf:li");
            if creator.family_name.is_some() || creator.given_name.is_some() {
                let mut name = resource_element("vCard:N");
                if let Some(family) = &creator.family_name {
                    name.push_element(text_element("vCard:Family", family));
                }
                if let Some(given) = &creator.given_name {
                    name.push_element(text_element("vCard:Given", given));
                }
                entry.push_element(name);
            }
            if let Some(email) = &creator.email {
                entry.push_element(text_element("vCard:EMAIL", email));
            }
            if let Some(organisation) = &creator.organisation {
                let mut org = resource_element("vCard:ORG");
                org.push_element(text_element("vCard:Orgname", organisation));
                entry.push_element(org);
            }
            bag.push_element(entry);
        }
        let mut creator = XmlElement::new("dcterms:creator");
        creator.push_element(bag);
        description.push_element(creator);
    }
    if let Some(created) = &history.created {
        let mut element = resource_element("dcterms:created");
        element.push_element(text_element("dcterms:W3CDTF", created));
        description.push_element(element);
    }
}

fn write_list<T, F>(name: &str, items: &[T], mut write_item: F) -> Result<Option<XmlElement>, DocumentError>
where
    F: FnMut(&T) -> Result<XmlElement, DocumentError>,
{
    if items.is_empty() {
        return Ok(None);
    }
    let mut list = XmlElement::new(name);
    for item in items {
        list.push_element(write_item(item)?);
    }
    Ok(Some(list))
}

fn write_model(model: &SbmlModel, level: u32) -> Result<XmlElement, DocumentError> {
    let mut element = XmlElement::new("model");
    write_sbase(&mut element, &model.sbase, None, model.history.as_ref())?;
    if let Some(strict) = model.fbc.as_ref().and_then(|f| f.strict) {
        element.set_attribute("fbc:strict", strict.to_string());
    }

    let lists = [
        write_list("listOfUnitDefinitions", &model.unit_definitions, write_unit_definition)?,
        write_list("listOfCompartments", &model.compartments, |c| {
            let mut e = XmlElement::new("compartment");
            write_sbase(&mut e, &c.sbase, None, None)?;
            e.set_optional_attribute("constant", c.constant);
            Ok(e)
        })?,
        write_list("listOfSpecies", &model.species, |s| write_species(s, level))?,
        write_list("listOfParameters", &model.parameters, |p| {
            let mut e = XmlElement::new("parameter");
            write_sbase(&mut e, &p.sbase, None, None)?;
            e.set_optional_attribute("value", p.value.map(format_double));
            e.set_optional_attribute("units", p.units.as_ref());
            e.set_optional_attribute("constant", p.constant);
            Ok(e)
        })?,
        write_list("listOfReactions", &model.reactions, |r| write_reaction(r, level))?,
    ];
    for list in lists.into_iter().flatten() {
        element.push_element(list);
    }

    if let Some(fbc) = &model.fbc {
        if let Some(objectives) = &fbc.objectives {
            element.push_element(write_objectives(objectives)?);
        }
        let gene_products = write_list("fbc:listOfGeneProducts", &fbc.gene_products, |g| {
            let mut e = XmlElement::new("fbc:geneProduct");
            write_sbase(&mut e, &g.sbase, Some("fbc"), None)?;
            e.set_optional_attribute("fbc:label", g.label.as_ref());
            Ok(e)
        })?;
        if let Some(list) = gene_products {
            element.push_element(list);
        }
    }

    if let Some(groups) = &model.groups {
        if let Some(list) = write_list("groups:listOfGroups", &groups.groups, write_group)? {
            element.push_element(list);
        }
    }
    Ok(element)
}

fn write_unit_definition(definition: &UnitDefinition) -> Result<XmlElement, DocumentError> {
    let mut element = XmlElement::new("unitDefinition");
    write_sbase(&mut element, &definition.sbase, None, None)?;
    let units = write_list("listOfUnits", &definition.units, |u| {
        Ok(XmlElement::new("unit")
            .with_attribute("kind", &u.kind)
            .with_attribute("exponent", format_double(u.exponent))
            .with_attribute("scale", u.scale.to_string())
            .with_attribute("multiplier", format_double(u.multiplier)))
    })?;
    if let Some(units) = units {
        element.push_element(units);
    }
    Ok(element)
}

fn write_species(species: &Species, level: u32) -> Result<XmlElement, DocumentError> {
    let mut element = XmlElement::new("species");
    write_sbase(&mut element, &species.sbase, None, None)?;
    element.set_optional_attribute("compartment", species.compartment.as_ref());
    element.set_optional_attribute(
        "hasOnlySubstanceUnits",
        species.has_only_substance_units,
    );
    element.set_optional_attribute("boundaryCondition", species.boundary_condition);
    element.set_optional_attribute("constant", species.constant);
    if level < 3 {
        element.set_optional_attribute("charge", species.charge);
    }
    element.set_optional_attribute("fbc:charge", species.fbc_charge);
    element.set_optional_attribute("fbc:chemicalFormula", species.fbc_chemical_formula.as_ref());
    Ok(element)
}

fn write_species_reference(reference: &SpeciesReference) -> Result<XmlElement, DocumentError> {
    let mut element = XmlElement::new("speciesReference");
    write_sbase(&mut element, &reference.sbase, None, None)?;
    element.set_optional_attribute("species", reference.species.as_ref());
    element.set_optional_attribute("stoichiometry", reference.stoichiometry.map(format_double));
    element.set_optional_attribute("constant", reference.constant);
    Ok(element)
}

fn write_reaction(reaction: &Reaction, level: u32) -> Result<XmlElement, DocumentError> {
    let mut element = XmlElement::new("reaction");
    write_sbase(&mut element, &reaction.sbase, None, None)?;
    element.set_optional_attribute("reversible", reaction.reversible);
    element.set_optional_attribute("fast", reaction.fast);
    element.set_optional_attribute("fbc:lowerFluxBound", reaction.lower_flux_bound.as_ref());
    element.set_optional_attribute("fbc:upperFluxBound", reaction.upper_flux_bound.as_ref());

    let lists = [
        write_list("listOfReactants", &reaction.reactants, write_species_reference)?,
        write_list("listOfProducts", &reaction.products, write_species_reference)?,
    ];
    for list in lists.into_iter().flatten() {
        element.push_element(list);
    }
    if let Some(kinetic_law) = &reaction.kinetic_law {
        let mut law = XmlElement::new("kineticLaw");
        write_sbase(&mut law, &kinetic_law.sbase, None, None)?;
        let (list_name, item_name) = if level < 3 {
            ("listOfParameters", "parameter")
        } else {
            ("listOfLocalParameters", "localParameter")
        };
        let parameters = write_list(list_name, &kinetic_law.parameters, |p| {
            let mut e = XmlElement::new(item_name);
            write_sbase(&mut e, &p.sbase, None, None)?;
            e.set_optional_attribute("value", p.value.map(format_double));
            Ok(e)
        })?;
        if let Some(parameters) = parameters {
            law.push_element(parameters);
        }
        element.push_element(law);
    }
    if let Some(gpa) = &reaction.gene_product_association {
        let mut association = XmlElement::new("fbc:geneProductAssociation");
        write_sbase(&mut association, &gpa.sbase, Some("fbc"), None)?;
        if let Some(tree) = &gpa.association {
            association.push_element(write_association(tree));
        }
        element.push_element(association);
    }
    Ok(element)
}

fn write_association(association: &Association) -> XmlElement {
    match association {
        Association::GeneProductRef(id) => {
            XmlElement::new("fbc:geneProductRef").with_attribute("fbc:geneProduct", id)
        }
        Association::And(children) | Association::Or(children) => {
            let name = if matches!(association, Association::And(_)) {
                "fbc:and"
            } else {
                "fbc:or"
            };
            let mut element = XmlElement::new(name);
            for child in children {
                element.push_element(write_association(child));
            }
            element
        }
    }
}

fn write_objectives(objectives: &ListOfObjectives) -> Result<XmlElement, DocumentError> {
    let mut list = XmlElement::new("fbc:listOfObjectives");
    list.set_optional_attribute("fbc:activeObjective", objectives.active_objective.as_ref());
    for objective in &objectives.objectives {
        let mut element = XmlElement::new("fbc:objective");
        write_sbase(&mut element, &objective.sbase, Some("fbc"), None)?;
        element.set_optional_attribute("fbc:type", objective.objective_type.map(|t| t.as_str()));
        let fluxes = write_list("fbc:listOfFluxObjectives", &objective.flux_objectives, |f| {
            let mut e = XmlElement::new("fbc:fluxObjective");
            write_sbase(&mut e, &f.sbase, Some("fbc"), None)?;
            e.set_optional_attribute("fbc:reaction", f.reaction.as_ref());
            e.set_optional_attribute("fbc:coefficient", f.coefficient.map(format_double));
            Ok(e)
        })?;
        if let Some(fluxes) = fluxes {
            element.push_element(fluxes);
        }
        list.push_element(element);
    }
    Ok(list)
}

fn write_group(group: &Group) -> Result<XmlElement, DocumentError> {
    let mut element = XmlElement::new("groups:group");
    write_sbase(&mut element, &group.sbase, Some("groups"), None)?;
    element.set_optional_attribute("groups:kind", group.kind.map(|k| k.as_str()));
    let members = write_list("groups:listOfMembers", &group.members, |m| {
        let mut e = XmlElement::new("groups:member");
        write_sbase(&mut e, &m.sbase, Some("groups"), None)?;
        e.set_optional_attribute("groups:idRef", m.id_ref.as_ref());
        e.set_optional_attribute("groups:metaIdRef", m.meta_id_ref.as_ref());
        Ok(e)
    })?;
    if let Some(members) = members {
        element.push_element(members);
    }
    Ok(element)
}
