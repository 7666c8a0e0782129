//! Typed SBML object tree
//!
//! Only the parts of SBML core, FBC and Groups that constraint based models use are
//! represented. Attributes that were absent in a document are `None`, attributes that could
//! not be interpreted are also `None` and leave a message in [`SbmlDocument::warnings`].
use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use indexmap::IndexMap;

use crate::sbml::xml::{XmlElement, XmlNode};
use crate::sbml::DocumentError;

// region SBase

/// Attributes and children shared by every SBML component
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SBase {
    pub id: Option<String>,
    pub meta_id: Option<String>,
    pub name: Option<String>,
    pub sbo_term: Option<String>,
    pub(crate) notes: Option<String>,
    pub cv_terms: Vec<CvTerm>,
}

impl SBase {
    /// SBase with only an id
    pub fn with_id(id: &str) -> Self {
        SBase {
            id: Some(id.to_string()),
            ..Default::default()
        }
    }

    /// The XML content of the notes element, without the enclosing `<notes>` tag
    pub fn notes_string(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// Replace the notes of this component
    ///
    /// The notes must be well formed XML containing at least one element, mirroring the
    /// requirement that SBML notes hold XHTML content.
    pub fn set_notes(&mut self, notes: &str) -> Result<(), DocumentError> {
        let nodes = XmlElement::parse_fragment(notes, Vec::new())
            .map_err(|e| DocumentError::InvalidNotes(e.to_string()))?;
        if !nodes.iter().any(|n| matches!(n, XmlNode::Element(_))) {
            return Err(DocumentError::InvalidNotes(
                "notes must contain at least one XHTML element".to_string(),
            ));
        }
        self.notes = Some(notes.to_string());
        Ok(())
    }

    /// Set the SBO term, which must have the form `SBO:` followed by seven digits
    pub fn set_sbo_term(&mut self, term: &str) -> Result<(), DocumentError> {
        if !is_sbo_term(term) {
            return Err(DocumentError::InvalidSboTerm(term.to_string()));
        }
        self.sbo_term = Some(term.to_string());
        Ok(())
    }

    /// Attach a controlled vocabulary term, which must carry at least one resource
    pub fn add_cv_term(&mut self, term: CvTerm) -> Result<(), DocumentError> {
        if term.resources.is_empty() {
            return Err(DocumentError::EmptyCvTerm);
        }
        self.cv_terms.push(term);
        Ok(())
    }
}

/// Whether `term` has the form `SBO:0000000`
pub fn is_sbo_term(term: &str) -> bool {
    term.strip_prefix("SBO:")
        .is_some_and(|digits| digits.len() == 7 && digits.chars().all(|c| c.is_ascii_digit()))
}

// endregion SBase

// region CV terms

/// Qualifier of a controlled vocabulary term
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Qualifier {
    Biological(BiologicalQualifier),
    Model(ModelQualifier),
}

/// BioModels biology qualifiers
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BiologicalQualifier {
    Is,
    HasPart,
    IsPartOf,
    IsVersionOf,
    HasVersion,
    IsHomologTo,
    IsDescribedBy,
    IsEncodedBy,
    Encodes,
    OccursIn,
    HasProperty,
    IsPropertyOf,
    HasTaxon,
    Unknown,
}

impl BiologicalQualifier {
    /// Local name of the `bqbiol:` element
    pub fn element_name(&self) -> &'static str {
        match self {
            BiologicalQualifier::Is => "is",
            BiologicalQualifier::HasPart => "hasPart",
            BiologicalQualifier::IsPartOf => "isPartOf",
            BiologicalQualifier::IsVersionOf => "isVersionOf",
            BiologicalQualifier::HasVersion => "hasVersion",
            BiologicalQualifier::IsHomologTo => "isHomologTo",
            BiologicalQualifier::IsDescribedBy => "isDescribedBy",
            BiologicalQualifier::IsEncodedBy => "isEncodedBy",
            BiologicalQualifier::Encodes => "encodes",
            BiologicalQualifier::OccursIn => "occursIn",
            BiologicalQualifier::HasProperty => "hasProperty",
            BiologicalQualifier::IsPropertyOf => "isPropertyOf",
            BiologicalQualifier::HasTaxon => "hasTaxon",
            BiologicalQualifier::Unknown => "unknown",
        }
    }

    pub fn from_element_name(name: &str) -> Option<Self> {
        Some(match name {
            "is" => BiologicalQualifier::Is,
            "hasPart" => BiologicalQualifier::HasPart,
            "isPartOf" => BiologicalQualifier::IsPartOf,
            "isVersionOf" => BiologicalQualifier::IsVersionOf,
            "hasVersion" => BiologicalQualifier::HasVersion,
            "isHomologTo" => BiologicalQualifier::IsHomologTo,
            "isDescribedBy" => BiologicalQualifier::IsDescribedBy,
            "isEncodedBy" => BiologicalQualifier::IsEncodedBy,
            "encodes" => BiologicalQualifier::Encodes,
            "occursIn" => BiologicalQualifier::OccursIn,
            "hasProperty" => BiologicalQualifier::HasProperty,
            "isPropertyOf" => BiologicalQualifier::IsPropertyOf,
            "hasTaxon" => BiologicalQualifier::HasTaxon,
            "unknown" => BiologicalQualifier::Unknown,
            _ => return None,
        })
    }
}

/// BioModels model qualifiers
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ModelQualifier {
    Is,
    IsDescribedBy,
    IsDerivedFrom,
    IsInstanceOf,
    HasInstance,
    Unknown,
}

impl ModelQualifier {
    /// Local name of the `bqmodel:` element
    pub fn element_name(&self) -> &'static str {
        match self {
            ModelQualifier::Is => "is",
            ModelQualifier::IsDescribedBy => "isDescribedBy",
            ModelQualifier::IsDerivedFrom => "isDerivedFrom",
            ModelQualifier::IsInstanceOf => "isInstanceOf",
            ModelQualifier::HasInstance => "hasInstance",
            ModelQualifier::Unknown => "unknown",
        }
    }

    pub fn from_element_name(name: &str) -> Option<Self> {
        Some(match name {
            "is" => ModelQualifier::Is,
            "isDescribedBy" => ModelQualifier::IsDescribedBy,
            "isDerivedFrom" => ModelQualifier::IsDerivedFrom,
            "isInstanceOf" => ModelQualifier::IsInstanceOf,
            "hasInstance" => ModelQualifier::HasInstance,
            "unknown" => ModelQualifier::Unknown,
            _ => return None,
        })
    }
}

/// Controlled vocabulary term: a qualifier and the resources it relates the component to
#[derive(Clone, Debug, PartialEq)]
pub struct CvTerm {
    pub qualifier: Qualifier,
    pub resources: Vec<String>,
}

impl CvTerm {
    pub fn new(qualifier: Qualifier, resource: &str) -> Self {
        CvTerm {
            qualifier,
            resources: vec![resource.to_string()],
        }
    }
}

/// Creator entry of a model history
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ModelCreator {
    pub family_name: Option<String>,
    pub given_name: Option<String>,
    pub organisation: Option<String>,
    pub email: Option<String>,
}

/// Dublin Core provenance block of a model annotation
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ModelHistory {
    pub creators: Vec<ModelCreator>,
    /// W3CDTF creation date
    pub created: Option<String>,
}

impl ModelHistory {
    pub fn is_empty(&self) -> bool {
        self.creators.is_empty() && self.created.is_none()
    }
}

// endregion CV terms

// region Document

/// A package enabled on a document
#[derive(Clone, Debug, PartialEq)]
pub struct SbmlPackage {
    pub version: u32,
    pub required: bool,
}

/// Root of an SBML document
#[derive(Clone, Debug, PartialEq)]
pub struct SbmlDocument {
    pub level: u32,
    pub version: u32,
    pub sbase: SBase,
    /// Enabled packages keyed by their short name (e.g. `fbc`)
    pub packages: IndexMap<String, SbmlPackage>,
    pub model: Option<SbmlModel>,
    /// Problems found while interpreting the XML
    pub warnings: Vec<String>,
}

impl Default for SbmlDocument {
    fn default() -> Self {
        SbmlDocument::new(3, 1)
    }
}

impl SbmlDocument {
    pub fn new(level: u32, version: u32) -> Self {
        SbmlDocument {
            level,
            version,
            sbase: SBase::default(),
            packages: IndexMap::new(),
            model: None,
            warnings: Vec::new(),
        }
    }

    /// Enable (or update) a package
    pub fn enable_package(&mut self, name: &str, version: u32, required: bool) {
        self.packages
            .insert(name.to_string(), SbmlPackage { version, required });
    }

    pub fn package_version(&self, name: &str) -> Option<u32> {
        self.packages.get(name).map(|p| p.version)
    }

    pub fn is_package_enabled(&self, name: &str) -> bool {
        self.packages.contains_key(name)
    }

    /// Create a new empty model, replacing any existing one
    pub fn create_model(&mut self, id: &str) -> &mut SbmlModel {
        self.model.insert(SbmlModel {
            sbase: SBase::with_id(id),
            ..Default::default()
        })
    }

    /// Convert an FBC version 1 document to the FBC version 2 layout
    ///
    /// Flux bounds are turned into constant parameters `<reaction>_lb`/`<reaction>_ub` which
    /// the reactions then reference. Documents not using FBC version 1 are left unchanged.
    pub fn convert_fbc_v1_to_v2(&mut self) -> Result<(), DocumentError> {
        if self.package_version("fbc") != Some(1) {
            return Ok(());
        }
        if let Some(model) = self.model.as_mut() {
            let bounds = model
                .fbc
                .as_mut()
                .map(|fbc| std::mem::take(&mut fbc.flux_bounds))
                .unwrap_or_default();
            for bound in bounds {
                let reaction_id = bound.reaction.ok_or_else(|| {
                    DocumentError::FbcConversion("flux bound without a reaction".to_string())
                })?;
                let value = bound.value.ok_or_else(|| {
                    DocumentError::FbcConversion(format!(
                        "flux bound of reaction '{reaction_id}' has no value"
                    ))
                })?;
                let operation = bound.operation.ok_or_else(|| {
                    DocumentError::FbcConversion(format!(
                        "flux bound of reaction '{reaction_id}' has no operation"
                    ))
                })?;
                let reaction = model
                    .reactions
                    .iter_mut()
                    .find(|r| r.sbase.id.as_deref() == Some(reaction_id.as_str()))
                    .ok_or_else(|| {
                        DocumentError::FbcConversion(format!(
                            "flux bound references unknown reaction '{reaction_id}'"
                        ))
                    })?;
                let mut new_parameters = Vec::new();
                if matches!(
                    operation,
                    FluxBoundOperation::GreaterEqual | FluxBoundOperation::Equal
                ) {
                    let id = format!("{reaction_id}_lb");
                    reaction.lower_flux_bound = Some(id.clone());
                    new_parameters.push(id);
                }
                if matches!(
                    operation,
                    FluxBoundOperation::LessEqual | FluxBoundOperation::Equal
                ) {
                    let id = format!("{reaction_id}_ub");
                    reaction.upper_flux_bound = Some(id.clone());
                    new_parameters.push(id);
                }
                for id in new_parameters {
                    match model
                        .parameters
                        .iter_mut()
                        .find(|p| p.sbase.id.as_deref() == Some(id.as_str()))
                    {
                        Some(parameter) => parameter.value = Some(value),
                        None => model.parameters.push(Parameter {
                            sbase: SBase::with_id(&id),
                            value: Some(value),
                            constant: Some(true),
                            units: None,
                        }),
                    }
                }
            }
        }
        let required = self.packages.get("fbc").is_some_and(|p| p.required);
        self.enable_package("fbc", 2, required);
        Ok(())
    }
}

// endregion Document

// region Model

/// Kind of component an identifier refers to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Model,
    UnitDefinition,
    Compartment,
    Species,
    Parameter,
    Reaction,
    SpeciesReference,
    GeneProduct,
    Objective,
    Group,
}

impl Display for ElementKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ElementKind::Model => "model",
            ElementKind::UnitDefinition => "unitDefinition",
            ElementKind::Compartment => "compartment",
            ElementKind::Species => "species",
            ElementKind::Parameter => "parameter",
            ElementKind::Reaction => "reaction",
            ElementKind::SpeciesReference => "speciesReference",
            ElementKind::GeneProduct => "geneProduct",
            ElementKind::Objective => "objective",
            ElementKind::Group => "group",
        };
        write!(f, "{name}")
    }
}

/// Lookup of model components by id and by meta id, built once per model
#[derive(Debug, Default)]
pub struct ElementIndex<'a> {
    by_id: HashMap<&'a str, ElementKind>,
    by_meta_id: HashMap<&'a str, (ElementKind, Option<&'a str>)>,
}

impl<'a> ElementIndex<'a> {
    fn insert(&mut self, kind: ElementKind, sbase: &'a SBase) {
        if let Some(id) = sbase.id.as_deref() {
            self.by_id.entry(id).or_insert(kind);
        }
        if let Some(meta_id) = sbase.meta_id.as_deref() {
            self.by_meta_id
                .entry(meta_id)
                .or_insert((kind, sbase.id.as_deref()));
        }
    }

    /// Kind of the component with the given id
    pub fn kind_of(&self, id: &str) -> Option<ElementKind> {
        self.by_id.get(id).copied()
    }

    /// Kind and id of the component with the given meta id
    pub fn by_meta_id(&self, meta_id: &str) -> Option<(ElementKind, Option<&'a str>)> {
        self.by_meta_id.get(meta_id).copied()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SbmlModel {
    pub sbase: SBase,
    pub history: Option<ModelHistory>,
    pub unit_definitions: Vec<UnitDefinition>,
    pub compartments: Vec<Compartment>,
    pub species: Vec<Species>,
    pub parameters: Vec<Parameter>,
    pub reactions: Vec<Reaction>,
    pub fbc: Option<FbcModelPlugin>,
    pub groups: Option<GroupsModelPlugin>,
}

impl SbmlModel {
    pub fn parameter(&self, id: &str) -> Option<&Parameter> {
        self.parameters
            .iter()
            .find(|p| p.sbase.id.as_deref() == Some(id))
    }

    pub fn species_by_id(&self, id: &str) -> Option<&Species> {
        self.species.iter().find(|s| s.sbase.id.as_deref() == Some(id))
    }

    pub fn reaction(&self, id: &str) -> Option<&Reaction> {
        self.reactions
            .iter()
            .find(|r| r.sbase.id.as_deref() == Some(id))
    }

    /// FBC plugin of the model, created on first use
    pub fn fbc_mut(&mut self) -> &mut FbcModelPlugin {
        self.fbc.get_or_insert_with(FbcModelPlugin::default)
    }

    /// Groups plugin of the model, created on first use
    pub fn groups_mut(&mut self) -> &mut GroupsModelPlugin {
        self.groups.get_or_insert_with(GroupsModelPlugin::default)
    }

    /// Build the id and meta id index over every component of the model
    pub fn element_index(&self) -> ElementIndex<'_> {
        let mut index = ElementIndex::default();
        index.insert(ElementKind::Model, &self.sbase);
        for u in &self.unit_definitions {
            index.insert(ElementKind::UnitDefinition, &u.sbase);
        }
        for c in &self.compartments {
            index.insert(ElementKind::Compartment, &c.sbase);
        }
        for s in &self.species {
            index.insert(ElementKind::Species, &s.sbase);
        }
        for p in &self.parameters {
            index.insert(ElementKind::Parameter, &p.sbase);
        }
        for r in &self.reactions {
            index.insert(ElementKind::Reaction, &r.sbase);
            for sr in r.reactants.iter().chain(r.products.iter()) {
                index.insert(ElementKind::SpeciesReference, &sr.sbase);
            }
        }
        if let Some(fbc) = &self.fbc {
            for gp in &fbc.gene_products {
                index.insert(ElementKind::GeneProduct, &gp.sbase);
            }
            if let Some(objectives) = &fbc.objectives {
                for o in &objectives.objectives {
                    index.insert(ElementKind::Objective, &o.sbase);
                }
            }
        }
        if let Some(groups) = &self.groups {
            for g in &groups.groups {
                index.insert(ElementKind::Group, &g.sbase);
            }
        }
        index
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct UnitDefinition {
    pub sbase: SBase,
    pub units: Vec<Unit>,
}

/// A base unit scaled as `(multiplier * 10^scale * kind)^exponent`
#[derive(Clone, Debug, PartialEq)]
pub struct Unit {
    pub kind: String,
    pub exponent: f64,
    pub scale: i32,
    pub multiplier: f64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Compartment {
    pub sbase: SBase,
    pub constant: Option<bool>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Species {
    pub sbase: SBase,
    pub compartment: Option<String>,
    /// Inline `charge` attribute, only valid before SBML Level 3
    pub charge: Option<i32>,
    pub boundary_condition: Option<bool>,
    pub constant: Option<bool>,
    pub has_only_substance_units: Option<bool>,
    pub fbc_charge: Option<i32>,
    pub fbc_chemical_formula: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Parameter {
    pub sbase: SBase,
    pub value: Option<f64>,
    pub constant: Option<bool>,
    pub units: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Reaction {
    pub sbase: SBase,
    pub reversible: Option<bool>,
    pub fast: Option<bool>,
    pub reactants: Vec<SpeciesReference>,
    pub products: Vec<SpeciesReference>,
    pub kinetic_law: Option<KineticLaw>,
    pub lower_flux_bound: Option<String>,
    pub upper_flux_bound: Option<String>,
    pub gene_product_association: Option<GeneProductAssociation>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SpeciesReference {
    pub sbase: SBase,
    pub species: Option<String>,
    pub stoichiometry: Option<f64>,
    pub constant: Option<bool>,
}

/// Kinetic law of a reaction, only its parameters are kept
#[derive(Clone, Debug, Default, PartialEq)]
pub struct KineticLaw {
    pub sbase: SBase,
    /// Parameters from both `listOfParameters` and `listOfLocalParameters`
    pub parameters: Vec<LocalParameter>,
}

impl KineticLaw {
    pub fn parameter(&self, id: &str) -> Option<&LocalParameter> {
        self.parameters
            .iter()
            .find(|p| p.sbase.id.as_deref() == Some(id))
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct LocalParameter {
    pub sbase: SBase,
    pub value: Option<f64>,
}

// endregion Model

// region FBC

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FbcModelPlugin {
    pub strict: Option<bool>,
    pub gene_products: Vec<GeneProduct>,
    pub objectives: Option<ListOfObjectives>,
    /// Version 1 flux bounds, empty after conversion to version 2
    pub flux_bounds: Vec<FluxBound>,
}

impl FbcModelPlugin {
    pub fn gene_product(&self, id: &str) -> Option<&GeneProduct> {
        self.gene_products
            .iter()
            .find(|g| g.sbase.id.as_deref() == Some(id))
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct GeneProduct {
    pub sbase: SBase,
    pub label: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ListOfObjectives {
    pub active_objective: Option<String>,
    pub objectives: Vec<Objective>,
}

impl ListOfObjectives {
    pub fn objective(&self, id: &str) -> Option<&Objective> {
        self.objectives
            .iter()
            .find(|o| o.sbase.id.as_deref() == Some(id))
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Objective {
    pub sbase: SBase,
    pub objective_type: Option<ObjectiveType>,
    pub flux_objectives: Vec<FluxObjective>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObjectiveType {
    Maximize,
    Minimize,
}

impl ObjectiveType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectiveType::Maximize => "maximize",
            ObjectiveType::Minimize => "minimize",
        }
    }
}

impl FromStr for ObjectiveType {
    type Err = DocumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "maximize" => Ok(ObjectiveType::Maximize),
            "minimize" => Ok(ObjectiveType::Minimize),
            other => Err(DocumentError::InvalidValue {
                attribute: "fbc:type".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FluxObjective {
    pub sbase: SBase,
    pub reaction: Option<String>,
    pub coefficient: Option<f64>,
}

/// Version 1 flux bound
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FluxBound {
    pub sbase: SBase,
    pub reaction: Option<String>,
    pub operation: Option<FluxBoundOperation>,
    pub value: Option<f64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FluxBoundOperation {
    LessEqual,
    GreaterEqual,
    Equal,
}

impl FromStr for FluxBoundOperation {
    type Err = DocumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lessEqual" | "less" => Ok(FluxBoundOperation::LessEqual),
            "greaterEqual" | "greater" => Ok(FluxBoundOperation::GreaterEqual),
            "equal" => Ok(FluxBoundOperation::Equal),
            other => Err(DocumentError::InvalidValue {
                attribute: "fbc:operation".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct GeneProductAssociation {
    pub sbase: SBase,
    pub association: Option<Association>,
}

/// Boolean association over gene products
#[derive(Clone, Debug, PartialEq)]
pub enum Association {
    And(Vec<Association>),
    Or(Vec<Association>),
    GeneProductRef(String),
}

impl Association {
    /// Every referenced gene product id, in order of first appearance
    pub fn gene_product_ids(&self) -> Vec<&str> {
        let mut ids = Vec::new();
        self.collect_ids(&mut ids);
        ids
    }

    fn collect_ids<'a>(&'a self, ids: &mut Vec<&'a str>) {
        match self {
            Association::GeneProductRef(id) => {
                if !ids.contains(&id.as_str()) {
                    ids.push(id);
                }
            }
            Association::And(children) | Association::Or(children) => {
                for child in children {
                    child.collect_ids(ids);
                }
            }
        }
    }
}

// endregion FBC

// region Groups

#[derive(Clone, Debug, Default, PartialEq)]
pub struct GroupsModelPlugin {
    pub groups: Vec<Group>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Group {
    pub sbase: SBase,
    pub kind: Option<GroupKind>,
    pub members: Vec<Member>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GroupKind {
    Classification,
    Partonomy,
    Collection,
}

impl GroupKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupKind::Classification => "classification",
            GroupKind::Partonomy => "partonomy",
            GroupKind::Collection => "collection",
        }
    }
}

impl FromStr for GroupKind {
    type Err = DocumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "classification" => Ok(GroupKind::Classification),
            "partonomy" => Ok(GroupKind::Partonomy),
            "collection" => Ok(GroupKind::Collection),
            other => Err(DocumentError::InvalidValue {
                attribute: "groups:kind".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Member {
    pub sbase: SBase,
    pub id_ref: Option<String>,
    pub meta_id_ref: Option<String>,
}

// endregion Groups
