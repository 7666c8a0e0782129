//! Translation of SBML documents into models
use std::collections::HashSet;
use std::io::Read;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use crate::io::gpr_parse::{gene_ids, rewrite_gene_ids};
use crate::io::sbml::annotation::parse_annotations;
use crate::io::sbml::error::SbmlError;
use crate::io::sbml::gpr::{association_to_rule, strip_outer_parens};
use crate::io::sbml::ids::{IdReplacement, IdReplacements};
use crate::io::sbml::notes::parse_notes;
use crate::metabolic_model::annotation::Notes;
use crate::metabolic_model::gene::Gene;
use crate::metabolic_model::group::{Group, GroupMember};
use crate::metabolic_model::metabolite::Metabolite;
use crate::metabolic_model::model::{Creator, Model, SbmlMeta};
use crate::metabolic_model::reaction::Reaction;
use crate::optimize::objective::ObjectiveSense;
use crate::sbml::{
    read_sbml_from_string, ElementKind, ObjectiveType, SBase, SbmlDocument, SbmlModel,
};

/// Where an SBML document is read from
pub enum SbmlSource {
    Path(PathBuf),
    /// The SBML document itself
    Text(String),
    Reader(Box<dyn Read>),
}

impl SbmlSource {
    /// The SBML text, read from the file or reader if needed
    pub(crate) fn into_text(self) -> Result<String, SbmlError> {
        let text = match self {
            SbmlSource::Path(path) => std::fs::read_to_string(path)?,
            SbmlSource::Text(text) => text,
            SbmlSource::Reader(mut reader) => {
                let mut text = String::new();
                reader.read_to_string(&mut text)?;
                text
            }
        };
        Ok(text)
    }

    pub(crate) fn into_document(self) -> Result<SbmlDocument, SbmlError> {
        Ok(read_sbml_from_string(&self.into_text()?)?)
    }
}

impl From<&str> for SbmlSource {
    /// A string naming an existing file is a path, anything else is taken as SBML text
    fn from(value: &str) -> Self {
        if Path::new(value).exists() {
            SbmlSource::Path(PathBuf::from(value))
        } else {
            SbmlSource::Text(value.to_string())
        }
    }
}

impl From<String> for SbmlSource {
    fn from(value: String) -> Self {
        SbmlSource::from(value.as_str())
    }
}

impl From<&Path> for SbmlSource {
    fn from(value: &Path) -> Self {
        SbmlSource::Path(value.to_path_buf())
    }
}

impl From<PathBuf> for SbmlSource {
    fn from(value: PathBuf) -> Self {
        SbmlSource::Path(value)
    }
}

impl From<Box<dyn Read>> for SbmlSource {
    fn from(value: Box<dyn Read>) -> Self {
        SbmlSource::Reader(value)
    }
}

/// Numeric type stoichiometries and objective coefficients are read as
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NumberKind {
    #[default]
    Float,
    /// Values are truncated towards zero
    Integer,
}

impl NumberKind {
    /// Convert a value, `None` for NaN and infinite values
    pub fn convert(&self, value: f64) -> Option<f64> {
        if !value.is_finite() {
            return None;
        }
        match self {
            NumberKind::Float => Some(value),
            NumberKind::Integer => Some(value.trunc()),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct SbmlReadOptions {
    pub number: NumberKind,
    pub id_replacements: IdReplacements,
}

/// Read a model from SBML
///
/// # Parameters
/// - `source`: Path, SBML text or reader. A `&str` naming an existing file is read from
///   that file, otherwise it is parsed as SBML.
/// - `options`: Number type and identifier replacements
///
/// # Returns
/// The model, or a [`SbmlError::Translation`] wrapping what went wrong
///
/// # Examples
/// ```no_run
/// use cobrars_sbml::io::sbml::{read_sbml_model, SbmlReadOptions};
/// let model = read_sbml_model("e_coli_core.xml", &SbmlReadOptions::default()).unwrap();
/// ```
pub fn read_sbml_model(
    source: impl Into<SbmlSource>,
    options: &SbmlReadOptions,
) -> Result<Model, SbmlError> {
    let document = source
        .into()
        .into_document()
        .map_err(SbmlError::into_translation)?;
    sbml_to_model(document, options).map_err(SbmlError::into_translation)
}

/// Translate a parsed SBML document into a model
pub fn sbml_to_model(document: SbmlDocument, options: &SbmlReadOptions) -> Result<Model, SbmlError> {
    SbmlReader::new(options).read(document)
}

/// Performs one translation, collecting the warnings raised on the way
pub(crate) struct SbmlReader<'a> {
    options: &'a SbmlReadOptions,
    warnings: Vec<String>,
}

impl<'a> SbmlReader<'a> {
    pub(crate) fn new(options: &'a SbmlReadOptions) -> Self {
        SbmlReader {
            options,
            warnings: Vec::new(),
        }
    }

    pub(crate) fn into_warnings(self) -> Vec<String> {
        self.warnings
    }

    fn warn(&mut self, message: String) {
        log::warn!("{message}");
        self.warnings.push(message);
    }

    fn replace(&self, kind: IdReplacement, id: &str) -> String {
        self.options.id_replacements.apply(kind, id)
    }

    pub(crate) fn read(&mut self, mut document: SbmlDocument) -> Result<Model, SbmlError> {
        for warning in std::mem::take(&mut document.warnings) {
            self.warn(warning);
        }
        let Some(fbc) = document.model.as_ref().map(|m| m.fbc.as_ref()) else {
            return Err(SbmlError::MissingModel);
        };
        match fbc.map(|fbc| fbc.strict.is_some()) {
            None => self.warn("Model does not contain FBC information".to_string()),
            Some(strict_set) => {
                if !strict_set {
                    self.warn(r#"Loading SBML model without fbc:strict="true""#.to_string());
                }
                if document.package_version("fbc") == Some(1) {
                    self.warn(
                        "Loading SBML with fbc-v1 (models should be encoded using fbc-v2)"
                            .to_string(),
                    );
                    document.convert_fbc_v1_to_v2()?;
                }
            }
        }
        let Some(sbml_model) = document.model.as_ref() else {
            return Err(SbmlError::MissingModel);
        };

        let mut model = Model::new_empty();
        model.id = sbml_model.sbase.id.clone();
        model.name = sbml_model.sbase.name.clone();
        model.meta = Some(self.read_meta(&document, sbml_model));
        model.notes = parse_notes(&sbml_model.sbase);
        model.annotation = parse_annotations(&sbml_model.sbase);

        for compartment in &sbml_model.compartments {
            match &compartment.sbase.id {
                Some(id) => model.add_compartment(
                    id,
                    compartment.sbase.name.as_deref().unwrap_or_default(),
                ),
                None => self.warn("Ignoring compartment without an id".to_string()),
            }
        }

        let boundary_ids = self.read_species(sbml_model, &mut model)?;
        self.read_genes(sbml_model, &mut model)?;
        for reaction in &sbml_model.reactions {
            let reaction = self.read_reaction(sbml_model, reaction, &model, &boundary_ids)?;
            model.add_reaction(reaction)?;
        }
        self.read_objective(sbml_model, &mut model)?;
        self.read_groups(sbml_model, &mut model)?;
        Ok(model)
    }

    fn read_meta(&mut self, document: &SbmlDocument, sbml_model: &SbmlModel) -> SbmlMeta {
        let packages: IndexMap<String, u32> = document
            .packages
            .iter()
            .map(|(name, package)| (name.clone(), package.version))
            .collect();
        let mut info = format!(
            "<{}> SBML L{}V{}",
            sbml_model.sbase.id.as_deref().unwrap_or_default(),
            document.level,
            document.version
        );
        for (name, version) in &packages {
            info.push_str(&format!(", {name}-v{version}"));
            if name != "fbc" && name != "groups" {
                self.warn(format!(
                    "SBML package '{name}' not supported, information is not parsed"
                ));
            }
        }
        let (creators, created) = match &sbml_model.history {
            Some(history) => (
                history
                    .creators
                    .iter()
                    .map(|c| Creator {
                        family_name: c.family_name.clone(),
                        given_name: c.given_name.clone(),
                        organisation: c.organisation.clone(),
                        email: c.email.clone(),
                    })
                    .collect(),
                history.created.clone(),
            ),
            None => (Vec::new(), None),
        };
        SbmlMeta {
            level: document.level,
            version: document.version,
            packages,
            info,
            creators,
            created,
            notes: parse_notes(&document.sbase),
            annotation: parse_annotations(&document.sbase),
        }
    }

    /// Add the metabolites, returning the ids of boundary species
    fn read_species(
        &mut self,
        sbml_model: &SbmlModel,
        model: &mut Model,
    ) -> Result<HashSet<String>, SbmlError> {
        let mut boundary_ids = HashSet::new();
        for species in &sbml_model.species {
            let sid = self.replace(IdReplacement::Specie, required_id(&species.sbase, "species")?);
            let mut metabolite = Metabolite::new(&sid);
            metabolite.name = species.sbase.name.clone();
            metabolite.notes = parse_notes(&species.sbase);
            metabolite.annotation = parse_annotations(&species.sbase);
            metabolite.compartment = species.compartment.clone();

            metabolite.charge = match (species.fbc_charge, species.charge) {
                (Some(charge), _) => Some(charge),
                (None, Some(charge)) => {
                    self.warn(format!(
                        "Use of charge attribute is discouraged '{sid}', use fbc:charge instead"
                    ));
                    Some(charge)
                }
                (None, None) => match metabolite.notes.get("CHARGE") {
                    Some(charge) => {
                        self.warn(format!(
                            "Use of CHARGE note is discouraged '{sid}', use fbc:charge instead"
                        ));
                        charge.parse::<i32>().ok()
                    }
                    None => None,
                },
            };
            metabolite.formula = match &species.fbc_chemical_formula {
                Some(formula) => Some(formula.clone()),
                None => match metabolite.notes.get("FORMULA") {
                    Some(formula) => {
                        self.warn(format!(
                            "Use of FORMULA note is discouraged '{sid}', use fbc:chemicalFormula instead"
                        ));
                        Some(formula.clone())
                    }
                    None => None,
                },
            };

            if species.boundary_condition == Some(true) {
                boundary_ids.insert(sid);
            }
            model.add_metabolite(metabolite);
        }
        Ok(boundary_ids)
    }

    fn read_genes(&mut self, sbml_model: &SbmlModel, model: &mut Model) -> Result<(), SbmlError> {
        if let Some(fbc) = &sbml_model.fbc {
            for gene_product in &fbc.gene_products {
                let gid = self.replace(
                    IdReplacement::Gene,
                    required_id(&gene_product.sbase, "geneProduct")?,
                );
                let mut gene = Gene::new(&gid);
                if let Some(name) = &gene_product.sbase.name {
                    gene.name = Some(name.clone());
                }
                gene.notes = parse_notes(&gene_product.sbase);
                gene.annotation = parse_annotations(&gene_product.sbase);
                model.add_gene(gene);
            }
        } else {
            for reaction in &sbml_model.reactions {
                let Some(rule) = legacy_gene_association(&parse_notes(&reaction.sbase)) else {
                    continue;
                };
                for gid in gene_ids(&rule) {
                    let gid = self.replace(IdReplacement::Gene, &gid);
                    if !model.genes.contains_key(&gid) {
                        model.add_gene(Gene::new(&gid));
                    }
                }
            }
        }
        Ok(())
    }

    fn read_reaction(
        &mut self,
        sbml_model: &SbmlModel,
        sbml_reaction: &crate::sbml::Reaction,
        model: &Model,
        boundary_ids: &HashSet<String>,
    ) -> Result<Reaction, SbmlError> {
        let sbml_id = required_id(&sbml_reaction.sbase, "reaction")?;
        let rid = self.replace(IdReplacement::Reaction, sbml_id);
        let mut reaction = Reaction::new(&rid);
        reaction.name = sbml_reaction.sbase.name.clone();
        reaction.notes = parse_notes(&sbml_reaction.sbase);
        reaction.annotation = parse_annotations(&sbml_reaction.sbase);

        let (lower_bound, upper_bound) = self.read_bounds(sbml_model, sbml_reaction, &rid)?;
        reaction.lower_bound = lower_bound;
        reaction.upper_bound = upper_bound;

        let mut stoichiometry: IndexMap<String, f64> = IndexMap::new();
        for (references, sign) in [(&sbml_reaction.reactants, -1.), (&sbml_reaction.products, 1.)] {
            for reference in references {
                let species = reference.species.as_deref().ok_or_else(|| {
                    SbmlError::MissingAttribute {
                        element: format!("species reference of reaction '{rid}'"),
                        attribute: "species".to_string(),
                    }
                })?;
                let sid = self.replace(IdReplacement::Specie, species);
                let raw = reference
                    .stoichiometry
                    .ok_or_else(|| SbmlError::MissingStoichiometry {
                        reaction: rid.clone(),
                        species: sid.clone(),
                    })?;
                let value = self.options.number.convert(raw).ok_or_else(|| {
                    SbmlError::InvalidStoichiometry {
                        reaction: rid.clone(),
                        species: sid.clone(),
                        value: raw,
                    }
                })?;
                *stoichiometry.entry(sid).or_insert(0.) += sign * value;
            }
        }
        for (sid, coefficient) in stoichiometry {
            if boundary_ids.contains(&sid) {
                self.warn(format!(
                    "Boundary metabolite '{sid}' used in reaction '{rid}'"
                ));
                continue;
            }
            if !model.metabolites.contains_key(&sid) {
                self.warn(format!(
                    "Ignoring unknown metabolite '{sid}' in reaction '{rid}'"
                ));
                continue;
            }
            reaction.metabolites.insert(sid, coefficient);
        }

        let options = self.options;
        let rule = if sbml_model.fbc.is_some() {
            sbml_reaction
                .gene_product_association
                .as_ref()
                .and_then(|gpa| gpa.association.as_ref())
                .map(|association| association_to_rule(association, &options.id_replacements))
                .unwrap_or_default()
        } else {
            match legacy_gene_association(&reaction.notes) {
                Some(rule) => {
                    self.warn(format!(
                        "Use of GENE ASSOCIATION note is discouraged '{rid}', use fbc:gpr instead"
                    ));
                    strip_outer_parens(&rewrite_gene_ids(&rule, |gene| {
                        options.id_replacements.apply(IdReplacement::Gene, gene)
                    }))
                }
                None => String::new(),
            }
        };
        reaction.gene_reaction_rule = rule;
        Ok(reaction)
    }

    /// Lower and upper bound from FBC parameters, falling back to kinetic law parameters
    fn read_bounds(
        &mut self,
        sbml_model: &SbmlModel,
        reaction: &crate::sbml::Reaction,
        rid: &str,
    ) -> Result<(f64, f64), SbmlError> {
        if reaction.lower_flux_bound.is_some() || reaction.upper_flux_bound.is_some() {
            let lower = flux_bound_value(
                sbml_model,
                rid,
                reaction.lower_flux_bound.as_deref(),
                "fbc:lowerFluxBound",
            )?;
            let upper = flux_bound_value(
                sbml_model,
                rid,
                reaction.upper_flux_bound.as_deref(),
                "fbc:upperFluxBound",
            )?;
            return Ok((lower, upper));
        }
        if let Some(kinetic_law) = &reaction.kinetic_law {
            let local_value = |id: &str| {
                kinetic_law
                    .parameter(id)
                    .and_then(|p| p.value)
                    .filter(|value| !value.is_nan())
                    .ok_or_else(|| SbmlError::MissingBounds {
                        reaction: rid.to_string(),
                        reason: format!("kinetic law has no numeric {id} parameter"),
                    })
            };
            let lower = local_value("LOWER_BOUND")?;
            let upper = local_value("UPPER_BOUND")?;
            self.warn(format!(
                "Encoding LOWER_BOUND and UPPER_BOUND in KineticLaw is discouraged '{rid}', use fbc:fluxBounds instead"
            ));
            return Ok((lower, upper));
        }
        Err(SbmlError::NoFluxBounds(rid.to_string()))
    }

    fn read_objective(&mut self, sbml_model: &SbmlModel, model: &mut Model) -> Result<(), SbmlError> {
        let options = self.options;
        let mut sense = ObjectiveSense::Maximize;
        let mut coefficients: IndexMap<String, f64> = IndexMap::new();
        if let Some(fbc) = &sbml_model.fbc {
            let objective = match &fbc.objectives {
                None => {
                    self.warn("listOfObjectives element not found".to_string());
                    None
                }
                Some(list) if list.objectives.is_empty() => {
                    self.warn("No objective in listOfObjectives".to_string());
                    None
                }
                Some(list) => match list.active_objective.as_deref() {
                    None | Some("") => {
                        self.warn("No active objective in listOfObjectives".to_string());
                        None
                    }
                    Some(active) => {
                        let objective = list.objective(active);
                        if objective.is_none() {
                            self.warn(format!(
                                "Active objective '{active}' not found in listOfObjectives"
                            ));
                        }
                        objective
                    }
                },
            };
            if let Some(objective) = objective {
                let objective_id = objective.sbase.id.as_deref().unwrap_or_default();
                sense = match objective.objective_type {
                    Some(ObjectiveType::Maximize) => ObjectiveSense::Maximize,
                    Some(ObjectiveType::Minimize) => ObjectiveSense::Minimize,
                    None => return Err(SbmlError::MissingObjectiveType(objective_id.to_string())),
                };
                for flux_objective in &objective.flux_objectives {
                    let reaction = flux_objective.reaction.as_deref().ok_or_else(|| {
                        SbmlError::MissingAttribute {
                            element: format!("flux objective of objective '{objective_id}'"),
                            attribute: "fbc:reaction".to_string(),
                        }
                    })?;
                    let rid = options.id_replacements.apply(IdReplacement::Reaction, reaction);
                    if !model.reactions.contains_key(&rid) {
                        return Err(SbmlError::UnknownObjectiveReaction(rid));
                    }
                    match flux_objective.coefficient.and_then(|c| options.number.convert(c)) {
                        Some(coefficient) => {
                            coefficients.insert(rid, coefficient);
                        }
                        None => self.warn(format!(
                            "Missing or invalid objective coefficient for reaction '{rid}'"
                        )),
                    }
                }
            }
        } else {
            for reaction in &sbml_model.reactions {
                let Some(parameter) = reaction
                    .kinetic_law
                    .as_ref()
                    .and_then(|k| k.parameter("OBJECTIVE_COEFFICIENT"))
                else {
                    continue;
                };
                let rid = options.id_replacements.apply(
                    IdReplacement::Reaction,
                    reaction.sbase.id.as_deref().unwrap_or_default(),
                );
                if !model.reactions.contains_key(&rid) {
                    return Err(SbmlError::UnknownObjectiveReaction(rid));
                }
                match parameter.value.and_then(|c| options.number.convert(c)) {
                    Some(coefficient) => {
                        coefficients.insert(rid.clone(), coefficient);
                    }
                    None => self.warn(format!(
                        "Missing or invalid OBJECTIVE_COEFFICIENT for reaction '{rid}'"
                    )),
                }
                self.warn(format!(
                    "Encoding OBJECTIVE_COEFFICIENT in KineticLaw is discouraged '{rid}', use fbc:fluxObjective instead"
                ));
            }
        }
        model.set_objective(coefficients)?;
        model.set_objective_direction(sense);
        Ok(())
    }

    fn read_groups(&mut self, sbml_model: &SbmlModel, model: &mut Model) -> Result<(), SbmlError> {
        let options = self.options;
        let Some(plugin) = &sbml_model.groups else {
            // Subsystems in reaction notes
            let mut subsystems: IndexMap<String, Vec<String>> = IndexMap::new();
            for reaction in model.reactions.values() {
                if let Some(subsystem) = reaction.notes.get("SUBSYSTEM") {
                    subsystems
                        .entry(subsystem.clone())
                        .or_default()
                        .push(reaction.id.clone());
                }
            }
            for (name, reactions) in subsystems {
                let mut group = Group::new(&name);
                group.name = Some(name.clone());
                for reaction in reactions {
                    group.add_member(GroupMember::Reaction(reaction));
                }
                model.add_group(group)?;
            }
            return Ok(());
        };

        let index = sbml_model.element_index();
        for sbml_group in &plugin.groups {
            let gid = sbml_group.sbase.id.clone().unwrap_or_default();
            let mut group = Group::new(&gid);
            group.name = sbml_group.sbase.name.clone();
            if let Some(kind) = sbml_group.kind {
                group.kind = kind.as_str().to_string();
            }
            group.notes = parse_notes(&sbml_group.sbase);
            group.annotation = parse_annotations(&sbml_group.sbase);

            for member in &sbml_group.members {
                let resolved = match (&member.id_ref, &member.meta_id_ref) {
                    (Some(id_ref), _) => index.kind_of(id_ref).map(|k| (k, Some(id_ref.as_str()))),
                    (None, Some(meta_id_ref)) => index.by_meta_id(meta_id_ref),
                    (None, None) => None,
                };
                let Some((kind, Some(id))) = resolved else {
                    self.warn(format!(
                        "Member of group '{gid}' does not reference an element with an id"
                    ));
                    continue;
                };
                let replacements = &options.id_replacements;
                let member = match kind {
                    ElementKind::Species => {
                        GroupMember::Metabolite(replacements.apply(IdReplacement::Specie, id))
                    }
                    ElementKind::Reaction => {
                        GroupMember::Reaction(replacements.apply(IdReplacement::Reaction, id))
                    }
                    ElementKind::GeneProduct => {
                        GroupMember::Gene(replacements.apply(IdReplacement::Gene, id))
                    }
                    other => {
                        self.warn(format!(
                            "Member '{id}' could not be added to group '{gid}', unsupported type {other}"
                        ));
                        continue;
                    }
                };
                group.add_member(member);
            }
            model.add_group(group)?;
        }
        Ok(())
    }
}

fn required_id<'s>(sbase: &'s SBase, element: &str) -> Result<&'s str, SbmlError> {
    sbase
        .id
        .as_deref()
        .ok_or_else(|| SbmlError::MissingAttribute {
            element: element.to_string(),
            attribute: "id".to_string(),
        })
}

fn flux_bound_value(
    sbml_model: &SbmlModel,
    rid: &str,
    parameter_id: Option<&str>,
    attribute: &str,
) -> Result<f64, SbmlError> {
    let parameter_id = parameter_id.ok_or_else(|| SbmlError::MissingBounds {
        reaction: rid.to_string(),
        reason: format!("no {attribute}"),
    })?;
    let parameter = sbml_model
        .parameter(parameter_id)
        .ok_or_else(|| SbmlError::MissingBounds {
            reaction: rid.to_string(),
            reason: format!("parameter '{parameter_id}' not found"),
        })?;
    // Infinite bounds are allowed, NaN is not a bound
    match (parameter.constant, parameter.value) {
        (Some(true), Some(value)) if !value.is_nan() => Ok(value),
        _ => Err(SbmlError::MissingBounds {
            reaction: rid.to_string(),
            reason: format!("no constant bound '{parameter_id}'"),
        }),
    }
}

/// Gene reaction rule stored in legacy reaction notes
fn legacy_gene_association(notes: &Notes) -> Option<String> {
    notes
        .get("GENE ASSOCIATION")
        .or_else(|| notes.get("GENE_ASSOCIATION"))
        .filter(|rule| !rule.is_empty())
        .cloned()
}
