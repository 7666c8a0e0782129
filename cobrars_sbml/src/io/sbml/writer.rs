//! Translation of models into SBML Level 3 Version 1 documents with FBC version 2
use std::io::Write;
use std::path::Path;

use crate::configuration::Configuration;
use crate::io::sbml::annotation::set_annotations;
use crate::io::sbml::bounds::{BoundKind, BoundParameters, SBO_FBA_FRAMEWORK};
use crate::io::sbml::error::SbmlError;
use crate::io::sbml::gpr::rule_to_association;
use crate::io::sbml::ids::{IdReplacement, IdReplacements};
use crate::io::sbml::notes::set_notes;
use crate::metabolic_model::annotation::{Annotation, Notes};
use crate::metabolic_model::group::GroupMember;
use crate::metabolic_model::model::Model;
use crate::optimize::objective::ObjectiveSense;
use crate::sbml::{
    Compartment, FbcModelPlugin, FluxObjective, GeneProduct, GeneProductAssociation, Group,
    GroupKind, GroupsModelPlugin, ListOfObjectives, Member, ModelCreator, ModelHistory, Objective,
    ObjectiveType, Reaction, SBase, SbmlDocument, SbmlModel, Species, SpeciesReference, Unit,
    UnitDefinition,
};

/// Id of the flux unit definition
pub const FLUX_UNITS_ID: &str = "mmol_per_gDW_per_hr";

/// Id of the objective written to the model
pub const OBJECTIVE_ID: &str = "obj";

#[derive(Clone, Debug)]
pub struct SbmlWriteOptions {
    pub id_replacements: IdReplacements,
    /// Write the flux unit definition and give it to the bound parameters
    pub units: bool,
    /// Default bounds written as the shared bound parameters
    pub configuration: Configuration,
}

impl Default for SbmlWriteOptions {
    fn default() -> Self {
        SbmlWriteOptions {
            id_replacements: IdReplacements::default(),
            units: true,
            configuration: Configuration::default(),
        }
    }
}

/// Write a model to an SBML file
///
/// # Parameters
/// - `model`: Model to write
/// - `path`: File to create (or replace)
/// - `options`: Identifier replacements, units and default bounds
///
/// # Examples
/// ```no_run
/// use cobrars_sbml::io::sbml::{write_sbml_model, SbmlWriteOptions};
/// use cobrars_sbml::metabolic_model::model::Model;
/// let model = Model::new("empty");
/// write_sbml_model(&model, "empty.xml", &SbmlWriteOptions::default()).unwrap();
/// ```
pub fn write_sbml_model<P: AsRef<Path>>(
    model: &Model,
    path: P,
    options: &SbmlWriteOptions,
) -> Result<(), SbmlError> {
    model_to_sbml(model, options).write_to_file(path)?;
    Ok(())
}

/// Write a model as SBML into `writer`
pub fn write_sbml_to_writer<W: Write>(
    model: &Model,
    writer: W,
    options: &SbmlWriteOptions,
) -> Result<(), SbmlError> {
    model_to_sbml(model, options).write_to(writer)?;
    Ok(())
}

/// Write a model as an SBML string
pub fn write_sbml_to_string(model: &Model, options: &SbmlWriteOptions) -> Result<String, SbmlError> {
    Ok(model_to_sbml(model, options).to_xml_string()?)
}

/// Build the SBML document of a model
///
/// Problems with individual notes, annotations or gene reaction rules are logged and the
/// offending item is left out.
pub fn model_to_sbml(model: &Model, options: &SbmlWriteOptions) -> SbmlDocument {
    let replacements = &options.id_replacements;
    let mut document = SbmlDocument::new(3, 1);
    document.enable_package("fbc", 2, false);
    document.sbase.sbo_term = Some(SBO_FBA_FRAMEWORK.to_string());

    let mut sbml_model = SbmlModel {
        sbase: SBase {
            id: model.id.clone(),
            name: model.name.clone(),
            ..Default::default()
        },
        fbc: Some(FbcModelPlugin {
            strict: Some(true),
            ..Default::default()
        }),
        ..Default::default()
    };
    annotate(&mut sbml_model.sbase, &model.notes, &model.annotation);

    if let Some(meta) = &model.meta {
        annotate(&mut document.sbase, &meta.notes, &meta.annotation);
        let history = ModelHistory {
            creators: meta
                .creators
                .iter()
                .map(|c| ModelCreator {
                    family_name: c.family_name.clone(),
                    given_name: c.given_name.clone(),
                    organisation: c.organisation.clone(),
                    email: c.email.clone(),
                })
                .collect(),
            created: meta.created.clone(),
        };
        if !history.is_empty() {
            sbml_model.history = Some(history);
        }
    }

    if options.units {
        sbml_model.unit_definitions.push(flux_unit_definition());
    }
    let bounds = BoundParameters::new(
        &options.configuration,
        options.units.then_some(FLUX_UNITS_ID),
    );
    bounds.create_default_parameters(&mut sbml_model);

    for (id, name) in &model.compartments {
        sbml_model.compartments.push(Compartment {
            sbase: SBase {
                name: Some(name.clone()),
                ..SBase::with_id(id)
            },
            constant: Some(true),
        });
    }

    for metabolite in model.metabolites.values() {
        let mut species = Species {
            sbase: SBase {
                name: metabolite.name.clone(),
                ..SBase::with_id(&replacements.apply(IdReplacement::SpecieRev, &metabolite.id))
            },
            compartment: metabolite.compartment.clone(),
            boundary_condition: Some(false),
            constant: Some(true),
            has_only_substance_units: Some(false),
            fbc_charge: metabolite.charge,
            fbc_chemical_formula: metabolite.formula.clone(),
            ..Default::default()
        };
        annotate(&mut species.sbase, &metabolite.notes, &metabolite.annotation);
        sbml_model.species.push(species);
    }

    let mut gene_products = Vec::with_capacity(model.genes.len());
    for gene in model.genes.values() {
        let gid = replacements.apply(IdReplacement::GeneRev, &gene.id);
        let name = match &gene.name {
            Some(name) if !name.is_empty() => name.clone(),
            _ => gid.clone(),
        };
        let mut gene_product = GeneProduct {
            sbase: SBase {
                name: Some(name),
                ..SBase::with_id(&gid)
            },
            label: Some(gid),
        };
        annotate(&mut gene_product.sbase, &gene.notes, &gene.annotation);
        gene_products.push(gene_product);
    }

    let mut objective = Objective {
        sbase: SBase::with_id(OBJECTIVE_ID),
        objective_type: Some(match model.objective.sense() {
            ObjectiveSense::Maximize => ObjectiveType::Maximize,
            ObjectiveSense::Minimize => ObjectiveType::Minimize,
        }),
        flux_objectives: Vec::new(),
    };

    for reaction in model.reactions.values() {
        let rid = replacements.apply(IdReplacement::ReactionRev, &reaction.id);
        let mut sbml_reaction = Reaction {
            sbase: SBase {
                name: reaction.name.clone(),
                ..SBase::with_id(&rid)
            },
            reversible: Some(reaction.lower_bound < 0.),
            fast: Some(false),
            ..Default::default()
        };
        annotate(&mut sbml_reaction.sbase, &reaction.notes, &reaction.annotation);

        for (metabolite, coefficient) in &reaction.metabolites {
            let reference = SpeciesReference {
                species: Some(replacements.apply(IdReplacement::SpecieRev, metabolite)),
                stoichiometry: Some(coefficient.abs()),
                constant: Some(true),
                ..Default::default()
            };
            if *coefficient < 0. {
                sbml_reaction.reactants.push(reference);
            } else {
                sbml_reaction.products.push(reference);
            }
        }

        sbml_reaction.lower_flux_bound = Some(bounds.resolve_or_create(
            &mut sbml_model,
            &rid,
            reaction.lower_bound,
            BoundKind::Lower,
        ));
        sbml_reaction.upper_flux_bound = Some(bounds.resolve_or_create(
            &mut sbml_model,
            &rid,
            reaction.upper_bound,
            BoundKind::Upper,
        ));

        sbml_reaction.gene_product_association =
            rule_to_association(&reaction.gene_reaction_rule, replacements).map(|association| {
                GeneProductAssociation {
                    sbase: SBase::default(),
                    association: Some(association),
                }
            });

        let coefficient = model.objective_coefficient(&reaction.id);
        if coefficient != 0. {
            objective.flux_objectives.push(FluxObjective {
                sbase: SBase::default(),
                reaction: Some(rid.clone()),
                coefficient: Some(coefficient),
            });
        }
        sbml_model.reactions.push(sbml_reaction);
    }

    if let Some(fbc) = sbml_model.fbc.as_mut() {
        fbc.gene_products = gene_products;
        fbc.objectives = Some(ListOfObjectives {
            active_objective: Some(OBJECTIVE_ID.to_string()),
            objectives: vec![objective],
        });
    }

    if !model.groups.is_empty() {
        document.enable_package("groups", 1, false);
        sbml_model.groups = Some(GroupsModelPlugin {
            groups: model
                .groups
                .values()
                .map(|group| write_group(model, group, replacements))
                .collect(),
        });
    }

    document.model = Some(sbml_model);
    document
}

fn annotate(sbase: &mut SBase, notes: &Notes, annotation: &Annotation) {
    set_notes(sbase, notes);
    set_annotations(sbase, annotation);
}

fn flux_unit_definition() -> UnitDefinition {
    UnitDefinition {
        sbase: SBase::with_id(FLUX_UNITS_ID),
        units: vec![
            Unit {
                kind: "mole".to_string(),
                exponent: 1.,
                scale: -3,
                multiplier: 1.,
            },
            Unit {
                kind: "gram".to_string(),
                exponent: -1.,
                scale: 0,
                multiplier: 1.,
            },
            Unit {
                kind: "second".to_string(),
                exponent: -1.,
                scale: 0,
                multiplier: 3600.,
            },
        ],
    }
}

fn write_group(
    model: &Model,
    group: &crate::metabolic_model::group::Group,
    replacements: &IdReplacements,
) -> Group {
    let kind = match group.kind.parse::<GroupKind>() {
        Ok(kind) => kind,
        Err(e) => {
            log::warn!("{e} on group '{}', writing it as a collection", group.id);
            GroupKind::Collection
        }
    };
    let mut sbml_group = Group {
        sbase: SBase {
            name: group.name.clone(),
            ..SBase::with_id(&group.id)
        },
        kind: Some(kind),
        members: Vec::with_capacity(group.members.len()),
    };
    annotate(&mut sbml_group.sbase, &group.notes, &group.annotation);

    for member in &group.members {
        let (id_ref, name) = match member {
            GroupMember::Metabolite(id) => (
                replacements.apply(IdReplacement::SpecieRev, id),
                model.metabolites.get(id).and_then(|m| m.name.clone()),
            ),
            GroupMember::Reaction(id) => (
                replacements.apply(IdReplacement::ReactionRev, id),
                model.reactions.get(id).and_then(|r| r.name.clone()),
            ),
            GroupMember::Gene(id) => (
                replacements.apply(IdReplacement::GeneRev, id),
                model.genes.get(id).and_then(|g| g.name.clone()),
            ),
        };
        sbml_group.members.push(Member {
            sbase: SBase {
                name: name.filter(|n| !n.is_empty()),
                ..Default::default()
            },
            id_ref: Some(id_ref),
            meta_id_ref: None,
        });
    }
    sbml_group
}

#[cfg(test)]
mod tests {
    use indexmap::IndexMap;

    use super::*;
    use crate::io::sbml::bounds::{LOWER_BOUND_ID, UPPER_BOUND_ID, ZERO_BOUND_ID};
    use crate::io::sbml::reader::{read_sbml_model, SbmlReadOptions};
    use crate::metabolic_model::annotation::AnnotationValue;
    use crate::metabolic_model::gene::Gene;
    use crate::metabolic_model::group::Group as ModelGroup;
    use crate::metabolic_model::metabolite::MetaboliteBuilder;
    use crate::metabolic_model::model::{Creator, SbmlMeta};
    use crate::metabolic_model::reaction::{Reaction as ModelReaction, ReactionBuilder};
    use crate::sbml::{Association, BiologicalQualifier, CvTerm, Qualifier};

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn metabolite(id: &str, compartment: &str) -> crate::metabolic_model::metabolite::Metabolite {
        MetaboliteBuilder::default()
            .id(id.to_string())
            .name(Some(id.to_uppercase()))
            .compartment(Some(compartment.to_string()))
            .build()
            .unwrap()
    }

    fn textbook_model() -> Model {
        let mut model = Model::new("tiny");
        model.name = Some("Tiny model".to_string());
        model.add_compartment("c", "cytosol");
        model.add_compartment("e", "extracellular");
        let mut glc = metabolite("glc__D_e", "e");
        glc.charge = Some(0);
        glc.formula = Some("C6H12O6".to_string());
        glc.annotation.insert(
            "chebi".to_string(),
            AnnotationValue::Single("CHEBI:17234".to_string()),
        );
        model.add_metabolite(glc);
        model.add_metabolite(metabolite("g6p_c", "c"));
        model.add_metabolite(metabolite("f6p_c", "c"));

        let exchange = ReactionBuilder::default()
            .id("EX_glc__D_e".to_string())
            .metabolites(IndexMap::from([("glc__D_e".to_string(), -1.)]))
            .lower_bound(-10.)
            .build()
            .unwrap();
        let transport = ReactionBuilder::default()
            .id("GLCt".to_string())
            .metabolites(IndexMap::from([
                ("glc__D_e".to_string(), -1.),
                ("g6p_c".to_string(), 1.),
            ]))
            .gene_reaction_rule("(b2417 and b1621) or b1817.1".to_string())
            .lower_bound(0.)
            .build()
            .unwrap();
        let mut pgi = ReactionBuilder::default()
            .id("PGI".to_string())
            .name(Some("Glucose-6-phosphate isomerase".to_string()))
            .metabolites(IndexMap::from([
                ("g6p_c".to_string(), -1.),
                ("f6p_c".to_string(), 2.),
            ]))
            .gene_reaction_rule("b4025".to_string())
            .build()
            .unwrap();
        pgi.notes
            .insert("SUBSYSTEM".to_string(), "Glycolysis".to_string());
        for reaction in [exchange, transport, pgi] {
            model.add_reaction(reaction).unwrap();
        }
        model.genes["b2417"].name = Some("crr".to_string());
        model
            .set_objective(IndexMap::from([("PGI".to_string(), 1.)]))
            .unwrap();

        let mut group = ModelGroup::new("glycolysis");
        group.name = Some("Glycolysis".to_string());
        group.add_member(GroupMember::Reaction("PGI".to_string()));
        group.add_member(GroupMember::Metabolite("g6p_c".to_string()));
        group.add_member(GroupMember::Gene("b4025".to_string()));
        model.add_group(group).unwrap();
        model
    }

    #[test]
    fn document_layout() {
        init();
        let document = model_to_sbml(&textbook_model(), &SbmlWriteOptions::default());
        assert_eq!((document.level, document.version), (3, 1));
        assert_eq!(document.package_version("fbc"), Some(2));
        assert_eq!(document.package_version("groups"), Some(1));
        assert!(!document.packages["fbc"].required);
        assert_eq!(document.sbase.sbo_term.as_deref(), Some(SBO_FBA_FRAMEWORK));

        let model = document.model.as_ref().unwrap();
        assert_eq!(model.fbc.as_ref().unwrap().strict, Some(true));
        assert_eq!(model.unit_definitions[0].sbase.id.as_deref(), Some(FLUX_UNITS_ID));
        let parameter_ids: Vec<&str> = model
            .parameters
            .iter()
            .filter_map(|p| p.sbase.id.as_deref())
            .collect();
        assert_eq!(
            parameter_ids,
            vec![
                LOWER_BOUND_ID,
                UPPER_BOUND_ID,
                ZERO_BOUND_ID,
                "R_EX_glc__D_e_lower_bound"
            ]
        );

        let species = model.species_by_id("M_glc__D_e").unwrap();
        assert_eq!(species.boundary_condition, Some(false));
        assert_eq!(species.fbc_charge, Some(0));
        assert_eq!(species.sbase.meta_id.as_deref(), Some("meta_M_glc__D_e"));
        assert_eq!(
            species.sbase.cv_terms,
            vec![CvTerm::new(
                Qualifier::Biological(BiologicalQualifier::Is),
                "https://identifiers.org/chebi/CHEBI:17234"
            )]
        );

        let transport = model.reaction("R_GLCt").unwrap();
        assert_eq!(transport.reversible, Some(false));
        assert_eq!(transport.fast, Some(false));
        assert_eq!(transport.lower_flux_bound.as_deref(), Some(ZERO_BOUND_ID));
        assert_eq!(transport.upper_flux_bound.as_deref(), Some(UPPER_BOUND_ID));
        assert_eq!(
            transport
                .gene_product_association
                .as_ref()
                .and_then(|g| g.association.as_ref()),
            Some(&Association::Or(vec![
                Association::And(vec![
                    Association::GeneProductRef("G_b2417".to_string()),
                    Association::GeneProductRef("G_b1621".to_string()),
                ]),
                Association::GeneProductRef("G_b1817__SBML_DOT__1".to_string()),
            ]))
        );

        let pgi = model.reaction("R_PGI").unwrap();
        assert_eq!(pgi.reversible, Some(true));
        assert_eq!(pgi.products[0].stoichiometry, Some(2.));
        assert!(pgi.sbase.notes_string().unwrap().contains("<p>SUBSYSTEM: Glycolysis</p>"));

        let fbc = model.fbc.as_ref().unwrap();
        let objectives = fbc.objectives.as_ref().unwrap();
        assert_eq!(objectives.active_objective.as_deref(), Some(OBJECTIVE_ID));
        assert_eq!(objectives.objectives[0].flux_objectives.len(), 1);
        assert_eq!(
            objectives.objectives[0].flux_objectives[0].reaction.as_deref(),
            Some("R_PGI")
        );
        let crr = fbc.gene_product("G_b2417").unwrap();
        assert_eq!(crr.sbase.name.as_deref(), Some("crr"));
        assert_eq!(crr.label.as_deref(), Some("G_b2417"));

        let group = &model.groups.as_ref().unwrap().groups[0];
        assert_eq!(group.kind, Some(GroupKind::Collection));
        assert_eq!(group.members[0].id_ref.as_deref(), Some("R_PGI"));
        assert_eq!(
            group.members[0].sbase.name.as_deref(),
            Some("Glucose-6-phosphate isomerase")
        );
        assert_eq!(group.members[2].id_ref.as_deref(), Some("G_b4025"));
    }

    #[test]
    fn round_trip() {
        init();
        let mut model = textbook_model();
        model.set_objective_direction(ObjectiveSense::Minimize);
        let sbml = write_sbml_to_string(&model, &SbmlWriteOptions::default()).unwrap();
        let read = read_sbml_model(sbml.as_str(), &SbmlReadOptions::default()).unwrap();

        assert_eq!(read.id, model.id);
        assert_eq!(read.name, model.name);
        assert_eq!(read.compartments, model.compartments);
        assert_eq!(read.metabolites, model.metabolites);
        assert_eq!(read.genes.keys().collect::<Vec<_>>(), model.genes.keys().collect::<Vec<_>>());
        for (id, reaction) in &model.reactions {
            let other = &read.reactions[id];
            assert_eq!(other.metabolites, reaction.metabolites);
            assert_eq!(other.lower_bound, reaction.lower_bound);
            assert_eq!(other.upper_bound, reaction.upper_bound);
            assert_eq!(other.notes, reaction.notes);
            assert_eq!(other.name, reaction.name);
        }
        assert_eq!(
            read.reactions["GLCt"].gene_reaction_rule,
            "( b2417 and b1621 ) or b1817.1"
        );
        assert_eq!(read.reactions["PGI"].gene_reaction_rule, "b4025");
        assert_eq!(read.objective_coefficient("PGI"), 1.);
        assert_eq!(read.objective.sense(), ObjectiveSense::Minimize);
        assert_eq!(read.groups["glycolysis"].members, model.groups["glycolysis"].members);
    }

    #[test]
    fn bound_parameters_are_shared() {
        let mut model = Model::new("shared");
        for i in 0..10 {
            model.add_reaction(ModelReaction::new(&format!("R{i}"))).unwrap();
        }
        let document = model_to_sbml(&model, &SbmlWriteOptions::default());
        let sbml_model = document.model.unwrap();
        assert_eq!(sbml_model.parameters.len(), 3);
        assert!(sbml_model
            .reactions
            .iter()
            .all(|r| r.lower_flux_bound.as_deref() == Some(LOWER_BOUND_ID)));
    }

    #[test]
    fn configured_defaults_and_no_units() {
        let mut model = Model::new("configured");
        let mut reaction = ModelReaction::new("R");
        reaction.lower_bound = -1000.;
        reaction.upper_bound = 100.;
        model.add_reaction(reaction).unwrap();
        let options = SbmlWriteOptions {
            units: false,
            configuration: Configuration {
                lower_bound: -100.,
                upper_bound: 100.,
                ..Default::default()
            },
            ..Default::default()
        };
        let sbml_model = model_to_sbml(&model, &options).model.unwrap();
        assert!(sbml_model.unit_definitions.is_empty());
        assert!(sbml_model.parameters.iter().all(|p| p.units.is_none()));
        assert_eq!(sbml_model.parameter(LOWER_BOUND_ID).unwrap().value, Some(-100.));
        let reaction = &sbml_model.reactions[0];
        assert_eq!(reaction.lower_flux_bound.as_deref(), Some("R_R_lower_bound"));
        assert_eq!(reaction.upper_flux_bound.as_deref(), Some(UPPER_BOUND_ID));
    }

    #[test]
    fn unparsable_rule_and_group_kind() {
        init();
        let mut model = Model::new("lossy");
        let mut reaction = ModelReaction::new("R");
        reaction.gene_reaction_rule = "(g1 and".to_string();
        model.add_reaction(reaction).unwrap();
        let mut group = ModelGroup::new("g");
        group.kind = "bag".to_string();
        group.add_member(GroupMember::Reaction("R".to_string()));
        model.add_group(group).unwrap();

        let sbml_model = model_to_sbml(&model, &SbmlWriteOptions::default()).model.unwrap();
        assert_eq!(sbml_model.reactions[0].gene_product_association, None);
        assert_eq!(
            sbml_model.groups.unwrap().groups[0].kind,
            Some(GroupKind::Collection)
        );
    }

    #[test]
    fn metadata_written_back() {
        init();
        let mut model = Model::new("meta");
        model.meta = Some(SbmlMeta {
            creators: vec![Creator {
                family_name: Some("Doe".to_string()),
                given_name: Some("Jane".to_string()),
                organisation: Some("University".to_string()),
                email: Some("jane@example.org".to_string()),
            }],
            created: Some("2019-03-06T14:40:55Z".to_string()),
            notes: Notes::from([("DESCRIPTION".to_string(), "test".to_string())]),
            ..Default::default()
        });
        let mut buffer = Vec::new();
        write_sbml_to_writer(&model, &mut buffer, &SbmlWriteOptions::default()).unwrap();
        let read = read_sbml_model(
            String::from_utf8(buffer).unwrap(),
            &SbmlReadOptions::default(),
        )
        .unwrap();
        let meta = read.meta.unwrap();
        assert_eq!(meta.creators, model.meta.as_ref().unwrap().creators);
        assert_eq!(meta.created.as_deref(), Some("2019-03-06T14:40:55Z"));
        assert_eq!(meta.notes["DESCRIPTION"], "test");
        assert_eq!(meta.annotation["sbo"], AnnotationValue::Single(SBO_FBA_FRAMEWORK.to_string()));
        assert_eq!(meta.info, "<meta> SBML L3V1, fbc-v2");
    }

    #[test]
    fn write_to_path() {
        init();
        let model = textbook_model();
        let file = tempfile::NamedTempFile::new().unwrap();
        write_sbml_model(&model, file.path(), &SbmlWriteOptions::default()).unwrap();
        let read = read_sbml_model(file.path(), &SbmlReadOptions::default()).unwrap();
        assert_eq!(read.reactions.len(), 3);
        assert_eq!(read.genes["b1817.1"], Gene::new("b1817.1"));
    }
}
