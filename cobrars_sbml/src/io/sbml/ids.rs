//! Conversion between model identifiers and SBML identifiers
//!
//! SBML ids can not contain `.` and are conventionally prefixed by the kind of component
//! (`G_` genes, `M_` metabolites, `R_` reactions).
use indexmap::IndexMap;

/// Escape sequence standing in for `.` in SBML gene ids
pub const SBML_DOT: &str = "__SBML_DOT__";

/// Which identifier transformation to apply
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IdReplacement {
    /// SBML gene product id to gene id
    Gene,
    /// Gene id to SBML gene product id
    GeneRev,
    /// SBML species id to metabolite id
    Specie,
    /// Metabolite id to SBML species id
    SpecieRev,
    /// SBML reaction id to reaction id
    Reaction,
    /// Reaction id to SBML reaction id
    ReactionRev,
}

/// Set of identifier transformations used while reading and writing
///
/// Kinds without a function leave identifiers unchanged.
#[derive(Clone, Debug)]
pub struct IdReplacements {
    functions: IndexMap<IdReplacement, fn(&str) -> String>,
}

impl Default for IdReplacements {
    fn default() -> Self {
        let functions: IndexMap<IdReplacement, fn(&str) -> String> = IndexMap::from([
            (IdReplacement::Gene, strip_gene as fn(&str) -> String),
            (IdReplacement::GeneRev, restore_gene),
            (IdReplacement::Specie, strip_species),
            (IdReplacement::SpecieRev, restore_species),
            (IdReplacement::Reaction, strip_reaction),
            (IdReplacement::ReactionRev, restore_reaction),
        ]);
        IdReplacements { functions }
    }
}

impl IdReplacements {
    /// Leave every identifier unchanged
    pub fn none() -> Self {
        IdReplacements {
            functions: IndexMap::new(),
        }
    }

    /// Replace (or add) the transformation for one kind
    pub fn set(&mut self, kind: IdReplacement, function: fn(&str) -> String) {
        self.functions.insert(kind, function);
    }

    /// Remove the transformation for one kind
    pub fn unset(&mut self, kind: IdReplacement) {
        self.functions.shift_remove(&kind);
    }

    /// Transform `id`
    pub fn apply(&self, kind: IdReplacement, id: &str) -> String {
        match self.functions.get(&kind) {
            Some(function) => function(id),
            None => id.to_string(),
        }
    }
}

/// Remove `prefix` from `id` if present
pub fn strip_prefix(id: &str, prefix: &str) -> String {
    id.strip_prefix(prefix).unwrap_or(id).to_string()
}

/// Prepend `prefix` to `id`
pub fn add_prefix(id: &str, prefix: &str) -> String {
    format!("{prefix}{id}")
}

pub fn strip_gene(id: &str) -> String {
    strip_prefix(&id.replace(SBML_DOT, "."), "G_")
}

pub fn restore_gene(id: &str) -> String {
    add_prefix(&id.replace('.', SBML_DOT), "G_")
}

pub fn strip_species(id: &str) -> String {
    strip_prefix(id, "M_")
}

pub fn restore_species(id: &str) -> String {
    add_prefix(id, "M_")
}

pub fn strip_reaction(id: &str) -> String {
    strip_prefix(id, "R_")
}

pub fn restore_reaction(id: &str) -> String {
    add_prefix(id, "R_")
}
