//! Data categories and their static registry.
//!
//! Each category pairs an [`Extractor`] with an optional [`Generator`] and
//! declares the source files it reads and rewrites. Categories are looked up
//! through [`REGISTRY`]; there is no dynamic discovery.
pub mod abilities;
pub mod constants;
pub mod items;
pub mod moves;
pub mod pokedex;
pub mod species;
pub mod starters;

use std::fmt;

use crate::codegen::Generator;
use crate::extract::Extractor;
use crate::project::Project;
use crate::resources::{FileBinding, GeneratedFile};

/// Identifies one slice of project data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CategoryKind {
    /// Species, their forms and gameplay fields.
    Species,
    /// Ability ids.
    Abilities,
    /// Item table.
    Items,
    /// Pokémon constant groups.
    Constants,
    /// Starter choices.
    Starters,
    /// Move ids, descriptions and battle data.
    Moves,
    /// National and regional dex order.
    Pokedex,
}

impl CategoryKind {
    /// Every category in registry order.
    pub const ALL: &'static [Self] = &[
        Self::Species,
        Self::Abilities,
        Self::Items,
        Self::Constants,
        Self::Starters,
        Self::Moves,
        Self::Pokedex,
    ];

    /// Stable identifier used on the command line and in document names.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Species => "species",
            Self::Abilities => "abilities",
            Self::Items => "items",
            Self::Constants => "constants",
            Self::Starters => "starters",
            Self::Moves => "moves",
            Self::Pokedex => "pokedex",
        }
    }

    /// Parse an identifier.
    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.id() == id)
    }

    /// File name of the canonical document under `data/`.
    #[must_use]
    pub fn document(self) -> String {
        format!("{}.json", self.id())
    }
}

impl fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// A category bound to a project.
pub struct CategoryDef {
    /// Which category this is.
    pub kind: CategoryKind,
    /// Source files (relative to `source/`) the extractor reads.
    pub inputs: Vec<String>,
    /// Hand-authored files rewritten in place, with their backups.
    pub bindings: Vec<FileBinding>,
    /// Files owned entirely by the generator.
    pub generated: Vec<GeneratedFile>,
    /// Source to records.
    pub extractor: Box<dyn Extractor>,
    /// Records to source; `None` for read-only categories.
    pub generator: Option<Box<dyn Generator>>,
}

impl fmt::Debug for CategoryDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CategoryDef")
            .field("kind", &self.kind)
            .field("inputs", &self.inputs)
            .field("bindings", &self.bindings)
            .field("generated", &self.generated)
            .field("generator", &self.generator.is_some())
            .finish_non_exhaustive()
    }
}

impl CategoryDef {
    /// A category with no bindings and no generator.
    #[must_use]
    pub fn read_only(kind: CategoryKind, inputs: &[&str], extractor: Box<dyn Extractor>) -> Self {
        Self {
            kind,
            inputs: inputs.iter().map(ToString::to_string).collect(),
            bindings: Vec::new(),
            generated: Vec::new(),
            extractor,
            generator: None,
        }
    }

    /// Bind `rels` as rewritten originals.
    #[must_use]
    pub fn with_bindings(mut self, project: &Project, rels: &[&str]) -> Self {
        self.bindings = rels.iter().map(|rel| FileBinding::new(project, rel)).collect();
        self
    }

    /// Declare `rels` as generated files.
    #[must_use]
    pub fn with_generated(mut self, project: &Project, rels: &[&str]) -> Self {
        self.generated = rels.iter().map(|rel| GeneratedFile::new(project, rel)).collect();
        self
    }

    /// Attach a generator.
    #[must_use]
    pub fn with_generator(mut self, generator: Box<dyn Generator>) -> Self {
        self.generator = Some(generator);
        self
    }
}

/// Builds a category for a project.
pub type Constructor = fn(&Project) -> CategoryDef;

/// Every category and its constructor, in registry order.
pub static REGISTRY: &[(CategoryKind, Constructor)] = &[
    (CategoryKind::Species, species::category),
    (CategoryKind::Abilities, abilities::category),
    (CategoryKind::Items, items::category),
    (CategoryKind::Constants, constants::category),
    (CategoryKind::Starters, starters::category),
    (CategoryKind::Moves, moves::category),
    (CategoryKind::Pokedex, pokedex::category),
];

/// Construct `kind` for `project`.
#[must_use]
pub fn build(kind: CategoryKind, project: &Project) -> Option<CategoryDef> {
    REGISTRY
        .iter()
        .find(|(registered, _)| *registered == kind)
        .map(|(_, constructor)| constructor(project))
}
