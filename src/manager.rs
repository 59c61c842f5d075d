//! Orchestration of every enabled category: extraction, persistence,
//! regeneration with rollback, restore, and record access.
//!
//! Each operation walks the categories in registry order and records one
//! [`Phase`] step per category. A failing category is logged and recorded,
//! and the walk continues.
//!
//! Triggers are decided from the files on disk so they hold across
//! processes:
//!
//! - **extraction** is due when the document is absent, strictly older than
//!   an input, or a backup is missing while the document carries no edits
//!   newer than the inputs;
//! - **regeneration** is due when the records are dirty, a bound or
//!   generated file is missing, or (for categories with a generator) the
//!   document is strictly newer than a written file.
//!
//! A successful extraction stamps the document with the newest input mtime;
//! a successful regeneration stamps the document and every written file with
//! one common time. Neither state then looks stale to the other.
use std::sync::Arc;
use std::time::SystemTime;

use anyhow::{Context as _, Result, bail};

use crate::categories::{self, CategoryDef, CategoryKind, abilities, moves, species, starters};
use crate::codegen::GenerateContext;
use crate::config::ProjectConfig;
use crate::error::GenerationError;
use crate::exec::CommandRunner;
use crate::expr::ConstantTable;
use crate::expr::conditional::resolve_value;
use crate::extract::ExtractContext;
use crate::logging::{Log, Phase, StepStatus};
use crate::model::{Record, Value};
use crate::preprocess::Preprocessor;
use crate::project::Project;
use crate::resources::binding::{ensure_backups, restore};
use crate::resources::{Resource, ResourceState};
use crate::resources::helpers::fs::{modified, set_modified};
use crate::store::RecordStore;

/// Result of one category step that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Outcome {
    Done(Option<String>),
    Unchanged(String),
    Skipped(String),
    DryRun,
}

/// Record `result` as the outcome of `phase` for `category`, logging
/// failures.
fn record(log: &dyn Log, phase: Phase, category: &str, result: Result<Outcome>) {
    match result {
        Ok(Outcome::Done(detail)) => log.record_step(phase, category, StepStatus::Done, detail.as_deref()),
        Ok(Outcome::Unchanged(reason)) => {
            log.debug(&format!("{phase} {category}: {reason}"));
            log.record_step(phase, category, StepStatus::Unchanged, Some(&reason));
        }
        Ok(Outcome::Skipped(reason)) => {
            log.warn(&format!("{phase} {category}: {reason}"));
            log.record_step(phase, category, StepStatus::Skipped, Some(&reason));
        }
        Ok(Outcome::DryRun) => log.record_step(phase, category, StepStatus::DryRun, None),
        Err(e) => {
            log.error(&format!("{phase} {category}: {e:#}"));
            log.record_step(phase, category, StepStatus::Failed, Some(&format!("{e:#}")));
        }
    }
}

/// Snapshot of one category's state, for `status`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryStatus {
    /// Category.
    pub kind: CategoryKind,
    /// Top-level records in the document.
    pub records: usize,
    /// Records differ from the document on disk.
    pub dirty: bool,
    /// A load would extract.
    pub extraction_due: bool,
    /// A build would regenerate.
    pub regeneration_due: bool,
}

/// One managed category: its definition, document, and whether its records
/// may be used.
#[derive(Debug)]
struct Category {
    def: CategoryDef,
    store: RecordStore,
    trusted: bool,
}

impl Category {
    fn id(&self) -> &'static str {
        self.def.kind.id()
    }

    fn doc_mtime(&self) -> Option<SystemTime> {
        modified(self.store.path())
    }

    fn newest_input(&self, project: &Project) -> Option<SystemTime> {
        self.def
            .inputs
            .iter()
            .filter_map(|rel| modified(&project.source_path(rel)))
            .max()
    }

    fn backups_complete(&self) -> bool {
        self.def.bindings.iter().all(|b| b.backup.exists())
    }

    fn files_complete(&self) -> bool {
        self.def
            .bindings
            .iter()
            .map(|b| b as &dyn Resource)
            .chain(self.def.generated.iter().map(|g| g as &dyn Resource))
            .all(|r| matches!(r.current_state(), Ok(ResourceState::Correct)))
    }

    /// Every file a regeneration writes.
    fn written_paths(&self) -> impl Iterator<Item = &std::path::Path> {
        self.def
            .bindings
            .iter()
            .map(|b| b.original.as_path())
            .chain(self.def.generated.iter().map(|g| g.path.as_path()))
    }

    fn extraction_due(&self, project: &Project) -> bool {
        let Some(doc) = self.doc_mtime() else {
            return true;
        };
        let newest = self.newest_input(project);
        if newest.is_some_and(|input| doc < input) {
            return true;
        }
        let has_edits = newest.is_some_and(|input| doc > input);
        !self.backups_complete() && !has_edits
    }

    /// The document was saved after the last regeneration.
    fn pending(&self) -> bool {
        if self.def.generator.is_none() {
            return false;
        }
        let Some(doc) = self.doc_mtime() else {
            return false;
        };
        self.written_paths()
            .filter_map(modified)
            .any(|written| doc > written)
    }

    fn regeneration_due(&self) -> bool {
        self.store.is_dirty() || !self.files_complete() || self.pending()
    }

    fn extract(&mut self, ctx: &ExtractContext<'_>) -> Result<Outcome> {
        let extraction = match self.def.extractor.extract(ctx) {
            Ok(extraction) => extraction,
            Err(e) if self.store.path().exists() => {
                self.store = RecordStore::load(self.store.path())?;
                self.trusted = true;
                return Ok(Outcome::Skipped(format!(
                    "extraction failed, keeping previous document: {e:#}"
                )));
            }
            Err(e) => {
                self.trusted = false;
                return Err(e);
            }
        };
        extraction.report.log(self.id(), ctx.log);
        let count = extraction.records.len();
        self.store.replace(extraction.records);
        self.store.force_save()?;
        if let Some(newest) = self.newest_input(ctx.project) {
            set_modified(self.store.path(), newest)?;
        }
        self.trusted = true;
        Ok(Outcome::Done(Some(format!("{count} records"))))
    }

    fn load(&mut self, ctx: &ExtractContext<'_>, force: bool) -> Result<Outcome> {
        if force || self.extraction_due(ctx.project) {
            return self.extract(ctx);
        }
        self.store = RecordStore::load(self.store.path())?;
        self.trusted = true;
        Ok(Outcome::Unchanged("document up to date".to_string()))
    }

    fn generate_once(&self, ctx: &GenerateContext<'_>) -> Result<()> {
        ensure_backups(&self.def.bindings)?;
        match &self.def.generator {
            Some(generator) => generator.generate(self.store.records(), ctx),
            None => Ok(()),
        }
    }

    fn rollback(&self) -> Result<()> {
        restore(&self.def.bindings, &self.def.generated)
            .with_context(|| format!("restoring {}", self.id()))?;
        Ok(())
    }

    /// Regenerate with one retry from a restored tree.
    fn regenerate(&mut self, ctx: &GenerateContext<'_>) -> Result<()> {
        self.store.save()?;
        if let Err(first) = self.generate_once(ctx) {
            ctx.log.warn(&format!(
                "{}: generation failed, restoring and retrying: {first:#}",
                self.id()
            ));
            self.rollback()?;
            if let Err(second) = self.generate_once(ctx) {
                self.rollback()?;
                return Err(GenerationError::Fatal {
                    category: self.id().to_string(),
                    reason: format!("{second:#}"),
                }
                .into());
            }
        }
        self.stamp()
    }

    /// Give the document and every written file one common mtime.
    fn stamp(&self) -> Result<()> {
        let now = SystemTime::now();
        for path in self.written_paths().filter(|p| p.exists()) {
            set_modified(path, now)?;
        }
        set_modified(self.store.path(), now)
    }
}

/// Every enabled category of one project.
#[derive(Debug)]
pub struct DataManager {
    project: Project,
    constants: ConstantTable,
    preprocessor: Preprocessor,
    categories: Vec<Category>,
}

impl DataManager {
    /// Build the category table from `config`. Nothing is read yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration names an unknown category.
    pub fn new(project: Project, config: &ProjectConfig, runner: Arc<dyn CommandRunner>) -> Result<Self> {
        let categories = config
            .enabled_categories()?
            .into_iter()
            .filter_map(|kind| categories::build(kind, &project))
            .map(|def| Category {
                store: RecordStore::empty(&project.document_path(&def.kind.document())),
                def,
                trusted: false,
            })
            .collect();
        Ok(Self {
            preprocessor: Preprocessor::new(runner, config.preprocessor.clone()),
            constants: config.generation.constants.clone(),
            project,
            categories,
        })
    }

    /// Project layout.
    #[must_use]
    pub const fn project(&self) -> &Project {
        &self.project
    }

    /// Enabled categories in registry order.
    pub fn kinds(&self) -> impl Iterator<Item = CategoryKind> + '_ {
        self.categories.iter().map(|c| c.def.kind)
    }

    /// Load every category: extract where due (always with `force`),
    /// otherwise read the document.
    pub fn load_all(&mut self, force: bool, log: &dyn Log) {
        let ctx = ExtractContext {
            project: &self.project,
            preprocessor: &self.preprocessor,
            log,
        };
        for category in &mut self.categories {
            let id = category.id();
            log.stage(&format!("{} {id}", Phase::Extract));
            let result = category.load(&ctx, force);
            record(log, Phase::Extract, id, result);
        }
    }

    /// Read every document without extracting.
    pub fn open_documents(&mut self, log: &dyn Log) {
        for category in &mut self.categories {
            let id = category.id();
            let result = RecordStore::load(category.store.path()).map(|store| {
                category.trusted = store.path().exists();
                category.store = store;
                if category.trusted {
                    Outcome::Done(None)
                } else {
                    Outcome::Unchanged("no document".to_string())
                }
            });
            record(log, Phase::Load, id, result);
        }
    }

    /// Save every dirty document. Returns how many were written.
    pub fn persist_all(&mut self, log: &dyn Log) -> usize {
        let mut written = 0;
        for category in self.categories.iter_mut().filter(|c| c.trusted) {
            let id = category.id();
            let result = category.store.save().map(|saved| {
                if saved {
                    written += 1;
                    Outcome::Done(None)
                } else {
                    Outcome::Unchanged("no edits".to_string())
                }
            });
            record(log, Phase::Persist, id, result);
        }
        written
    }

    /// Regenerate every category whose trigger holds. Returns how many were
    /// regenerated (or, with `dry_run`, would be).
    pub fn regenerate_all(&mut self, dry_run: bool, log: &dyn Log) -> usize {
        let mut count = 0;
        for category in &mut self.categories {
            let id = category.id();
            if !category.trusted {
                record(log, Phase::Build, id, Ok(Outcome::Skipped("records not loaded".to_string())));
                continue;
            }
            if !category.regeneration_due() {
                record(log, Phase::Build, id, Ok(Outcome::Unchanged("up to date".to_string())));
                continue;
            }
            count += 1;
            if dry_run {
                log.dry_run(&format!("would regenerate {id}"));
                record(log, Phase::Build, id, Ok(Outcome::DryRun));
                continue;
            }
            log.stage(&format!("{} {id}", Phase::Build));
            let ctx = GenerateContext {
                project: &self.project,
                constants: &self.constants,
                log,
            };
            let result = category.regenerate(&ctx).map(|()| Outcome::Done(None));
            record(log, Phase::Build, id, result);
        }
        count
    }

    /// Regenerate one category regardless of its trigger.
    ///
    /// # Errors
    ///
    /// Returns an error if the category is not enabled or not loaded, or
    /// regeneration fails after its retry.
    pub fn regenerate(&mut self, kind: CategoryKind, log: &dyn Log) -> Result<()> {
        let ctx = GenerateContext {
            project: &self.project,
            constants: &self.constants,
            log,
        };
        let category = self
            .categories
            .iter_mut()
            .find(|c| c.def.kind == kind)
            .with_context(|| format!("category '{kind}' is not enabled"))?;
        if !category.trusted {
            bail!("category '{kind}' has no trusted records");
        }
        category.regenerate(&ctx)
    }

    /// Put every original back and delete every generated file. Returns how
    /// many files were touched.
    pub fn restore_all(&mut self, log: &dyn Log) -> usize {
        let mut touched = 0;
        for category in &self.categories {
            let id = category.id();
            let result = restore(&category.def.bindings, &category.def.generated).map(|n| {
                touched += n;
                if n == 0 {
                    Outcome::Unchanged("nothing to restore".to_string())
                } else {
                    Outcome::Done(Some(format!("{n} files")))
                }
            });
            record(log, Phase::Restore, id, result);
        }
        touched
    }

    /// Trigger state of every category, from the documents on disk.
    #[must_use]
    pub fn status(&self) -> Vec<CategoryStatus> {
        self.categories
            .iter()
            .map(|c| CategoryStatus {
                kind: c.def.kind,
                records: c.store.records().len(),
                dirty: c.store.is_dirty(),
                extraction_due: c.extraction_due(&self.project),
                regeneration_due: c.regeneration_due(),
            })
            .collect()
    }

    fn category(&self, kind: CategoryKind) -> Option<&Category> {
        self.categories
            .iter()
            .find(|c| c.def.kind == kind && c.trusted)
    }

    fn category_mut(&mut self, kind: CategoryKind) -> Result<&mut Category> {
        self.categories
            .iter_mut()
            .find(|c| c.def.kind == kind && c.trusted)
            .with_context(|| format!("category '{kind}' is not loaded"))
    }

    /// Records of a loaded category.
    #[must_use]
    pub fn records(&self, kind: CategoryKind) -> Option<&Record> {
        self.category(kind).map(|c| c.store.records())
    }

    /// Whether a loaded category has unsaved changes.
    #[must_use]
    pub fn is_dirty(&self, kind: CategoryKind) -> bool {
        self.category(kind).is_some_and(|c| c.store.is_dirty())
    }

    /// Value at `path` inside a category.
    #[must_use]
    pub fn get(&self, kind: CategoryKind, path: &[&str]) -> Option<&Value> {
        self.records(kind)?.get_path(path)
    }

    /// Set the value at `path`, creating intermediate records. Returns the
    /// previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the category is not loaded or the path crosses a
    /// non-record value.
    pub fn set(&mut self, kind: CategoryKind, path: &[&str], value: Value) -> Result<Option<Value>> {
        let category = self.category_mut(kind)?;
        let records = category.store.records_mut();
        if let Some((_, parents)) = path.split_last() {
            for depth in 1..=parents.len() {
                let prefix = parents.get(..depth).unwrap_or_default();
                if let Some(existing) = records.get_path(prefix)
                    && existing.as_record().is_none()
                {
                    bail!("'{}' is not a record", prefix.join("."));
                }
            }
        }
        Ok(records.set_path(path, value))
    }

    /// Save one category now.
    ///
    /// # Errors
    ///
    /// Returns an error if the category is not loaded or the document cannot
    /// be written.
    pub fn save(&mut self, kind: CategoryKind) -> Result<bool> {
        self.category_mut(kind)?.store.save()
    }

    /// A `species_info` field with defaults and conditionals resolved.
    #[must_use]
    pub fn species_info(&self, species: &str, key: &str, form: Option<&str>, index: Option<usize>) -> Value {
        self.records(CategoryKind::Species).map_or_else(
            || species::default_value(key),
            |records| species::info_value(records, species, key, form, index, &self.constants),
        )
    }

    /// Set a `species_info` field of a species or form.
    ///
    /// # Errors
    ///
    /// Returns an error if species are not loaded or the species/form is
    /// unknown.
    pub fn set_species_info(&mut self, species: &str, key: &str, value: Value, form: Option<&str>) -> Result<()> {
        let category = self.category_mut(CategoryKind::Species)?;
        let info = species::info_mut(category.store.records_mut(), species, form)
            .with_context(|| format!("unknown species {species}"))?;
        info.insert(key, value);
        Ok(())
    }

    /// Species whose dex constant is `dex_constant`.
    #[must_use]
    pub fn species_by_dex_constant(&self, dex_constant: &str) -> Option<&str> {
        species::by_dex_constant(self.records(CategoryKind::Species)?, dex_constant)
    }

    /// Ability constant in slot `index` of a species or form.
    #[must_use]
    pub fn species_ability(&self, species: &str, index: usize, form: Option<&str>) -> String {
        self.records(CategoryKind::Species).map_or_else(
            || "ABILITY_NONE".to_string(),
            |records| {
                species::ability(records, self.records(CategoryKind::Abilities), species, index, form)
            },
        )
    }

    /// Ability constant with numeric id `id`.
    #[must_use]
    pub fn ability_by_id(&self, id: i64) -> Option<&str> {
        abilities::by_id(self.records(CategoryKind::Abilities)?, id)
    }

    /// An item record.
    #[must_use]
    pub fn item(&self, item: &str) -> Option<&Record> {
        self.records(CategoryKind::Items)?.record(item)
    }

    /// A constant from one of the named groups (`types`, `natures`, …) or
    /// a top-level scalar when `group` is `None`, with conditionals
    /// resolved.
    #[must_use]
    pub fn constant(&self, group: Option<&str>, name: &str) -> Option<Value> {
        let records = self.records(CategoryKind::Constants)?;
        let value = match group {
            Some(group) => records.get_path(&[group, name]),
            None => records.get(name),
        }?;
        Some(resolve_value(value, &self.constants))
    }

    /// Starter record in `slot`.
    #[must_use]
    pub fn starter(&self, slot: usize) -> Option<&Record> {
        self.records(CategoryKind::Starters)?.record(&slot.to_string())
    }

    /// Set one field of the starter in `slot`.
    ///
    /// # Errors
    ///
    /// Returns an error if starters are not loaded, the slot does not exist
    /// or the field is not a starter field.
    pub fn set_starter_field(&mut self, slot: usize, key: &str, value: Value) -> Result<()> {
        if !starters::FIELDS.contains(&key) {
            bail!("unknown starter field '{key}'");
        }
        let category = self.category_mut(CategoryKind::Starters)?;
        let starter = category
            .store
            .records_mut()
            .record_mut(&slot.to_string())
            .with_context(|| format!("no starter in slot {slot}"))?;
        starter.insert(key, value);
        Ok(())
    }

    /// Description text of a move.
    #[must_use]
    pub fn move_description(&self, move_id: &str) -> Option<&str> {
        moves::description(self.records(CategoryKind::Moves)?, move_id)
    }

    /// National dex order.
    #[must_use]
    pub fn national_dex(&self) -> Vec<&str> {
        self.dex("national_dex")
    }

    /// Regional dex order.
    #[must_use]
    pub fn regional_dex(&self) -> Vec<&str> {
        self.dex("regional_dex")
    }

    fn dex(&self, key: &str) -> Vec<&str> {
        self.get(CategoryKind::Pokedex, &[key])
            .and_then(Value::as_list)
            .map(|list| list.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }
}
