#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::panic,
    clippy::indexing_slicing
)]
//! Integration tests for build triggers, dry runs and restore.
mod common;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use common::{IntegrationTestContext, TestContextBuilder, logger};
use porysync::categories::CategoryKind;
use porysync::exec::{CommandOutput, CommandRunner};
use porysync::model::Value;

mockall::mock! {
    pub Runner {}

    impl CommandRunner for Runner {
        fn run(&self, args: &[String], workdir: &Path) -> Result<CommandOutput>;
    }
}

impl std::fmt::Debug for MockRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockRunner").finish_non_exhaustive()
    }
}

fn status_of(
    manager: &porysync::manager::DataManager,
    kind: CategoryKind,
) -> porysync::manager::CategoryStatus {
    manager
        .status()
        .into_iter()
        .find(|s| s.kind == kind)
        .expect("category enabled")
}

#[test]
fn restore_without_build_is_a_no_op() {
    let ctx = IntegrationTestContext::new();
    let before = ctx.tree();
    let log = logger();
    let mut manager = ctx.manager(&[]);
    assert_eq!(manager.restore_all(&log), 0);
    assert_eq!(ctx.tree(), before);
    assert_eq!(log.failure_count(), 0);
}

#[test]
fn restore_after_build_returns_pristine_tree() {
    let ctx = IntegrationTestContext::new();
    let pristine = ctx.tree();
    let log = logger();
    let mut manager = ctx.manager(&[]);
    manager.load_all(false, &log);
    manager.set_starter_field(0, "level", Value::Int(12)).unwrap();
    manager.persist_all(&log);
    assert_eq!(manager.regenerate_all(false, &log), 3);
    assert_ne!(ctx.tree(), pristine);

    // species_info.h, starter_choose.c, battle_setup.c, pokedex.h and
    // pory_species.h
    assert_eq!(manager.restore_all(&log), 5);
    assert_eq!(ctx.tree(), pristine);
    assert_eq!(manager.restore_all(&log), 0);
    assert_eq!(log.failure_count(), 0);
}

#[test]
fn pokedex_build_only_takes_a_backup() {
    let ctx = IntegrationTestContext::new();
    let log = logger();
    let mut manager = ctx.manager(&["pokedex"]);
    manager.load_all(false, &log);
    manager.regenerate_all(false, &log);
    assert!(ctx.source("include/constants/pokedex.h.bak").exists());
    assert_eq!(ctx.read("include/constants/pokedex.h"), common::POKEDEX_H);
}

#[test]
fn second_build_is_up_to_date() {
    let ctx = IntegrationTestContext::new();
    let log = logger();
    let mut manager = ctx.manager(&["species", "starters"]);
    manager.load_all(false, &log);
    assert_eq!(manager.regenerate_all(false, &log), 2);
    assert!(!status_of(&manager, CategoryKind::Starters).regeneration_due);

    let mut next = ctx.manager(&["species", "starters"]);
    next.load_all(false, &log);
    assert_eq!(next.regenerate_all(false, &log), 0);
    assert!(!status_of(&next, CategoryKind::Species).extraction_due);
}

#[test]
fn dry_run_writes_nothing() {
    let ctx = IntegrationTestContext::new();
    let before = ctx.tree();
    let log = logger();
    let mut manager = ctx.manager(&["starters"]);
    manager.load_all(false, &log);
    assert_eq!(manager.regenerate_all(true, &log), 1);
    assert_eq!(ctx.tree(), before);
    assert!(status_of(&manager, CategoryKind::Starters).regeneration_due);
}

#[test]
fn edits_mark_only_their_category_dirty() {
    let ctx = IntegrationTestContext::new();
    let log = logger();
    let mut manager = ctx.manager(&["starters", "items"]);
    manager.load_all(false, &log);
    manager.set_starter_field(2, "item", Value::from("ITEM_POTION")).unwrap();
    assert!(manager.is_dirty(CategoryKind::Starters));
    assert!(!manager.is_dirty(CategoryKind::Items));
    assert_eq!(manager.persist_all(&log), 1);
    assert!(!manager.is_dirty(CategoryKind::Starters));
}

#[test]
fn up_to_date_documents_skip_the_preprocessor() {
    let ctx = IntegrationTestContext::new();
    let log = logger();
    ctx.manager(&["moves"]).load_all(false, &log);

    let mut runner = MockRunner::new();
    runner.expect_run().never();
    let mut manager = ctx.manager_with(&["moves"], Arc::new(runner));
    manager.load_all(false, &log);
    assert_eq!(log.failure_count(), 0);
    assert_eq!(
        manager.move_description("MOVE_POUND"),
        Some("Pounds the foe with\nforelegs or tail.")
    );
}

#[test]
fn newer_input_triggers_extraction() {
    let ctx = IntegrationTestContext::new();
    let log = logger();
    ctx.manager(&["abilities"]).load_all(false, &log);

    ctx.write(
        "include/constants/abilities.h",
        &format!("{}#define ABILITY_DRIZZLE 2\n", common::ABILITIES_H),
    );
    ctx.touch("include/constants/abilities.h");
    let mut manager = ctx.manager(&["abilities"]);
    assert!(status_of(&manager, CategoryKind::Abilities).extraction_due);
    manager.load_all(false, &log);
    assert_eq!(manager.ability_by_id(2), Some("ABILITY_DRIZZLE"));
}

#[test]
fn missing_backups_trigger_extraction_unless_the_document_was_edited() {
    let ctx = IntegrationTestContext::new();
    let log = logger();
    ctx.manager(&["starters"]).load_all(false, &log);
    assert!(status_of(&ctx.manager(&["starters"]), CategoryKind::Starters).extraction_due);

    let mut editor = ctx.manager(&["starters"]);
    editor.load_all(false, &log);
    editor.set_starter_field(0, "level", Value::Int(12)).unwrap();
    assert_eq!(editor.persist_all(&log), 1);
    ctx.touch_document(&CategoryKind::Starters.document());

    let mut manager = ctx.manager(&["starters"]);
    assert!(!status_of(&manager, CategoryKind::Starters).extraction_due);
    manager.load_all(false, &log);
    assert_eq!(
        manager.starter(0).and_then(|s| s.get("level")),
        Some(&Value::Int(12))
    );
    assert!(!ctx.source("src/starter_choose.c.bak").exists());
    assert_eq!(log.failure_count(), 0);
}

#[test]
fn preprocessor_runs_from_source_dir() {
    let ctx = TestContextBuilder::new()
        .with_config("categories = [\"pokedex\"]\n\n[preprocessor]\ncommand = [\"cpp\"]\ndefines = []\n")
        .build();
    let log = logger();
    let source = ctx.source("");
    let mut runner = MockRunner::new();
    runner
        .expect_run()
        .withf(move |args, workdir| {
            args.first().map(String::as_str) == Some("cpp")
                && args.iter().any(|a| a == "include/constants/pokedex.h")
                && workdir == source.as_path()
        })
        .times(1)
        .returning(|args, workdir| common::InliningPreprocessor.run(args, workdir));

    let config = porysync::config::ProjectConfig::load(ctx.root_path()).unwrap();
    let mut manager = porysync::manager::DataManager::new(
        porysync::project::Project::new(ctx.root_path()),
        &config,
        Arc::new(runner),
    )
    .unwrap();
    manager.load_all(false, &log);
    assert_eq!(log.failure_count(), 0);
}
