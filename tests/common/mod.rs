// Shared helpers for integration tests.
//
// Provides a temporary-directory-backed decomp project, a fluent builder to
// override individual sources, and a fake preprocessor that copies files to
// `processed/` with local `#include`s inlined, so extraction and regeneration
// can run without a C toolchain.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};
use porysync::config::ProjectConfig;
use porysync::exec::{CommandOutput, CommandRunner};
use porysync::logging::Logger;
use porysync::manager::DataManager;
use porysync::project::Project;

pub const POKEDEX_H: &str = "\
#ifndef GUARD_CONSTANTS_POKEDEX_H
#define GUARD_CONSTANTS_POKEDEX_H

enum {
    NATIONAL_DEX_NONE,
    NATIONAL_DEX_BULBASAUR,
    NATIONAL_DEX_IVYSAUR,
    NATIONAL_DEX_VENUSAUR,
    NATIONAL_DEX_TREECKO,
};

enum {
    HOENN_DEX_NONE,
    HOENN_DEX_TREECKO,
};

#endif
";

pub const SPECIES_INFO_H: &str = "\
#include \"species_info/shared_dex_text.h\"

const struct SpeciesInfo gSpeciesInfo[] =
{
    [SPECIES_NONE] = {0},

    #include \"species_info/gen_1_families.h\"
    #include \"species_info/gen_3_families.h\"

    [SPECIES_EGG] =
    {
        .frontPic = gMonFrontPic_Egg,
        .frontPicSize = MON_COORDS_SIZE(24, 24),
    },
};
";

pub const SHARED_DEX_TEXT_H: &str = r#"const u8 gTreeckoPokedexText[] = _(
    "It quickly scales even vertical walls.\n"
    "It senses humidity with its tail.");
"#;

pub const GEN_1_FAMILIES_H: &str = r#"    [SPECIES_BULBASAUR] =
    {
        .baseHP = 45,
        .baseAttack = 49,
        .types = { TYPE_GRASS, TYPE_POISON },
        .genderRatio = min(254, ((12.5 * 255) / 100)),
        .friendship = STANDARD_FRIENDSHIP,
        .abilities = { ABILITY_OVERGROW, ABILITY_NONE, ABILITY_CHLOROPHYLL },
        .speciesName = _("Bulbasaur"),
        .natDexNum = NATIONAL_DEX_BULBASAUR,
        .description = COMPOUND_STRING(
            "A strange seed was planted on its\n"
            "back at birth."),
        .frontPic = gMonFrontPic_Bulbasaur,
        .frontPicSize = MON_COORDS_SIZE(40, 40),
        .flags = SPECIES_FLAG_GENDER_DIFFERENCE | SPECIES_FLAG_CAPTURE,
        .evolutions = EVOLUTION({EVO_LEVEL, 16, SPECIES_IVYSAUR}),
    },

    [SPECIES_IVYSAUR] =
    {
        .baseHP = 60,
        .types = { TYPE_GRASS, TYPE_POISON },
        .genderRatio = min(254, ((50 * 255) / 100)),
        .speciesName = _("Ivysaur"),
        .natDexNum = NATIONAL_DEX_IVYSAUR,
        .evolutions = EVOLUTION({EVO_LEVEL, 32, SPECIES_VENUSAUR}),
    },

    [SPECIES_VENUSAUR] =
    {
        .baseHP = 80,
        .types = { TYPE_GRASS, TYPE_POISON },
        .speciesName = _("Venusaur"),
        .natDexNum = NATIONAL_DEX_VENUSAUR,
    },

    [SPECIES_VENUSAUR_MEGA] =
    {
        .baseHP = 80,
        .baseAttack = 100,
        .natDexNum = NATIONAL_DEX_VENUSAUR,
        .isMegaEvolution = TRUE,
    },
"#;

pub const GEN_3_FAMILIES_H: &str = r#"    [SPECIES_TREECKO] =
    {
        .baseHP = 40,
        .types = { TYPE_GRASS, TYPE_GRASS },
        .genderRatio = MON_GENDERLESS,
        .speciesName = _("Treecko"),
        .natDexNum = NATIONAL_DEX_TREECKO,
        .description = gTreeckoPokedexText,
    },
"#;

pub const ABILITIES_H: &str = "\
#define ABILITY_NONE 0
#define ABILITY_STENCH 1
#define ABILITY_OVERGROW 65
#define ABILITY_CHLOROPHYLL 34
";

pub const ITEMS_H: &str = r#"const struct Item gItems[] =
{
    [ITEM_NONE] =
    {
        .name = _("????????"),
        .price = 0,
    },

    [ITEM_POTION] =
    {
        .name = _("POTION"),
        .price = 300,
        .description = COMPOUND_STRING(
            "Restores the HP of a\n"
            "POKéMON by 20 points."),
    },
};
"#;

pub const CONSTANTS_H: &str = "\
#define TYPE_NONE 255
#define TYPE_NORMAL 0
#define TYPE_GRASS 12 // plants
#define NATURE_HARDY 0
#define EVO_MODE_NORMAL 0
#define EVO_LEVEL 4
#define SHINY_ODDS 16
";

pub const STARTER_CHOOSE_C: &str = "\
#include \"global.h\"

static const u16 sStarterMon[STARTER_MON_COUNT] =
{
    SPECIES_TREECKO,
    SPECIES_BULBASAUR,
    SPECIES_IVYSAUR,
};

u16 GetStarterPokemon(u16 chosenStarterId)
{
    return sStarterMon[chosenStarterId];
}
";

pub const BATTLE_SETUP_C: &str = "\
#include \"global.h\"

static void CB2_GiveStarter(void)
{
    u16 starterMon;

    *GetVarPointer(VAR_STARTER_MON) = gSpecialVar_Result;
    starterMon = GetStarterPokemon(gSpecialVar_Result);
    ScriptGiveMon(starterMon, 5, ITEM_NONE, 0, 0, 0);
    ResetTasks();
}
";

pub const MOVES_H: &str = "\
#define MOVE_NONE 0
#define MOVE_POUND 1
#define MOVE_ABSORB 2
";

pub const MOVE_DESCRIPTIONS_H: &str = r#"static const u8 sPoundDescription[] = _(
    "Pounds the foe with\n"
    "forelegs or tail.");
static const u8 sAbsorbDescription[] = _("An attack that absorbs HP.");

const u8 *const gMoveDescriptionPointers[MOVES_COUNT - 1] =
{
    [MOVE_POUND - 1] = sPoundDescription,
    [MOVE_ABSORB - 1] = sAbsorbDescription,
};
"#;

pub const BATTLE_MOVES_H: &str = "\
const struct BattleMove gBattleMoves[MOVES_COUNT] =
{
    [MOVE_POUND] =
    {
        .effect = EFFECT_HIT,
        .power = 40,
    },
};
";

/// Every source file of the synthetic project, relative to `source/`.
pub const SOURCES: &[(&str, &str)] = &[
    ("include/constants/pokedex.h", POKEDEX_H),
    ("include/config/pokemon.h", "#define P_UPDATED_TYPES GEN_LATEST\n"),
    ("include/config/battle.h", "#define B_UPDATED_MOVE_DATA GEN_LATEST\n"),
    ("include/config/species_enabled.h", "#define P_FAMILY_BULBASAUR TRUE\n"),
    ("src/data/pokemon/species_info.h", SPECIES_INFO_H),
    ("src/data/pokemon/species_info/shared_dex_text.h", SHARED_DEX_TEXT_H),
    ("src/data/pokemon/species_info/gen_1_families.h", GEN_1_FAMILIES_H),
    ("src/data/pokemon/species_info/gen_3_families.h", GEN_3_FAMILIES_H),
    ("include/constants/abilities.h", ABILITIES_H),
    ("src/data/items.h", ITEMS_H),
    ("include/constants/pokemon.h", CONSTANTS_H),
    ("src/starter_choose.c", STARTER_CHOOSE_C),
    ("src/battle_setup.c", BATTLE_SETUP_C),
    ("include/constants/moves.h", MOVES_H),
    ("src/data/text/move_descriptions.h", MOVE_DESCRIPTIONS_H),
    ("src/data/battle_moves.h", BATTLE_MOVES_H),
];

/// Stand-in for `gcc -E`: copies the input to its `-o` path, replacing each
/// `#include "x"` line by the contents of `x` (relative to the including
/// file) when that file exists.
#[derive(Debug, Clone, Copy, Default)]
pub struct InliningPreprocessor;

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|arg| arg == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn inline_includes(path: &Path) -> Result<String> {
    let text = std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut out = String::new();
    for line in text.lines() {
        let included = line
            .trim()
            .strip_prefix("#include \"")
            .and_then(|rest| rest.strip_suffix('"'))
            .map(|rel| dir.join(rel))
            .filter(|target| target.exists());
        match included {
            Some(target) => out.push_str(&inline_includes(&target)?),
            None => {
                out.push_str(line);
                out.push('\n');
            }
        }
    }
    Ok(out)
}

impl CommandRunner for InliningPreprocessor {
    fn run(&self, args: &[String], workdir: &Path) -> Result<CommandOutput> {
        let input = flag_value(args, "-E").context("no -E input")?;
        let output = workdir.join(flag_value(args, "-o").context("no -o output")?);
        let text = inline_includes(&workdir.join(input))?;
        if let Some(parent) = output.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&output, text)?;
        Ok(CommandOutput {
            success: true,
            code: Some(0),
            lines: Vec::new(),
        })
    }
}

/// A preprocessor that always exits non-zero without writing anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingPreprocessor;

impl CommandRunner for FailingPreprocessor {
    fn run(&self, _args: &[String], _workdir: &Path) -> Result<CommandOutput> {
        Ok(CommandOutput {
            success: false,
            code: Some(1),
            lines: vec!["fatal error: no input files".to_string()],
        })
    }
}

/// An isolated decomp project backed by a [`tempfile::TempDir`].
///
/// The directory is automatically deleted when dropped.
pub struct IntegrationTestContext {
    /// Temporary directory containing `source/`, `processed/` and `data/`.
    pub root: tempfile::TempDir,
}

impl IntegrationTestContext {
    /// Create a project with every file in [`SOURCES`].
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("create temp dir");
        let ctx = Self { root };
        for (rel, text) in SOURCES {
            ctx.write(rel, text);
        }
        ctx
    }

    /// Path to the project root.
    pub fn root_path(&self) -> &Path {
        self.root.path()
    }

    /// Absolute path of `rel` under `source/`.
    pub fn source(&self, rel: &str) -> PathBuf {
        self.root.path().join("source").join(rel)
    }

    /// Read `rel` under `source/`.
    pub fn read(&self, rel: &str) -> String {
        std::fs::read_to_string(self.source(rel)).expect("read source file")
    }

    /// Write `rel` under `source/`, creating parents.
    pub fn write(&self, rel: &str, text: &str) {
        let path = self.source(rel);
        std::fs::create_dir_all(path.parent().expect("source parent")).expect("create parent");
        std::fs::write(path, text).expect("write source file");
    }

    /// Snapshot of every file under `source/`, sorted by path.
    pub fn tree(&self) -> Vec<(PathBuf, String)> {
        fn walk(dir: &Path, out: &mut Vec<(PathBuf, String)>) {
            for entry in std::fs::read_dir(dir).expect("read dir") {
                let path = entry.expect("dir entry").path();
                if path.is_dir() {
                    walk(&path, out);
                } else {
                    let text = std::fs::read_to_string(&path).expect("read file");
                    out.push((path, text));
                }
            }
        }
        let mut out = Vec::new();
        walk(&self.root.path().join("source"), &mut out);
        out.sort();
        out
    }

    /// Push the mtime of `source/<rel>` well past anything written so far.
    pub fn touch(&self, rel: &str) {
        push_mtime(&self.source(rel));
    }

    /// Same as [`Self::touch`] for the document `data/<name>`.
    pub fn touch_document(&self, name: &str) {
        push_mtime(&self.root.path().join("data").join(name));
    }

    /// A manager for `categories` (all when empty) using `runner`.
    pub fn manager_with(&self, categories: &[&str], runner: Arc<dyn CommandRunner>) -> DataManager {
        let config = ProjectConfig {
            categories: (!categories.is_empty())
                .then(|| categories.iter().map(ToString::to_string).collect()),
            ..ProjectConfig::default()
        };
        DataManager::new(Project::new(self.root.path()), &config, runner).expect("build manager")
    }

    /// A manager for `categories` (all when empty) using the inlining
    /// preprocessor.
    pub fn manager(&self, categories: &[&str]) -> DataManager {
        self.manager_with(categories, Arc::new(InliningPreprocessor))
    }
}

fn push_mtime(path: &Path) {
    let later = std::time::SystemTime::now() + std::time::Duration::from_secs(60);
    std::fs::File::options()
        .write(true)
        .open(path)
        .and_then(|file| file.set_modified(later))
        .expect("set mtime");
}

/// Fluent builder for [`IntegrationTestContext`].
///
/// Allows individual tests to override sources before the context is
/// finalised without modifying the shared setup.
pub struct TestContextBuilder {
    ctx: IntegrationTestContext,
}

impl TestContextBuilder {
    /// Begin building a new context backed by the full synthetic project.
    pub fn new() -> Self {
        Self {
            ctx: IntegrationTestContext::new(),
        }
    }

    /// Replace `source/<rel>` with `content`.
    pub fn with_source(self, rel: &str, content: &str) -> Self {
        self.ctx.write(rel, content);
        self
    }

    /// Write `porysync.toml` at the project root.
    pub fn with_config(self, content: &str) -> Self {
        std::fs::write(self.ctx.root.path().join("porysync.toml"), content)
            .expect("write porysync.toml");
        self
    }

    /// Finish building and return the configured context.
    pub fn build(self) -> IntegrationTestContext {
        self.ctx
    }
}

/// A logger for one test. Without an installed subscriber its events are
/// dropped, but summary entries are still recorded.
pub fn logger() -> Logger {
    Logger::new("test")
}
