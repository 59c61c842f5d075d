//! Console/file logger that collects one summary entry per category step.
use std::path::PathBuf;
use std::sync::Mutex;

use super::types::{Log, Phase, StepEntry, StepStatus};
use super::utils::log_file_path;

/// Implement the display methods of [`Log`] by delegating to inherent methods
/// of the same name on the implementing type.
macro_rules! forward_log_methods {
    ($($method:ident),+ $(,)?) => {
        $(
            fn $method(&self, msg: &str) {
                self.$method(msg);
            }
        )+
    };
}

/// Per-status counters for the summary footer.
#[derive(Debug, Default)]
struct Tally {
    done: u32,
    unchanged: u32,
    skipped: u32,
    dry_run: u32,
    failed: u32,
}

impl Tally {
    /// Count `status` and return its icon and colour.
    const fn add(&mut self, status: StepStatus) -> (&'static str, &'static str) {
        match status {
            StepStatus::Done => {
                self.done += 1;
                ("✓", "\x1b[32m")
            }
            StepStatus::Unchanged => {
                self.unchanged += 1;
                ("·", "\x1b[2m")
            }
            StepStatus::Skipped => {
                self.skipped += 1;
                ("○", "\x1b[33m")
            }
            StepStatus::DryRun => {
                self.dry_run += 1;
                ("~", "\x1b[37m")
            }
            StepStatus::Failed => {
                self.failed += 1;
                ("✗", "\x1b[31m")
            }
        }
    }

    const fn total(&self) -> u32 {
        self.done + self.unchanged + self.skipped + self.dry_run + self.failed
    }
}

/// Logger for one command run.
///
/// Every message also lands in `$XDG_CACHE_HOME/porysync/<command>.log`
/// (via the subscriber's file layer) with timestamps and ANSI codes
/// stripped, regardless of the verbose flag.
#[derive(Debug)]
pub struct Logger {
    steps: Mutex<Vec<StepEntry>>,
    log_file: Option<PathBuf>,
}

impl Logger {
    /// Create a new logger for `command`.
    ///
    /// Only remembers the log file path for the summary; the file itself is
    /// opened by [`init_subscriber`](super::subscriber::init_subscriber).
    #[must_use]
    pub fn new(command: &str) -> Self {
        Self {
            steps: Mutex::new(Vec::new()),
            log_file: log_file_path(command),
        }
    }

    /// Return the log file path, if available.
    #[cfg(test)]
    pub const fn log_path(&self) -> Option<&PathBuf> {
        self.log_file.as_ref()
    }

    /// Every recorded step, in recording order.
    #[must_use]
    pub fn steps(&self) -> Vec<StepEntry> {
        self.steps.lock().map_or_else(|_| vec![], |g| g.clone())
    }

    /// Labels (`build starters`) of the failed steps.
    #[must_use]
    pub fn failed_steps(&self) -> Vec<String> {
        self.steps()
            .iter()
            .filter(|s| s.status == StepStatus::Failed)
            .map(StepEntry::label)
            .collect()
    }

    /// Log an error message.
    pub fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    /// Log a warning message.
    pub fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    /// Log a stage header.
    pub fn stage(&self, msg: &str) {
        tracing::info!(target: "porysync::stage", "{msg}");
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    /// Log a debug message (console only when verbose; always in the file).
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    /// Log what a dry run would have done.
    pub fn dry_run(&self, msg: &str) {
        tracing::info!(target: "porysync::dry_run", "{msg}");
    }

    /// Record the outcome of `phase` for `category`.
    pub fn record_step(&self, phase: Phase, category: &str, status: StepStatus, message: Option<&str>) {
        if let Ok(mut guard) = self.steps.lock() {
            guard.push(StepEntry {
                phase,
                category: category.to_string(),
                status,
                message: message.map(String::from),
            });
        }
    }

    /// Count the failed steps.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.steps.lock().map_or(0, |guard| {
            guard
                .iter()
                .filter(|s| s.status == StepStatus::Failed)
                .count()
        })
    }

    /// Print the recorded steps grouped by phase, then the totals.
    pub fn print_summary(&self) {
        let steps = self.steps();
        if steps.is_empty() {
            return;
        }

        self.stage("Summary");

        let mut phases: Vec<Phase> = steps.iter().map(|s| s.phase).collect();
        phases.sort();
        phases.dedup();

        let mut tally = Tally::default();
        for phase in phases {
            self.info(&format!("\x1b[1m{phase}\x1b[0m"));
            for step in steps.iter().filter(|s| s.phase == phase) {
                let (icon, color) = tally.add(step.status);
                let suffix = step
                    .message
                    .as_ref()
                    .map_or_else(String::new, |msg| format!(" ({msg})"));
                self.info(&format!("  {color}{icon} {}{suffix}\x1b[0m", step.category));
            }
        }

        self.info(&format!(
            "{} steps: \x1b[32m{} done\x1b[0m, \x1b[2m{} unchanged\x1b[0m, \x1b[33m{} skipped\x1b[0m, \x1b[37m{} dry-run\x1b[0m, \x1b[31m{} failed\x1b[0m",
            tally.total(),
            tally.done,
            tally.unchanged,
            tally.skipped,
            tally.dry_run,
            tally.failed
        ));

        if let Some(path) = &self.log_file {
            self.info(&format!("\x1b[2mlog: {}\x1b[0m", path.display()));
        }
    }
}

impl Log for Logger {
    forward_log_methods!(stage, info, debug, warn, error, dry_run);

    fn record_step(&self, phase: Phase, category: &str, status: StepStatus, message: Option<&str>) {
        self.record_step(phase, category, status, message);
    }
}
