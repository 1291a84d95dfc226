use crate::writer::{SkipReason, WriteOutcome};
use colored::Colorize;
use std::path::{Path, PathBuf};

/// What happened at one path during a scaffold run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// A directory was created.
    Mkdir,
    /// A file was written or skipped.
    File(WriteOutcome),
    /// A generated file was rewritten into this path and removed from `from`.
    Moved { from: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportEntry {
    pub path: PathBuf,
    pub action: Action,
}

/// Ordered record of everything a scaffold run did, or chose not to do.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    pub entries: Vec<ReportEntry>,
}
impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn directories(&mut self, created: Vec<PathBuf>) {
        self.entries.extend(created.into_iter().map(|path| ReportEntry {
            path,
            action: Action::Mkdir,
        }));
    }

    pub fn file(&mut self, path: PathBuf, outcome: WriteOutcome) {
        self.entries.push(ReportEntry {
            path,
            action: Action::File(outcome),
        });
    }

    pub fn moved(&mut self, from: PathBuf, to: PathBuf) {
        self.entries.push(ReportEntry {
            path: to,
            action: Action::Moved { from },
        });
    }

    /// Files written by this run.
    pub fn written(&self) -> Vec<&Path> {
        self.paths_where(|action| matches!(action, Action::File(WriteOutcome::Written)))
    }

    /// Files left alone because something already existed at their path.
    pub fn conflicts(&self) -> Vec<&Path> {
        self.paths_where(|action| {
            matches!(
                action,
                Action::File(WriteOutcome::Skipped(SkipReason::AlreadyExists))
            )
        })
    }

    pub fn relocated(&self) -> Vec<&Path> {
        self.paths_where(|action| matches!(action, Action::Moved { .. }))
    }

    fn paths_where(&self, predicate: impl Fn(&Action) -> bool) -> Vec<&Path> {
        self.entries
            .iter()
            .filter(|entry| predicate(&entry.action))
            .map(|entry| entry.path.as_path())
            .collect()
    }

    /// Prints one line per file, coloured by outcome. Templates that do not
    /// exist are only logged.
    pub fn print(&self) {
        for entry in &self.entries {
            match &entry.action {
                Action::Mkdir => log::debug!("mkdir {}", entry.path.display()),
                Action::File(WriteOutcome::Written) => {
                    println!("{} {}", "create".green(), entry.path.display())
                }
                Action::File(WriteOutcome::Skipped(SkipReason::AlreadyExists)) => {
                    println!("{} {}", "skip".yellow(), entry.path.display())
                }
                Action::File(WriteOutcome::Skipped(SkipReason::MissingTemplate)) => {
                    log::info!("no stub for {}", entry.path.display())
                }
                Action::Moved { from } => println!(
                    "{} {} -> {}",
                    "move".blue(),
                    from.display(),
                    entry.path.display()
                ),
            }
        }
    }
}
