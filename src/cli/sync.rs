//! Sync command - converge the store onto a directory of secret files.

use std::path::Path;

use tracing::info;

use crate::cli::output::{Change, Printer};
use crate::core::config::Settings;
use crate::core::domain::{ChangeSummary, NamespaceChanges};
use crate::core::store;
use crate::core::sync::{Reporter, SyncOptions, Syncer};
use crate::error::{Error, Result};

/// Prints sync progress to the terminal.
struct TerminalReporter<'a> {
    printer: &'a Printer,
}

impl Reporter for TerminalReporter<'_> {
    fn namespace_started(&mut self, namespace: &str, _file: &Path) {
        self.printer.header(namespace);
    }

    fn changes(&mut self, summary: &ChangeSummary, dry_run: bool) {
        if summary.is_empty() {
            self.printer.dimmed("  no changes");
            return;
        }

        for key in &summary.deleted {
            self.printer.change(Change::Deleted, key);
        }
        for key in &summary.updated {
            self.printer.change(Change::Updated, key);
        }
        for key in &summary.added {
            self.printer.change(Change::Added, key);
        }

        if dry_run {
            self.printer.dimmed(&format!(
                "  would add {}, update {}, delete {}",
                summary.added.len(),
                summary.updated.len(),
                summary.deleted.len()
            ));
        }
    }

    fn applied(&mut self, summary: &ChangeSummary) {
        self.printer.success(&format!(
            "{}: {} written, {} deleted",
            summary.namespace,
            summary.upserts(),
            summary.deleted.len()
        ));
    }

    fn namespaces(&mut self, changes: &NamespaceChanges) {
        if changes.to_remove.is_empty() {
            return;
        }
        println!();
        self.printer
            .warn("namespaces in the store without a secret file (not removed):");
        for namespace in &changes.to_remove {
            self.printer.list_item(namespace);
        }
    }

    fn failed(&mut self, namespace: &str, _error: &Error) {
        self.printer
            .error(&format!("sync stopped at namespace {namespace}"));
    }
}

/// Sync a directory of secret files into the store.
pub fn execute(
    settings: &Settings,
    printer: &Printer,
    dir: &Path,
    namespace: Option<String>,
    dry_run: bool,
) -> Result<()> {
    info!(dir = %dir.display(), dry_run, "running sync");

    let store = store::open(settings)?;
    let options = SyncOptions::new(settings.table.as_str())
        .dry_run(dry_run)
        .batch_limit(settings.batch_limit)
        .namespace(namespace);

    let mut reporter = TerminalReporter { printer };
    let report = Syncer::new(store, options).run(dir, &mut reporter)?;

    if report.dry_run {
        printer.dimmed("dry run, nothing was written");
    } else if report.was_synced() {
        printer.success("already in sync");
    }

    Ok(())
}
