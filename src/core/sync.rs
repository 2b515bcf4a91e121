//! Sync orchestration.
//!
//! Walks a secret tree and converges the store onto it, one namespace at a
//! time:
//!
//! ```text
//! load file -> expand includes -> fetch remote -> diff -> delete -> insert
//! ```
//!
//! Deletes are written before inserts, each in batches of at most
//! `batch_limit` items. A dry run stops after the diff. Once every
//! namespace is done, the namespaces present on only one side are reported;
//! remote-only namespaces are never deleted.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::core::batch::write_in_batches;
use crate::core::constants::BATCH_LIMIT;
use crate::core::domain::{ChangeSummary, Diff, NamespaceChanges, Secrets, SyncReport};
use crate::core::include::{expand_includes, has_includes};
use crate::core::reconcile::compare_namespace_sets;
use crate::core::secrets::SecretFile;
use crate::core::store::SecretStore;
use crate::core::types::Namespace;
use crate::core::walk::list_namespaced_files;
use crate::error::{Error, Result, Stage, SyncError};

/// Options for one sync run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOptions {
    /// Table to sync into
    pub table: String,
    /// Compute and report changes without writing
    pub dry_run: bool,
    /// Maximum items per write request
    pub batch_limit: usize,
    /// Sync only this namespace
    pub namespace: Option<Namespace>,
}

impl SyncOptions {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            dry_run: false,
            batch_limit: BATCH_LIMIT,
            namespace: None,
        }
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn batch_limit(mut self, limit: usize) -> Self {
        self.batch_limit = limit;
        self
    }

    pub fn namespace(mut self, namespace: Option<Namespace>) -> Self {
        self.namespace = namespace;
        self
    }
}

/// Receives progress of a sync run.
///
/// Rendering is up to the implementation; the run itself never prints.
pub trait Reporter {
    /// A namespace is about to be processed.
    fn namespace_started(&mut self, _namespace: &str, _file: &Path) {}

    /// The diff of a namespace is known. Called for every namespace,
    /// including unchanged ones.
    fn changes(&mut self, summary: &ChangeSummary, dry_run: bool);

    /// The changes of a namespace were written.
    fn applied(&mut self, _summary: &ChangeSummary) {}

    /// Namespaces present on only one side. Not called for filtered runs.
    fn namespaces(&mut self, changes: &NamespaceChanges);

    /// A namespace failed; the run stops after this call.
    fn failed(&mut self, _namespace: &str, _error: &Error) {}
}

/// A reporter that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl Reporter for Silent {
    fn changes(&mut self, _summary: &ChangeSummary, _dry_run: bool) {}
    fn namespaces(&mut self, _changes: &NamespaceChanges) {}
}

/// Converges a store onto a secret tree.
#[derive(Debug)]
pub struct Syncer<S> {
    store: S,
    options: SyncOptions,
}

impl<S: SecretStore> Syncer<S> {
    pub fn new(store: S, options: SyncOptions) -> Self {
        Self { store, options }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn options(&self) -> &SyncOptions {
        &self.options
    }

    /// Sync every secret file under `root`.
    ///
    /// Namespaces are processed in path order, each completely before the
    /// next. The first failure is passed to [`Reporter::failed`] and
    /// returned; namespaces already written stay written.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::DirectoryRead` if the tree cannot be walked,
    /// `SyncError::InvalidBatchLimit` for a limit outside 1..=[`BATCH_LIMIT`],
    /// `SyncError::DuplicateNamespace` if two files share a namespace,
    /// `SyncError::NamespaceNotFound` if a namespace filter matches no file,
    /// `SyncError::Namespace` wrapping the failure of one namespace, or the
    /// store's error when listing remote namespaces.
    pub fn run(&self, root: &Path, reporter: &mut impl Reporter) -> Result<SyncReport> {
        let options = &self.options;
        if options.batch_limit == 0 || options.batch_limit > BATCH_LIMIT {
            return Err(SyncError::InvalidBatchLimit.into());
        }

        info!(
            root = %root.display(),
            table = %options.table,
            dry_run = options.dry_run,
            "syncing secrets"
        );

        let files = list_namespaced_files(root)?;
        let selected: Vec<_> = match &options.namespace {
            Some(wanted) => {
                let matching: Vec<_> = files.iter().filter(|(_, ns)| ns == wanted).collect();
                if matching.is_empty() {
                    return Err(SyncError::NamespaceNotFound(wanted.clone()).into());
                }
                matching
            }
            None => files.iter().collect(),
        };

        let mut report = SyncReport {
            dry_run: options.dry_run,
            ..SyncReport::default()
        };

        for (file, namespace) in selected {
            reporter.namespace_started(namespace, file);

            match self.sync_namespace(file, namespace, &files, reporter) {
                Ok(summary) => report.namespaces.push(summary),
                Err(e) => {
                    reporter.failed(namespace, &e);
                    return Err(e);
                }
            }
        }

        if options.namespace.is_none() {
            let remote = self.store.list_namespaces(&options.table)?;
            let changes = compare_namespace_sets(&remote, files.iter().map(|(_, ns)| ns));
            debug!(
                to_add = changes.to_add.len(),
                to_remove = changes.to_remove.len(),
                "namespaces compared"
            );
            reporter.namespaces(&changes);
            report.namespace_changes = Some(changes);
        }

        Ok(report)
    }

    fn sync_namespace(
        &self,
        file: &Path,
        namespace: &str,
        files: &[(PathBuf, Namespace)],
        reporter: &mut impl Reporter,
    ) -> Result<ChangeSummary> {
        let options = &self.options;
        let fail = move |stage: Stage| {
            move |source: Error| -> Error {
                SyncError::Namespace {
                    namespace: namespace.to_string(),
                    file: file.to_path_buf(),
                    stage,
                    source: Box::new(source),
                }
                .into()
            }
        };

        let mut local = SecretFile::load(file).map_err(fail(Stage::Load))?.secrets;
        debug!(namespace, secrets = local.len(), "loaded");

        if has_includes(&local) {
            local = expand_includes(namespace, local, |target| resolve(files, target))
                .map_err(fail(Stage::Include))?;
            debug!(namespace, secrets = local.len(), "includes expanded");
        }

        let remote = self
            .store
            .list_secrets(&options.table, namespace)
            .map_err(fail(Stage::Fetch))?;

        let diff = Diff::compute(&local, &remote);
        let summary = diff.summary(namespace);
        debug!(
            namespace,
            added = diff.added.len(),
            updated = diff.updated.len(),
            deleted = diff.deleted.len(),
            "diffed"
        );
        reporter.changes(&summary, options.dry_run);

        if options.dry_run || diff.is_empty() {
            return Ok(summary);
        }

        write_in_batches(&diff.deleted, options.batch_limit, |batch| {
            self.store.delete(&options.table, namespace, batch)
        })
        .map_err(fail(Stage::Delete))?;

        write_in_batches(&diff.upserts(), options.batch_limit, |batch| {
            self.store.insert(&options.table, namespace, batch)
        })
        .map_err(fail(Stage::Insert))?;

        debug!(namespace, "applied");
        reporter.applied(&summary);
        Ok(summary)
    }
}

/// Local secrets of another namespace, for include expansion.
fn resolve(files: &[(PathBuf, Namespace)], namespace: &str) -> Result<Option<Secrets>> {
    match files.iter().find(|(_, ns)| ns == namespace) {
        Some((path, _)) => Ok(Some(SecretFile::load(path)?.secrets)),
        None => Ok(None),
    }
}
