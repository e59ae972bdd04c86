//! Output workspace layout, reconciliation and atomic writes.
//!
//! ```text
//! {out}/
//! ├── clients/
//! │   ├── __init__.py          index module
//! │   └── {module_name}.py     one per generated client
//! └── sequence.py              starter sequence
//! ```

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::diagnostic::SequencerError;

pub const CLIENTS_DIR: &str = "clients";
pub const INDEX_FILE: &str = "__init__.py";
pub const SEQUENCE_FILE: &str = "sequence.py";
pub const SOURCE_EXTENSION: &str = "py";

/// Paths of everything the pipeline creates or deletes under one output directory.
#[derive(Debug, Clone)]
pub struct WorkspaceLayout {
    root: PathBuf,
}

impl WorkspaceLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn clients_dir(&self) -> PathBuf {
        self.root.join(CLIENTS_DIR)
    }

    /// Where the generator is expected to leave the client for `module_name`.
    pub fn client_file(&self, module_name: &str) -> PathBuf {
        client_file_in(&self.clients_dir(), module_name)
    }

    pub fn index_file(&self) -> PathBuf {
        self.clients_dir().join(INDEX_FILE)
    }

    pub fn sequence_file(&self) -> PathBuf {
        self.root.join(SEQUENCE_FILE)
    }
}

/// `{dir}/{module_name}.py`
pub fn client_file_in(dir: &Path, module_name: &str) -> PathBuf {
    dir.join(format!("{}.{}", module_name, SOURCE_EXTENSION))
}

/// Files removed by [`reconcile`].
#[derive(Debug, Default)]
pub struct ReconcileReport {
    pub deleted: Vec<PathBuf>,
}

/// Deletes every file in `clients/` and the sequence script, creating
/// `clients/` when it is missing. Subdirectories are left in place.
pub fn reconcile(layout: &WorkspaceLayout) -> Result<ReconcileReport, SequencerError> {
    let clients_dir = layout.clients_dir();
    std::fs::create_dir_all(&clients_dir)
        .map_err(|e| SequencerError::io(&clients_dir, e.to_string()))?;

    let mut report = ReconcileReport::default();

    let entries = std::fs::read_dir(&clients_dir)
        .map_err(|e| SequencerError::io(&clients_dir, e.to_string()))?;
    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| SequencerError::io(&clients_dir, e.to_string()))?;
        let path = entry.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();

    for path in files {
        if delete_file(&path)? {
            report.deleted.push(path);
        }
    }

    let sequence_file = layout.sequence_file();
    if delete_file(&sequence_file)? {
        report.deleted.push(sequence_file);
    }

    debug!(deleted = report.deleted.len(), "workspace reconciled");
    Ok(report)
}

/// Removes a file. Returns `false` if there was nothing to remove.
fn delete_file(path: &Path) -> Result<bool, SequencerError> {
    if !path.is_file() {
        return Ok(false);
    }
    match std::fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(SequencerError::io(path, e.to_string())),
    }
}

/// Writes `content` to a temporary file beside `path` and renames it into place.
///
/// A replaced file keeps its permissions. A new file gets the same mode a
/// plain `create` would (0o666 less the umask).
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<(), SequencerError> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    #[cfg_attr(not(unix), allow(unused_mut))]
    let mut builder = tempfile::Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(0o666));
    }
    let mut temp = builder
        .tempfile_in(dir)
        .map_err(|e| SequencerError::io(dir, e.to_string()))?;

    if let Err(e) = temp.write_all(content).and_then(|_| temp.flush()) {
        return Err(SequencerError::io(temp.path(), e.to_string()));
    }
    if let Ok(existing) = std::fs::metadata(path) {
        temp.as_file()
            .set_permissions(existing.permissions())
            .map_err(|e| SequencerError::io(temp.path(), e.to_string()))?;
    }
    temp.persist(path)
        .map_err(|e| SequencerError::io(path, e.error.to_string()))?;
    Ok(())
}

/// Checks that `dir` exists, is a directory and is not read-only.
pub fn validate_output_dir(dir: &Path) -> Result<(), SequencerError> {
    let invalid = |reason: &str| SequencerError::InvalidOutputDirectory {
        path: dir.to_path_buf(),
        reason: reason.to_string(),
    };

    let metadata = std::fs::metadata(dir).map_err(|_| invalid("directory does not exist"))?;
    if !metadata.is_dir() {
        return Err(invalid("not a directory"));
    }
    if metadata.permissions().readonly() {
        return Err(invalid("directory is not writable"));
    }
    Ok(())
}
