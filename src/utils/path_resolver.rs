//! Import specifier resolution against the scanned file set

use crate::models::metrics::SUPPORTED_EXTENSIONS;
use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};
use tracing::trace;

/// Resolves relative import specifiers to files of the current scan
///
/// Resolution never touches the filesystem: a candidate only resolves when it
/// is one of the scanned files, so edges cannot dangle.
pub struct ImportResolver<'a> {
    files: &'a HashSet<PathBuf>,
}

impl<'a> ImportResolver<'a> {
    pub fn new(files: &'a HashSet<PathBuf>) -> Self {
        Self { files }
    }

    /// Resolve `specifier` as imported from the file `from`
    ///
    /// Candidates, first hit wins: the literal path, the path with each
    /// supported extension, `index.<ext>` (and `__init__.py`) inside it. A
    /// specifier ending in `.js` is retried without that suffix, for sources
    /// that import a compiled name of a TypeScript file.
    pub fn resolve(&self, from: &Path, specifier: &str) -> Option<PathBuf> {
        let dir = from.parent().unwrap_or(from);
        let base = normalize(&dir.join(specifier));

        let resolved = self.probe(&base).or_else(|| {
            specifier
                .strip_suffix(".js")
                .and_then(|stem| self.probe(&normalize(&dir.join(stem))))
        });

        if resolved.is_none() {
            trace!(from = %from.display(), specifier, "unresolved import");
        }
        resolved
    }

    fn probe(&self, base: &Path) -> Option<PathBuf> {
        if self.files.contains(base) {
            return Some(base.to_path_buf());
        }

        let base_str = base.as_os_str().to_string_lossy();
        let with_extension = SUPPORTED_EXTENSIONS
            .iter()
            .map(|ext| PathBuf::from(format!("{}.{}", base_str, ext)));
        let index_files = SUPPORTED_EXTENSIONS
            .iter()
            .map(|ext| base.join(format!("index.{}", ext)))
            .chain(std::iter::once(base.join("__init__.py")));

        with_extension
            .chain(index_files)
            .find(|candidate| self.files.contains(candidate))
    }
}

/// Lexically resolve `.` and `..` components
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}
