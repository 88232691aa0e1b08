//! Filesystem enumeration for choice views.
//!
//! Choice views may declare their selectable universe as "the entries of a
//! directory". That is the engine's only filesystem side effect, so it is
//! isolated behind [`EntryScanner`] and trivially substitutable in tests.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;

use crate::schema::meta::{ScanKind, ScanSpec};

/// Enumerates the selectable universe for a scan declaration.
pub trait EntryScanner {
    /// Entry names matching the spec, in stable order.
    ///
    /// # Errors
    ///
    /// Fails when the directory cannot be listed. A missing directory must
    /// propagate rather than render an empty list, since an empty list is
    /// indistinguishable from "no choices configured".
    fn scan(&self, spec: &ScanSpec) -> anyhow::Result<Vec<String>>;
}

/// Scanner over a real directory tree.
pub struct FsScanner {
    root: PathBuf,
}

impl FsScanner {
    /// Creates a scanner resolving specs relative to `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl EntryScanner for FsScanner {
    fn scan(&self, spec: &ScanSpec) -> anyhow::Result<Vec<String>> {
        let dir = self.root.join(&spec.dir);
        let entries = fs::read_dir(&dir)
            .with_context(|| format!("listing choices in {}", dir.display()))?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.with_context(|| format!("reading entry in {}", dir.display()))?;
            let path = entry.path();
            let file_name = entry.file_name().to_string_lossy().to_string();
            match spec.kind {
                ScanKind::Directories => {
                    if path.is_dir() {
                        names.push(file_name);
                    }
                }
                ScanKind::Files => {
                    if !path.is_file() {
                        continue;
                    }
                    let name = if spec.keep_extension {
                        file_name
                    } else {
                        file_name
                            .rsplit_once('.')
                            .map(|(stem, _)| stem.to_string())
                            .unwrap_or(file_name)
                    };
                    // Python-era module folders carry __init__ markers.
                    if name.contains("__init__") {
                        continue;
                    }
                    if !names.contains(&name) {
                        names.push(name);
                    }
                }
            }
        }
        names.sort();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn scratch_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("formset-scan-{tag}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn touch(path: &Path) {
        fs::write(path, b"").unwrap();
    }

    #[test]
    fn files_scan_strips_extensions_and_dedupes() {
        let root = scratch_dir("files");
        fs::create_dir(root.join("themes")).unwrap();
        touch(&root.join("themes/plain.json"));
        touch(&root.join("themes/plain.bak"));
        touch(&root.join("themes/dark.json"));
        touch(&root.join("themes/__init__.py"));

        let scanner = FsScanner::new(&root);
        let spec = ScanSpec {
            dir: "themes".into(),
            kind: ScanKind::Files,
            keep_extension: false,
        };
        assert_eq!(scanner.scan(&spec).unwrap(), ["dark", "plain"]);

        fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn directories_scan_skips_files() {
        let root = scratch_dir("dirs");
        fs::create_dir(root.join("skins")).unwrap();
        fs::create_dir(root.join("skins/default")).unwrap();
        fs::create_dir(root.join("skins/compact")).unwrap();
        touch(&root.join("skins/readme.txt"));

        let scanner = FsScanner::new(&root);
        let spec = ScanSpec {
            dir: "skins".into(),
            kind: ScanKind::Directories,
            keep_extension: false,
        };
        assert_eq!(scanner.scan(&spec).unwrap(), ["compact", "default"]);

        fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn missing_directory_fails_loudly() {
        let scanner = FsScanner::new(std::env::temp_dir().join("formset-scan-absent"));
        let spec = ScanSpec {
            dir: "nowhere".into(),
            kind: ScanKind::Files,
            keep_extension: false,
        };
        assert!(scanner.scan(&spec).is_err());
    }
}
