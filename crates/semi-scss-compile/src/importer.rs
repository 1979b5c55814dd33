//! Import interception for the SCSS compiler.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! grass resolves `@import` targets through a `grass::Fs`. `OverrideFs` serves
//! every file under the foundation tree through the override rewrite and
//! reads everything else straight from disk.

use std::fmt::Debug;
use std::io;
use std::path::{Path, PathBuf};

use crate::rewrite::rewrite_file;

/// `grass::Fs` adapter that injects the extra override import into
/// foundation partials as they are loaded.
pub struct OverrideFs {
    foundation_path: PathBuf,
    extra_import: Option<String>,
}

impl OverrideFs {
    pub fn new(foundation_path: impl Into<PathBuf>, extra_import: Option<String>) -> Self {
        Self {
            foundation_path: foundation_path.into(),
            extra_import,
        }
    }

    /// Whether reads of `path` go through the override rewrite.
    pub fn intercepts(&self, path: &Path) -> bool {
        path.starts_with(&self.foundation_path)
    }
}

impl Debug for OverrideFs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverrideFs")
            .field("foundation_path", &self.foundation_path)
            .field("extra_import", &self.extra_import)
            .finish()
    }
}

impl grass::Fs for OverrideFs {
    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        if self.intercepts(path) {
            rewrite_file(path, self.extra_import.as_deref())
        } else {
            std::fs::read(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grass::Fs;
    use std::fs;
    use tempfile::TempDir;

    const PARTIAL: &str = "@import './variables.scss';\n.btn {}";

    #[test]
    fn test_reads_under_foundation_are_rewritten() {
        let temp = TempDir::new().unwrap();
        let foundation = temp.path().join("foundation");
        fs::create_dir_all(foundation.join("button")).unwrap();
        let partial = foundation.join("button/button.scss");
        fs::write(&partial, PARTIAL).unwrap();

        let fs_adapter = OverrideFs::new(&foundation, Some("./local.scss".to_string()));

        assert!(fs_adapter.intercepts(&partial));
        let content = String::from_utf8(fs_adapter.read(&partial).unwrap()).unwrap();
        assert!(content.contains("@import \"./local.scss\";"));
    }

    #[test]
    fn test_reads_outside_foundation_untouched() {
        let temp = TempDir::new().unwrap();
        let foundation = temp.path().join("foundation");
        let other = temp.path().join("theme/button.scss");
        fs::create_dir_all(other.parent().unwrap()).unwrap();
        fs::write(&other, PARTIAL).unwrap();

        let fs_adapter = OverrideFs::new(&foundation, Some("./local.scss".to_string()));

        assert!(!fs_adapter.intercepts(&other));
        assert_eq!(fs_adapter.read(&other).unwrap(), PARTIAL.as_bytes());
    }

    #[test]
    fn test_sibling_prefix_not_intercepted() {
        let fs_adapter = OverrideFs::new("/src/foundation", None);
        assert!(fs_adapter.intercepts(Path::new("/src/foundation/./button/button.scss")));
        assert!(!fs_adapter.intercepts(Path::new("/src/foundation-extra/button.scss")));
    }

    #[test]
    fn test_debug() {
        let fs_adapter = OverrideFs::new("/src/foundation", None);
        assert!(format!("{fs_adapter:?}").contains("OverrideFs"));
    }
}
