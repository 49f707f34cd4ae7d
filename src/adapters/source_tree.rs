use crate::domain::ports::SourceTree;
use crate::utils::error::{AuditError, Result};
use std::path::{Path, PathBuf};

/// Reads module trees from the local filesystem.
///
/// Listings are sorted by path so the include scan order is reproducible.
/// Every file is listed, dot-directories included, unless [`Self::skip_hidden`] is set.
#[derive(Debug, Clone)]
pub struct LocalSourceTree {
    skip_hidden: bool,
}

impl LocalSourceTree {
    pub fn new() -> Self {
        Self { skip_hidden: false }
    }

    /// Do not descend into dot-directories such as `.git`, nor list dot-files.
    pub fn skip_hidden(mut self) -> Self {
        self.skip_hidden = true;
        self
    }

    fn collect_recursive(&self, dir: &Path, result: &mut Vec<PathBuf>) -> Result<()> {
        let entries = std::fs::read_dir(dir).map_err(|e| AuditError::scan(dir, e))?;

        for entry in entries {
            let entry = entry.map_err(|e| AuditError::scan(dir, e))?;
            let path = entry.path();
            let file_type = entry.file_type().map_err(|e| AuditError::scan(&path, e))?;

            if self.skip_hidden && entry.file_name().to_string_lossy().starts_with('.') {
                continue;
            }

            if file_type.is_dir() {
                self.collect_recursive(&path, result)?;
            } else if file_type.is_file() || path.is_file() {
                result.push(path);
            }
        }
        Ok(())
    }
}

impl Default for LocalSourceTree {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceTree for LocalSourceTree {
    fn list_files(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();
        self.collect_recursive(dir, &mut result)?;
        result.sort();
        Ok(result)
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        let bytes = std::fs::read(path).map_err(|e| AuditError::scan(path, e))?;
        // 舊的原始碼常見非 UTF-8 編碼
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// A source tree held in memory, listed in insertion order.
///
/// Lets a caller that already has manifest text and file listings run the
/// engine without touching the filesystem.
#[derive(Debug, Clone, Default)]
pub struct MemorySourceTree {
    files: Vec<(PathBuf, String)>,
    dirs: Vec<PathBuf>,
}

impl MemorySourceTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        self.add_file(path, contents);
        self
    }

    /// Register an existing directory that may hold no files.
    pub fn with_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.dirs.push(path.into());
        self
    }

    pub fn add_file(&mut self, path: impl Into<PathBuf>, contents: impl Into<String>) {
        let path = path.into();
        match self.files.iter_mut().find(|(p, _)| *p == path) {
            Some(entry) => entry.1 = contents.into(),
            None => self.files.push((path, contents.into())),
        }
    }

    fn dir_exists(&self, dir: &Path) -> bool {
        self.dirs.iter().any(|d| d.starts_with(dir))
            || self
                .files
                .iter()
                .any(|(p, _)| p.starts_with(dir) && p.as_path() != dir)
    }
}

impl SourceTree for MemorySourceTree {
    fn list_files(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        if !self.dir_exists(dir) {
            return Err(AuditError::scan(
                dir,
                std::io::Error::new(std::io::ErrorKind::NotFound, "directory not found"),
            ));
        }
        Ok(self
            .files
            .iter()
            .filter(|(p, _)| p.starts_with(dir) && p.as_path() != dir)
            .map(|(p, _)| p.clone())
            .collect())
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        self.files
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, contents)| contents.clone())
            .ok_or_else(|| {
                AuditError::scan(
                    path,
                    std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_local_tree_lists_sorted_and_recursive() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        std::fs::create_dir_all(root.join("b/nested")).unwrap();
        std::fs::create_dir_all(root.join("a")).unwrap();
        std::fs::create_dir_all(root.join(".git")).unwrap();
        std::fs::write(root.join("b/nested/z.h"), "").unwrap();
        std::fs::write(root.join("a/y.cpp"), "").unwrap();
        std::fs::write(root.join("x.cs"), "").unwrap();
        std::fs::write(root.join(".git/HEAD"), "").unwrap();

        let files = LocalSourceTree::new().list_files(root).unwrap();
        let relative: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect();
        assert_eq!(relative, vec![".git/HEAD", "a/y.cpp", "b/nested/z.h", "x.cs"]);

        let visible = LocalSourceTree::new().skip_hidden().list_files(root).unwrap();
        assert_eq!(visible.len(), 3);
    }

    #[test]
    fn test_headers_under_dot_directories_are_owned() {
        let temp_dir = TempDir::new().unwrap();
        let module_dir = temp_dir.path().join("Foo");
        std::fs::create_dir_all(module_dir.join(".generated")).unwrap();
        std::fs::write(module_dir.join(".generated/Foo.gen.h"), "").unwrap();

        let headers = crate::core::headers::inventory_headers(
            &LocalSourceTree::new(),
            &module_dir,
            &crate::domain::options::ScanOptions::default(),
        )
        .unwrap();
        assert!(headers.contains("Foo.gen.h"));
    }

    #[test]
    fn test_local_tree_missing_dir_is_scan_error() {
        let temp_dir = TempDir::new().unwrap();
        let err = LocalSourceTree::new()
            .list_files(&temp_dir.path().join("missing"))
            .unwrap_err();
        assert!(matches!(err, AuditError::ScanError { .. }));
    }

    #[test]
    fn test_local_tree_reads_non_utf8() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("latin1.h");
        std::fs::write(&path, b"// caf\xe9\n#include \"Core.h\"\n").unwrap();
        let contents = LocalSourceTree::new().read_to_string(&path).unwrap();
        assert!(contents.contains("#include \"Core.h\""));
    }

    #[test]
    fn test_memory_tree_keeps_insertion_order() {
        let tree = MemorySourceTree::new()
            .with_file("/r/M/b.cpp", "b")
            .with_file("/r/M/a.cpp", "a")
            .with_dir("/r/Empty");

        let files = tree.list_files(Path::new("/r/M")).unwrap();
        assert_eq!(files, vec![PathBuf::from("/r/M/b.cpp"), PathBuf::from("/r/M/a.cpp")]);
        assert!(tree.list_files(Path::new("/r/Empty")).unwrap().is_empty());
        assert_eq!(tree.read_to_string(Path::new("/r/M/a.cpp")).unwrap(), "a");
        assert!(tree.read_to_string(Path::new("/r/M/c.cpp")).is_err());
    }
}
