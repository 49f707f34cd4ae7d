use crate::domain::options::ScanOptions;
use crate::domain::ports::SourceTree;
use crate::utils::error::Result;
use std::collections::HashSet;
use std::path::Path;

/// Base names of every header anywhere under `dir`.
///
/// Same-named headers in different subdirectories collapse into one entry.
pub fn inventory_headers<T: SourceTree + ?Sized>(
    tree: &T,
    dir: &Path,
    options: &ScanOptions,
) -> Result<HashSet<String>> {
    let headers = tree
        .list_files(dir)?
        .into_iter()
        .filter(|path| options.is_header(path))
        .filter_map(|path| {
            path.file_name()
                .map(|name| name.to_string_lossy().into_owned())
        })
        .collect();
    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::source_tree::MemorySourceTree;

    #[test]
    fn test_inventory_strips_directories() {
        let tree = MemorySourceTree::new()
            .with_file("/m/Foo/Public/Foo.h", "")
            .with_file("/m/Foo/Private/Detail/Impl.h", "")
            .with_file("/m/Foo/Private/Foo.cpp", "")
            .with_file("/m/Foo/Foo.Build.cs", "");

        let headers = inventory_headers(&tree, Path::new("/m/Foo"), &ScanOptions::default()).unwrap();
        let mut names: Vec<_> = headers.into_iter().collect();
        names.sort();
        assert_eq!(names, vec!["Foo.h", "Impl.h"]);
    }

    #[test]
    fn test_same_name_in_two_directories_is_one_header() {
        let tree = MemorySourceTree::new()
            .with_file("/m/Foo/Public/Types.h", "")
            .with_file("/m/Foo/Private/Types.h", "");

        let headers = inventory_headers(&tree, Path::new("/m/Foo"), &ScanOptions::default()).unwrap();
        assert_eq!(headers.len(), 1);
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let tree = MemorySourceTree::new();
        assert!(inventory_headers(&tree, Path::new("/nowhere"), &ScanOptions::default()).is_err());
    }
}
