//! # Document Collection
//!
//! File: cli/src/pipeline/collect.rs
//!
//! ## Overview
//!
//! Walks a populated extraction tree and selects the files that live under a
//! documentation area, e.g. `/usr/share/doc` or `/usr/share/man`.
//!
//! ## Matching
//!
//! Patterns are compared on whole path components, against the file's path
//! relative to the extraction root. A pattern matches when its components occur
//! as a contiguous run anywhere in that relative path:
//!
//! | relative path                       | `/usr/share/doc` |
//! |-------------------------------------|------------------|
//! | `usr/share/doc/foo/README`          | match            |
//! | `opt/vendor/usr/share/doc/x`        | match            |
//! | `usr/share/doc-base/foo`            | no match         |
//! | `usr/share/docs/README`             | no match         |
//!
//! Only the relative path is inspected, so a scratch root that happens to
//! contain a pattern never selects an entire tree.
//!
use crate::core::error::ExtractError;
use crate::pipeline::record::ArchiveRecord;
use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, trace};
use walkdir::WalkDir;

/// A documentation-area pattern split into path components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocPattern {
    raw: String,
    components: Vec<OsString>,
}

fn normal_components(path: &Path) -> Vec<OsString> {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_os_string()),
            _ => None,
        })
        .collect()
}

impl DocPattern {
    pub fn new(raw: &str) -> Self {
        Self {
            raw: raw.to_string(),
            components: normal_components(Path::new(raw)),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// True when this pattern's components appear contiguously in `relative`.
    pub fn matches(&self, relative: &Path) -> bool {
        if self.components.is_empty() {
            return false;
        }
        let parts = normal_components(relative);
        parts
            .windows(self.components.len())
            .any(|window| window == self.components.as_slice())
    }
}

/// Parses configured pattern strings.
pub fn compile_patterns(raw: &[String]) -> Vec<DocPattern> {
    raw.iter().map(|p| DocPattern::new(p)).collect()
}

/// Selects documentation files under `extraction_root` and attaches them to
/// `record` in walk order. Returns the number of documents found.
pub fn collect_documents(
    record: &mut ArchiveRecord,
    extraction_root: &Path,
    patterns: &[DocPattern],
) -> Result<usize, ExtractError> {
    let mut documents: Vec<PathBuf> = Vec::new();

    for entry in WalkDir::new(extraction_root).follow_links(false) {
        let entry = entry.map_err(|source| ExtractError::Walk {
            root: extraction_root.to_path_buf(),
            source,
        })?;
        // Symlinks count when they resolve to a regular file.
        if !entry.path().is_file() {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(extraction_root) else {
            continue;
        };
        if let Some(pattern) = patterns.iter().find(|p| p.matches(relative)) {
            trace!("{:?} matches {}", relative, pattern.as_str());
            documents.push(entry.into_path());
        }
    }

    let count = documents.len();
    debug!("Collected {} documents for '{}'", count, record.name());
    record.attach_documents(documents)?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::fs;
    use tempfile::tempdir;

    fn touch(root: &Path, relative: &str) -> PathBuf {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, relative).unwrap();
        path
    }

    fn defaults() -> Vec<DocPattern> {
        compile_patterns(&["/usr/share/doc".to_string(), "/usr/share/man".to_string()])
    }

    #[test]
    fn test_pattern_matches_on_component_boundaries() {
        let doc = DocPattern::new("/usr/share/doc");
        assert!(doc.matches(Path::new("usr/share/doc/foo/README")));
        assert!(doc.matches(Path::new("opt/x/usr/share/doc/y")));
        assert!(!doc.matches(Path::new("usr/share/doc-base/foo")));
        assert!(!doc.matches(Path::new("usr/share/docs/README")));
        assert!(!doc.matches(Path::new("usr/local/share/doc/README")));
        assert!(!doc.matches(Path::new("usr/share")));

        // Leading/trailing separators are irrelevant.
        assert!(DocPattern::new("usr/share/man/").matches(Path::new("usr/share/man/man1/ls.1")));
        assert!(!DocPattern::new("/").matches(Path::new("usr/share/doc/README")));
    }

    #[test]
    fn test_collects_exactly_matching_files() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("foo-1.0");
        let readme = touch(&root, "usr/share/doc/foo/README");
        let page = touch(&root, "usr/share/man/man1/foo.1.gz");
        touch(&root, "usr/bin/foo");
        touch(&root, "usr/share/doc-base/foo");
        touch(&root, "etc/foo.conf");
        // An empty documentation directory contributes nothing.
        fs::create_dir_all(root.join("usr/share/doc/empty")).unwrap();

        let mut record = ArchiveRecord::new(Path::new("foo-1.0.rpm"), Path::new("rpms"), ".rpm");
        let count = collect_documents(&mut record, &root, &defaults()).unwrap();

        assert_eq!(count, 2);
        let found: HashSet<PathBuf> = record.documents().unwrap().iter().cloned().collect();
        assert_eq!(found, HashSet::from([readme, page]));
        assert!(record.documents().unwrap().iter().all(|p| p.is_file()));
    }

    #[test]
    fn test_scratch_root_containing_pattern_is_ignored() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("usr/share/doc/scratch/pkg");
        touch(&root, "usr/bin/tool");
        let kept = touch(&root, "usr/share/man/man8/tool.8");

        let mut record = ArchiveRecord::new(Path::new("pkg.rpm"), Path::new("rpms"), ".rpm");
        collect_documents(&mut record, &root, &defaults()).unwrap();

        assert_eq!(record.documents().unwrap(), &[kept]);
    }

    #[test]
    fn test_empty_tree_yields_no_documents() {
        let dir = tempdir().unwrap();
        let mut record = ArchiveRecord::new(Path::new("e.rpm"), Path::new("rpms"), ".rpm");
        assert_eq!(collect_documents(&mut record, dir.path(), &defaults()).unwrap(), 0);
        assert_eq!(record.documents().unwrap().len(), 0);
    }

    #[test]
    fn test_missing_root_is_walk_error() {
        let dir = tempdir().unwrap();
        let mut record = ArchiveRecord::new(Path::new("m.rpm"), Path::new("rpms"), ".rpm");
        let err = collect_documents(&mut record, &dir.path().join("absent"), &defaults())
            .unwrap_err();
        assert!(matches!(err, ExtractError::Walk { .. }));
        assert!(record.documents().is_none());
    }
}
