//! Filesystem-backed resources.
//!
//! Relative paths resolve against a base directory, normally the directory
//! of the document being interpreted. Absolute paths and `..` are honored
//! unless the provider is [`confined`](FilesystemResourceProvider::confined),
//! in which case anything outside the base is rejected.

use pagescript_traits::{ResourceError, ResourceProvider, SharedResourceData};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

#[derive(Debug)]
pub struct FilesystemResourceProvider {
    base_path: PathBuf,
    /// Canonical form of `base_path`, when it exists.
    canonical_base: Option<PathBuf>,
    confined: bool,
}

impl FilesystemResourceProvider {
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        let base = base_path.as_ref().to_path_buf();
        let canonical = base.canonicalize().ok();
        Self {
            base_path: base,
            canonical_base: canonical,
            confined: false,
        }
    }

    /// A provider rooted at the directory containing `document`.
    pub fn for_document<P: AsRef<Path>>(document: P) -> Self {
        let dir = document
            .as_ref()
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        Self::new(dir)
    }

    /// Restricts resolution to files inside the base directory.
    pub fn confined(mut self, confined: bool) -> Self {
        self.confined = confined;
        self
    }

    pub fn base(&self) -> &Path {
        &self.base_path
    }

    fn resolve(&self, path: &str) -> Result<PathBuf, ResourceError> {
        let requested = Path::new(path);
        if !self.confined {
            return Ok(self.base_path.join(requested));
        }

        if requested.is_absolute()
            || requested
                .components()
                .any(|c| matches!(c, Component::ParentDir | Component::Prefix(_)))
        {
            return Err(ResourceError::Rejected(path.to_string()));
        }

        let full_path = self.base_path.join(requested);
        // Symlinks may still point outside the base.
        if let (Ok(canonical), Some(base)) = (full_path.canonicalize(), &self.canonical_base) {
            if !canonical.starts_with(base) {
                return Err(ResourceError::Rejected(path.to_string()));
            }
            return Ok(canonical);
        }
        Ok(full_path)
    }
}

impl ResourceProvider for FilesystemResourceProvider {
    fn load(&self, path: &str) -> Result<SharedResourceData, ResourceError> {
        let full_path = self.resolve(path)?;
        log::debug!("Loading resource '{}' from {}", path, full_path.display());

        std::fs::read(&full_path).map(Arc::new).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ResourceError::NotFound(path.to_string())
            } else {
                ResourceError::LoadFailed {
                    path: path.to_string(),
                    message: e.to_string(),
                }
            }
        })
    }

    fn exists(&self, path: &str) -> bool {
        self.resolve(path).map(|p| p.is_file()).unwrap_or(false)
    }

    fn base_path(&self) -> Option<&str> {
        self.base_path.to_str()
    }

    fn name(&self) -> &'static str {
        "FilesystemResourceProvider"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_load_existing_file() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("bg.png"), b"image bytes").unwrap();

        let provider = FilesystemResourceProvider::new(dir.path());
        let data = provider.load("bg.png").unwrap();
        assert_eq!(&*data, b"image bytes");
        assert!(provider.exists("bg.png"));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        let provider = FilesystemResourceProvider::new(dir.path());

        assert_eq!(
            provider.load("missing.png"),
            Err(ResourceError::NotFound("missing.png".to_string()))
        );
        assert!(!provider.exists("missing.png"));
    }

    #[test]
    fn test_directories_do_not_exist_as_resources() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("images")).unwrap();
        let provider = FilesystemResourceProvider::new(dir.path());
        assert!(!provider.exists("images"));
    }

    #[test]
    fn test_for_document_uses_parent_directory() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("logo.png"), b"x").unwrap();
        let doc = dir.path().join("report.ddl");

        let provider = FilesystemResourceProvider::for_document(&doc);
        assert_eq!(provider.base(), dir.path());
        assert!(provider.exists("logo.png"));

        let bare = FilesystemResourceProvider::for_document("report.ddl");
        assert_eq!(bare.base(), Path::new("."));
    }

    #[test]
    fn test_resolves_parent_and_absolute_paths() {
        let dir = tempdir().unwrap();
        let docs = dir.path().join("docs");
        fs::create_dir(&docs).unwrap();
        let bg = dir.path().join("bg.png");
        fs::write(&bg, b"shared").unwrap();

        let provider = FilesystemResourceProvider::new(&docs);
        assert!(provider.exists("../bg.png"));
        assert_eq!(&*provider.load("../bg.png").unwrap(), b"shared");

        let absolute = bg.to_str().unwrap();
        assert!(provider.exists(absolute));
        assert_eq!(&*provider.load(absolute).unwrap(), b"shared");
    }

    #[test]
    fn test_confined_rejects_traversal_and_absolute_paths() {
        let dir = tempdir().unwrap();
        let docs = dir.path().join("docs");
        fs::create_dir(&docs).unwrap();
        fs::write(dir.path().join("bg.png"), b"shared").unwrap();
        fs::write(docs.join("inside.png"), b"inside").unwrap();

        let provider = FilesystemResourceProvider::new(&docs).confined(true);
        assert_eq!(
            provider.load("../bg.png"),
            Err(ResourceError::Rejected("../bg.png".to_string()))
        );
        let absolute = dir.path().join("bg.png");
        assert!(matches!(
            provider.load(absolute.to_str().unwrap()),
            Err(ResourceError::Rejected(_))
        ));
        assert!(!provider.exists("../bg.png"));
        assert!(provider.exists("inside.png"));
    }

    #[test]
    fn test_allows_nested_paths() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("images");
        fs::create_dir(&nested).unwrap();
        fs::write(nested.join("bg.png"), b"nested").unwrap();

        let provider = FilesystemResourceProvider::new(dir.path());
        assert!(provider.exists("images/bg.png"));
        assert_eq!(&*provider.load("images/bg.png").unwrap(), b"nested");
    }
}
