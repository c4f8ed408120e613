use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub const MARKUP_EXTENSION: &str = "html";
pub const DOCUMENT_EXTENSION: &str = "pdf";

/// The markup and document files belonging to one pipeline run.
///
/// Both live side by side in the temp directory and share a random stem, so
/// concurrent requests never collide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPair {
    id: String,
    markup: PathBuf,
    document: PathBuf,
}

impl ArtifactPair {
    pub fn generate(dir: &Path) -> Self {
        Self::with_id(dir, Uuid::new_v4().simple().to_string())
    }

    pub fn with_id(dir: &Path, id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            markup: dir.join(format!("{}.{}", id, MARKUP_EXTENSION)),
            document: dir.join(format!("{}.{}", id, DOCUMENT_EXTENSION)),
            id,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn markup_path(&self) -> &Path {
        &self.markup
    }

    pub fn document_path(&self) -> &Path {
        &self.document
    }

    /// Deletes whichever of the two files exist. Failures are logged, not
    /// returned: by the time cleanup runs the request outcome is settled.
    pub async fn remove(&self) {
        for path in [&self.markup, &self.document] {
            match tokio::fs::remove_file(path).await {
                Ok(()) => tracing::info!(path = %path.display(), "Removed artifact"),
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Failed to remove artifact"
                ),
            }
        }
    }
}

/// True for file names the pipeline produces.
pub fn is_artifact(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some(MARKUP_EXTENSION) | Some(DOCUMENT_EXTENSION)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_are_siblings_sharing_the_id() {
        let pair = ArtifactPair::with_id(Path::new("/tmp/spool"), "abc");
        assert_eq!(pair.markup_path(), Path::new("/tmp/spool/abc.html"));
        assert_eq!(pair.document_path(), Path::new("/tmp/spool/abc.pdf"));
        assert_eq!(pair.markup_path().parent(), pair.document_path().parent());
    }

    #[test]
    fn generated_ids_are_unique() {
        let dir = Path::new("/tmp");
        let a = ArtifactPair::generate(dir);
        let b = ArtifactPair::generate(dir);
        assert_ne!(a.id(), b.id());
        assert_eq!(a.id().len(), 32);
    }

    #[tokio::test]
    async fn remove_tolerates_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let pair = ArtifactPair::with_id(dir.path(), "half");
        tokio::fs::write(pair.markup_path(), "<html></html>")
            .await
            .unwrap();

        pair.remove().await;

        assert!(!pair.markup_path().exists());
        assert!(!pair.document_path().exists());
    }

    #[test]
    fn recognises_artifact_extensions() {
        assert!(is_artifact(Path::new("x/abc.html")));
        assert!(is_artifact(Path::new("abc.pdf")));
        assert!(!is_artifact(Path::new("notes.txt")));
        assert!(!is_artifact(Path::new("pdf")));
    }
}
