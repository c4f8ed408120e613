use crate::config::ReaperConfig;
use crate::models::artifacts::is_artifact;
use std::path::PathBuf;
use std::time::{Duration, SystemTime};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// Periodically deletes artifacts that failed pipeline runs left behind.
pub struct ArtifactReaper {
    dir: PathBuf,
    interval: Duration,
    max_age: Duration,
    shutdown_token: CancellationToken,
}

impl ArtifactReaper {
    pub fn new(dir: impl Into<PathBuf>, config: &ReaperConfig, shutdown_token: CancellationToken) -> Self {
        Self {
            dir: dir.into(),
            interval: config.interval,
            max_age: config.max_age,
            shutdown_token,
        }
    }

    /// Sweeps once per interval, starting immediately, until cancelled.
    pub async fn start(self) {
        if self.interval.is_zero() {
            tracing::info!("Artifact reaper disabled by configuration");
            return;
        }

        tracing::info!(
            dir = %self.dir.display(),
            interval_secs = self.interval.as_secs(),
            max_age_secs = self.max_age.as_secs(),
            "Starting artifact reaper"
        );

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = self.shutdown_token.cancelled() => {
                    tracing::info!("Artifact reaper stopped");
                    return;
                }
                _ = ticker.tick() => {
                    match self.sweep().await {
                        Ok(0) => {}
                        Ok(removed) => tracing::info!(removed, "Reaped stale artifacts"),
                        Err(e) => tracing::warn!(error = %e, "Artifact sweep failed"),
                    }
                }
            }
        }
    }

    /// Removes artifacts older than `max_age`; returns how many were removed.
    pub async fn sweep(&self) -> std::io::Result<usize> {
        let now = SystemTime::now();
        let mut removed = 0;
        let mut entries = tokio::fs::read_dir(&self.dir).await?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if !is_artifact(&path) {
                continue;
            }

            let metadata = match entry.metadata().await {
                Ok(metadata) if metadata.is_file() => metadata,
                _ => continue,
            };
            let age = metadata
                .modified()
                .ok()
                .and_then(|modified| now.duration_since(modified).ok())
                .unwrap_or_default();
            if age < self.max_age {
                continue;
            }

            match tokio::fs::remove_file(&path).await {
                Ok(()) => {
                    tracing::debug!(path = %path.display(), age_secs = age.as_secs(), "Removed stale artifact");
                    removed += 1;
                }
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "Failed to remove stale artifact"),
            }
        }

        metrics::counter!("print_artifacts_reaped_total").increment(removed as u64);
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reaper(dir: &std::path::Path, max_age: Duration) -> ArtifactReaper {
        ArtifactReaper::new(
            dir,
            &ReaperConfig {
                interval: Duration::from_secs(60),
                max_age,
            },
            CancellationToken::new(),
        )
    }

    #[tokio::test]
    async fn fresh_artifacts_survive() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.html"), "x").unwrap();

        let removed = reaper(dir.path(), Duration::from_secs(3600))
            .sweep()
            .await
            .unwrap();

        assert_eq!(removed, 0);
        assert!(dir.path().join("a.html").exists());
    }

    #[tokio::test]
    async fn stale_artifacts_are_removed_and_other_files_kept() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.html"), "x").unwrap();
        std::fs::write(dir.path().join("a.pdf"), "x").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "keep").unwrap();
        std::fs::create_dir(dir.path().join("nested.pdf")).unwrap();

        let removed = reaper(dir.path(), Duration::ZERO).sweep().await.unwrap();

        assert_eq!(removed, 2);
        assert!(!dir.path().join("a.html").exists());
        assert!(!dir.path().join("a.pdf").exists());
        assert!(dir.path().join("notes.txt").exists());
        assert!(dir.path().join("nested.pdf").exists());
    }

    #[tokio::test]
    async fn start_returns_once_cancelled() {
        let dir = tempfile::tempdir().unwrap();
        let token = CancellationToken::new();
        let reaper = ArtifactReaper::new(
            dir.path(),
            &ReaperConfig {
                interval: Duration::from_millis(10),
                max_age: Duration::from_secs(3600),
            },
            token.clone(),
        );

        let handle = tokio::spawn(reaper.start());
        token.cancel();

        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("reaper stops after cancellation")
            .unwrap();
    }
}
