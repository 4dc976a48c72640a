use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, warn};
use uuid::Uuid;

/// One rendered report on disk, alive for the span of a single request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportArtifact {
    pub filename: String,
    pub path: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("failed to prepare storage directory {dir}: {source}")]
    Prepare {
        dir: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write report artifact {filename}: {source}")]
    Write {
        filename: String,
        source: std::io::Error,
    },
}

/// Request-scoped artifact storage under one configured directory.
///
/// Callers release artifacts explicitly; the sweeper only mops up after
/// crashes between write and release.
pub struct ArtifactStore {
    dir: PathBuf,
    cleanup_delay: Duration,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>, cleanup_delay: Duration) -> Self {
        Self {
            dir: dir.into(),
            cleanup_delay,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write `bytes` under `filename`, creating the directory if absent.
    pub async fn store(
        &self,
        filename: &str,
        bytes: &[u8],
    ) -> Result<ReportArtifact, StorageError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| StorageError::Prepare {
                dir: self.dir.clone(),
                source,
            })?;

        let path = self.dir.join(filename);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|source| StorageError::Write {
                filename: filename.to_string(),
                source,
            })?;

        Ok(ReportArtifact {
            filename: filename.to_string(),
            path,
        })
    }

    /// Best-effort release. A missing file is fine; anything else is logged
    /// and left for the sweeper.
    pub async fn remove(&self, artifact: &ReportArtifact) {
        match tokio::fs::remove_file(&artifact.path).await {
            Ok(()) => debug!(filename = %artifact.filename, "released report artifact"),
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => {
                warn!(filename = %artifact.filename, error = %err, "artifact release failed")
            }
        }
    }

    /// Delete artifacts older than the cleanup delay. Returns how many were
    /// removed; unreadable entries are skipped.
    pub async fn sweep_stale(&self) -> usize {
        let mut removed = 0;
        let Ok(mut entries) = tokio::fs::read_dir(&self.dir).await else {
            return 0;
        };

        while let Ok(Some(entry)) = entries.next_entry().await {
            let Ok(metadata) = entry.metadata().await else {
                continue;
            };
            if !metadata.is_file() {
                continue;
            }
            let stale = metadata
                .modified()
                .ok()
                .and_then(|modified| modified.elapsed().ok())
                .map(|age| age >= self.cleanup_delay)
                .unwrap_or(false);
            if stale && tokio::fs::remove_file(entry.path()).await.is_ok() {
                removed += 1;
            }
        }

        if removed > 0 {
            debug!(removed, "swept stale report artifacts");
        }
        removed
    }

    /// Run the stale sweep on the cleanup interval for the life of the
    /// process.
    pub fn spawn_sweeper(self: &Arc<Self>) -> tokio::task::JoinHandle<()> {
        let store = Arc::clone(self);
        let period = store.cleanup_delay.max(Duration::from_secs(1));
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                store.sweep_stale().await;
            }
        })
    }
}

/// Collision-free artifact name: sanitized company, UTC timestamp, random
/// suffix.
pub(crate) fn report_filename(company: &str) -> String {
    let slug: String = company
        .trim()
        .chars()
        .map(|ch| if ch.is_ascii_alphanumeric() { ch } else { '_' })
        .collect();
    let stamp = Utc::now().format("%Y%m%dT%H%M%S%3f");
    let suffix = Uuid::new_v4().simple().to_string();
    format!("ROIplus_Report_{slug}_{stamp}_{}.pdf", &suffix[..8])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &Path, delay: Duration) -> ArtifactStore {
        ArtifactStore::new(dir.to_path_buf(), delay)
    }

    #[tokio::test]
    async fn store_writes_and_remove_releases() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let store = store_in(tmp.path(), Duration::from_secs(60));

        let artifact = store
            .store("ROIplus_Report_Acme_1.pdf", b"%PDF-1.3 test")
            .await
            .expect("artifact stored");
        assert!(artifact.path.exists());

        store.remove(&artifact).await;
        assert!(!artifact.path.exists());
    }

    #[tokio::test]
    async fn remove_tolerates_missing_files() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let store = store_in(tmp.path(), Duration::from_secs(60));
        let artifact = store
            .store("ROIplus_Report_Acme_2.pdf", b"bytes")
            .await
            .expect("artifact stored");

        store.remove(&artifact).await;
        // Second release is a no-op, not a panic or an error log storm.
        store.remove(&artifact).await;
    }

    #[tokio::test]
    async fn store_creates_the_directory() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let nested = tmp.path().join("nested/pdfs");
        let store = store_in(&nested, Duration::from_secs(60));

        let artifact = store
            .store("ROIplus_Report_Acme_3.pdf", b"bytes")
            .await
            .expect("artifact stored");
        assert!(artifact.path.starts_with(&nested));
    }

    #[tokio::test]
    async fn sweep_removes_only_stale_artifacts() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let store = store_in(tmp.path(), Duration::ZERO);
        store
            .store("ROIplus_Report_Acme_4.pdf", b"bytes")
            .await
            .expect("artifact stored");
        tokio::time::sleep(Duration::from_millis(20)).await;

        // Zero delay makes everything stale immediately.
        assert_eq!(store.sweep_stale().await, 1);
        assert_eq!(store.sweep_stale().await, 0);
    }

    #[test]
    fn filenames_are_sanitized_and_unique() {
        let first = report_filename("Test Company Ltd");
        let second = report_filename("Test Company Ltd");
        assert!(first.starts_with("ROIplus_Report_Test_Company_Ltd_"));
        assert!(first.ends_with(".pdf"));
        assert_ne!(first, second);
    }
}
