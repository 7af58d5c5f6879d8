//! Change detection for the watched certificate and key files.
//!
//! Files are compared by modification time at millisecond granularity,
//! which is what rotation agents touch when they write a renewed pair.
//! Known limitation: two distinct writes within the same millisecond, or a
//! rewrite that preserves the mtime, go undetected.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use crate::error::ReloadError;

/// Last-observed modification time for one watched file.
#[derive(Debug, Clone)]
pub(crate) struct FileWatermark {
    path: PathBuf,
    modified_ms: i128,
}

impl FileWatermark {
    /// Stat the file and record its current modification time.
    pub(crate) fn capture(path: &Path) -> Result<Self, ReloadError> {
        Ok(Self {
            path: path.to_path_buf(),
            modified_ms: modified_ms(path)?,
        })
    }
}

/// Outcome of polling the watched files.
#[derive(Debug)]
pub(crate) enum Poll {
    Unchanged,
    Changed { cert_ms: i128, key_ms: i128 },
}

/// Tracks the watermarks for the certificate and key files.
#[derive(Debug)]
pub(crate) struct ChangeDetector {
    cert: FileWatermark,
    key: FileWatermark,
}

impl ChangeDetector {
    pub(crate) fn new(cert: FileWatermark, key: FileWatermark) -> Self {
        Self { cert, key }
    }

    /// Stat both files and compare against the stored watermarks.
    ///
    /// Never updates the stored watermarks; the caller commits the returned
    /// times with [`commit`](Self::commit) once a reload based on them has
    /// succeeded, so a failed attempt is retried on the next poll.
    pub(crate) fn poll(&self) -> Result<Poll, ReloadError> {
        let cert_ms = modified_ms(&self.cert.path)?;
        let key_ms = modified_ms(&self.key.path)?;

        if cert_ms == self.cert.modified_ms && key_ms == self.key.modified_ms {
            Ok(Poll::Unchanged)
        } else {
            Ok(Poll::Changed { cert_ms, key_ms })
        }
    }

    /// Record the modification times a successful reload was based on.
    pub(crate) fn commit(&mut self, cert_ms: i128, key_ms: i128) {
        self.cert.modified_ms = cert_ms;
        self.key.modified_ms = key_ms;
    }
}

fn modified_ms(path: &Path) -> Result<i128, ReloadError> {
    let metadata = fs::metadata(path).map_err(|source| ReloadError::Stat {
        path: path.to_path_buf(),
        source,
    })?;
    let modified = metadata.modified().map_err(|source| ReloadError::Stat {
        path: path.to_path_buf(),
        source,
    })?;

    // mtimes before the epoch are legal on some filesystems.
    Ok(match modified.duration_since(UNIX_EPOCH) {
        Ok(after) => after.as_millis() as i128,
        Err(before) => -(before.duration().as_millis() as i128),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn unchanged_files_poll_unchanged() {
        let dir = TempDir::new().unwrap();
        let cert_path = dir.path().join("cert.pem");
        let key_path = dir.path().join("key.pem");
        fs::write(&cert_path, "cert").unwrap();
        fs::write(&key_path, "key").unwrap();

        let detector = ChangeDetector::new(
            FileWatermark::capture(&cert_path).unwrap(),
            FileWatermark::capture(&key_path).unwrap(),
        );
        assert!(matches!(detector.poll().unwrap(), Poll::Unchanged));
    }

    #[test]
    fn either_file_diverging_polls_changed() {
        let dir = TempDir::new().unwrap();
        let cert_path = dir.path().join("cert.pem");
        let key_path = dir.path().join("key.pem");
        fs::write(&cert_path, "cert").unwrap();
        fs::write(&key_path, "key").unwrap();

        let mut detector = ChangeDetector::new(
            FileWatermark::capture(&cert_path).unwrap(),
            FileWatermark::capture(&key_path).unwrap(),
        );

        // Force a stale key watermark; the cert watermark still matches.
        detector.key.modified_ms = -1;
        match detector.poll().unwrap() {
            Poll::Changed { cert_ms, key_ms } => {
                assert_eq!(cert_ms, detector.cert.modified_ms);
                assert_ne!(key_ms, detector.key.modified_ms);
                detector.commit(cert_ms, key_ms);
            }
            Poll::Unchanged => panic!("expected change"),
        }

        // Committed watermarks match again.
        assert!(matches!(detector.poll().unwrap(), Poll::Unchanged));
    }

    #[test]
    fn missing_file_is_a_stat_error() {
        let dir = TempDir::new().unwrap();
        let cert_path = dir.path().join("cert.pem");
        let key_path = dir.path().join("key.pem");
        fs::write(&cert_path, "cert").unwrap();
        fs::write(&key_path, "key").unwrap();

        let detector = ChangeDetector::new(
            FileWatermark::capture(&cert_path).unwrap(),
            FileWatermark::capture(&key_path).unwrap(),
        );

        fs::remove_file(&key_path).unwrap();
        let err = detector.poll().unwrap_err();
        assert!(matches!(err, ReloadError::Stat { path, .. } if path == key_path));
    }
}
