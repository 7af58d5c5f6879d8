//! Background reload worker.
//!
//! Owns the change detector and runs check cycles strictly one at a time:
//! either on its periodic tick inside [`run`](ReloadWorker::run), or
//! driven manually through the facade when polling is disabled.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time;

use crate::config::ReloaderConfig;
use crate::error::ReloadError;
use crate::load;
use crate::store::CertificateStore;
use crate::watch::{ChangeDetector, Poll};

#[derive(Debug)]
pub(crate) struct ReloadWorker {
    config: Arc<ReloaderConfig>,
    store: Arc<CertificateStore>,
    detector: ChangeDetector,
}

impl ReloadWorker {
    pub(crate) fn new(
        config: Arc<ReloaderConfig>,
        store: Arc<CertificateStore>,
        detector: ChangeDetector,
    ) -> Self {
        Self {
            config,
            store,
            detector,
        }
    }

    /// Run one check cycle: poll for changes, reload if either file moved,
    /// publish on success.
    ///
    /// Any failure is reported through the error hook and leaves both the
    /// published key pair and the watermarks untouched, so the reloader
    /// keeps serving the last good pair and retries on the next cycle.
    pub(crate) fn check(&mut self) {
        let (cert_ms, key_ms) = match self.detector.poll() {
            Ok(Poll::Unchanged) => return,
            Ok(Poll::Changed { cert_ms, key_ms }) => (cert_ms, key_ms),
            Err(err) => {
                tracing::warn!(error = %err, "certificate check failed");
                self.config.notify_error(&err);
                return;
            }
        };

        let certified_key =
            match load::load_key_pair(&self.config.certificate_path, &self.config.key_path) {
                Ok(certified_key) => certified_key,
                Err(err) => {
                    let err = ReloadError::from(err);
                    tracing::warn!(
                        error = %err,
                        "certificate reload failed, keeping previous key pair"
                    );
                    self.config.notify_error(&err);
                    return;
                }
            };

        // Commit the times observed before parsing, so a file that changes
        // again mid-reload is picked up on the very next cycle.
        self.detector.commit(cert_ms, key_ms);
        self.store.swap(Arc::new(certified_key));

        tracing::info!(
            certificate = ?self.config.certificate_path,
            key = ?self.config.key_path,
            "certificate reloaded"
        );
        self.config.notify_reload();
    }

    /// Loop until the close signal arrives, running one check per period.
    ///
    /// Each check is scheduled one full period after the previous cycle
    /// completes, so a cycle that overruns the period is never followed by
    /// back-to-back catch-up checks. The close signal is consumed at the
    /// wait point only; a cycle already underway when close is requested
    /// runs to completion.
    pub(crate) async fn run(mut self, period: Duration, mut close_rx: mpsc::Receiver<()>) {
        tracing::debug!(period_ms = period.as_millis() as u64, "reload worker started");

        loop {
            tokio::select! {
                _ = time::sleep(period) => {
                    self.check();
                }
                _ = close_rx.recv() => {
                    tracing::debug!("reload worker received close signal, exiting loop");
                    break;
                }
            }
        }
    }
}
