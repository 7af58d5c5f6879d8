//! The reloader facade: initial load, background task, read accessor.

use std::fmt;
use std::sync::Arc;

use rustls::server::{ClientHello, ResolvesServerCert};
use rustls::sign::CertifiedKey;
use tokio::sync::mpsc;

use crate::config::ReloaderConfig;
use crate::error::ReloadError;
use crate::load;
use crate::store::CertificateStore;
use crate::watch::{ChangeDetector, FileWatermark};
use crate::worker::ReloadWorker;

/// A TLS key pair that republishes itself when its source files change.
///
/// Construction performs one synchronous load and fails fast if the files
/// are missing, malformed, or mismatched. With a positive
/// [`check_period`](ReloaderConfig::check_period) a background task then
/// polls the files and atomically publishes each successfully reloaded
/// pair; readers are never blocked by a reload and a failed reload never
/// displaces the last good pair.
///
/// `Arc<CertificateReloader>` implements [`ResolvesServerCert`], so it can
/// be handed directly to
/// [`rustls::ServerConfig`]`::builder()...with_cert_resolver`.
///
/// Call [`close`](Self::close) when the reloader is no longer needed;
/// dropping it does not stop the background task.
pub struct CertificateReloader {
    store: Arc<CertificateStore>,
    close_tx: Option<mpsc::Sender<()>>,
    // Present only when polling is disabled; drives manual `check` calls.
    worker: Option<ReloadWorker>,
}

impl CertificateReloader {
    /// Load the key pair once and, if a positive check period is
    /// configured, start the background polling task.
    ///
    /// Errors here are returned directly instead of going through the
    /// `on_error` hook, because no reloader exists yet to own the hook.
    ///
    /// # Panics
    ///
    /// Panics if a check period is configured and this is called outside a
    /// tokio runtime, since the polling task is spawned onto the ambient
    /// runtime.
    pub fn new(config: ReloaderConfig) -> Result<Self, ReloadError> {
        let cert_mark = FileWatermark::capture(&config.certificate_path)?;
        let key_mark = FileWatermark::capture(&config.key_path)?;
        let certified_key = load::load_key_pair(&config.certificate_path, &config.key_path)?;

        tracing::info!(
            certificate = ?config.certificate_path,
            key = ?config.key_path,
            "initial certificate loaded"
        );

        let store = Arc::new(CertificateStore::new(Arc::new(certified_key)));
        let config = Arc::new(config);
        let worker = ReloadWorker::new(
            config.clone(),
            store.clone(),
            ChangeDetector::new(cert_mark, key_mark),
        );

        match config.polling_period() {
            Some(period) => {
                let (close_tx, close_rx) = mpsc::channel(1);
                tokio::spawn(worker.run(period, close_rx));
                Ok(Self {
                    store,
                    close_tx: Some(close_tx),
                    worker: None,
                })
            }
            None => Ok(Self {
                store,
                close_tx: None,
                worker: Some(worker),
            }),
        }
    }

    /// The currently published key pair.
    ///
    /// Never fails and never blocks beyond a brief reference copy under the
    /// store lock; safe to call concurrently from any number of handshakes.
    pub fn current(&self) -> Arc<CertifiedKey> {
        self.store.current()
    }

    /// Whether [`close`](Self::close) has been called. A closed reloader
    /// no longer checks for changes but keeps serving the last published
    /// key pair.
    pub fn is_closed(&self) -> bool {
        self.store.is_closed()
    }

    /// Stop the background polling task.
    ///
    /// Idempotent and safe to call concurrently: only the first call sends
    /// the one-shot close signal. Returns without waiting for the task to
    /// observe the signal; a check cycle already underway completes first.
    pub fn close(&self) {
        if self.store.close() {
            if let Some(close_tx) = &self.close_tx {
                let _ = close_tx.try_send(());
            }
        }
    }

    /// Run one check cycle immediately.
    ///
    /// Only effective when background polling is disabled; with a polling
    /// task running this is a no-op, so a manual check can never overlap a
    /// scheduled one. Cycle failures are reported through the `on_error`
    /// hook, as for scheduled cycles.
    pub fn check(&mut self) {
        if let Some(worker) = &mut self.worker {
            worker.check();
        }
    }
}

impl ResolvesServerCert for CertificateReloader {
    /// Dynamic certificate selection hook: ignores the client hello and
    /// returns the latest published pair.
    fn resolve(&self, _client_hello: ClientHello<'_>) -> Option<Arc<CertifiedKey>> {
        Some(self.store.current())
    }
}

impl fmt::Debug for CertificateReloader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CertificateReloader")
            .field("closed", &self.store.is_closed())
            .field("polling", &self.close_tx.is_some())
            .finish()
    }
}
