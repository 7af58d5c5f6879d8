//! Reloader configuration.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::ReloadError;

type ReloadHook = Box<dyn Fn() + Send + Sync + 'static>;
type ErrorHook = Box<dyn Fn(&ReloadError) + Send + Sync + 'static>;

/// Configuration for a [`CertificateReloader`](crate::CertificateReloader).
///
/// Built in builder style; immutable once the reloader is constructed.
pub struct ReloaderConfig {
    pub(crate) certificate_path: PathBuf,
    pub(crate) key_path: PathBuf,
    check_period: Option<Duration>,
    on_reload: Option<ReloadHook>,
    on_error: Option<ErrorHook>,
}

impl ReloaderConfig {
    /// Watch the given PEM certificate-chain and private-key files.
    pub fn new(certificate_path: impl Into<PathBuf>, key_path: impl Into<PathBuf>) -> Self {
        Self {
            certificate_path: certificate_path.into(),
            key_path: key_path.into(),
            check_period: None,
            on_reload: None,
            on_error: None,
        }
    }

    /// How often to check the files for changes.
    ///
    /// Unset or zero disables background polling: the reloader then only
    /// performs its initial load, and further cycles run via manual
    /// [`check`](crate::CertificateReloader::check) calls.
    pub fn check_period(mut self, period: Duration) -> Self {
        self.check_period = Some(period);
        self
    }

    /// Invoked (with no arguments) after each successful reload.
    pub fn on_reload(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_reload = Some(Box::new(hook));
        self
    }

    /// Invoked with the error whenever a check cycle fails to reload.
    pub fn on_error(mut self, hook: impl Fn(&ReloadError) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Box::new(hook));
        self
    }

    /// The polling period, if background polling is enabled.
    pub(crate) fn polling_period(&self) -> Option<Duration> {
        self.check_period.filter(|period| !period.is_zero())
    }

    /// Call the reload hook if one is configured.
    pub(crate) fn notify_reload(&self) {
        if let Some(hook) = &self.on_reload {
            hook();
        }
    }

    /// Call the error hook if one is configured.
    pub(crate) fn notify_error(&self, err: &ReloadError) {
        if let Some(hook) = &self.on_error {
            hook(err);
        }
    }
}

impl fmt::Debug for ReloaderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReloaderConfig")
            .field("certificate_path", &self.certificate_path)
            .field("key_path", &self.key_path)
            .field("check_period", &self.check_period)
            .field("on_reload", &self.on_reload.is_some())
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}
