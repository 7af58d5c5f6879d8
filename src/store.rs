//! Shared published state: the current key pair and the closed flag.

use std::sync::{Arc, Mutex};

use rustls::sign::CertifiedKey;

/// Slot holding the currently published key pair.
///
/// One mutex guards both the key pair and the closed flag. Every critical
/// section is a single reference copy, swap, or flag read; reload I/O and
/// parsing happen outside the lock, so readers are never held up by a
/// reload in progress.
#[derive(Debug)]
pub(crate) struct CertificateStore {
    inner: Mutex<Inner>,
}

#[derive(Debug)]
struct Inner {
    certified_key: Arc<CertifiedKey>,
    closed: bool,
}

impl CertificateStore {
    pub(crate) fn new(certified_key: Arc<CertifiedKey>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                certified_key,
                closed: false,
            }),
        }
    }

    /// The currently published key pair.
    ///
    /// Readers holding an earlier `Arc` keep a valid pair across any number
    /// of swaps.
    pub(crate) fn current(&self) -> Arc<CertifiedKey> {
        let inner = self.inner.lock().expect("certificate store mutex poisoned");
        inner.certified_key.clone()
    }

    /// Publish a new key pair.
    pub(crate) fn swap(&self, certified_key: Arc<CertifiedKey>) {
        let mut inner = self.inner.lock().expect("certificate store mutex poisoned");
        inner.certified_key = certified_key;
    }

    pub(crate) fn is_closed(&self) -> bool {
        let inner = self.inner.lock().expect("certificate store mutex poisoned");
        inner.closed
    }

    /// Mark the store closed. Returns true only for the call that performed
    /// the transition, so the close signal is sent at most once.
    pub(crate) fn close(&self) -> bool {
        let mut inner = self.inner.lock().expect("certificate store mutex poisoned");
        let was_closed = inner.closed;
        inner.closed = true;
        !was_closed
    }
}
