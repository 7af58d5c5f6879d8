//! Error types for certificate loading and reloading.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors from reading and parsing a certificate/key pair off disk.
#[derive(Debug, Error)]
pub enum LoadError {
    /// A source file could not be opened or read.
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A source file contained malformed PEM.
    #[error("invalid PEM in {path:?}: {source}")]
    Pem {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The certificate file decoded but held no certificates.
    #[error("no certificates found in {path:?}")]
    NoCertificates { path: PathBuf },

    /// The key file decoded but held no private key.
    #[error("no private key found in {path:?}")]
    NoPrivateKey { path: PathBuf },

    /// The private key is not a type the crypto provider supports.
    #[error("unsupported private key in {path:?}: {source}")]
    UnsupportedKey {
        path: PathBuf,
        #[source]
        source: rustls::Error,
    },

    /// The private key does not correspond to the leaf certificate.
    #[error("private key does not match certificate: {0}")]
    KeyMismatch(#[source] rustls::Error),
}

/// Errors surfaced by a reload check cycle.
///
/// Also returned by [`CertificateReloader::new`](crate::CertificateReloader::new)
/// when the initial load fails; after construction, cycle errors are only
/// reported through the configured `on_error` hook.
#[derive(Debug, Error)]
pub enum ReloadError {
    /// A watched file could not be stat'ed.
    #[error("failed to stat {path:?}: {source}")]
    Stat {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The changed files failed to load or validate.
    #[error(transparent)]
    Load(#[from] LoadError),
}
