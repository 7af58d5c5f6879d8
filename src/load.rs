//! Key-pair loading and validation.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use rustls::sign::CertifiedKey;
use rustls::InconsistentKeys;

use crate::error::LoadError;

/// Read and parse a PEM certificate chain and private key, verifying that
/// the key corresponds to the leaf certificate.
///
/// Stateless; the only side effect is the two file reads.
pub(crate) fn load_key_pair(cert_path: &Path, key_path: &Path) -> Result<CertifiedKey, LoadError> {
    let cert_file = File::open(cert_path).map_err(|source| LoadError::Read {
        path: cert_path.to_path_buf(),
        source,
    })?;
    let cert_chain = rustls_pemfile::certs(&mut BufReader::new(cert_file))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|source| LoadError::Pem {
            path: cert_path.to_path_buf(),
            source,
        })?;
    if cert_chain.is_empty() {
        return Err(LoadError::NoCertificates {
            path: cert_path.to_path_buf(),
        });
    }

    let key_file = File::open(key_path).map_err(|source| LoadError::Read {
        path: key_path.to_path_buf(),
        source,
    })?;
    let key_der = rustls_pemfile::private_key(&mut BufReader::new(key_file))
        .map_err(|source| LoadError::Pem {
            path: key_path.to_path_buf(),
            source,
        })?
        .ok_or_else(|| LoadError::NoPrivateKey {
            path: key_path.to_path_buf(),
        })?;

    let signing_key = rustls::crypto::ring::default_provider()
        .key_provider
        .load_private_key(key_der)
        .map_err(|source| LoadError::UnsupportedKey {
            path: key_path.to_path_buf(),
            source,
        })?;

    let certified_key = CertifiedKey::new(cert_chain, signing_key);
    match certified_key.keys_match() {
        Ok(()) => Ok(certified_key),
        // The provider cannot extract a public key from this key type, so
        // consistency cannot be checked.
        Err(rustls::Error::InconsistentKeys(InconsistentKeys::Unknown)) => Ok(certified_key),
        Err(source) => Err(LoadError::KeyMismatch(source)),
    }
}
