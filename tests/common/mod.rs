//! Shared helpers for the reload integration tests.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tempfile::TempDir;

/// Write a freshly generated self-signed key pair to the given paths.
pub fn write_key_pair(cert_path: &Path, key_path: &Path) {
    let rcgen::CertifiedKey { cert, key_pair } =
        rcgen::generate_simple_self_signed(vec!["localhost".into()]).unwrap();
    fs::write(cert_path, cert.pem()).unwrap();
    fs::write(key_path, key_pair.serialize_pem()).unwrap();
}

/// A temporary directory holding a valid certificate/key pair.
pub struct CertDir {
    // Held for its Drop; the directory is removed when the test ends.
    _dir: TempDir,
    pub cert_path: PathBuf,
    pub key_path: PathBuf,
}

pub fn cert_dir() -> CertDir {
    let dir = TempDir::new().unwrap();
    let cert_path = dir.path().join("cert.pem");
    let key_path = dir.path().join("key.pem");
    write_key_pair(&cert_path, &key_path);
    CertDir {
        _dir: dir,
        cert_path,
        key_path,
    }
}

/// Rewrite both files with a new pair, far enough apart in time from the
/// previous write that the millisecond-granularity mtimes differ.
pub fn rotate_key_pair(dir: &CertDir) {
    std::thread::sleep(Duration::from_millis(50));
    write_key_pair(&dir.cert_path, &dir.key_path);
}
