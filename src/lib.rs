//! Hot-reloading TLS key pairs for rustls servers.
//!
//! Watches a PEM certificate-chain file and a private-key file and
//! republishes the parsed pair whenever either file's modification time
//! changes, so an external renewal agent (e.g. an ACME client) can rotate
//! certificates without a server restart.
//!
//! # Guarantees
//!
//! - Construction loads and validates the pair synchronously and fails
//!   fast; a reloader always holds a complete, parsed key pair.
//! - Readers never block on a reload in progress; publishing is a single
//!   reference swap under a short-lived lock.
//! - A failed reload (missing file, bad PEM, key/cert mismatch) is
//!   reported through the `on_error` hook and the previous pair keeps
//!   being served; the change is retried on the next cycle.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use tls_cert_reloader::{CertificateReloader, ReloaderConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! # let rt = tokio::runtime::Runtime::new()?;
//! # rt.block_on(async {
//! let reloader = Arc::new(CertificateReloader::new(
//!     ReloaderConfig::new("certs/fullchain.pem", "certs/privkey.pem")
//!         .check_period(Duration::from_secs(60))
//!         .on_reload(|| tracing::info!("certificate rotated"))
//!         .on_error(|err| tracing::warn!(error = %err, "certificate reload failed")),
//! )?);
//!
//! let tls_config = rustls::ServerConfig::builder()
//!     .with_no_client_auth()
//!     .with_cert_resolver(reloader.clone());
//! // hand tls_config to the listener...
//! # Ok::<(), tls_cert_reloader::ReloadError>(())
//! # })?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod loader;

mod load;
mod store;
mod watch;
mod worker;

pub use config::ReloaderConfig;
pub use error::{LoadError, ReloadError};
pub use loader::CertificateReloader;
