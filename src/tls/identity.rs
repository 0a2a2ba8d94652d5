//! Certificate/key pair and the identity built from it

use crate::error::{Error, Result};
use reqwest::Identity;
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::debug;

const PEM_MARKER: &str = "-----BEGIN";
const CERT_FILE: &str = "client.crt";
const KEY_FILE: &str = "client.key";

/// PEM encoded client certificate and private key
#[derive(Clone)]
pub struct ClientCertificate {
    certificate: String,
    private_key: String,
}

impl ClientCertificate {
    /// Create a pair from PEM text
    pub fn new(certificate: impl Into<String>, private_key: impl Into<String>) -> Self {
        Self {
            certificate: certificate.into(),
            private_key: private_key.into(),
        }
    }

    /// Certificate PEM text
    pub fn certificate(&self) -> &str {
        &self.certificate
    }

    /// Build a TLS identity directly from the in-memory PEM buffers
    pub fn identity(&self) -> Result<Identity> {
        check_pem("ssl_cert", &self.certificate)?;
        check_pem("ssl_key", &self.private_key)?;
        identity_from_pem(self.certificate.as_bytes(), self.private_key.as_bytes())
    }

    /// Write the pair into a fresh private temporary directory
    ///
    /// The directory is created with owner-only permissions and each file
    /// with mode `0600`. Both are removed when the returned guard drops.
    pub fn materialize(&self) -> Result<MaterializedCredentials> {
        check_pem("ssl_cert", &self.certificate)?;
        check_pem("ssl_key", &self.private_key)?;

        let dir = tempfile::Builder::new().prefix("adp-mtls-").tempdir()?;
        let cert_path = dir.path().join(CERT_FILE);
        let key_path = dir.path().join(KEY_FILE);

        write_private(&cert_path, self.certificate.as_bytes())?;
        write_private(&key_path, self.private_key.as_bytes())?;

        debug!(dir = %dir.path().display(), "Materialized client certificate");

        Ok(MaterializedCredentials {
            dir,
            cert_path,
            key_path,
        })
    }
}

impl fmt::Debug for ClientCertificate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCertificate")
            .field("certificate_len", &self.certificate.len())
            .field("private_key", &"***")
            .finish()
    }
}

/// Certificate and key written to disk for the lifetime of this guard
#[derive(Debug)]
pub struct MaterializedCredentials {
    dir: TempDir,
    cert_path: PathBuf,
    key_path: PathBuf,
}

impl MaterializedCredentials {
    /// Path of the certificate file
    pub fn cert_path(&self) -> &Path {
        &self.cert_path
    }

    /// Path of the private key file
    pub fn key_path(&self) -> &Path {
        &self.key_path
    }

    /// Directory holding both files
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// Load a TLS identity from the written files
    pub fn identity(&self) -> Result<Identity> {
        let cert_pem = fs::read(&self.cert_path)?;
        let key_pem = fs::read(&self.key_path)?;
        identity_from_pem(&cert_pem, &key_pem)
    }

    /// Remove the files now, reporting any I/O error
    pub fn close(self) -> Result<()> {
        self.dir.close()?;
        Ok(())
    }
}

/// A TLS identity plus, in file mode, the guard keeping its files alive
pub struct ClientIdentity {
    identity: Identity,
    materialized: Option<MaterializedCredentials>,
}

impl ClientIdentity {
    /// Load the identity, through temp files when `materialize` is set
    pub fn load(certificate: &ClientCertificate, materialize: bool) -> Result<Self> {
        if materialize {
            let materialized = certificate.materialize()?;
            let identity = materialized.identity()?;
            Ok(Self {
                identity,
                materialized: Some(materialized),
            })
        } else {
            Ok(Self {
                identity: certificate.identity()?,
                materialized: None,
            })
        }
    }

    /// The reqwest identity
    pub fn identity(&self) -> Identity {
        self.identity.clone()
    }

    /// The temp file guard, if the identity was materialized
    pub fn materialized(&self) -> Option<&MaterializedCredentials> {
        self.materialized.as_ref()
    }
}

impl fmt::Debug for ClientIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientIdentity")
            .field("materialized", &self.materialized)
            .finish_non_exhaustive()
    }
}

fn check_pem(field: &str, pem: &str) -> Result<()> {
    if pem.contains(PEM_MARKER) {
        Ok(())
    } else {
        Err(Error::invalid_value(field, "expected PEM encoded data"))
    }
}

fn identity_from_pem(cert_pem: &[u8], key_pem: &[u8]) -> Result<Identity> {
    let mut buf = Vec::with_capacity(cert_pem.len() + key_pem.len() + 1);
    buf.extend_from_slice(cert_pem);
    if !cert_pem.ends_with(b"\n") {
        buf.push(b'\n');
    }
    buf.extend_from_slice(key_pem);

    Identity::from_pem(&buf)
        .map_err(|e| Error::tls(format!("failed to create client identity: {e}")))
}

fn write_private(path: &Path, contents: &[u8]) -> Result<()> {
    let mut file = open_private(path)?;
    file.write_all(contents)?;
    file.sync_all()?;
    Ok(())
}

#[cfg(unix)]
fn open_private(path: &Path) -> std::io::Result<File> {
    use std::os::unix::fs::OpenOptionsExt;

    OpenOptions::new()
        .write(true)
        .create_new(true)
        .mode(0o600)
        .open(path)
}

#[cfg(not(unix))]
fn open_private(path: &Path) -> std::io::Result<File> {
    OpenOptions::new().write(true).create_new(true).open(path)
}
