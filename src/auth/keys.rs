//! Token signing key material.
//!
//! The service signs identity tokens with an Ed25519 key pair. Both halves are
//! read from PEM files once at startup and stay read-only for the lifetime of
//! the process; a [`KeyStore`] is shared behind an `Arc`.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{Duration, Utc};
use ed25519_dalek::pkcs8::spki::der::pem::LineEnding;
use ed25519_dalek::pkcs8::{EncodePrivateKey, EncodePublicKey, KeypairBytes};
use ed25519_dalek::SigningKey;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand_core::OsRng;
use serde_json::{json, Value};
use thiserror::Error;
use zeroize::Zeroizing;

pub const PRIVATE_KEY_FILE: &str = "private.pem";
pub const PUBLIC_KEY_FILE: &str = "public.pem";

/// Key material is missing or unusable. Fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("key file not found: {}", .0.display())]
    MissingKey(PathBuf),

    #[error("unable to read key file {}: {source}", .path.display())]
    ReadKey {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to write key file {}: {source}", .path.display())]
    WriteKey {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed {which} key: {reason}")]
    MalformedKey { which: &'static str, reason: String },

    #[error("private and public key do not form a pair")]
    KeyMismatch,

    #[error("key generation failed: {0}")]
    Generate(String),

    #[error("refusing to overwrite existing key file {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error("invalid setting {name}: {reason}")]
    InvalidSetting { name: &'static str, reason: String },
}

/// Holds the signing key pair for the process lifetime.
#[derive(Clone)]
pub struct KeyStore {
    private_key: EncodingKey,
    public_key: DecodingKey,
}

impl std::fmt::Debug for KeyStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyStore")
            .field("algorithm", &self.algorithm())
            .finish_non_exhaustive()
    }
}

impl KeyStore {
    /// Load the key pair from PEM files on disk.
    pub fn load(private_path: &Path, public_path: &Path) -> Result<Self, ConfigurationError> {
        let private_pem = Zeroizing::new(read_key_file(private_path)?);
        let public_pem = read_key_file(public_path)?;

        let store = Self::from_pem(&private_pem, &public_pem)?;
        tracing::info!(
            private_key = %private_path.display(),
            public_key = %public_path.display(),
            "loaded token signing keys"
        );
        Ok(store)
    }

    /// Build from a PKCS#8 private key PEM and an SPKI public key PEM.
    pub fn from_pem(private_pem: &[u8], public_pem: &[u8]) -> Result<Self, ConfigurationError> {
        let private_key = EncodingKey::from_ed_pem(private_pem).map_err(|e| {
            ConfigurationError::MalformedKey { which: "private", reason: e.to_string() }
        })?;
        let public_key = DecodingKey::from_ed_pem(public_pem).map_err(|e| {
            ConfigurationError::MalformedKey { which: "public", reason: e.to_string() }
        })?;

        let store = Self { private_key, public_key };
        store.check_pair()?;
        Ok(store)
    }

    /// In-memory store backed by a freshly generated key pair.
    pub fn generate() -> Result<Self, ConfigurationError> {
        let keys = GeneratedKeys::generate()?;
        Self::from_pem(keys.private_pem.as_bytes(), keys.public_pem.as_bytes())
    }

    pub fn private_key(&self) -> &EncodingKey {
        &self.private_key
    }

    pub fn public_key(&self) -> &DecodingKey {
        &self.public_key
    }

    pub fn algorithm(&self) -> Algorithm {
        Algorithm::EdDSA
    }

    // Sign and verify a probe token; PEM parsing does not catch a mismatched pair.
    fn check_pair(&self) -> Result<(), ConfigurationError> {
        let probe = json!({
            "sub": "key-probe",
            "exp": (Utc::now() + Duration::minutes(1)).timestamp(),
        });

        let token = encode(&Header::new(self.algorithm()), &probe, &self.private_key).map_err(|e| {
            ConfigurationError::MalformedKey { which: "private", reason: e.to_string() }
        })?;

        let validation = Validation::new(self.algorithm());
        decode::<Value>(&token, &self.public_key, &validation)
            .map(|_| ())
            .map_err(|_| ConfigurationError::KeyMismatch)
    }
}

fn read_key_file(path: &Path) -> Result<Vec<u8>, ConfigurationError> {
    fs::read(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            ConfigurationError::MissingKey(path.to_path_buf())
        } else {
            ConfigurationError::ReadKey { path: path.to_path_buf(), source }
        }
    })
}

/// A freshly generated Ed25519 key pair in PEM form.
pub struct GeneratedKeys {
    pub private_pem: Zeroizing<String>,
    pub public_pem: String,
}

impl GeneratedKeys {
    pub fn generate() -> Result<Self, ConfigurationError> {
        let signing_key = SigningKey::generate(&mut OsRng);

        // PKCS#8 v1 (no embedded public key), the same layout `openssl genpkey` emits.
        let keypair = KeypairBytes { secret_key: signing_key.to_bytes(), public_key: None };
        let private_pem = keypair
            .to_pkcs8_pem(LineEnding::LF)
            .map_err(|e| ConfigurationError::Generate(e.to_string()))?;
        let public_pem = signing_key
            .verifying_key()
            .to_public_key_pem(LineEnding::LF)
            .map_err(|e| ConfigurationError::Generate(e.to_string()))?;

        Ok(Self { private_pem, public_pem })
    }

    /// Write `private.pem` and `public.pem` into `dir`, returning both paths.
    pub fn write_to(&self, dir: &Path, overwrite: bool) -> Result<(PathBuf, PathBuf), ConfigurationError> {
        let private_path = dir.join(PRIVATE_KEY_FILE);
        let public_path = dir.join(PUBLIC_KEY_FILE);

        if !overwrite {
            for path in [&private_path, &public_path] {
                if path.exists() {
                    return Err(ConfigurationError::AlreadyExists(path.clone()));
                }
            }
        }

        fs::create_dir_all(dir)
            .map_err(|source| ConfigurationError::WriteKey { path: dir.to_path_buf(), source })?;
        write_key_file(&private_path, self.private_pem.as_bytes(), true)?;
        write_key_file(&public_path, self.public_pem.as_bytes(), false)?;

        Ok((private_path, public_path))
    }
}

fn write_key_file(path: &Path, contents: &[u8], secret: bool) -> Result<(), ConfigurationError> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(if secret { 0o600 } else { 0o644 });
    }
    #[cfg(not(unix))]
    let _ = secret;

    options
        .open(path)
        .and_then(|mut file| file.write_all(contents))
        .map_err(|source| ConfigurationError::WriteKey { path: path.to_path_buf(), source })
}
