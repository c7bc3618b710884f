//! On-disk storage of the single symmetric key used for every note.
//!
//! The key file holds the raw key bytes and nothing else. It is created on the
//! first start of a deployment and read back unchanged afterwards. Two
//! processes starting against an empty directory at the same moment may both
//! try to create it; the loser fails with [`KeyStoreError::Write`] instead of
//! overwriting the winner's key.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::Path;

use derive_more::Display;
use rand::{rngs::OsRng, RngCore};
use zeroize::Zeroizing;

/// AES-256-GCM key length in bytes.
pub const KEY_LEN: usize = 32;

pub struct Key(Zeroizing<Vec<u8>>);

impl Key {
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, KeyStoreError> {
        if bytes.len() != KEY_LEN {
            return Err(KeyStoreError::InvalidLength(bytes.len()));
        }

        Ok(Key(Zeroizing::new(bytes)))
    }

    pub fn generate() -> Self {
        let mut bytes = Zeroizing::new(vec![0u8; KEY_LEN]);
        OsRng.fill_bytes(&mut bytes);
        Key(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Debug for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Key(..)")
    }
}

#[derive(Debug, Display)]
pub enum KeyStoreError {
    #[display(fmt = "failed to read key file {}: {}", path, source)]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[display(fmt = "failed to write key file {}: {}", path, source)]
    Write {
        path: String,
        source: std::io::Error,
    },
    #[display(fmt = "key file holds {} bytes, expected a 32 byte key", _0)]
    InvalidLength(usize),
}

impl std::error::Error for KeyStoreError {}

/// Reads the key at `path`, generating and persisting a fresh one if the file
/// does not exist yet.
pub fn load_or_create_key(path: &Path) -> Result<Key, KeyStoreError> {
    match fs::read(path) {
        Ok(bytes) => {
            log::info!("loaded encryption key from {}", path.display());
            Key::from_bytes(bytes)
        }
        Err(err) if err.kind() == ErrorKind::NotFound => {
            let key = Key::generate();
            persist(path, &key).map_err(|source| KeyStoreError::Write {
                path: path.display().to_string(),
                source,
            })?;
            log::warn!("generated a new encryption key at {}", path.display());
            Ok(key)
        }
        Err(source) => Err(KeyStoreError::Read {
            path: path.display().to_string(),
            source,
        }),
    }
}

fn persist(path: &Path, key: &Key) -> std::io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    file.write_all(key.as_bytes())?;
    file.sync_all()
}
