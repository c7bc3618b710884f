pub mod cipher;
pub mod key_store;

pub use cipher::{Cipher, DECRYPTION_FAILED};
pub use key_store::{load_or_create_key, Key, KeyStoreError};
