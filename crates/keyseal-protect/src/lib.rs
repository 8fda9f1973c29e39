//! Key-protection core: RSA key-pair generation, authenticated symmetric
//! encryption of the serialized private key, and the pipeline composing
//! both with a storage vault.

pub mod cipher;
pub mod keypair;
pub mod pipeline;

pub use pipeline::{protect_new_keypair, ProtectError, ProtectedKeyPair};
