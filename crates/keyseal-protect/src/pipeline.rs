use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use keyseal_core::vault::{unique_entry_name, Vault, VaultError};
use rand::{CryptoRng, RngCore};
use rsa::RsaPublicKey;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::{
    cipher::{self, CipherError, SealedSecret, NONCE_LEN, PASSWORD_LEN, TAG_LEN},
    keypair::{KeyPair, KeygenError},
};

/// Filename prefix for persisted private-key entries.
pub const ENTRY_PREFIX: &str = "private_key";

/// First failure of any pipeline step, propagated as-is. The pipeline
/// never retries and never writes anything before encryption succeeds, so
/// a failed call leaves no file behind.
#[derive(Debug, Error)]
pub enum ProtectError {
    #[error(transparent)]
    Keygen(#[from] KeygenError),
    #[error(transparent)]
    Cipher(#[from] CipherError),
    #[error(transparent)]
    Vault(#[from] VaultError),
}

/// Result of one protection run.
///
/// The persisted file holds only the base64 ciphertext: password, nonce,
/// and tag deliberately stay out of storage (split custody). The file
/// alone can neither be verified nor decrypted; the caller holds the
/// other half of the material, and losing it makes the file permanently
/// opaque. None of these fields may be logged.
#[derive(Debug)]
pub struct ProtectedKeyPair {
    pub public_key: RsaPublicKey,
    pub filename: String,
    pub password: [u8; PASSWORD_LEN],
    pub nonce: [u8; NONCE_LEN],
    pub tag: [u8; TAG_LEN],
}

/// Generate a key pair, encrypt its serialized private half under a fresh
/// password, and persist the base64 ciphertext under a collision-resistant
/// name.
///
/// Runs strictly linearly: generate, serialize, encrypt, encode, persist.
/// Exactly one vault entry is created per successful call. `modulus_bits`
/// is mandatory; see [`KeyPair`] for guidance on weak sizes.
#[instrument(skip(rng, vault))]
pub fn protect_new_keypair<R, V>(
    rng: &mut R,
    vault: &V,
    modulus_bits: usize,
) -> Result<ProtectedKeyPair, ProtectError>
where
    R: RngCore + CryptoRng,
    V: Vault + ?Sized,
{
    let pair = KeyPair::generate(rng, modulus_bits)?;
    let private_der = pair.serialize_private()?;

    let password = cipher::new_password(rng);
    let SealedSecret {
        ciphertext,
        nonce,
        tag,
    } = cipher::encrypt(rng, &password, &private_der)?;
    drop(private_der);

    let encoded = BASE64.encode(&ciphertext);
    let filename = unique_entry_name(rng, ENTRY_PREFIX);
    vault.write(&filename, &encoded)?;
    debug!(%filename, modulus_bits, "protected key pair persisted");

    Ok(ProtectedKeyPair {
        public_key: pair.public_key().clone(),
        filename,
        password,
        nonce,
        tag,
    })
}

#[cfg(test)]
mod tests {
    use keyseal_core::vault::InMemoryVault;
    use keyseal_storage::file_vault::FileVault;
    use rand::rngs::OsRng;
    use rsa::traits::PublicKeyParts;

    use super::*;

    fn recover_private_der(vault: &dyn Vault, protected: &ProtectedKeyPair) -> Vec<u8> {
        let encoded = vault.read(&protected.filename).expect("read entry");
        let ciphertext = BASE64.decode(encoded).expect("valid base64");
        cipher::decrypt(
            &protected.password,
            &protected.nonce,
            &ciphertext,
            &protected.tag,
        )
        .expect("decrypt with returned material")
    }

    #[test]
    fn protects_a_512_bit_keypair_end_to_end() {
        let dir = tempfile::tempdir().expect("tempdir");
        let vault = FileVault::new(dir.path());

        let protected = protect_new_keypair(&mut OsRng, &vault, 512).expect("protect");

        assert_eq!(protected.public_key.n().bits(), 512);
        assert!(vault.path_for(&protected.filename).exists());

        let der = recover_private_der(&vault, &protected);
        let private = KeyPair::deserialize_private(&der).expect("deserialize");
        assert_eq!(private.to_public_key().n(), protected.public_key.n());
        assert_eq!(private.to_public_key().e(), protected.public_key.e());
    }

    #[test]
    fn file_holds_base64_of_ciphertext_only() {
        let vault = InMemoryVault::new();
        let protected = protect_new_keypair(&mut OsRng, &vault, 512).expect("protect");

        let encoded = vault.read(&protected.filename).expect("read entry");
        assert!(encoded.is_ascii());
        let ciphertext = BASE64.decode(&encoded).expect("valid base64");

        // Tag and nonce are withheld from storage: the decoded content is
        // exactly the ciphertext, and the returned tag is not part of it.
        let plain = cipher::decrypt(
            &protected.password,
            &protected.nonce,
            &ciphertext,
            &protected.tag,
        )
        .expect("ciphertext + out-of-band tag must decrypt");
        KeyPair::deserialize_private(&plain).expect("valid PKCS#1 DER");
    }

    #[test]
    fn successive_calls_yield_distinct_filenames_and_passwords() {
        let vault = InMemoryVault::new();

        let first = protect_new_keypair(&mut OsRng, &vault, 512).expect("protect");
        let second = protect_new_keypair(&mut OsRng, &vault, 512).expect("protect");

        assert_ne!(first.filename, second.filename);
        assert_ne!(first.password, second.password);
        assert_ne!(first.nonce, second.nonce);
    }

    #[test]
    fn tampered_on_disk_ciphertext_fails_authentication() {
        let dir = tempfile::tempdir().expect("tempdir");
        let vault = FileVault::new(dir.path());
        let protected = protect_new_keypair(&mut OsRng, &vault, 512).expect("protect");

        let encoded = vault.read(&protected.filename).expect("read entry");
        let mut ciphertext = BASE64.decode(encoded).expect("valid base64");
        ciphertext[0] ^= 0x01;

        let err = cipher::decrypt(
            &protected.password,
            &protected.nonce,
            &ciphertext,
            &protected.tag,
        )
        .expect_err("tampered file must not decrypt");
        assert_eq!(err, CipherError::Authentication);
    }

    #[test]
    fn vault_failure_propagates_and_leaves_no_entry() {
        struct RefusingVault;

        impl Vault for RefusingVault {
            fn write(&self, _name: &str, _payload: &str) -> Result<(), VaultError> {
                Err(VaultError::Io {
                    reason: "permission denied".into(),
                })
            }

            fn read(&self, name: &str) -> Result<String, VaultError> {
                Err(VaultError::NotFound {
                    name: name.to_string(),
                })
            }
        }

        let err = protect_new_keypair(&mut OsRng, &RefusingVault, 512)
            .expect_err("write failure must propagate");
        assert!(matches!(err, ProtectError::Vault(VaultError::Io { .. })));
    }
}
