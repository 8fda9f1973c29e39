use aes_gcm::{
    aead::{Aead, AeadCore, KeyInit},
    Aes128Gcm, Nonce,
};
use rand::{CryptoRng, RngCore};
use thiserror::Error;

/// Symmetric password length in bytes. The password doubles as the
/// AES-128-GCM key.
pub const PASSWORD_LEN: usize = 16;
/// AES-GCM nonce length in bytes.
pub const NONCE_LEN: usize = 12;
/// AES-GCM authentication tag length in bytes.
pub const TAG_LEN: usize = 16;

/// Errors produced by the authenticated cipher.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CipherError {
    /// The password is not exactly [`PASSWORD_LEN`] bytes.
    #[error("invalid password length: expected {PASSWORD_LEN} bytes, got {got}")]
    KeyLength { got: usize },
    /// The cipher rejected the payload at encryption time.
    #[error("encryption failed: {reason}")]
    Encryption { reason: String },
    /// Tag verification failed: tampering, wrong password, or wrong nonce.
    /// No plaintext is ever released when this is returned.
    #[error("ciphertext authentication failed")]
    Authentication,
}

/// Output of one authenticated encryption: ciphertext plus the nonce and
/// tag needed to verify and decrypt it. Ciphertext and tag are kept
/// separate so the tag can be withheld from at-rest storage.
#[derive(Debug)]
pub struct SealedSecret {
    pub ciphertext: Vec<u8>,
    pub nonce: [u8; NONCE_LEN],
    pub tag: [u8; TAG_LEN],
}

/// Draw a fresh random password. Every call is an independent draw; the
/// result is never reused across protection operations.
pub fn new_password<R: RngCore + CryptoRng>(rng: &mut R) -> [u8; PASSWORD_LEN] {
    let mut password = [0u8; PASSWORD_LEN];
    rng.fill_bytes(&mut password);
    password
}

/// Encrypt `plaintext` under `password` with AES-128-GCM. A fresh nonce is
/// generated internally per call and must never be reused with the same
/// password, which holds as long as passwords come from [`new_password`].
pub fn encrypt<R: RngCore + CryptoRng>(
    rng: &mut R,
    password: &[u8],
    plaintext: &[u8],
) -> Result<SealedSecret, CipherError> {
    let cipher = build_cipher(password)?;
    let nonce = Aes128Gcm::generate_nonce(&mut *rng);

    // aes-gcm appends the tag to the ciphertext; split it back off so the
    // two travel separately.
    let mut combined = cipher
        .encrypt(&nonce, plaintext)
        .map_err(|err| CipherError::Encryption {
            reason: err.to_string(),
        })?;
    let tag_bytes = combined.split_off(combined.len() - TAG_LEN);

    let mut tag = [0u8; TAG_LEN];
    tag.copy_from_slice(&tag_bytes);
    let mut nonce_out = [0u8; NONCE_LEN];
    nonce_out.copy_from_slice(nonce.as_slice());

    Ok(SealedSecret {
        ciphertext: combined,
        nonce: nonce_out,
        tag,
    })
}

/// Verify the tag and decrypt. Any mismatch between password, nonce,
/// ciphertext, and tag yields [`CipherError::Authentication`].
pub fn decrypt(
    password: &[u8],
    nonce: &[u8; NONCE_LEN],
    ciphertext: &[u8],
    tag: &[u8; TAG_LEN],
) -> Result<Vec<u8>, CipherError> {
    let cipher = build_cipher(password)?;

    let mut combined = Vec::with_capacity(ciphertext.len() + TAG_LEN);
    combined.extend_from_slice(ciphertext);
    combined.extend_from_slice(tag);

    cipher
        .decrypt(Nonce::from_slice(nonce), combined.as_ref())
        .map_err(|_| CipherError::Authentication)
}

fn build_cipher(password: &[u8]) -> Result<Aes128Gcm, CipherError> {
    Aes128Gcm::new_from_slice(password).map_err(|_| CipherError::KeyLength {
        got: password.len(),
    })
}
