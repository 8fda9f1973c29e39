use rand::{CryptoRng, RngCore};
use rsa::{
    pkcs1::{DecodeRsaPrivateKey, EncodeRsaPrivateKey},
    traits::PublicKeyParts,
    RsaPrivateKey, RsaPublicKey,
};
use thiserror::Error;
use zeroize::Zeroizing;

/// Errors produced during key-pair generation and serialization.
#[derive(Debug, Error)]
pub enum KeygenError {
    /// The requested modulus size is unsupported or the RNG failed.
    #[error("key generation failed for {bits}-bit modulus: {reason}")]
    Generation { bits: usize, reason: String },
    /// Canonical encoding or decoding of the private key failed.
    #[error("private key serialization failed: {reason}")]
    Serialization { reason: String },
}

/// An RSA key pair. Both halves are produced by a single generation call
/// and are never constructed independently of each other.
///
/// There is no default modulus size: callers must choose one explicitly.
/// Sizes below 2048 bits (such as the 512 used in tests here) are
/// cryptographically weak and unsuitable for production keys.
pub struct KeyPair {
    public: RsaPublicKey,
    private: RsaPrivateKey,
}

impl KeyPair {
    /// Generate a fresh key pair with the given modulus size, drawing all
    /// randomness from `rng`.
    pub fn generate<R: RngCore + CryptoRng>(
        rng: &mut R,
        modulus_bits: usize,
    ) -> Result<Self, KeygenError> {
        let private =
            RsaPrivateKey::new(rng, modulus_bits).map_err(|err| KeygenError::Generation {
                bits: modulus_bits,
                reason: err.to_string(),
            })?;
        let public = private.to_public_key();
        Ok(Self { public, private })
    }

    pub fn public_key(&self) -> &RsaPublicKey {
        &self.public
    }

    /// Bit length of the public modulus.
    pub fn modulus_bits(&self) -> usize {
        self.public.n().bits()
    }

    /// Canonical PKCS#1 DER encoding of the private key. The buffer is
    /// zeroized on drop; callers should not let it outlive the encryption
    /// step.
    pub fn serialize_private(&self) -> Result<Zeroizing<Vec<u8>>, KeygenError> {
        let doc = self
            .private
            .to_pkcs1_der()
            .map_err(|err| KeygenError::Serialization {
                reason: err.to_string(),
            })?;
        Ok(doc.to_bytes())
    }

    /// Reconstruct a private key from its canonical PKCS#1 DER encoding.
    pub fn deserialize_private(der: &[u8]) -> Result<RsaPrivateKey, KeygenError> {
        RsaPrivateKey::from_pkcs1_der(der).map_err(|err| KeygenError::Serialization {
            reason: err.to_string(),
        })
    }
}
