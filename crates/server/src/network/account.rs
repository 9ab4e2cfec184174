use ed25519_dalek::{Signer, SigningKey};

use super::NetworkError;

/// Signing identity for posts to the message network.
///
/// The address is the hex-encoded public key.
pub struct Account {
    signing_key: SigningKey,
}

impl Account {
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut rand::rngs::OsRng),
        }
    }

    /// Restores an account from a hex-encoded 32-byte secret key.
    pub fn from_private_key(private_key: &str) -> Result<Self, NetworkError> {
        let bytes = hex::decode(private_key.trim())
            .map_err(|e| NetworkError::Key(e.to_string()))?;
        let seed: [u8; 32] = bytes
            .try_into()
            .map_err(|_| NetworkError::Key("expected 32 bytes".into()))?;
        Ok(Self {
            signing_key: SigningKey::from_bytes(&seed),
        })
    }

    pub fn private_key_hex(&self) -> String {
        hex::encode(self.signing_key.to_bytes())
    }

    pub fn public_key_hex(&self) -> String {
        hex::encode(self.signing_key.verifying_key().to_bytes())
    }

    pub fn address(&self) -> String {
        self.public_key_hex()
    }

    /// Hex-encoded Ed25519 signature of `message`.
    pub fn sign(&self, message: &[u8]) -> String {
        hex::encode(self.signing_key.sign(message).to_bytes())
    }
}

impl std::fmt::Debug for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Account")
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}
