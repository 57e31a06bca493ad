//! Argon2id key derivation for password → payload key.

use argon2::Argon2;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use super::traits::KeyDerivation;
use super::KEY_LEN;
use crate::error::{Result, StegoError};

/// Argon2id work factor, fixed by configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct KdfParams {
    /// Memory cost in KiB (default: 19 MiB = 19456).
    pub m_cost: u32,
    /// Number of iterations (default: 2).
    pub t_cost: u32,
    /// Degree of parallelism (default: 1).
    pub p_cost: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            m_cost: 19456,
            t_cost: 2,
            p_cost: 1,
        }
    }
}

/// Argon2id (v0x13) over the configured [`KdfParams`].
pub struct Argon2idKdf {
    argon2: Argon2<'static>,
}

impl Argon2idKdf {
    /// Validate `params` and build the KDF. Invalid parameters are a
    /// configuration error and surface as an internal fault.
    pub fn new(params: &KdfParams) -> Result<Self> {
        let argon2_params =
            argon2::Params::new(params.m_cost, params.t_cost, params.p_cost, Some(KEY_LEN))
                .map_err(|e| StegoError::InternalFault(format!("invalid KDF params: {}", e)))?;

        Ok(Self {
            argon2: Argon2::new(
                argon2::Algorithm::Argon2id,
                argon2::Version::V0x13,
                argon2_params,
            ),
        })
    }
}

impl KeyDerivation for Argon2idKdf {
    fn derive_key(&self, password: &[u8], salt: &[u8]) -> Result<Zeroizing<[u8; KEY_LEN]>> {
        let mut output = Zeroizing::new([0u8; KEY_LEN]);
        self.argon2
            .hash_password_into(password, salt, output.as_mut())
            .map_err(|e| StegoError::InternalFault(format!("KDF failed: {}", e)))?;
        Ok(output)
    }
}
