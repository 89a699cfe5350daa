//! Identities of parties and asset contracts.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use serde_with::hex::Hex;
use serde_with::serde_as;

use crate::error::IdentityError;
use crate::Result;

/// Opaque address of a party or an asset contract.
///
/// Parsed from `0x`-prefixed hex, base58, or base64 text forms;
/// always displayed and serialized as hex.
#[serde_as]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct Address(#[serde_as(as = "Hex")] Vec<u8>);

impl Address {
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{}", hex::encode(&self.0))
    }
}

impl std::str::FromStr for Address {
    type Err = crate::error::BarterError;

    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(IdentityError::EmptyIdentity.into());
        }
        if let Some(stripped) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            let bytes = hex::decode(stripped).map_err(IdentityError::Hex)?;
            return Ok(Self(bytes));
        }
        if let Ok(bytes) = bs58::decode(s).into_vec() {
            return Ok(Self(bytes));
        }
        if let Ok(bytes) = BASE64.decode(s) {
            return Ok(Self(bytes));
        }
        Err(IdentityError::UnsupportedFormat.into())
    }
}
