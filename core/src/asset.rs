use serde::{Deserialize, Serialize};

use crate::error::AssetError;
use crate::identity::Address;
use crate::{BarterError, Result};

/// Reserved non-fungible unit meaning "any unit from this contract".
///
/// Valid only on the requested side of a barter request; a concrete
/// (transferable) asset never carries it.
pub const ANY_UNIT: u64 = u64::MAX;

/// One unit of exchange in a basket: a fungible amount or a single
/// non-fungible unit of some contract.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "asset_type", rename_all = "snake_case")]
pub enum Asset {
    /// Contract-based fungible token; `amount` is the transferable quantity.
    Fungible { contract: Address, amount: u128 },
    /// Non-fungible token identified by `unit` within `contract`.
    NonFungible { contract: Address, unit: u64 },
}

/// Kind tag used by the raw parallel-array input encoding.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    Fungible = 0,
    NonFungible = 1,
}

impl TryFrom<u8> for AssetKind {
    type Error = AssetError;

    fn try_from(tag: u8) -> std::result::Result<Self, Self::Error> {
        match tag {
            0 => Ok(Self::Fungible),
            1 => Ok(Self::NonFungible),
            other => Err(AssetError::UnknownKind(other)),
        }
    }
}

impl Asset {
    pub fn kind(&self) -> AssetKind {
        match self {
            Self::Fungible { .. } => AssetKind::Fungible,
            Self::NonFungible { .. } => AssetKind::NonFungible,
        }
    }

    /// Returns the contract the asset belongs to.
    pub fn contract(&self) -> &Address {
        match self {
            Self::Fungible { contract, .. } | Self::NonFungible { contract, .. } => contract,
        }
    }

    /// Validate an asset that is about to move custody.
    ///
    /// Concrete assets must name an exact unit and a non-zero amount;
    /// the wildcard unit never moves.
    pub fn validate_concrete(&self) -> Result<()> {
        match self {
            Self::Fungible { amount: 0, .. } => Err(AssetError::ZeroAmount.into()),
            Self::NonFungible { unit: ANY_UNIT, .. } => {
                Err(AssetError::WildcardNotTransferable.into())
            }
            _ => Ok(()),
        }
    }

    /// Validate an asset on the requested side of a barter request.
    ///
    /// The wildcard unit is allowed here; zero fungible amounts are not,
    /// since an exact-amount match against zero can never settle anything.
    pub fn validate_pattern(&self) -> Result<()> {
        match self {
            Self::Fungible { amount: 0, .. } => Err(AssetError::ZeroAmount.into()),
            _ => Ok(()),
        }
    }

    /// Request-side matching: does `proposed` satisfy `self`?
    ///
    /// Kinds and contracts must agree. Fungible amounts match exactly.
    /// A non-fungible request matches exactly on `unit`, unless it carries
    /// the wildcard, which admits any concrete unit of the contract.
    pub fn matches(&self, proposed: &Asset) -> bool {
        match (self, proposed) {
            (
                Self::Fungible { contract, amount },
                Self::Fungible {
                    contract: proposed_contract,
                    amount: proposed_amount,
                },
            ) => contract == proposed_contract && amount == proposed_amount,

            (
                Self::NonFungible { contract, unit },
                Self::NonFungible {
                    contract: proposed_contract,
                    unit: proposed_unit,
                },
            ) => contract == proposed_contract && (*unit == ANY_UNIT || unit == proposed_unit),

            _ => false,
        }
    }
}

/// Collapse the raw parallel-array encoding (one attribute array per field)
/// into a basket, validating shape once at the boundary.
///
/// # Errors
///
/// `AssetError::LengthMismatch` if the arrays disagree in length,
/// `AssetError::UnknownKind` on a tag outside the fungible/non-fungible domain.
pub fn basket_from_parts(
    kinds: &[u8],
    contracts: &[Address],
    units: &[u64],
    amounts: &[u128],
) -> Result<Vec<Asset>> {
    let len = kinds.len();
    for other in [contracts.len(), units.len(), amounts.len()] {
        if other != len {
            return Err(AssetError::LengthMismatch(len, other).into());
        }
    }

    let mut basket = Vec::with_capacity(len);
    for i in 0..len {
        let asset = match AssetKind::try_from(kinds[i])? {
            AssetKind::Fungible => Asset::Fungible {
                contract: contracts[i].clone(),
                amount: amounts[i],
            },
            AssetKind::NonFungible => Asset::NonFungible {
                contract: contracts[i].clone(),
                unit: units[i],
            },
        };
        basket.push(asset);
    }
    Ok(basket)
}

impl std::fmt::Display for Asset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fungible { contract, amount } => write!(f, "fungible:{}:{}", contract, amount),
            Self::NonFungible {
                contract,
                unit: ANY_UNIT,
            } => write!(f, "nft:{}:any", contract),
            Self::NonFungible { contract, unit } => write!(f, "nft:{}:{}", contract, unit),
        }
    }
}

impl std::str::FromStr for Asset {
    type Err = BarterError;

    fn from_str(s: &str) -> Result<Self> {
        let parts = s.split(':').collect::<Vec<_>>();
        match parts.as_slice() {
            ["fungible", contract, amount] => {
                let contract = contract.parse()?;
                let amount = amount.parse()?;

                Ok(Self::Fungible { contract, amount })
            }

            ["nft", contract, unit] => {
                let contract = contract.parse()?;
                let unit = if *unit == "any" {
                    ANY_UNIT
                } else {
                    unit.parse()?
                };

                Ok(Self::NonFungible { contract, unit })
            }

            _ => Err(AssetError::UnsupportedFormat.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr as _;

    use super::*;

    fn contract(tag: u8) -> Address {
        Address::from_bytes(vec![tag; 4])
    }

    #[test]
    fn matching_table() {
        let want_fungible = Asset::Fungible {
            contract: contract(1),
            amount: 100,
        };
        assert!(want_fungible.matches(&Asset::Fungible {
            contract: contract(1),
            amount: 100,
        }));
        // amount must match exactly
        assert!(!want_fungible.matches(&Asset::Fungible {
            contract: contract(1),
            amount: 99,
        }));
        assert!(!want_fungible.matches(&Asset::Fungible {
            contract: contract(2),
            amount: 100,
        }));
        // kind mismatch
        assert!(!want_fungible.matches(&Asset::NonFungible {
            contract: contract(1),
            unit: 100,
        }));

        let want_exact = Asset::NonFungible {
            contract: contract(3),
            unit: 7,
        };
        assert!(want_exact.matches(&Asset::NonFungible {
            contract: contract(3),
            unit: 7,
        }));
        assert!(!want_exact.matches(&Asset::NonFungible {
            contract: contract(3),
            unit: 8,
        }));

        let want_any = Asset::NonFungible {
            contract: contract(3),
            unit: ANY_UNIT,
        };
        assert!(want_any.matches(&Asset::NonFungible {
            contract: contract(3),
            unit: 8,
        }));
        assert!(!want_any.matches(&Asset::NonFungible {
            contract: contract(4),
            unit: 8,
        }));
    }

    #[test]
    fn concrete_validation() {
        assert!(Asset::Fungible {
            contract: contract(1),
            amount: 1,
        }
        .validate_concrete()
        .is_ok());

        assert!(Asset::Fungible {
            contract: contract(1),
            amount: 0,
        }
        .validate_concrete()
        .is_err());

        assert!(Asset::NonFungible {
            contract: contract(1),
            unit: ANY_UNIT,
        }
        .validate_concrete()
        .is_err());

        // the wildcard is fine as a request pattern
        assert!(Asset::NonFungible {
            contract: contract(1),
            unit: ANY_UNIT,
        }
        .validate_pattern()
        .is_ok());
    }

    #[test]
    fn parse_round_trip() {
        for s in ["fungible:0xaa11:250", "nft:0xbb22:7", "nft:0xbb22:any"] {
            let asset = Asset::from_str(s).unwrap();
            assert_eq!(asset.to_string(), s);
        }
        assert!(Asset::from_str("pool:0xaa11:1:2").is_err());
        assert!(Asset::from_str("fungible:0xaa11").is_err());
    }

    #[test]
    fn parts_boundary_validation() {
        let contracts = vec![contract(1), contract(2)];
        let basket = basket_from_parts(&[0, 1], &contracts, &[0, 9], &[50, 0]).unwrap();
        assert_eq!(
            basket,
            vec![
                Asset::Fungible {
                    contract: contract(1),
                    amount: 50,
                },
                Asset::NonFungible {
                    contract: contract(2),
                    unit: 9,
                },
            ]
        );

        assert_eq!(
            basket_from_parts(&[0, 1], &contracts, &[0], &[50, 0]),
            Err(AssetError::LengthMismatch(2, 1).into())
        );
        assert_eq!(
            basket_from_parts(&[2], &contracts[..1], &[0], &[50]),
            Err(AssetError::UnknownKind(2).into())
        );
    }
}
