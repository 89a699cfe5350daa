//! Mock asset gateway tracking custody in process memory.
//! NOT FOR PRODUCTION USE.

use std::collections::{HashMap, HashSet};

use crate::asset::Asset;
use crate::error::TransferError;
use crate::gateway::AssetGateway;
use crate::identity::Address;

/// In-memory custody book: fungible balances per (contract, holder) and a
/// single owner per non-fungible unit. Escrowed assets are held under an
/// internal escrow account. Failures can be injected per contract.
#[derive(Debug, Clone)]
pub struct MockGateway {
    fungible: HashMap<(Address, Address), u128>,
    units: HashMap<(Address, u64), Address>,
    escrow: Address,
    failing: HashSet<Address>,
}

impl Default for MockGateway {
    fn default() -> Self {
        Self {
            fungible: HashMap::new(),
            units: HashMap::new(),
            escrow: Address::from_bytes(*b"mock-escrow"),
            failing: HashSet::new(),
        }
    }
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// The internal account escrowed assets are booked under.
    pub fn escrow_address(&self) -> &Address {
        &self.escrow
    }

    /// Mint `amount` of a fungible contract to `owner`.
    pub fn seed_fungible(&mut self, contract: &Address, owner: &Address, amount: u128) {
        *self
            .fungible
            .entry((contract.clone(), owner.clone()))
            .or_default() += amount;
    }

    /// Mint non-fungible `unit` of `contract` to `owner`.
    pub fn seed_unit(&mut self, contract: &Address, unit: u64, owner: &Address) {
        self.units.insert((contract.clone(), unit), owner.clone());
    }

    /// Make every transfer touching `contract` fail.
    pub fn fail_on(&mut self, contract: &Address) {
        self.failing.insert(contract.clone());
    }

    pub fn fungible_balance(&self, contract: &Address, owner: &Address) -> u128 {
        self.fungible
            .get(&(contract.clone(), owner.clone()))
            .copied()
            .unwrap_or(0)
    }

    pub fn unit_owner(&self, contract: &Address, unit: u64) -> Option<&Address> {
        self.units.get(&(contract.clone(), unit))
    }

    fn transfer(
        &mut self,
        from: &Address,
        to: &Address,
        asset: &Asset,
    ) -> Result<(), String> {
        if self.failing.contains(asset.contract()) {
            return Err(format!("contract {} declined", asset.contract()));
        }
        match asset {
            Asset::Fungible { contract, amount } => {
                let key = (contract.clone(), from.clone());
                let held = self.fungible.get(&key).copied().unwrap_or(0);
                if held < *amount {
                    return Err(format!(
                        "insufficient balance of {}: held {}, need {}",
                        contract, held, amount
                    ));
                }
                self.fungible.insert(key, held - amount);
                *self
                    .fungible
                    .entry((contract.clone(), to.clone()))
                    .or_default() += amount;
            }
            Asset::NonFungible { contract, unit } => {
                let key = (contract.clone(), *unit);
                let held = self.units.get(&key).is_some_and(|owner| owner == from);
                if !held {
                    return Err(format!("unit {}#{} not held by {}", contract, unit, from));
                }
                self.units.insert(key, to.clone());
            }
        }
        Ok(())
    }
}

impl AssetGateway for MockGateway {
    fn pull_in(&mut self, owner: &Address, asset: &Asset) -> Result<(), TransferError> {
        let escrow = self.escrow.clone();
        self.transfer(owner, &escrow, asset)
            .map_err(TransferError::PullRefused)
    }

    fn push_out(&mut self, recipient: &Address, asset: &Asset) -> Result<(), TransferError> {
        let escrow = self.escrow.clone();
        self.transfer(&escrow, recipient, asset)
            .map_err(TransferError::PushRefused)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(s: &[u8]) -> Address {
        Address::from_bytes(s.to_vec())
    }

    #[test]
    fn fungible_custody_round_trip() {
        let mut gateway = MockGateway::new();
        let token = addr(b"token");
        let alice = addr(b"alice");
        gateway.seed_fungible(&token, &alice, 100);

        let asset = Asset::Fungible {
            contract: token.clone(),
            amount: 60,
        };
        gateway.pull_in(&alice, &asset).unwrap();
        assert_eq!(gateway.fungible_balance(&token, &alice), 40);

        gateway.push_out(&alice, &asset).unwrap();
        assert_eq!(gateway.fungible_balance(&token, &alice), 100);

        // more than held
        let too_much = Asset::Fungible {
            contract: token.clone(),
            amount: 101,
        };
        assert!(matches!(
            gateway.pull_in(&alice, &too_much),
            Err(TransferError::PullRefused(_))
        ));
    }

    #[test]
    fn unit_custody_and_failure_injection() {
        let mut gateway = MockGateway::new();
        let nfts = addr(b"nfts");
        let bob = addr(b"bob");
        gateway.seed_unit(&nfts, 7, &bob);

        let asset = Asset::NonFungible {
            contract: nfts.clone(),
            unit: 7,
        };
        gateway.pull_in(&bob, &asset).unwrap();
        assert_ne!(gateway.unit_owner(&nfts, 7), Some(&bob));

        // bob no longer holds it
        assert!(gateway.pull_in(&bob, &asset).is_err());

        gateway.fail_on(&nfts);
        assert!(matches!(
            gateway.push_out(&bob, &asset),
            Err(TransferError::PushRefused(_))
        ));
    }
}
