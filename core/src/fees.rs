//! Flat per-request creation fee and the owner-drainable balance.

use serde::{Deserialize, Serialize};

use crate::asset::Asset;
use crate::error::{BarterError, LedgerError};
use crate::gateway::AssetGateway;
use crate::identity::Address;
use crate::Result;

/// Fee accounting: a flat creation fee, denominated in a fungible fee
/// token, and the balance collected so far. Only the administrator may
/// change the fee or sweep the balance.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Treasury {
    admin: Address,
    fee_token: Address,
    fee: u128,
    collected: u128,
}

impl Treasury {
    pub fn new(admin: Address, fee_token: Address, fee: u128) -> Self {
        Self {
            admin,
            fee_token,
            fee,
            collected: 0,
        }
    }

    pub fn current_fee(&self) -> u128 {
        self.fee
    }

    pub fn collected(&self) -> u128 {
        self.collected
    }

    /// The asset a creation fee payment moves through the gateway.
    pub fn fee_asset(&self) -> Asset {
        Asset::Fungible {
            contract: self.fee_token.clone(),
            amount: self.fee,
        }
    }

    /// Reject a payment that is not exactly the current fee.
    pub fn check_payment(&self, paid: u128) -> Result<()> {
        if paid != self.fee {
            return Err(BarterError::IncorrectFee {
                paid,
                required: self.fee,
            });
        }
        Ok(())
    }

    /// Book one collected creation fee.
    pub(crate) fn record_fee(&mut self) {
        self.collected += self.fee;
    }

    /// Change the flat fee. Admin only.
    pub fn set_fee(&mut self, caller: &Address, fee: u128) -> Result<()> {
        self.ensure_admin(caller)?;
        self.fee = fee;
        Ok(())
    }

    /// Push the collected balance out to `recipient` and return the swept
    /// amount. The balance is zeroed only after the transfer succeeds; a
    /// gateway failure is surfaced to the caller untouched.
    pub fn sweep<G: AssetGateway>(
        &mut self,
        caller: &Address,
        recipient: &Address,
        gateway: &mut G,
    ) -> Result<u128> {
        self.ensure_admin(caller)?;
        if self.collected == 0 {
            return Err(LedgerError::NothingToWithdraw.into());
        }
        let payout = Asset::Fungible {
            contract: self.fee_token.clone(),
            amount: self.collected,
        };
        gateway.push_out(recipient, &payout)?;
        let swept = self.collected;
        self.collected = 0;
        Ok(swept)
    }

    fn ensure_admin(&self, caller: &Address) -> Result<()> {
        if *caller != self.admin {
            return Err(BarterError::NotAdmin);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::mock::MockGateway;

    fn treasury() -> Treasury {
        Treasury::new(
            Address::from_bytes(*b"admin"),
            Address::from_bytes(*b"fee-token"),
            5,
        )
    }

    #[test]
    fn exact_payment_only() {
        let treasury = treasury();
        assert!(treasury.check_payment(5).is_ok());
        assert_eq!(
            treasury.check_payment(4),
            Err(BarterError::IncorrectFee {
                paid: 4,
                required: 5
            })
        );
    }

    #[test]
    fn fee_changes_are_admin_only() {
        let mut treasury = treasury();
        assert_eq!(
            treasury.set_fee(&Address::from_bytes(*b"mallory"), 1),
            Err(BarterError::NotAdmin)
        );
        treasury.set_fee(&Address::from_bytes(*b"admin"), 9).unwrap();
        assert_eq!(treasury.current_fee(), 9);
    }

    #[test]
    fn sweep_zeroes_balance_only_on_success() {
        let mut treasury = treasury();
        let admin = Address::from_bytes(*b"admin");
        let recipient = Address::from_bytes(*b"vault");
        let fee_token = Address::from_bytes(*b"fee-token");

        let mut gateway = MockGateway::new();
        assert_eq!(
            treasury.sweep(&admin, &recipient, &mut gateway),
            Err(BarterError::Ledger(LedgerError::NothingToWithdraw))
        );

        treasury.record_fee();
        treasury.record_fee();
        // escrow never actually received the fees, so the push fails
        assert!(matches!(
            treasury.sweep(&admin, &recipient, &mut gateway),
            Err(BarterError::Transfer(_))
        ));
        assert_eq!(treasury.collected(), 10);

        let escrow = gateway.escrow_address().clone();
        gateway.seed_fungible(&fee_token, &escrow, 10);
        assert_eq!(treasury.sweep(&admin, &recipient, &mut gateway), Ok(10));
        assert_eq!(treasury.collected(), 0);
        assert_eq!(gateway.fungible_balance(&fee_token, &recipient), 10);
    }
}
