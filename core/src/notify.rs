//! Observational notifications mirroring engine mutations.
//!
//! Emitted for off-chain indexing and never required for correctness.

use serde::{Deserialize, Serialize};

use crate::identity::Address;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Notification {
    RequestCreated { id: u64, requester: Address },
    RequestCancelled { id: u64 },
    RequestAccepted { id: u64, accepter: Address },
    /// Assets pulled into escrow from `owner` within one call.
    EscrowInflow { owner: Address, count: usize },
    /// Assets credited to `owner`'s withdrawable slot within one call.
    LedgerCredit { owner: Address, count: usize },
    /// Assets pushed out to `owner` by a withdrawal call.
    Withdrawal { owner: Address, count: usize },
}
