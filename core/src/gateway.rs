//! Custody seam between the barter engine and the execution environment.

use crate::asset::Asset;
use crate::error::TransferError;
use crate::identity::Address;

/// In-memory gateway for tests and local scenario runs
pub mod mock;

/// Moves asset custody between an external owner and the escrow.
///
/// The engine treats any failure as fatal to the enclosing call: it writes
/// none of its own state until every pull of an operation has succeeded,
/// and the surrounding environment is responsible for rolling back custody
/// already moved within the failed call.
///
/// A transferred asset is always concrete; the wildcard unit is validated
/// away before any gateway call.
pub trait AssetGateway {
    /// Pull `asset` from `owner` into escrow custody.
    fn pull_in(&mut self, owner: &Address, asset: &Asset) -> Result<(), TransferError>;

    /// Push `asset` out of escrow custody to `recipient`.
    fn push_out(&mut self, recipient: &Address, asset: &Asset) -> Result<(), TransferError>;
}
