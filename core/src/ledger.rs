//! Per-owner pool of assets held by the escrow and claimable by that owner.

use std::collections::HashMap;

use crate::asset::Asset;
use crate::error::LedgerError;
use crate::identity::Address;
use crate::Result;

/// Withdrawable ledger: for each owner, an insertion-ordered slot of assets
/// the escrow holds on that owner's behalf pending outbound transfer.
///
/// Entry order carries no meaning beyond indexing for withdrawal; removal
/// compacts by swap-and-truncate and may reorder the remaining entries, so
/// indices are not stable across calls.
#[derive(Debug, Clone, Default)]
pub struct WithdrawableLedger {
    slots: HashMap<Address, Vec<Asset>>,
}

impl WithdrawableLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append assets to an owner's slot. Returns the number credited.
    pub fn credit<I>(&mut self, owner: &Address, assets: I) -> usize
    where
        I: IntoIterator<Item = Asset>,
    {
        let slot = self.slots.entry(owner.clone()).or_default();
        let before = slot.len();
        slot.extend(assets);
        slot.len() - before
    }

    /// Current contents of an owner's slot, in insertion order.
    pub fn entries(&self, owner: &Address) -> &[Asset] {
        self.slots.get(owner).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Copies of the entries at `indices` without mutating the slot.
    ///
    /// # Errors
    ///
    /// `EmptyIndices`, `UnsortedIndices`, or `IndexOutOfRange` exactly as
    /// [`remove_at`](Self::remove_at); the slot is never touched.
    pub fn peek_at(&self, owner: &Address, indices: &[usize]) -> Result<Vec<Asset>> {
        let slot = self.entries(owner);
        check_indices(slot.len(), indices)?;
        Ok(indices.iter().map(|&i| slot[i].clone()).collect())
    }

    /// Remove the entries at `indices` (strictly ascending, duplicate-free)
    /// and return them in index order.
    ///
    /// Compaction walks the indices highest to lowest and swaps each removed
    /// slot with the current last live one before truncating, so the cost is
    /// O(removed) and the surviving entries are exactly the complement of the
    /// removed set, in unspecified order.
    pub fn remove_at(&mut self, owner: &Address, indices: &[usize]) -> Result<Vec<Asset>> {
        match self.slots.get_mut(owner) {
            Some(slot) => {
                check_indices(slot.len(), indices)?;
                let removed = indices.iter().map(|&i| slot[i].clone()).collect();
                for &index in indices.iter().rev() {
                    slot.swap_remove(index);
                }
                let emptied = slot.is_empty();
                if emptied {
                    self.slots.remove(owner);
                }
                Ok(removed)
            }
            None => {
                // an absent slot never passes the index check
                check_indices(0, indices)?;
                Ok(Vec::new())
            }
        }
    }

    /// Empty an owner's slot, returning everything it held.
    ///
    /// # Errors
    ///
    /// `NothingToWithdraw` if the slot is already empty.
    pub fn drain(&mut self, owner: &Address) -> Result<Vec<Asset>> {
        match self.slots.remove(owner) {
            Some(assets) if !assets.is_empty() => Ok(assets),
            _ => Err(LedgerError::NothingToWithdraw.into()),
        }
    }
}

fn check_indices(len: usize, indices: &[usize]) -> Result<()> {
    if indices.is_empty() {
        return Err(LedgerError::EmptyIndices.into());
    }
    if indices.windows(2).any(|pair| pair[0] >= pair[1]) {
        return Err(LedgerError::UnsortedIndices.into());
    }
    // ascending, so only the last can be out of range
    let last = indices[indices.len() - 1];
    if last >= len {
        return Err(LedgerError::IndexOutOfRange { index: last, len }.into());
    }
    Ok(())
}
