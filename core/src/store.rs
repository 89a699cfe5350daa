//! Authoritative table of barter requests and the per-creator index.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::asset::Asset;
use crate::error::BarterError;
use crate::identity::Address;
use crate::Result;

/// Lifecycle of a barter request.
///
/// `Pending` is the only open state; the two terminal states are never
/// left once entered.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStatus {
    /// Offered basket escrowed; awaiting acceptance or cancellation.
    Pending,
    /// A matching proposal settled the trade.
    Completed,
    /// The requester withdrew the offer.
    Cancelled,
}

/// A barter request: an escrowed offered basket and the basket asked
/// for in return.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BarterRequest {
    pub id: u64,
    pub requester: Address,
    /// Exactly mirrors what was pulled into escrow at creation.
    pub offered: Vec<Asset>,
    /// May contain wildcard units; never moves custody itself.
    pub requested: Vec<Asset>,
    pub status: RequestStatus,
}

impl BarterRequest {
    pub fn ensure_pending(&self) -> Result<()> {
        if self.status == RequestStatus::Pending {
            Ok(())
        } else {
            Err(BarterError::RequestNotPending(self.id))
        }
    }
}

/// Request table keyed by id, plus an append-only per-creator index.
///
/// Ids are assigned at insertion in strictly increasing order starting
/// at 0. Terminal requests are retained as historical records.
#[derive(Debug, Clone, Default)]
pub struct RequestStore {
    requests: BTreeMap<u64, BarterRequest>,
    by_requester: HashMap<Address, Vec<u64>>,
    next_id: u64,
}

impl RequestStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a new pending request and return its id.
    pub fn insert(&mut self, requester: Address, offered: Vec<Asset>, requested: Vec<Asset>) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.by_requester
            .entry(requester.clone())
            .or_default()
            .push(id);
        self.requests.insert(
            id,
            BarterRequest {
                id,
                requester,
                offered,
                requested,
                status: RequestStatus::Pending,
            },
        );
        id
    }

    pub fn get(&self, id: u64) -> Option<&BarterRequest> {
        self.requests.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: u64) -> Option<&mut BarterRequest> {
        self.requests.get_mut(&id)
    }

    /// Ids of every request the address ever created, oldest first.
    pub fn ids_for(&self, requester: &Address) -> &[u64] {
        self.by_requester
            .get(requester)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The id the next insertion will be assigned.
    pub fn next_id(&self) -> u64 {
        self.next_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn requester() -> Address {
        Address::from_bytes(*b"alice")
    }

    fn offer() -> Vec<Asset> {
        vec![Asset::Fungible {
            contract: Address::from_bytes(*b"tokn"),
            amount: 5,
        }]
    }

    #[test]
    fn ids_are_sequential_from_zero() {
        let mut store = RequestStore::new();
        assert_eq!(store.next_id(), 0);
        assert_eq!(store.insert(requester(), offer(), vec![]), 0);
        assert_eq!(store.insert(requester(), offer(), vec![]), 1);
        assert_eq!(store.next_id(), 2);
        assert_eq!(store.ids_for(&requester()), &[0, 1]);
        assert!(store.ids_for(&Address::from_bytes(*b"bob")).is_empty());
    }

    #[test]
    fn pending_guard() {
        let mut store = RequestStore::new();
        let id = store.insert(requester(), offer(), vec![]);
        assert!(store.get(id).unwrap().ensure_pending().is_ok());

        store.get_mut(id).unwrap().status = RequestStatus::Cancelled;
        assert_eq!(
            store.get(id).unwrap().ensure_pending(),
            Err(BarterError::RequestNotPending(id))
        );
        assert!(store.get(2).is_none());
    }
}
