//! Barter engine: request lifecycle orchestration over the escrow gateway.

use tracing::{debug, info};

use crate::asset::Asset;
use crate::error::{BarterError, LedgerError};
use crate::fees::Treasury;
use crate::gateway::AssetGateway;
use crate::identity::Address;
use crate::interface::EngineConfig;
use crate::ledger::WithdrawableLedger;
use crate::notify::Notification;
use crate::store::{BarterRequest, RequestStatus, RequestStore};
use crate::Result;

/// Orchestrates request creation, cancellation, proposal acceptance and
/// withdrawal. The only component allowed to mutate the request store and
/// the withdrawable ledger together.
///
/// Every operation is transactional: engine state is written only after all
/// inbound transfers of the call have succeeded, so a gateway failure leaves
/// the store, ledger and treasury exactly as they were. All mutating
/// operations take `&mut self`, so a gateway implementation can never
/// re-enter the engine mid-call.
#[derive(Debug)]
pub struct BarterEngine<G> {
    gateway: G,
    store: RequestStore,
    ledger: WithdrawableLedger,
    treasury: Treasury,
    outbox: Vec<Notification>,
}

impl<G: AssetGateway> BarterEngine<G> {
    pub fn new(config: EngineConfig, gateway: G) -> Self {
        Self {
            gateway,
            store: RequestStore::new(),
            ledger: WithdrawableLedger::new(),
            treasury: Treasury::new(config.admin, config.fee_token, config.creation_fee),
            outbox: Vec::new(),
        }
    }

    /// Escrow `offered` from the caller and open a request asking for
    /// `requested` in return. Returns the new request id.
    ///
    /// An empty `requested` basket is legal (a pure gift); an empty
    /// `offered` basket is not.
    ///
    /// # Errors
    ///
    /// `IncorrectFee` unless `payment` equals the current fee; `EmptyBasket`
    /// on an empty offer; asset validation errors on wildcard or zero-amount
    /// entries; `Transfer` if the gateway refuses the fee or any offered
    /// asset, in which case no engine state changes.
    pub fn create_request(
        &mut self,
        caller: &Address,
        offered: Vec<Asset>,
        requested: Vec<Asset>,
        payment: u128,
    ) -> Result<u64> {
        self.treasury.check_payment(payment)?;
        if offered.is_empty() {
            return Err(BarterError::EmptyBasket);
        }
        for asset in &offered {
            asset.validate_concrete()?;
        }
        for asset in &requested {
            asset.validate_pattern()?;
        }

        if self.treasury.current_fee() > 0 {
            let fee = self.treasury.fee_asset();
            self.gateway.pull_in(caller, &fee)?;
        }
        for asset in &offered {
            self.gateway.pull_in(caller, asset)?;
        }
        self.treasury.record_fee();

        let count = offered.len();
        let id = self.store.insert(caller.clone(), offered, requested);
        info!(id, requester = %caller, assets = count, "barter request created");
        self.emit(Notification::EscrowInflow {
            owner: caller.clone(),
            count,
        });
        self.emit(Notification::RequestCreated {
            id,
            requester: caller.clone(),
        });
        Ok(id)
    }

    /// Cancel a pending request, re-labelling its escrowed offer as
    /// withdrawable by the requester. No assets move.
    ///
    /// # Errors
    ///
    /// `UnknownRequest`, `OnlyRequester`, or `RequestNotPending`.
    pub fn cancel_request(&mut self, caller: &Address, id: u64) -> Result<()> {
        let offered = {
            let request = self
                .store
                .get_mut(id)
                .ok_or(BarterError::UnknownRequest(id))?;
            if request.requester != *caller {
                return Err(BarterError::OnlyRequester);
            }
            request.ensure_pending()?;
            request.status = RequestStatus::Cancelled;
            request.offered.clone()
        };

        let count = self.ledger.credit(caller, offered);
        info!(id, requester = %caller, "barter request cancelled");
        self.emit(Notification::RequestCancelled { id });
        self.emit(Notification::LedgerCredit {
            owner: caller.clone(),
            count,
        });
        Ok(())
    }

    /// Settle a pending request with a basket matching its `requested`
    /// description. The proposal is escrowed from the caller, the request
    /// turns `Completed`, the proposal is credited to the requester and the
    /// originally offered basket to the caller.
    ///
    /// The pending check and the status write happen within one `&mut self`
    /// call, so at most one acceptance can ever succeed per request.
    ///
    /// # Errors
    ///
    /// `UnknownRequest` / `RequestNotPending` on a missing or settled
    /// request; `ProposalLengthMismatch` / `ProposalNotValid` when the
    /// proposal does not satisfy the request; `Transfer` if the gateway
    /// refuses any proposed asset, leaving the request pending and engine
    /// state unchanged.
    pub fn accept_request(&mut self, caller: &Address, id: u64, proposed: Vec<Asset>) -> Result<()> {
        {
            let request = self.store.get(id).ok_or(BarterError::UnknownRequest(id))?;
            request.ensure_pending()?;
            if proposed.len() != request.requested.len() {
                return Err(BarterError::ProposalLengthMismatch {
                    proposed: proposed.len(),
                    requested: request.requested.len(),
                });
            }
            for (i, (wanted, offered)) in request.requested.iter().zip(&proposed).enumerate() {
                offered.validate_concrete()?;
                if !wanted.matches(offered) {
                    return Err(BarterError::ProposalNotValid(i));
                }
            }
        }

        for asset in &proposed {
            self.gateway.pull_in(caller, asset)?;
        }

        let (requester, offered) = {
            let request = self
                .store
                .get_mut(id)
                .ok_or(BarterError::UnknownRequest(id))?;
            request.status = RequestStatus::Completed;
            (request.requester.clone(), request.offered.clone())
        };

        let inflow = proposed.len();
        let to_requester = self.ledger.credit(&requester, proposed);
        let to_accepter = self.ledger.credit(caller, offered);
        info!(id, accepter = %caller, requester = %requester, "barter request accepted");
        self.emit(Notification::EscrowInflow {
            owner: caller.clone(),
            count: inflow,
        });
        self.emit(Notification::RequestAccepted {
            id,
            accepter: caller.clone(),
        });
        self.emit(Notification::LedgerCredit {
            owner: requester,
            count: to_requester,
        });
        self.emit(Notification::LedgerCredit {
            owner: caller.clone(),
            count: to_accepter,
        });
        Ok(())
    }

    /// Withdraw the ledger entries at `indices` (strictly ascending,
    /// duplicate-free) from the caller's slot, transferring each out through
    /// the gateway. Returns the withdrawn assets in index order.
    ///
    /// Remaining entries are the exact complement of the withdrawn set, in
    /// unspecified order; indices are not stable across calls.
    ///
    /// # Errors
    ///
    /// Index validation errors leave the ledger untouched; so does a
    /// `Transfer` failure, since entries are removed only after every
    /// outbound transfer has succeeded.
    pub fn withdraw(&mut self, caller: &Address, indices: &[usize]) -> Result<Vec<Asset>> {
        let assets = self.ledger.peek_at(caller, indices)?;
        for asset in &assets {
            self.gateway.push_out(caller, asset)?;
        }
        let removed = self.ledger.remove_at(caller, indices)?;
        info!(owner = %caller, count = removed.len(), "ledger withdrawal");
        self.emit(Notification::Withdrawal {
            owner: caller.clone(),
            count: removed.len(),
        });
        Ok(removed)
    }

    /// Withdraw the caller's entire slot at once.
    ///
    /// # Errors
    ///
    /// `NothingToWithdraw` on an empty slot; `Transfer` failures leave the
    /// slot intact.
    pub fn withdraw_all(&mut self, caller: &Address) -> Result<Vec<Asset>> {
        let assets = self.ledger.entries(caller).to_vec();
        if assets.is_empty() {
            return Err(LedgerError::NothingToWithdraw.into());
        }
        for asset in &assets {
            self.gateway.push_out(caller, asset)?;
        }
        let drained = self.ledger.drain(caller)?;
        info!(owner = %caller, count = drained.len(), "ledger drained");
        self.emit(Notification::Withdrawal {
            owner: caller.clone(),
            count: drained.len(),
        });
        Ok(drained)
    }

    /// Change the flat creation fee. Admin only.
    pub fn set_fee(&mut self, caller: &Address, fee: u128) -> Result<()> {
        self.treasury.set_fee(caller, fee)?;
        info!(fee, "creation fee updated");
        Ok(())
    }

    /// Sweep the collected fee balance to `recipient`. Admin only; a failed
    /// sweep transfer is surfaced, never absorbed.
    pub fn sweep_fees(&mut self, caller: &Address, recipient: &Address) -> Result<u128> {
        let swept = self
            .treasury
            .sweep(caller, recipient, &mut self.gateway)?;
        info!(recipient = %recipient, amount = swept, "fee balance swept");
        Ok(swept)
    }

    pub fn request(&self, id: u64) -> Option<&BarterRequest> {
        self.store.get(id)
    }

    /// Ids of every request `owner` ever created, oldest first.
    pub fn requests_of(&self, owner: &Address) -> &[u64] {
        self.store.ids_for(owner)
    }

    /// The id the next creation will be assigned.
    pub fn next_request_id(&self) -> u64 {
        self.store.next_id()
    }

    /// Contents of `owner`'s withdrawable slot, in insertion order.
    pub fn withdrawable(&self, owner: &Address) -> &[Asset] {
        self.ledger.entries(owner)
    }

    pub fn current_fee(&self) -> u128 {
        self.treasury.current_fee()
    }

    pub fn collected_fees(&self) -> u128 {
        self.treasury.collected()
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Drain the accumulated notifications, oldest first.
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.outbox)
    }

    fn emit(&mut self, notification: Notification) {
        debug!(?notification, "notification");
        self.outbox.push(notification);
    }
}
