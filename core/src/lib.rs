/// Asset descriptors exchanged in baskets,
/// and request-side matching logic
pub mod asset;
/// Barter engine orchestrating requests,
/// escrow movements and ledger credits
pub mod engine;
/// Flat creation-fee accounting
pub mod fees;
/// Asset custody seam between the engine
/// and the execution environment
pub mod gateway;
/// Identities of parties and asset contracts
pub mod identity;
/// JSON (de)serialization of engine configuration
pub mod interface;
/// Per-owner pool of withdrawable assets
pub mod ledger;
/// Observational notifications for off-chain indexing
pub mod notify;
/// Authoritative table of barter requests
pub mod store;

pub mod error;
use error::BarterError;

pub use asset::{Asset, AssetKind, ANY_UNIT};
pub use engine::BarterEngine;
pub use fees::Treasury;
pub use gateway::AssetGateway;
pub use identity::Address;
pub use interface::EngineConfig;
pub use ledger::WithdrawableLedger;
pub use notify::Notification;
pub use store::{BarterRequest, RequestStatus, RequestStore};

pub type Result<T> = std::result::Result<T, BarterError>;
