use thiserror::Error;

/// Barter-related errors.
#[derive(Debug, Error, PartialEq)]
pub enum BarterError {
    /// Creation payment does not match the current fee.
    #[error("incorrect fee: paid {paid}, required {required}")]
    IncorrectFee { paid: u128, required: u128 },

    /// An offered basket must contain at least one asset.
    #[error("offered basket must not be empty")]
    EmptyBasket,

    #[error("no request with id {0}")]
    UnknownRequest(u64),

    /// The request already reached a terminal state.
    #[error("request {0} is not pending")]
    RequestNotPending(u64),

    #[error("only the requester may cancel a request")]
    OnlyRequester,

    #[error("caller is not the fee administrator")]
    NotAdmin,

    #[error("proposal has {proposed} assets, request asks for {requested}")]
    ProposalLengthMismatch { proposed: usize, requested: usize },

    /// A proposed asset does not satisfy the requested one.
    #[error("proposal does not satisfy the request at index {0}")]
    ProposalNotValid(usize),

    #[error("ledger error: {0}")]
    Ledger(LedgerError),

    #[error("asset error: {0}")]
    Asset(AssetError),

    #[error("identity error: {0}")]
    Identity(IdentityError),

    /// The asset transfer collaborator refused a movement.
    #[error("asset transfer failed: {0}")]
    Transfer(TransferError),

    #[error("parse int error: {0}")]
    ParseInt(#[from] std::num::ParseIntError),
}

/// Errors raised by withdrawable-ledger operations.
#[derive(Debug, Error, PartialEq)]
pub enum LedgerError {
    #[error("no ledger entry at index {index} (slot holds {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("withdrawal indices must be strictly ascending")]
    UnsortedIndices,

    #[error("withdrawal index list must not be empty")]
    EmptyIndices,

    #[error("nothing to withdraw")]
    NothingToWithdraw,
}

/// Errors when parsing or validating an `Asset`.
#[derive(Debug, Error, PartialEq)]
pub enum AssetError {
    #[error("amount must be non-zero")]
    ZeroAmount,

    /// The wildcard unit matches requests but can never move custody.
    #[error("wildcard unit is not transferable")]
    WildcardNotTransferable,

    #[error("unknown asset kind tag: {0}")]
    UnknownKind(u8),

    #[error("attribute arrays disagree in length ({0} vs {1})")]
    LengthMismatch(usize, usize),

    #[error("unsupported asset string format")]
    UnsupportedFormat,
}

/// Errors that might occur while parsing an `Address`.
#[derive(Debug, Error, PartialEq)]
pub enum IdentityError {
    #[error("invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("cannot parse identity from empty string")]
    EmptyIdentity,

    #[error("unsupported identity format")]
    UnsupportedFormat,
}

/// Failures reported by the asset transfer gateway.
#[derive(Debug, Error, PartialEq, Clone)]
pub enum TransferError {
    #[error("inbound transfer refused: {0}")]
    PullRefused(String),

    #[error("outbound transfer refused: {0}")]
    PushRefused(String),
}

impl From<LedgerError> for BarterError {
    fn from(value: LedgerError) -> Self {
        Self::Ledger(value)
    }
}

impl From<AssetError> for BarterError {
    fn from(value: AssetError) -> Self {
        Self::Asset(value)
    }
}

impl From<IdentityError> for BarterError {
    fn from(value: IdentityError) -> Self {
        Self::Identity(value)
    }
}

impl From<TransferError> for BarterError {
    fn from(value: TransferError) -> Self {
        Self::Transfer(value)
    }
}
