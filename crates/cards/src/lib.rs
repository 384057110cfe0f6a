//! Card authorization holds and card financial transactions.
//!
//! Cards are addressed by an opaque reference token issued by the card
//! processor; this SDK never handles card numbers.

pub mod commands;
pub mod hold;
pub mod transaction;

pub use commands::{
    create_authorization_hold, create_card_transaction, get_authorization_hold, reverse_authorization_hold,
};
pub use hold::{AuthorizationHold, AuthorizationId, CardReferenceToken, CreateAuthorizationHoldRequest, HoldStatus, Merchant};
pub use transaction::{CardTransaction, CardTransactionId, CardTransactionType, CreateCardTransactionRequest};
