//! Payments (outgoing to external counterparties) and internal transfers
//! between savings accounts.

pub mod commands;
pub mod payment;
pub mod transfer;

pub use commands::{
    cancel_transfer, create_payment, create_transfer, get_payment, get_payments, get_transfer, get_transfers,
};
pub use payment::{Counterparty, CreatePaymentRequest, ListPaymentsParams, Payment, PaymentId, PaymentStatus};
pub use transfer::{
    CancelTransferRequest, CreateTransferRequest, ListTransfersParams, Transfer, TransferId, TransferStatus,
};
