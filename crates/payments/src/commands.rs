//! Command factories for payments and transfers.

use corebank_core::{CommandMetadata, HttpMethod, ValidationResult};
use corebank_infra::Command;

use crate::payment::{CreatePaymentRequest, ListPaymentsParams, Payment, PaymentId};
use crate::transfer::{CancelTransferRequest, CreateTransferRequest, ListTransfersParams, Transfer, TransferId};

pub const CREATE_PAYMENT: CommandMetadata = CommandMetadata::rest("CreatePayment", HttpMethod::Post, "/payments");
pub const GET_PAYMENT: CommandMetadata =
    CommandMetadata::rest("GetPayment", HttpMethod::Get, "/payments/{paymentId}");
pub const GET_PAYMENTS: CommandMetadata = CommandMetadata::rest("GetPayments", HttpMethod::Get, "/payments");
pub const CREATE_TRANSFER: CommandMetadata =
    CommandMetadata::rest("CreateTransfer", HttpMethod::Post, "/transfers");
pub const GET_TRANSFER: CommandMetadata =
    CommandMetadata::rest("GetTransfer", HttpMethod::Get, "/transfers/{transferId}");
pub const GET_TRANSFERS: CommandMetadata = CommandMetadata::rest("GetTransfers", HttpMethod::Get, "/transfers");
pub const CANCEL_TRANSFER: CommandMetadata =
    CommandMetadata::rest("CancelTransfer", HttpMethod::Post, "/transfers/{transferId}/cancel");

pub fn create_payment(request: CreatePaymentRequest) -> ValidationResult<Command<CreatePaymentRequest, Payment>> {
    Command::new(CREATE_PAYMENT, request, &[])?.with_json_body()
}

pub fn get_payment(id: &PaymentId) -> ValidationResult<Command<PaymentId, Payment>> {
    Command::new(GET_PAYMENT, id.clone(), &[("paymentId", id.as_str())])
}

pub fn get_payments(params: ListPaymentsParams) -> ValidationResult<Command<ListPaymentsParams, Vec<Payment>>> {
    Command::new(GET_PAYMENTS, params, &[])?.with_input_query()
}

pub fn create_transfer(
    request: CreateTransferRequest,
) -> ValidationResult<Command<CreateTransferRequest, Transfer>> {
    Command::new(CREATE_TRANSFER, request, &[])?.with_json_body()
}

pub fn get_transfer(id: &TransferId) -> ValidationResult<Command<TransferId, Transfer>> {
    Command::new(GET_TRANSFER, id.clone(), &[("transferId", id.as_str())])
}

pub fn get_transfers(params: ListTransfersParams) -> ValidationResult<Command<ListTransfersParams, Vec<Transfer>>> {
    Command::new(GET_TRANSFERS, params, &[])?.with_input_query()
}

pub fn cancel_transfer(
    id: &TransferId,
    request: CancelTransferRequest,
) -> ValidationResult<Command<CancelTransferRequest, Transfer>> {
    Command::new(CANCEL_TRANSFER, request, &[("transferId", id.as_str())])?.with_json_body()
}
