//! Command factories for card holds and transactions.

use corebank_core::{CommandMetadata, HttpMethod, NoContent, ValidationResult};
use corebank_infra::Command;

use crate::hold::{AuthorizationHold, AuthorizationId, CardReferenceToken, CreateAuthorizationHoldRequest};
use crate::transaction::{CardTransaction, CreateCardTransactionRequest};

pub const CREATE_AUTHORIZATION_HOLD: CommandMetadata = CommandMetadata::rest(
    "CreateAuthorizationHold",
    HttpMethod::Post,
    "/cards/{cardReferenceToken}/authorization-holds",
);
pub const GET_AUTHORIZATION_HOLD: CommandMetadata = CommandMetadata::rest(
    "GetAuthorizationHold",
    HttpMethod::Get,
    "/cards/{cardReferenceToken}/authorization-holds/{authorizationId}",
);
pub const REVERSE_AUTHORIZATION_HOLD: CommandMetadata = CommandMetadata::rest(
    "ReverseAuthorizationHold",
    HttpMethod::Delete,
    "/cards/{cardReferenceToken}/authorization-holds/{authorizationId}",
);
pub const CREATE_CARD_TRANSACTION: CommandMetadata = CommandMetadata::rest(
    "CreateCardTransaction",
    HttpMethod::Post,
    "/cards/{cardReferenceToken}/financial-transactions",
);

const CARD_PARAM: &str = "cardReferenceToken";
const AUTHORIZATION_PARAM: &str = "authorizationId";

pub fn create_authorization_hold(
    card: &CardReferenceToken,
    request: CreateAuthorizationHoldRequest,
) -> ValidationResult<Command<CreateAuthorizationHoldRequest, AuthorizationHold>> {
    Command::new(CREATE_AUTHORIZATION_HOLD, request, &[(CARD_PARAM, card.as_str())])?.with_json_body()
}

pub fn get_authorization_hold(
    card: &CardReferenceToken,
    authorization: &AuthorizationId,
) -> ValidationResult<Command<AuthorizationId, AuthorizationHold>> {
    Command::new(
        GET_AUTHORIZATION_HOLD,
        authorization.clone(),
        &[(CARD_PARAM, card.as_str()), (AUTHORIZATION_PARAM, authorization.as_str())],
    )
}

/// Release the reserved funds. The service answers with an empty body.
pub fn reverse_authorization_hold(
    card: &CardReferenceToken,
    authorization: &AuthorizationId,
) -> ValidationResult<Command<AuthorizationId, NoContent>> {
    Command::new(
        REVERSE_AUTHORIZATION_HOLD,
        authorization.clone(),
        &[(CARD_PARAM, card.as_str()), (AUTHORIZATION_PARAM, authorization.as_str())],
    )
}

pub fn create_card_transaction(
    card: &CardReferenceToken,
    request: CreateCardTransactionRequest,
) -> ValidationResult<Command<CreateCardTransactionRequest, CardTransaction>> {
    Command::new(CREATE_CARD_TRANSACTION, request, &[(CARD_PARAM, card.as_str())])?.with_json_body()
}
