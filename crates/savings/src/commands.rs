//! Command factories for the savings resource.

use corebank_core::{CommandMetadata, HttpMethod, ValidationResult};
use corebank_infra::Command;

use crate::account::{
    CloseSavingAccountRequest, CreateSavingAccountRequest, ListSavingAccountsParams, SavingAccount,
    SavingAccountId, UpdateSavingAccountRequest,
};
use crate::transaction::{SavingTransaction, TransactionRequest};

pub const CREATE_SAVING_ACCOUNT: CommandMetadata =
    CommandMetadata::rest("CreateSavingAccount", HttpMethod::Post, "/savings");
pub const GET_SAVING_ACCOUNT: CommandMetadata =
    CommandMetadata::rest("GetSavingAccount", HttpMethod::Get, "/savings/{savingAccountId}");
pub const GET_SAVING_ACCOUNTS: CommandMetadata =
    CommandMetadata::rest("GetSavingAccounts", HttpMethod::Get, "/savings");
pub const UPDATE_SAVING_ACCOUNT: CommandMetadata =
    CommandMetadata::rest("UpdateSavingAccount", HttpMethod::Put, "/savings/{savingAccountId}");
pub const CLOSE_SAVING_ACCOUNT: CommandMetadata =
    CommandMetadata::rest("CloseSavingAccount", HttpMethod::Post, "/savings/{savingAccountId}/close");
pub const MAKE_DEPOSIT: CommandMetadata = CommandMetadata::rest(
    "MakeDeposit",
    HttpMethod::Post,
    "/savings/{savingAccountId}/deposit-transactions",
);
pub const MAKE_WITHDRAWAL: CommandMetadata = CommandMetadata::rest(
    "MakeWithdrawal",
    HttpMethod::Post,
    "/savings/{savingAccountId}/withdrawal-transactions",
);

const ACCOUNT_PARAM: &str = "savingAccountId";

pub fn create_saving_account(
    request: CreateSavingAccountRequest,
) -> ValidationResult<Command<CreateSavingAccountRequest, SavingAccount>> {
    Command::new(CREATE_SAVING_ACCOUNT, request, &[])?.with_json_body()
}

pub fn get_saving_account(id: &SavingAccountId) -> ValidationResult<Command<SavingAccountId, SavingAccount>> {
    Command::new(GET_SAVING_ACCOUNT, id.clone(), &[(ACCOUNT_PARAM, id.as_str())])
}

pub fn get_saving_accounts(
    params: ListSavingAccountsParams,
) -> ValidationResult<Command<ListSavingAccountsParams, Vec<SavingAccount>>> {
    Command::new(GET_SAVING_ACCOUNTS, params, &[])?.with_input_query()
}

pub fn update_saving_account(
    id: &SavingAccountId,
    request: UpdateSavingAccountRequest,
) -> ValidationResult<Command<UpdateSavingAccountRequest, SavingAccount>> {
    Command::new(UPDATE_SAVING_ACCOUNT, request, &[(ACCOUNT_PARAM, id.as_str())])?.with_json_body()
}

pub fn close_saving_account(
    id: &SavingAccountId,
    request: CloseSavingAccountRequest,
) -> ValidationResult<Command<CloseSavingAccountRequest, SavingAccount>> {
    Command::new(CLOSE_SAVING_ACCOUNT, request, &[(ACCOUNT_PARAM, id.as_str())])?.with_json_body()
}

pub fn make_deposit(
    id: &SavingAccountId,
    request: TransactionRequest,
) -> ValidationResult<Command<TransactionRequest, SavingTransaction>> {
    Command::new(MAKE_DEPOSIT, request, &[(ACCOUNT_PARAM, id.as_str())])?.with_json_body()
}

pub fn make_withdrawal(
    id: &SavingAccountId,
    request: TransactionRequest,
) -> ValidationResult<Command<TransactionRequest, SavingTransaction>> {
    Command::new(MAKE_WITHDRAWAL, request, &[(ACCOUNT_PARAM, id.as_str())])?.with_json_body()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use corebank_auth::AuthMode;
    use corebank_clients::ClientId;
    use corebank_core::{Currency, Money, TenantId};
    use corebank_infra::{ApiError, ClientConfig, CommandExecutor, HttpResponse, RecordingTransport};

    use super::*;
    use crate::account::AccountState;
    use crate::transaction::TransactionType;

    fn account_id() -> SavingAccountId {
        SavingAccountId::new("s-1").unwrap()
    }

    fn eur(amount: u64) -> Money {
        Money::new(amount, Currency::new("EUR").unwrap())
    }

    fn executor(transport: &Arc<RecordingTransport>) -> CommandExecutor {
        let config = ClientConfig::builder("https://bank.test", AuthMode::bearer("tok").unwrap())
            .tenant_id(TenantId::new("acme").unwrap())
            .build()
            .unwrap();
        CommandExecutor::builder(config)
            .shared_transport(transport.clone())
            .build()
            .unwrap()
    }

    #[test]
    fn transaction_paths_are_resolved_per_account() {
        let deposit = make_deposit(&account_id(), TransactionRequest::new(eur(100))).unwrap();
        assert_eq!(deposit.segments(), ["savings", "s-1", "deposit-transactions"]);
        assert_eq!(deposit.metadata().command_name, "MakeDeposit");

        let withdrawal = make_withdrawal(&account_id(), TransactionRequest::new(eur(100))).unwrap();
        assert_eq!(withdrawal.segments(), ["savings", "s-1", "withdrawal-transactions"]);

        let close = close_saving_account(&account_id(), CloseSavingAccountRequest::default()).unwrap();
        assert_eq!(close.segments(), ["savings", "s-1", "close"]);
        assert_eq!(close.metadata().method, HttpMethod::Post);
    }

    #[test]
    fn zero_deposit_never_becomes_a_command() {
        assert!(make_deposit(&account_id(), TransactionRequest::new(eur(0))).is_err());
    }

    #[tokio::test]
    async fn deposit_returns_the_booked_transaction() {
        let transport = Arc::new(RecordingTransport::new().respond(
            HttpMethod::Post,
            "/savings/s-1/deposit-transactions",
            HttpResponse::json(
                201,
                &json!({
                    "id": "t-1",
                    "accountId": "s-1",
                    "type": "DEPOSIT",
                    "amount": { "amount": 2500, "currency": "EUR" },
                    "balanceAfter": { "amount": 15000, "currency": "EUR" },
                    "externalId": "dep-42",
                    "bookedAt": "2024-03-02T10:00:00Z"
                }),
            ),
        ));
        let executor = executor(&transport);

        let mut request = TransactionRequest::new(eur(2500));
        request.external_id = Some("dep-42".to_string());
        let transaction = make_deposit(&account_id(), request)
            .unwrap()
            .execute(&executor)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(transaction.kind, TransactionType::Deposit);
        assert_eq!(transaction.balance_after, Some(eur(15000)));
        let call = transport.last_call().unwrap();
        assert_eq!(call.header("x-tenant-id"), Some("acme"));
        assert_eq!(
            call.body_json().unwrap(),
            json!({ "amount": { "amount": 2500, "currency": "EUR" }, "externalId": "dep-42" })
        );
    }

    #[tokio::test]
    async fn list_filters_by_client_and_state() {
        let transport = Arc::new(RecordingTransport::new().respond(
            HttpMethod::Get,
            "/savings",
            HttpResponse::json(200, &json!([])),
        ));
        let executor = executor(&transport);

        let params = ListSavingAccountsParams {
            client_id: Some(ClientId::new("c-1").unwrap()),
            state: Some(AccountState::Dormant),
            ..ListSavingAccountsParams::default()
        };
        let accounts = get_saving_accounts(params).unwrap().execute(&executor).await.unwrap();
        assert_eq!(accounts, Some(Vec::new()));
        assert_eq!(
            transport.last_call().unwrap().url.query(),
            Some("clientId=c-1&state=DORMANT")
        );
    }

    #[tokio::test]
    async fn rejected_withdrawal_surfaces_the_service_error() {
        let transport = Arc::new(RecordingTransport::new().respond(
            HttpMethod::Post,
            "/savings/s-1/withdrawal-transactions",
            HttpResponse::json(
                400,
                &json!({ "errors": [{ "errorCode": 1104, "errorReason": "INSUFFICIENT_FUNDS" }] }),
            ),
        ));
        let executor = executor(&transport);

        let err = make_withdrawal(&account_id(), TransactionRequest::new(eur(1_000_000)))
            .unwrap()
            .execute(&executor)
            .await
            .unwrap_err();
        let api = err.api_error().unwrap();
        assert_eq!(api.name, ApiError::HTTP_ERROR);
        assert_eq!(api.code.as_deref(), Some("1104"));
        assert_eq!(api.message, "INSUFFICIENT_FUNDS");
    }
}
