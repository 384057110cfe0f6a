//! `corebank-sdk`: typed client for the core-banking REST and GraphQL APIs.
//!
//! This crate ties the workspace together: it re-exports the resource crates
//! under short module names and provides a [`prelude`] for application code.
//!
//! ```no_run
//! use corebank_sdk::prelude::*;
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfig::from_env()?;
//! let executor = CommandExecutor::builder(config)
//!     .middleware(LoggingMiddleware)
//!     .build()?;
//!
//! let client_id = ClientId::new("8a8e8f1c")?;
//! let client = get_client(&client_id)?.execute(&executor).await?;
//! println!("{client:?}");
//! # Ok(())
//! # }
//! ```

pub mod cli;

pub use corebank_auth as auth;
pub use corebank_cards as cards;
pub use corebank_clients as clients;
pub use corebank_core as common;
pub use corebank_infra as infra;
pub use corebank_payments as payments;
pub use corebank_savings as savings;

/// Everything needed to configure an executor and run commands.
pub mod prelude {
    pub use corebank_auth::{AuthMode, Credential, SigningKey};
    pub use corebank_core::{Currency, Money, NoContent, Pagination, Schema, TenantId, ValidationError};
    pub use corebank_infra::{
        ApiError, ClientConfig, Command, CommandError, CommandExecutor, LoggingMiddleware, MetricsMiddleware,
        Middleware, graphql_command, is_command_error,
    };

    pub use corebank_cards::{
        AuthorizationHold, AuthorizationId, CardReferenceToken, CardTransaction, CardTransactionType,
        CreateAuthorizationHoldRequest, CreateCardTransactionRequest, HoldStatus, Merchant, create_authorization_hold,
        create_card_transaction, get_authorization_hold, reverse_authorization_hold,
    };
    pub use corebank_clients::{
        Address, Client, ClientId, ClientSearch, ClientSearchResult, ClientState, CreateClientRequest, Gender,
        ListClientsParams, UpdateClientRequest, create_client, delete_client, get_client, get_clients, search_clients,
        update_client,
    };
    pub use corebank_payments::{
        CancelTransferRequest, Counterparty, CreatePaymentRequest, CreateTransferRequest, ListPaymentsParams,
        ListTransfersParams, Payment, PaymentId, PaymentStatus, Transfer, TransferId, TransferStatus, cancel_transfer,
        create_payment, create_transfer, get_payment, get_payments, get_transfer, get_transfers,
    };
    pub use corebank_savings::{
        AccountState, CloseSavingAccountRequest, CreateSavingAccountRequest, ListSavingAccountsParams, SavingAccount,
        SavingAccountId, SavingAccountType, SavingTransaction, TransactionRequest, TransactionType,
        UpdateSavingAccountRequest, close_saving_account, create_saving_account, get_saving_account,
        get_saving_accounts, make_deposit, make_withdrawal, update_saving_account,
    };
}
