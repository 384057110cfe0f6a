//! Savings accounts resource.
//!
//! Deposit and withdrawal transactions are booked against an account; the
//! service owns balances, this crate only shapes and validates requests.

pub mod account;
pub mod commands;
pub mod transaction;

pub use account::{
    AccountState, CloseSavingAccountRequest, CreateSavingAccountRequest, ListSavingAccountsParams, SavingAccount,
    SavingAccountId, SavingAccountType, UpdateSavingAccountRequest,
};
pub use commands::{
    close_saving_account, create_saving_account, get_saving_account, get_saving_accounts, make_deposit,
    make_withdrawal, update_saving_account,
};
pub use transaction::{SavingTransaction, SavingTransactionId, TransactionRequest, TransactionType};
