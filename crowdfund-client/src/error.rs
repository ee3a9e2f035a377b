// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use alloy::primitives::B256;
use crowdfund_base::data_types::{ArithmeticError, ParseAmountError, Timestamp};
use crowdfund_ethereum::ChainError;

/// Every way a campaign operation can fail.
///
/// Validation failures (`NotConnected`, `InvalidAmount`, `InvalidDeadline`) are detected
/// before anything is sent to the chain. The other variants come from the wallet, the node
/// or the contract and are reported as they are: nothing is retried.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no wallet is connected")]
    NotConnected,
    #[error("wallet connection rejected: {0}")]
    ConnectionRejected(String),
    #[error("no wallet available: configure a signing key")]
    NoWalletAvailable,
    #[error("invalid amount: {0}")]
    InvalidAmount(#[from] ParseAmountError),
    #[error("deadline {deadline} is not in the future (now: {now})")]
    InvalidDeadline { deadline: Timestamp, now: Timestamp },
    #[error("transaction rejected by {}: {reason}", rejected_by(.by_user))]
    TransactionRejected { by_user: bool, reason: String },
    #[error("insufficient funds: {0}")]
    InsufficientFunds(String),
    #[error("network error: {0}")]
    NetworkError(String),
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    #[error("transaction {0} did not emit a CampaignCreated event")]
    EventNotFound(B256),
    #[error("division by zero")]
    DivisionByZero,
}

fn rejected_by(by_user: &bool) -> &'static str {
    if *by_user {
        "the user"
    } else {
        "the contract"
    }
}

impl Error {
    /// Whether the user declined the request in their wallet. Such failures can simply be
    /// retried, while the others call for waiting or for fixing the setup.
    pub fn is_user_rejection(&self) -> bool {
        matches!(
            self,
            Error::ConnectionRejected(_) | Error::TransactionRejected { by_user: true, .. }
        )
    }
}

impl From<ChainError> for Error {
    fn from(error: ChainError) -> Self {
        match error {
            ChainError::NotConnected => Error::NotConnected,
            ChainError::ConnectionRejected(reason) => Error::ConnectionRejected(reason),
            ChainError::NoWalletAvailable => Error::NoWalletAvailable,
            ChainError::TransactionRejected { by_user, reason } => {
                Error::TransactionRejected { by_user, reason }
            }
            ChainError::InsufficientFunds(reason) => Error::InsufficientFunds(reason),
            ChainError::Network(reason) => Error::NetworkError(reason),
            ChainError::MalformedResponse(reason) => Error::MalformedResponse(reason),
            ChainError::UrlParseError(error) => Error::NetworkError(error.to_string()),
        }
    }
}

impl From<ArithmeticError> for Error {
    fn from(error: ArithmeticError) -> Self {
        match error {
            ArithmeticError::DivisionByZero => Error::DivisionByZero,
        }
    }
}
