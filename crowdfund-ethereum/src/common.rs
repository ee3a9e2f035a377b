// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use alloy::{
    primitives::{Address, Log, B256},
    providers::PendingTransactionError,
    rpc::json_rpc::RpcError,
    transports::TransportErrorKind,
};
use serde::Serialize;
use thiserror::Error;

/// The JSON-RPC error code wallets use when the user declines a request (EIP-1193).
pub const USER_REJECTED_CODE: i64 = 4001;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ChainError {
    /// A write was attempted without a connected wallet.
    #[error("no wallet is connected")]
    NotConnected,

    /// The wallet, or the node it talks to, refused the connection.
    #[error("wallet connection rejected: {0}")]
    ConnectionRejected(String),

    /// There is no wallet to connect to.
    #[error("no wallet available: configure a signing key")]
    NoWalletAvailable,

    /// The transaction was declined by the user or reverted by the contract.
    #[error("transaction rejected by {}: {reason}", rejected_by(.by_user))]
    TransactionRejected { by_user: bool, reason: String },

    /// The sender cannot pay for the value and gas of the transaction.
    #[error("insufficient funds: {0}")]
    InsufficientFunds(String),

    /// The node could not be reached or failed to answer.
    #[error("network error: {0}")]
    Network(String),

    /// The node answered with data that does not match the contract ABI.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// URL parsing error
    #[error(transparent)]
    UrlParseError(#[from] url::ParseError),
}

fn rejected_by(by_user: &bool) -> &'static str {
    if *by_user {
        "the user"
    } else {
        "the contract"
    }
}

impl ChainError {
    /// Classifies a JSON-RPC error object returned by the node or the wallet.
    pub fn from_error_response(code: i64, message: &str) -> Self {
        let lowercase = message.to_lowercase();
        if code == USER_REJECTED_CODE
            || lowercase.contains("user rejected")
            || lowercase.contains("user denied")
        {
            ChainError::TransactionRejected {
                by_user: true,
                reason: message.to_string(),
            }
        } else if lowercase.contains("insufficient funds") {
            ChainError::InsufficientFunds(message.to_string())
        } else if lowercase.contains("execution reverted") {
            ChainError::TransactionRejected {
                by_user: false,
                reason: message.to_string(),
            }
        } else {
            ChainError::Network(format!("error {code}: {message}"))
        }
    }
}

impl From<RpcError<TransportErrorKind>> for ChainError {
    fn from(error: RpcError<TransportErrorKind>) -> Self {
        match error {
            RpcError::ErrorResp(payload) => {
                ChainError::from_error_response(payload.code, &payload.message)
            }
            RpcError::DeserError { err, text } => {
                ChainError::MalformedResponse(format!("{err}: {text}"))
            }
            RpcError::LocalUsageError(error) => ChainError::TransactionRejected {
                by_user: false,
                reason: error.to_string(),
            },
            error => ChainError::Network(error.to_string()),
        }
    }
}

impl From<PendingTransactionError> for ChainError {
    fn from(error: PendingTransactionError) -> Self {
        match error {
            PendingTransactionError::TransportError(error) => error.into(),
            error => ChainError::Network(error.to_string()),
        }
    }
}

impl From<alloy::sol_types::Error> for ChainError {
    fn from(error: alloy::sol_types::Error) -> Self {
        ChainError::MalformedResponse(error.to_string())
    }
}

/// The confirmation record of an accepted transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    pub transaction_hash: B256,
    pub block_number: Option<u64>,
    pub from: Address,
    /// The events emitted by the transaction, in order.
    pub logs: Vec<Log>,
}
