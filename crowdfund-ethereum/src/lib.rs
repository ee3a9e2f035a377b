// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! This module provides typed access to the crowdfunding contract and to the wallet that
//! signs transactions for it.

pub mod client;
pub mod common;
pub mod connector;
pub mod contract;

/// Helper types for tests.
#[cfg(with_testing)]
pub mod test_utils;

pub use crate::{
    client::EthereumConnector,
    common::{ChainError, TransactionReceipt},
    connector::ChainConnector,
};
