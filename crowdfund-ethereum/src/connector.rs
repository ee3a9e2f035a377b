// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use alloy::primitives::{Address, U256};
use async_trait::async_trait;

use crate::{
    common::{ChainError, TransactionReceipt},
    contract::{Campaign, CategoryWinner, CreateCampaignArgs, DonatorLists},
};

/// The wallet and contract capabilities the campaign layer relies on.
///
/// Implementations hold the wallet session explicitly: it starts disconnected, becomes
/// connected through [`ChainConnector::connect`] and is torn down by
/// [`ChainConnector::disconnect`]. Reads do not need a wallet. When no contract is bound,
/// reads return empty results.
#[async_trait]
pub trait ChainConnector: Send + Sync {
    /// The address of the connected wallet, if any.
    async fn current_address(&self) -> Option<Address>;

    /// Connects the wallet and returns its address.
    async fn connect(&self) -> Result<Address, ChainError>;

    /// Disconnects the wallet. Disconnecting twice is not an error.
    async fn disconnect(&self);

    /// Calls `getCampaigns`.
    async fn get_campaigns(&self) -> Result<Vec<Campaign>, ChainError>;

    /// Calls `getDonators`.
    async fn get_donators(&self, campaign_id: U256) -> Result<DonatorLists, ChainError>;

    /// Calls `getWinnersByCategory`.
    async fn get_winners_by_category(&self) -> Result<Vec<CategoryWinner>, ChainError>;

    /// Submits a `createCampaign` transaction and waits for its receipt.
    async fn create_campaign(
        &self,
        args: CreateCampaignArgs,
    ) -> Result<TransactionReceipt, ChainError>;

    /// Submits a `donateToCampaign` transaction carrying `value` wei and waits for its
    /// receipt.
    async fn donate_to_campaign(
        &self,
        campaign_id: U256,
        value: U256,
    ) -> Result<TransactionReceipt, ChainError>;
}
