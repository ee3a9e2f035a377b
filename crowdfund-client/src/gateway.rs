// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Validation and submission of the two state-changing operations: campaign creation and
//! donation.

use std::sync::Arc;

use alloy::{
    primitives::U256,
    sol_types::SolEvent,
};
use crowdfund_base::{
    data_types::{to_minor_unit, Timestamp},
    time::Clock,
};
use crowdfund_ethereum::{
    contract::{CampaignCreated, CreateCampaignArgs},
    ChainConnector, TransactionReceipt,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::{cache::SnapshotCache, Error};

/// The fields a user fills in to create a campaign.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignForm {
    pub title: String,
    pub description: String,
    /// The funding goal, as a decimal amount of ether.
    pub target: String,
    pub deadline: Timestamp,
    pub image: String,
    pub category: String,
    pub website: Option<String>,
    pub twitter: Option<String>,
    pub linkedin: Option<String>,
    pub document_link: Option<String>,
}

/// Submits transactions on behalf of the connected wallet.
///
/// Each successful call results in exactly one transaction. Failed submissions are not
/// retried, and the gateway never updates campaign data locally: read it back through the
/// repository to observe the effect of a write.
pub struct MutationGateway {
    connector: Arc<dyn ChainConnector>,
    clock: Arc<dyn Clock>,
    cache: Option<Arc<SnapshotCache>>,
}

impl MutationGateway {
    pub fn new(connector: Arc<dyn ChainConnector>, clock: Arc<dyn Clock>) -> Self {
        Self {
            connector,
            clock,
            cache: None,
        }
    }

    /// Invalidates `cache` after every accepted write.
    pub fn with_cache(mut self, cache: Arc<SnapshotCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Creates a campaign owned by the connected wallet and returns its id.
    #[instrument(skip_all, fields(title = %form.title))]
    pub async fn create_campaign(&self, form: CampaignForm) -> Result<u64, Error> {
        let owner = self
            .connector
            .current_address()
            .await
            .ok_or(Error::NotConnected)?;
        let target = to_minor_unit(&form.target)?;
        let now = self.clock.current_time();
        // The contract stores whole seconds.
        if form.deadline.seconds() <= now.seconds() {
            return Err(Error::InvalidDeadline {
                deadline: form.deadline,
                now,
            });
        }
        let args = CreateCampaignArgs {
            owner,
            title: form.title,
            description: form.description,
            target,
            deadline: U256::from(form.deadline.seconds()),
            image: form.image,
            category: form.category,
            website: form.website.unwrap_or_default(),
            twitter: form.twitter.unwrap_or_default(),
            linkedin: form.linkedin.unwrap_or_default(),
            documentLink: form.document_link.unwrap_or_default(),
        };
        let receipt = self.connector.create_campaign(args).await?;
        self.invalidate_cache().await;
        let campaign_id = created_campaign_id(&receipt)?;
        info!(campaign_id, tx_hash = %receipt.transaction_hash, "campaign created");
        Ok(campaign_id)
    }

    /// Donates `amount` ether to a campaign.
    #[instrument(skip(self))]
    pub async fn donate(&self, campaign_id: u64, amount: &str) -> Result<TransactionReceipt, Error> {
        let value = to_minor_unit(amount)?;
        if self.connector.current_address().await.is_none() {
            return Err(Error::NotConnected);
        }
        let receipt = self
            .connector
            .donate_to_campaign(U256::from(campaign_id), value)
            .await?;
        self.invalidate_cache().await;
        info!(tx_hash = %receipt.transaction_hash, "donation accepted");
        Ok(receipt)
    }

    async fn invalidate_cache(&self) {
        if let Some(cache) = &self.cache {
            cache.invalidate().await;
        }
    }
}

/// Extracts the id of the new campaign from the `CampaignCreated` event of `receipt`.
fn created_campaign_id(receipt: &TransactionReceipt) -> Result<u64, Error> {
    let log = receipt
        .logs
        .iter()
        .find(|log| log.topics().first() == Some(&CampaignCreated::SIGNATURE_HASH))
        .ok_or(Error::EventNotFound(receipt.transaction_hash))?;
    let event = CampaignCreated::decode_log_data(&log.data)
        .map_err(|error| Error::MalformedResponse(error.to_string()))?;
    u64::try_from(event.campaignId).map_err(|_| {
        Error::MalformedResponse(format!("campaign id {} does not fit in 64 bits", event.campaignId))
    })
}
