// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Read access to the campaigns stored by the contract.

use std::sync::Arc;

use alloy::primitives::{Address, U256};
use crowdfund_base::{data_types::Amount, time::Clock, CATEGORIES};
use crowdfund_ethereum::ChainConnector;
use tracing::{debug, instrument};

use crate::{
    cache::SnapshotCache,
    campaign::{Campaign, CategoryWinner, Donation, VoteCounting},
    Error,
};

/// Fetches campaigns from the contract and derives views from them.
///
/// Every view is computed from a fresh call to the contract (or from the snapshot cache,
/// when one is configured). Nothing is kept between calls otherwise, so all operations are
/// independent and may run concurrently.
pub struct CampaignRepository {
    connector: Arc<dyn ChainConnector>,
    clock: Arc<dyn Clock>,
    vote_counting: VoteCounting,
    cache: Option<Arc<SnapshotCache>>,
}

impl CampaignRepository {
    pub fn new(connector: Arc<dyn ChainConnector>, clock: Arc<dyn Clock>) -> Self {
        Self {
            connector,
            clock,
            vote_counting: VoteCounting::default(),
            cache: None,
        }
    }

    pub fn with_vote_counting(mut self, vote_counting: VoteCounting) -> Self {
        self.vote_counting = vote_counting;
        self
    }

    pub fn with_cache(mut self, cache: Arc<SnapshotCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn vote_counting(&self) -> VoteCounting {
        self.vote_counting
    }

    /// Returns all campaigns, in contract order.
    #[instrument(skip(self))]
    pub async fn list_all(&self) -> Result<Vec<Campaign>, Error> {
        if let Some(cache) = &self.cache {
            if let Some(campaigns) = cache.get().await {
                return Ok(campaigns);
            }
        }
        let records = self.connector.get_campaigns().await?;
        let campaigns = records
            .into_iter()
            .enumerate()
            .map(|(index, record)| Campaign::from_record(index as u64, record, self.vote_counting))
            .collect::<Vec<_>>();
        debug!(count = campaigns.len(), "listed campaigns");
        if let Some(cache) = &self.cache {
            cache.insert(campaigns.clone()).await;
        }
        Ok(campaigns)
    }

    /// Returns the campaigns created by `owner`.
    pub async fn list_by_owner(&self, owner: Address) -> Result<Vec<Campaign>, Error> {
        let mut campaigns = self.list_all().await?;
        campaigns.retain(|campaign| campaign.owner == owner);
        Ok(campaigns)
    }

    /// Returns the campaigns of the given category. Unknown categories have no campaigns.
    pub async fn list_by_category(&self, category: &str) -> Result<Vec<Campaign>, Error> {
        let mut campaigns = self.list_all().await?;
        campaigns.retain(|campaign| campaign.category == category);
        Ok(campaigns)
    }

    /// Returns the campaigns whose deadline has not passed yet.
    pub async fn list_ongoing(&self) -> Result<Vec<Campaign>, Error> {
        let now = self.clock.current_time();
        let mut campaigns = self.list_all().await?;
        campaigns.retain(|campaign| campaign.is_ongoing(now));
        Ok(campaigns)
    }

    /// Returns the campaign with the given id, if it exists.
    pub async fn get(&self, campaign_id: u64) -> Result<Option<Campaign>, Error> {
        Ok(self
            .list_all()
            .await?
            .into_iter()
            .find(|campaign| campaign.id == campaign_id))
    }

    /// Returns the donations made to a campaign, in the order they were accepted.
    #[instrument(skip(self))]
    pub async fn list_donators(&self, campaign_id: u64) -> Result<Vec<Donation>, Error> {
        let lists = self
            .connector
            .get_donators(U256::from(campaign_id))
            .await?;
        if lists.donators.len() != lists.donations.len() {
            return Err(Error::MalformedResponse(format!(
                "campaign {campaign_id} has {} donors but {} donations",
                lists.donators.len(),
                lists.donations.len()
            )));
        }
        Ok(lists
            .donators
            .into_iter()
            .zip(lists.donations)
            .map(|(donator, donation)| Donation {
                donator,
                donation: Amount::from(donation),
            })
            .collect())
    }

    /// Returns the sum of the votes of all campaigns. This is recomputed on every call.
    pub async fn total_votes(&self) -> Result<u64, Error> {
        Ok(self
            .list_all()
            .await?
            .iter()
            .map(|campaign| campaign.votes)
            .sum())
    }

    /// Returns the best-funded campaign of each category, as computed by the contract.
    #[instrument(skip(self))]
    pub async fn list_winners(&self) -> Result<Vec<CategoryWinner>, Error> {
        Ok(self
            .connector
            .get_winners_by_category()
            .await?
            .into_iter()
            .map(CategoryWinner::from)
            .collect())
    }

    /// Returns the categories a campaign can be filed under.
    pub fn categories(&self) -> &'static [&'static str] {
        &CATEGORIES
    }
}
