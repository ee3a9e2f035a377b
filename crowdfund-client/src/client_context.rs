// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use alloy::primitives::Address;
use crowdfund_base::time::Clock;
use crowdfund_ethereum::ChainConnector;

use crate::{
    cache::SnapshotCache, campaign::VoteCounting, gateway::MutationGateway,
    repository::CampaignRepository, Error,
};

/// The wallet session, the campaign repository and the mutation gateway, sharing one
/// connector and, optionally, one snapshot cache.
///
/// Create one when the application starts and call [`ClientContext::disconnect`] on
/// sign-out.
pub struct ClientContext {
    connector: Arc<dyn ChainConnector>,
    repository: CampaignRepository,
    gateway: MutationGateway,
}

impl ClientContext {
    pub fn new(
        connector: Arc<dyn ChainConnector>,
        clock: Arc<dyn Clock>,
        vote_counting: VoteCounting,
        cache_ttl_millis: Option<u64>,
    ) -> Self {
        let mut repository = CampaignRepository::new(connector.clone(), clock.clone())
            .with_vote_counting(vote_counting);
        let mut gateway = MutationGateway::new(connector.clone(), clock.clone());
        if let Some(ttl_millis) = cache_ttl_millis {
            let cache = Arc::new(SnapshotCache::new(ttl_millis, clock));
            repository = repository.with_cache(cache.clone());
            gateway = gateway.with_cache(cache);
        }
        Self {
            connector,
            repository,
            gateway,
        }
    }

    pub fn repository(&self) -> &CampaignRepository {
        &self.repository
    }

    pub fn gateway(&self) -> &MutationGateway {
        &self.gateway
    }

    pub async fn current_address(&self) -> Option<Address> {
        self.connector.current_address().await
    }

    pub async fn connect(&self) -> Result<Address, Error> {
        Ok(self.connector.connect().await?)
    }

    pub async fn disconnect(&self) {
        self.connector.disconnect().await
    }
}
