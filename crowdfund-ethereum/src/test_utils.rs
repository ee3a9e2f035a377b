// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! An in-memory stand-in for the deployed contract and the user's wallet.

use std::{
    collections::BTreeMap,
    sync::atomic::{AtomicUsize, Ordering},
};

use alloy::{
    primitives::{Address, Log, B256, U256},
    sol_types::SolEvent,
};
use async_lock::Mutex;
use async_trait::async_trait;

use crate::{
    common::{ChainError, TransactionReceipt},
    connector::ChainConnector,
    contract::{Campaign, CampaignCreated, CategoryWinner, CreateCampaignArgs, DonatorLists},
};

/// The address the in-memory contract pretends to be deployed at.
pub const CONTRACT_ADDRESS: Address = Address::repeat_byte(0xcf);

/// The contract entry points, used to count calls.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum ContractCall {
    GetCampaigns,
    GetDonators,
    GetWinnersByCategory,
    CreateCampaign,
    DonateToCampaign,
}

#[derive(Default)]
struct MemoryState {
    campaigns: Vec<Campaign>,
    connected: Option<Address>,
    balance: Option<U256>,
    fail_next_write: Option<ChainError>,
    reject_connection: bool,
    omit_events: bool,
    truncate_donations: bool,
    transactions: u64,
}

/// A [`ChainConnector`] that keeps the contract state in memory.
///
/// Campaign creation appends a record and emits `CampaignCreated`; donations append to the
/// donor lists and bump `votes` and `amountCollected`, like the deployed contract.
pub struct MemoryConnector {
    wallet: Option<Address>,
    bound: bool,
    state: Mutex<MemoryState>,
    calls: Mutex<BTreeMap<ContractCall, usize>>,
    writes: AtomicUsize,
}

impl Default for MemoryConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryConnector {
    /// Creates a bound contract with no campaigns and no wallet.
    pub fn new() -> Self {
        Self {
            wallet: None,
            bound: true,
            state: Mutex::new(MemoryState::default()),
            calls: Mutex::new(BTreeMap::new()),
            writes: AtomicUsize::new(0),
        }
    }

    /// Creates a connector whose contract is not bound yet.
    pub fn unbound() -> Self {
        Self {
            bound: false,
            ..Self::new()
        }
    }

    /// Makes a wallet with the given address available to [`ChainConnector::connect`].
    pub fn with_wallet(mut self, address: Address) -> Self {
        self.wallet = Some(address);
        self
    }

    /// Stores a campaign as if it had been created on-chain, and returns its index.
    pub async fn insert_campaign(&self, campaign: Campaign) -> u64 {
        let mut state = self.state.lock().await;
        state.campaigns.push(campaign);
        (state.campaigns.len() - 1) as u64
    }

    /// Returns the stored record of a campaign.
    pub async fn campaign(&self, index: usize) -> Option<Campaign> {
        self.state.lock().await.campaigns.get(index).cloned()
    }

    /// Limits how many wei the wallet can spend in total.
    pub async fn set_balance(&self, balance: U256) {
        self.state.lock().await.balance = Some(balance);
    }

    /// Makes the next write fail with `error` before reaching the contract.
    pub async fn fail_next_write(&self, error: ChainError) {
        self.state.lock().await.fail_next_write = Some(error);
    }

    /// Makes the wallet refuse the next connection attempts.
    pub async fn set_reject_connection(&self, reject: bool) {
        self.state.lock().await.reject_connection = reject;
    }

    /// Stops emitting `CampaignCreated`, as a contract with a different ABI would.
    pub async fn set_omit_events(&self, omit: bool) {
        self.state.lock().await.omit_events = omit;
    }

    /// Makes `getDonators` return one donation fewer than donors.
    pub async fn set_truncate_donations(&self, truncate: bool) {
        self.state.lock().await.truncate_donations = truncate;
    }

    /// The number of times `call` reached the contract.
    pub async fn call_count(&self, call: ContractCall) -> usize {
        self.calls.lock().await.get(&call).copied().unwrap_or_default()
    }

    /// The number of write attempts, including the failed ones.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    async fn record(&self, call: ContractCall) {
        *self.calls.lock().await.entry(call).or_default() += 1;
    }

    /// Common checks of write calls. Returns the sender.
    fn prepare_write(&self, state: &mut MemoryState) -> Result<Address, ChainError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let sender = state.connected.ok_or(ChainError::NotConnected)?;
        if let Some(error) = state.fail_next_write.take() {
            return Err(error);
        }
        Ok(sender)
    }

    fn receipt(state: &mut MemoryState, from: Address, logs: Vec<Log>) -> TransactionReceipt {
        state.transactions += 1;
        TransactionReceipt {
            transaction_hash: B256::from(U256::from(state.transactions)),
            block_number: Some(state.transactions),
            from,
            logs,
        }
    }
}

/// Returns a campaign record with the given owner, title and category, and every other
/// field empty.
pub fn raw_campaign(owner: Address, title: &str, category: &str) -> Campaign {
    Campaign {
        owner,
        title: title.to_string(),
        description: String::new(),
        target: U256::ZERO,
        deadline: U256::ZERO,
        amountCollected: U256::ZERO,
        image: String::new(),
        donators: Vec::new(),
        donations: Vec::new(),
        votes: U256::ZERO,
        category: category.to_string(),
        website: String::new(),
        twitter: String::new(),
        linkedin: String::new(),
        documentLink: String::new(),
    }
}

#[async_trait]
impl ChainConnector for MemoryConnector {
    async fn current_address(&self) -> Option<Address> {
        self.state.lock().await.connected
    }

    async fn connect(&self) -> Result<Address, ChainError> {
        let wallet = self.wallet.ok_or(ChainError::NoWalletAvailable)?;
        let mut state = self.state.lock().await;
        if state.reject_connection {
            return Err(ChainError::ConnectionRejected(
                "the user declined the connection".to_string(),
            ));
        }
        state.connected = Some(wallet);
        Ok(wallet)
    }

    async fn disconnect(&self) {
        self.state.lock().await.connected = None;
    }

    async fn get_campaigns(&self) -> Result<Vec<Campaign>, ChainError> {
        self.record(ContractCall::GetCampaigns).await;
        if !self.bound {
            return Ok(Vec::new());
        }
        Ok(self.state.lock().await.campaigns.clone())
    }

    async fn get_donators(&self, campaign_id: U256) -> Result<DonatorLists, ChainError> {
        self.record(ContractCall::GetDonators).await;
        let state = self.state.lock().await;
        let campaign = usize::try_from(campaign_id)
            .ok()
            .and_then(|index| state.campaigns.get(index))
            .filter(|_| self.bound);
        let Some(campaign) = campaign else {
            return Ok(DonatorLists {
                donators: Vec::new(),
                donations: Vec::new(),
            });
        };
        let mut donations = campaign.donations.clone();
        if state.truncate_donations {
            donations.pop();
        }
        Ok(DonatorLists {
            donators: campaign.donators.clone(),
            donations,
        })
    }

    async fn get_winners_by_category(&self) -> Result<Vec<CategoryWinner>, ChainError> {
        self.record(ContractCall::GetWinnersByCategory).await;
        if !self.bound {
            return Ok(Vec::new());
        }
        let state = self.state.lock().await;
        let mut winners: Vec<CategoryWinner> = Vec::new();
        for campaign in &state.campaigns {
            let candidate = CategoryWinner {
                category: campaign.category.clone(),
                title: campaign.title.clone(),
                owner: campaign.owner,
                amountCollected: campaign.amountCollected,
            };
            match winners
                .iter_mut()
                .find(|winner| winner.category == campaign.category)
            {
                Some(winner) if winner.amountCollected < campaign.amountCollected => {
                    *winner = candidate
                }
                Some(_) => {}
                None => winners.push(candidate),
            }
        }
        Ok(winners)
    }

    async fn create_campaign(
        &self,
        args: CreateCampaignArgs,
    ) -> Result<TransactionReceipt, ChainError> {
        self.record(ContractCall::CreateCampaign).await;
        let mut state = self.state.lock().await;
        let sender = self.prepare_write(&mut state)?;
        let campaign_id = U256::from(state.campaigns.len());
        let event = CampaignCreated {
            campaignId: campaign_id,
            owner: args.owner,
            title: args.title.clone(),
        };
        state.campaigns.push(Campaign {
            owner: args.owner,
            title: args.title,
            description: args.description,
            target: args.target,
            deadline: args.deadline,
            amountCollected: U256::ZERO,
            image: args.image,
            donators: Vec::new(),
            donations: Vec::new(),
            votes: U256::ZERO,
            category: args.category,
            website: args.website,
            twitter: args.twitter,
            linkedin: args.linkedin,
            documentLink: args.documentLink,
        });
        let logs = if state.omit_events {
            Vec::new()
        } else {
            vec![Log {
                address: CONTRACT_ADDRESS,
                data: event.encode_log_data(),
            }]
        };
        Ok(Self::receipt(&mut state, sender, logs))
    }

    async fn donate_to_campaign(
        &self,
        campaign_id: U256,
        value: U256,
    ) -> Result<TransactionReceipt, ChainError> {
        self.record(ContractCall::DonateToCampaign).await;
        let mut state = self.state.lock().await;
        let sender = self.prepare_write(&mut state)?;
        let index = usize::try_from(campaign_id)
            .ok()
            .filter(|index| *index < state.campaigns.len())
            .ok_or_else(|| ChainError::TransactionRejected {
                by_user: false,
                reason: format!("execution reverted: no campaign {campaign_id}"),
            })?;
        if let Some(balance) = state.balance {
            state.balance = Some(balance.checked_sub(value).ok_or_else(|| {
                ChainError::InsufficientFunds(format!("balance {balance} is below {value}"))
            })?);
        }
        let campaign = &mut state.campaigns[index];
        campaign.donators.push(sender);
        campaign.donations.push(value);
        campaign.amountCollected += value;
        campaign.votes += U256::from(1u8);
        Ok(Self::receipt(&mut state, sender, Vec::new()))
    }
}
