// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use alloy::{primitives::Address, signers::local::PrivateKeySigner};
use chrono::{DateTime, NaiveDate, NaiveTime};
use crowdfund_base::{data_types::Timestamp, time::WallClock};
use crowdfund_ethereum::EthereumConnector;

use crate::{campaign::VoteCounting, client_context::ClientContext, Error};

#[derive(Clone, clap::Parser)]
#[command(
    name = "crowdfund",
    version,
    about = "Browse, create and fund campaigns of the crowdfunding contract"
)]
pub struct ClientOptions {
    /// The JSON-RPC endpoint of the Ethereum node.
    #[arg(long, env = "CROWDFUND_RPC_URL", default_value = "http://127.0.0.1:8545")]
    pub rpc_url: String,

    /// The address of the crowdfunding contract. Without it, every listing is empty.
    #[arg(long = "contract", env = "CROWDFUND_CONTRACT")]
    pub contract_address: Option<Address>,

    /// The private key signing transactions. Required to create campaigns and donate.
    #[arg(long, env = "CROWDFUND_PRIVATE_KEY", hide_env_values = true)]
    pub private_key: Option<PrivateKeySigner>,

    /// Refuse to send transactions to a node on another chain.
    #[arg(long, env = "CROWDFUND_CHAIN_ID")]
    pub chain_id: Option<u64>,

    /// How the votes of a campaign are counted.
    #[arg(long, value_enum, default_value_t = VoteCounting::PerDonation)]
    pub vote_counting: VoteCounting,

    /// Reuse the campaign list for this many milliseconds instead of fetching it for every
    /// view.
    #[arg(long, env = "CROWDFUND_CACHE_TTL_MS")]
    pub cache_ttl_ms: Option<u64>,

    /// Subcommand.
    #[command(subcommand)]
    pub command: ClientCommand,
}

impl ClientOptions {
    /// Creates the context used by every command.
    pub fn create_context(&self) -> Result<ClientContext, Error> {
        let mut connector = EthereumConnector::new(&self.rpc_url, self.contract_address)?;
        if let Some(signer) = self.private_key.clone() {
            connector = connector.with_signer(signer);
        }
        if let Some(chain_id) = self.chain_id {
            connector = connector.with_expected_chain_id(chain_id);
        }
        Ok(ClientContext::new(
            Arc::new(connector),
            Arc::new(WallClock),
            self.vote_counting,
            self.cache_ttl_ms,
        ))
    }
}

#[derive(Clone, clap::Subcommand)]
pub enum ClientCommand {
    /// List all campaigns.
    List,

    /// List the campaigns whose deadline has not passed.
    Ongoing,

    /// List the campaigns created by the configured wallet.
    Mine,

    /// List the campaigns created by an address.
    Owner { address: Address },

    /// List the campaigns of a category.
    Category { category: String },

    /// Show a single campaign with its progress and remaining days.
    Show { campaign_id: u64 },

    /// List the donations made to a campaign.
    Donators { campaign_id: u64 },

    /// Show the sum of the votes of all campaigns.
    TotalVotes,

    /// List the categories campaigns can be filed under.
    Categories,

    /// Show the best-funded campaign of each category.
    Winners,

    /// Create a campaign owned by the configured wallet.
    Create {
        #[arg(long)]
        title: String,

        #[arg(long)]
        description: String,

        /// The funding goal, in ether.
        #[arg(long)]
        target: String,

        /// The deadline, as a date (`2030-01-31`) or an RFC 3339 date-time.
        #[arg(long, value_parser = parse_deadline)]
        deadline: Timestamp,

        #[arg(long)]
        image: String,

        #[arg(long)]
        category: String,

        #[arg(long)]
        website: Option<String>,

        #[arg(long)]
        twitter: Option<String>,

        #[arg(long)]
        linkedin: Option<String>,

        #[arg(long)]
        document_link: Option<String>,
    },

    /// Donate to a campaign from the configured wallet.
    Donate {
        campaign_id: u64,

        /// The amount to donate, in ether.
        amount: String,
    },
}

/// Parses a deadline given as a date, taken at midnight UTC, or as an RFC 3339 date-time.
pub fn parse_deadline(input: &str) -> Result<Timestamp, String> {
    let date_time = match NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        Ok(date) => date.and_time(NaiveTime::MIN).and_utc(),
        Err(_) => DateTime::parse_from_rfc3339(input)
            .map_err(|error| format!("invalid deadline `{input}`: {error}"))?
            .to_utc(),
    };
    u64::try_from(date_time.timestamp_millis())
        .map(Timestamp::from)
        .map_err(|_| format!("deadline `{input}` is before 1970"))
}
