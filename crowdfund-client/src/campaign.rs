// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Application-level campaign records, normalized from the contract's representation.

use std::collections::BTreeSet;

use alloy::primitives::Address;
use crowdfund_base::{
    data_types::{progress_percentage, Amount, Timestamp},
    time,
};
use crowdfund_ethereum::contract;
use serde::{Deserialize, Serialize};

use crate::Error;

/// How the `votes` of a campaign are counted.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum VoteCounting {
    /// Every accepted donation counts, as recorded by the contract.
    #[default]
    PerDonation,
    /// Each donor address counts once, however many times it donated.
    DistinctDonors,
}

/// A crowdfunding campaign.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    /// The index of the campaign in the contract storage.
    pub id: u64,
    pub owner: Address,
    pub title: String,
    pub description: String,
    pub target: Amount,
    pub deadline: Timestamp,
    pub amount_collected: Amount,
    pub image: String,
    pub category: String,
    pub votes: u64,
    pub website: String,
    pub twitter: String,
    pub linkedin: String,
    pub document_link: String,
}

impl Campaign {
    /// Normalizes the record stored at index `id`.
    ///
    /// Every record normalizes: amounts cover the whole `uint256` range, while vote counts
    /// and deadlines beyond 64 bits saturate.
    pub fn from_record(id: u64, record: contract::Campaign, counting: VoteCounting) -> Self {
        let votes = match counting {
            VoteCounting::PerDonation => record.votes.saturating_to::<u64>(),
            VoteCounting::DistinctDonors => {
                record.donators.iter().collect::<BTreeSet<_>>().len() as u64
            }
        };
        Campaign {
            id,
            owner: record.owner,
            title: record.title,
            description: record.description,
            target: Amount::from(record.target),
            deadline: Timestamp::from_seconds(record.deadline.saturating_to::<u64>()),
            amount_collected: Amount::from(record.amountCollected),
            image: record.image,
            category: record.category,
            votes,
            website: record.website,
            twitter: record.twitter,
            linkedin: record.linkedin,
            document_link: record.documentLink,
        }
    }

    /// Whether the deadline is still ahead of `now`.
    pub fn is_ongoing(&self, now: Timestamp) -> bool {
        self.deadline > now
    }

    /// The number of days left, or the closed-campaign label.
    pub fn days_left(&self, now: Timestamp) -> String {
        time::days_left(self.deadline, now)
    }

    /// The collected amount as a rounded percentage of the target.
    pub fn progress_percentage(&self) -> Result<u64, Error> {
        Ok(progress_percentage(self.target, self.amount_collected)?)
    }
}

/// A single donation to a campaign.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Donation {
    pub donator: Address,
    pub donation: Amount,
}

/// The best-funded campaign of a category.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryWinner {
    pub category: String,
    pub title: String,
    pub owner: Address,
    pub amount_collected: Amount,
}

impl From<contract::CategoryWinner> for CategoryWinner {
    fn from(winner: contract::CategoryWinner) -> Self {
        CategoryWinner {
            category: winner.category,
            title: winner.title,
            owner: winner.owner,
            amount_collected: Amount::from(winner.amountCollected),
        }
    }
}

#[cfg(test)]
#[path = "unit_tests/campaign_tests.rs"]
mod tests;
