// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! This module provides the data access layer of the crowdfunding application: a
//! repository answering read queries about campaigns, and a gateway validating and
//! submitting the writes.

mod error;

pub mod cache;
pub mod campaign;
pub mod client_context;
pub mod client_options;
pub mod gateway;
pub mod repository;

pub use crate::{
    campaign::{Campaign, CategoryWinner, Donation, VoteCounting},
    client_context::ClientContext,
    error::Error,
    gateway::{CampaignForm, MutationGateway},
    repository::CampaignRepository,
};
