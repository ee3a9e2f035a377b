// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::process;

use anyhow::{bail, Context as _};
use clap::Parser as _;
use crowdfund_base::{data_types::Timestamp, time::days_left, CATEGORIES};
use crowdfund_client::{
    client_options::{ClientCommand, ClientOptions},
    Campaign, CampaignForm, ClientContext,
};
use serde::Serialize;
use tracing::{info, Instrument as _};

/// A campaign together with the values derived from it for display.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CampaignView {
    #[serde(flatten)]
    campaign: Campaign,
    progress_percentage: Option<u64>,
    days_left: String,
}

impl CampaignView {
    fn new(campaign: Campaign, now: Timestamp) -> Self {
        // Campaigns with a zero target have no meaningful progress.
        let progress_percentage = campaign.progress_percentage().ok();
        let days_left = days_left(campaign.deadline, now);
        CampaignView {
            campaign,
            progress_percentage,
            days_left,
        }
    }
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run(options: &ClientOptions) -> anyhow::Result<()> {
    let context = options.create_context()?;

    use ClientCommand::*;
    match &options.command {
        List => print_json(&context.repository().list_all().await?)?,

        Ongoing => print_json(&context.repository().list_ongoing().await?)?,

        Mine => {
            let owner = context.connect().await?;
            print_json(&context.repository().list_by_owner(owner).await?)?;
        }

        Owner { address } => print_json(&context.repository().list_by_owner(*address).await?)?,

        Category { category } => {
            print_json(&context.repository().list_by_category(category).await?)?
        }

        Show { campaign_id } => {
            let campaign = context
                .repository()
                .get(*campaign_id)
                .await?
                .with_context(|| format!("campaign {campaign_id} does not exist"))?;
            print_json(&CampaignView::new(campaign, Timestamp::now()))?;
        }

        Donators { campaign_id } => {
            print_json(&context.repository().list_donators(*campaign_id).await?)?
        }

        TotalVotes => print_json(&context.repository().total_votes().await?)?,

        Categories => print_json(&CATEGORIES)?,

        Winners => print_json(&context.repository().list_winners().await?)?,

        Create {
            title,
            description,
            target,
            deadline,
            image,
            category,
            website,
            twitter,
            linkedin,
            document_link,
        } => {
            if !CATEGORIES.contains(&category.as_str()) {
                bail!(
                    "unknown category `{category}`; expected one of: {}",
                    CATEGORIES.join(", ")
                );
            }
            context.connect().await?;
            let form = CampaignForm {
                title: title.clone(),
                description: description.clone(),
                target: target.clone(),
                deadline: *deadline,
                image: image.clone(),
                category: category.clone(),
                website: website.clone(),
                twitter: twitter.clone(),
                linkedin: linkedin.clone(),
                document_link: document_link.clone(),
            };
            let campaign_id = context.gateway().create_campaign(form).await?;
            info!("Campaign {campaign_id} created");
            print_json(&serde_json::json!({ "campaignId": campaign_id }))?;
        }

        Donate {
            campaign_id,
            amount,
        } => {
            context.connect().await?;
            let receipt = context.gateway().donate(*campaign_id, amount).await?;
            info!("Donated {amount} to campaign {campaign_id}");
            print_json(&receipt)?;
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let options = ClientOptions::parse();

    crowdfund_base::tracing::init("crowdfund");

    let span = tracing::info_span!("crowdfund::main");
    let result = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run(&options).instrument(span));

    if let Err(error) = result {
        tracing::error!("Error is {:?}", error);
        process::exit(2);
    }
    Ok(())
}
