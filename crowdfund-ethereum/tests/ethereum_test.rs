// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use alloy::{
    primitives::{Address, U256},
    sol_types::SolEvent,
};
use assert_matches::assert_matches;
use crowdfund_ethereum::{
    contract::{CampaignCreated, CreateCampaignArgs},
    test_utils::{raw_campaign, ContractCall, MemoryConnector},
    ChainConnector, ChainError, EthereumConnector,
};
use test_case::test_case;

fn create_args(owner: Address, title: &str) -> CreateCampaignArgs {
    CreateCampaignArgs {
        owner,
        title: title.to_string(),
        description: "description".to_string(),
        target: U256::from(1_000u64),
        deadline: U256::from(2_000_000_000u64),
        image: "ipfs://image".to_string(),
        category: "Health".to_string(),
        website: String::new(),
        twitter: String::new(),
        linkedin: String::new(),
        documentLink: String::new(),
    }
}

#[test_case(4001, "whatever the wallet says", true; "eip_1193_code")]
#[test_case(-32000, "MetaMask Tx Signature: User denied transaction signature.", true; "user_denied")]
#[test_case(-32603, "User rejected the request.", true; "user_rejected")]
#[test_case(-32000, "execution reverted: deadline in the past", false; "reverted")]
fn rejections_are_classified(code: i64, message: &str, by_user: bool) {
    assert_matches!(
        ChainError::from_error_response(code, message),
        ChainError::TransactionRejected { by_user: b, .. } if b == by_user
    );
}

#[test]
fn insufficient_funds_is_classified() {
    assert_matches!(
        ChainError::from_error_response(-32000, "insufficient funds for gas * price + value"),
        ChainError::InsufficientFunds(_)
    );
}

#[test]
fn other_errors_are_network_errors() {
    assert_matches!(
        ChainError::from_error_response(-32005, "limit exceeded"),
        ChainError::Network(_)
    );
}

#[test]
fn invalid_node_url_is_rejected() {
    assert_matches!(
        EthereumConnector::new("not a url", None),
        Err(ChainError::UrlParseError(_))
    );
}

#[tokio::test]
async fn connector_without_signer_has_no_wallet() -> anyhow::Result<()> {
    let connector = EthereumConnector::new("http://127.0.0.1:8545", None)?;
    assert_eq!(connector.current_address().await, None);
    assert_matches!(connector.connect().await, Err(ChainError::NoWalletAvailable));
    connector.disconnect().await;
    Ok(())
}

#[tokio::test]
async fn unbound_contract_reads_are_empty() -> anyhow::Result<()> {
    let connector = EthereumConnector::new("http://127.0.0.1:1", None)?;
    assert!(connector.get_campaigns().await?.is_empty());
    assert!(connector.get_winners_by_category().await?.is_empty());
    let lists = connector.get_donators(U256::ZERO).await?;
    assert!(lists.donators.is_empty() && lists.donations.is_empty());
    Ok(())
}

#[tokio::test]
async fn memory_wallet_lifecycle() {
    let wallet = Address::repeat_byte(1);
    let connector = MemoryConnector::new().with_wallet(wallet);
    assert_eq!(connector.current_address().await, None);
    assert_eq!(connector.connect().await, Ok(wallet));
    assert_eq!(connector.current_address().await, Some(wallet));
    connector.disconnect().await;
    connector.disconnect().await;
    assert_eq!(connector.current_address().await, None);

    connector.set_reject_connection(true).await;
    assert_matches!(
        connector.connect().await,
        Err(ChainError::ConnectionRejected(_))
    );
    assert_matches!(
        MemoryConnector::new().connect().await,
        Err(ChainError::NoWalletAvailable)
    );
}

#[tokio::test]
async fn memory_contract_emits_creation_event() -> anyhow::Result<()> {
    let wallet = Address::repeat_byte(1);
    let connector = MemoryConnector::new().with_wallet(wallet);
    connector
        .insert_campaign(raw_campaign(wallet, "first", "Health"))
        .await;
    connector.connect().await?;

    let receipt = connector
        .create_campaign(create_args(wallet, "second"))
        .await?;
    assert_eq!(receipt.from, wallet);
    assert_eq!(receipt.logs.len(), 1);
    let event = CampaignCreated::decode_log_data(&receipt.logs[0].data)?;
    assert_eq!(event.campaignId, U256::from(1u8));
    assert_eq!(event.owner, wallet);
    assert_eq!(event.title, "second");
    assert_eq!(connector.get_campaigns().await?.len(), 2);
    Ok(())
}

#[tokio::test]
async fn memory_contract_records_donations() -> anyhow::Result<()> {
    let owner = Address::repeat_byte(1);
    let donor = Address::repeat_byte(2);
    let connector = MemoryConnector::new().with_wallet(donor);
    let id = connector
        .insert_campaign(raw_campaign(owner, "title", "Health"))
        .await;

    assert_matches!(
        connector
            .donate_to_campaign(U256::from(id), U256::from(5u8))
            .await,
        Err(ChainError::NotConnected)
    );

    connector.connect().await?;
    connector
        .donate_to_campaign(U256::from(id), U256::from(5u8))
        .await?;
    connector
        .donate_to_campaign(U256::from(id), U256::from(7u8))
        .await?;

    let lists = connector.get_donators(U256::from(id)).await?;
    assert_eq!(lists.donators, vec![donor, donor]);
    assert_eq!(lists.donations, vec![U256::from(5u8), U256::from(7u8)]);
    let campaign = connector.campaign(0).await.expect("campaign exists");
    assert_eq!(campaign.amountCollected, U256::from(12u8));
    assert_eq!(campaign.votes, U256::from(2u8));
    assert_eq!(connector.call_count(ContractCall::DonateToCampaign).await, 3);
    assert_eq!(connector.write_count(), 3);
    Ok(())
}

#[tokio::test]
async fn memory_contract_checks_balance() -> anyhow::Result<()> {
    let donor = Address::repeat_byte(2);
    let connector = MemoryConnector::new().with_wallet(donor);
    connector
        .insert_campaign(raw_campaign(Address::ZERO, "title", "Health"))
        .await;
    connector.connect().await?;
    connector.set_balance(U256::from(10u8)).await;

    connector
        .donate_to_campaign(U256::ZERO, U256::from(6u8))
        .await?;
    assert_matches!(
        connector
            .donate_to_campaign(U256::ZERO, U256::from(6u8))
            .await,
        Err(ChainError::InsufficientFunds(_))
    );
    assert_matches!(
        connector
            .donate_to_campaign(U256::from(9u8), U256::from(1u8))
            .await,
        Err(ChainError::TransactionRejected { by_user: false, .. })
    );
    Ok(())
}
