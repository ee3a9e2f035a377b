// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use alloy::primitives::{Address, U256};
use assert_matches::assert_matches;
use crowdfund_base::{
    data_types::{Amount, ParseAmountError, Timestamp},
    time::TestClock,
};
use crowdfund_client::{
    cache::SnapshotCache, CampaignForm, CampaignRepository, ClientContext, Error,
    MutationGateway, VoteCounting,
};
use crowdfund_ethereum::{
    test_utils::{raw_campaign, ContractCall, MemoryConnector},
    ChainConnector as _, ChainError,
};
use test_case::test_case;

const OWNER: Address = Address::repeat_byte(0x11);
const NOW: Timestamp = Timestamp::from_seconds(1_700_000_000);

fn form(target: &str) -> CampaignForm {
    CampaignForm {
        title: "Reforest the valley".to_string(),
        description: "Ten thousand trees".to_string(),
        target: target.to_string(),
        deadline: NOW.saturating_add_millis(30 * 24 * 3600 * 1000),
        image: "https://example.org/trees.png".to_string(),
        category: "Environment".to_string(),
        website: Some("https://example.org".to_string()),
        ..CampaignForm::default()
    }
}

async fn connected() -> (Arc<MemoryConnector>, TestClock) {
    let connector = Arc::new(MemoryConnector::new().with_wallet(OWNER));
    connector.connect().await.unwrap();
    let clock = TestClock::new();
    clock.set(NOW);
    (connector, clock)
}

fn gateway(connector: &Arc<MemoryConnector>, clock: &TestClock) -> MutationGateway {
    MutationGateway::new(connector.clone(), Arc::new(clock.clone()))
}

#[tokio::test]
async fn creates_a_campaign() {
    let (connector, clock) = connected().await;
    connector
        .insert_campaign(raw_campaign(Address::repeat_byte(0x22), "Existing", "Health"))
        .await;

    let campaign_id = gateway(&connector, &clock)
        .create_campaign(form("12.5"))
        .await
        .unwrap();
    assert_eq!(campaign_id, 1);
    assert_eq!(connector.write_count(), 1);

    let record = connector.campaign(1).await.unwrap();
    assert_eq!(record.owner, OWNER);
    assert_eq!(record.target, Amount::from_millis(12_500).wei());
    assert_eq!(record.deadline, U256::from(NOW.seconds() + 30 * 24 * 3600));
    assert_eq!(record.website, "https://example.org");
    assert_eq!(record.twitter, "");
    assert_eq!(record.amountCollected, U256::ZERO);

    let campaign = CampaignRepository::new(connector.clone(), Arc::new(clock))
        .get(campaign_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(campaign.title, "Reforest the valley");
    assert_eq!(campaign.target.to_string(), "12.5");
}

#[test_case("0", ParseAmountError::NotPositive; "zero")]
#[test_case("-1", ParseAmountError::NotPositive; "negative")]
#[test_case("", ParseAmountError::Parse; "empty")]
#[test_case("ten", ParseAmountError::Parse; "not_a_number")]
#[test_case("0.0000000000000000001", ParseAmountError::TooManyDigits; "below_one_wei")]
#[tokio::test]
async fn invalid_targets_are_never_sent(target: &str, expected: ParseAmountError) {
    let (connector, clock) = connected().await;
    assert_matches!(
        gateway(&connector, &clock).create_campaign(form(target)).await,
        Err(Error::InvalidAmount(error)) if error == expected
    );
    assert_eq!(connector.write_count(), 0);
}

#[tokio::test]
async fn creation_requires_a_connected_wallet() {
    let connector = Arc::new(MemoryConnector::new().with_wallet(OWNER));
    let clock = TestClock::new();
    clock.set(NOW);
    assert_matches!(
        gateway(&connector, &clock).create_campaign(form("1")).await,
        Err(Error::NotConnected)
    );
    assert_eq!(connector.write_count(), 0);
}

#[test_case(0; "now")]
#[test_case(1; "one_millisecond_ago")]
#[tokio::test]
async fn past_deadlines_are_rejected(millis_ago: u64) {
    let (connector, clock) = connected().await;
    let mut form = form("1");
    form.deadline = NOW.saturating_sub_millis(millis_ago);
    assert_matches!(
        gateway(&connector, &clock).create_campaign(form).await,
        Err(Error::InvalidDeadline { deadline, now }) if now == NOW && deadline <= NOW
    );
    assert_eq!(connector.write_count(), 0);
}

#[tokio::test]
async fn deadlines_within_the_current_second_are_rejected() {
    let (connector, clock) = connected().await;
    clock.set(NOW.saturating_add_millis(200));
    let mut form = form("1");
    form.deadline = NOW.saturating_add_millis(900);
    assert_matches!(
        gateway(&connector, &clock).create_campaign(form.clone()).await,
        Err(Error::InvalidDeadline { .. })
    );
    assert_eq!(connector.write_count(), 0);

    form.deadline = NOW.saturating_add_millis(1_000);
    gateway(&connector, &clock).create_campaign(form).await.unwrap();
    assert_eq!(
        connector.campaign(0).await.unwrap().deadline,
        U256::from(NOW.seconds() + 1)
    );
}

#[tokio::test]
async fn missing_creation_event_is_reported() {
    let (connector, clock) = connected().await;
    connector.set_omit_events(true).await;
    assert_matches!(
        gateway(&connector, &clock).create_campaign(form("1")).await,
        Err(Error::EventNotFound(_))
    );
    // The transaction itself went through.
    assert_eq!(connector.write_count(), 1);
    assert!(connector.campaign(0).await.is_some());
}

#[tokio::test]
async fn donations_are_recorded() {
    let (connector, clock) = connected().await;
    connector
        .insert_campaign(raw_campaign(OWNER, "Campaign", "Health"))
        .await;
    let gateway = gateway(&connector, &clock);

    let receipt = gateway.donate(0, "0.25").await.unwrap();
    assert_eq!(receipt.from, OWNER);
    gateway.donate(0, "1").await.unwrap();

    let repository = CampaignRepository::new(connector.clone(), Arc::new(clock));
    let donations = repository.list_donators(0).await.unwrap();
    let amounts = donations
        .iter()
        .map(|donation| donation.donation.to_string())
        .collect::<Vec<_>>();
    assert_eq!(amounts, ["0.25", "1.0"]);
    let campaign = repository.get(0).await.unwrap().unwrap();
    assert_eq!(campaign.amount_collected, Amount::from_millis(1_250));
    assert_eq!(campaign.votes, 2);
    assert_eq!(connector.call_count(ContractCall::DonateToCampaign).await, 2);
}

#[test_case("0"; "zero")]
#[test_case("abc"; "not_a_number")]
#[tokio::test]
async fn invalid_donations_are_never_sent(amount: &str) {
    let (connector, clock) = connected().await;
    connector
        .insert_campaign(raw_campaign(OWNER, "Campaign", "Health"))
        .await;
    assert_matches!(
        gateway(&connector, &clock).donate(0, amount).await,
        Err(Error::InvalidAmount(_))
    );
    assert_eq!(connector.write_count(), 0);
}

#[tokio::test]
async fn donation_requires_a_connected_wallet() {
    let connector = Arc::new(MemoryConnector::new());
    connector
        .insert_campaign(raw_campaign(OWNER, "Campaign", "Health"))
        .await;
    assert_matches!(
        gateway(&connector, &TestClock::new()).donate(0, "1").await,
        Err(Error::NotConnected)
    );
    assert_eq!(connector.write_count(), 0);
}

#[tokio::test]
async fn chain_failures_pass_through() {
    let (connector, clock) = connected().await;
    connector
        .insert_campaign(raw_campaign(OWNER, "Campaign", "Health"))
        .await;
    connector.set_balance(Amount::ONE.wei()).await;
    let gateway = gateway(&connector, &clock);

    assert_matches!(
        gateway.donate(0, "2").await,
        Err(Error::InsufficientFunds(_))
    );
    assert_matches!(
        gateway.donate(7, "0.5").await,
        Err(error @ Error::TransactionRejected { by_user: false, .. })
            if !error.is_user_rejection()
    );

    connector
        .fail_next_write(ChainError::from_error_response(4001, "User rejected the request."))
        .await;
    let error = gateway.donate(0, "0.5").await.unwrap_err();
    assert!(error.is_user_rejection());

    connector
        .fail_next_write(ChainError::Network("connection reset".to_string()))
        .await;
    assert_matches!(
        gateway.create_campaign(form("1")).await,
        Err(Error::NetworkError(_))
    );

    // Nothing was retried and nothing was recorded.
    assert_eq!(connector.write_count(), 4);
    assert_eq!(connector.campaign(0).await.unwrap().donators, Vec::<Address>::new());
}

#[tokio::test]
async fn writes_invalidate_the_snapshot() {
    let (connector, clock) = connected().await;
    connector
        .insert_campaign(raw_campaign(OWNER, "Campaign", "Health"))
        .await;
    let cache = Arc::new(SnapshotCache::new(60_000, Arc::new(clock.clone())));
    let repository =
        CampaignRepository::new(connector.clone(), Arc::new(clock.clone())).with_cache(cache.clone());
    let gateway = gateway(&connector, &clock).with_cache(cache);

    assert_eq!(repository.total_votes().await.unwrap(), 0);
    gateway.donate(0, "1").await.unwrap();
    assert_eq!(repository.total_votes().await.unwrap(), 1);
    assert_eq!(connector.call_count(ContractCall::GetCampaigns).await, 2);
}

#[tokio::test]
async fn context_session_lifecycle() {
    let connector = Arc::new(MemoryConnector::new().with_wallet(OWNER));
    let clock = TestClock::new();
    clock.set(NOW);
    let context = ClientContext::new(
        connector.clone(),
        Arc::new(clock),
        VoteCounting::PerDonation,
        Some(60_000),
    );
    assert_eq!(context.current_address().await, None);

    connector.set_reject_connection(true).await;
    let error = context.connect().await.unwrap_err();
    assert_matches!(error, Error::ConnectionRejected(_));
    assert!(error.is_user_rejection());

    connector.set_reject_connection(false).await;
    assert_eq!(context.connect().await.unwrap(), OWNER);
    let campaign_id = context.gateway().create_campaign(form("3")).await.unwrap();
    let mine = context.repository().list_by_owner(OWNER).await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].id, campaign_id);

    context.disconnect().await;
    assert_matches!(
        context.gateway().donate(campaign_id, "1").await,
        Err(Error::NotConnected)
    );
}

#[tokio::test]
async fn unavailable_wallet_is_reported() {
    let context = ClientContext::new(
        Arc::new(MemoryConnector::new()),
        Arc::new(TestClock::new()),
        VoteCounting::default(),
        None,
    );
    assert_matches!(context.connect().await, Err(Error::NoWalletAvailable));
}
