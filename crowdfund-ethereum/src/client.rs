// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use alloy::{
    network::EthereumWallet,
    primitives::{Address, Bytes, U256},
    providers::{DynProvider, Provider, ProviderBuilder},
    rpc::types::eth::{TransactionInput, TransactionReceipt as RpcReceipt, TransactionRequest},
    signers::local::PrivateKeySigner,
    sol_types::SolCall,
};
use async_lock::RwLock;
use async_trait::async_trait;
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::{
    common::{ChainError, TransactionReceipt},
    connector::ChainConnector,
    contract::{
        donateToCampaignCall, getCampaignsCall, getDonatorsCall, getWinnersByCategoryCall,
        Campaign, CategoryWinner, CreateCampaignArgs, DonatorLists,
    },
};

/// A connected wallet: its address and a provider that signs with its key.
#[derive(Debug)]
struct WalletSession {
    address: Address,
    provider: DynProvider,
}

/// Access to the crowdfunding contract through an Ethereum JSON-RPC node, signing
/// transactions with a local private key.
#[derive(Debug)]
pub struct EthereumConnector {
    url: Url,
    contract_address: Option<Address>,
    signer: Option<PrivateKeySigner>,
    expected_chain_id: Option<u64>,
    reader: DynProvider,
    session: RwLock<Option<WalletSession>>,
}

impl EthereumConnector {
    /// Creates a connector for the node at `url`. Without a `contract_address`, every read
    /// returns an empty result.
    pub fn new(url: &str, contract_address: Option<Address>) -> Result<Self, ChainError> {
        let url = Url::parse(url)?;
        let reader = ProviderBuilder::new().connect_http(url.clone()).erased();
        Ok(Self {
            url,
            contract_address,
            signer: None,
            expected_chain_id: None,
            reader,
            session: RwLock::new(None),
        })
    }

    /// Sets the key used when the wallet is connected.
    pub fn with_signer(mut self, signer: PrivateKeySigner) -> Self {
        self.signer = Some(signer);
        self
    }

    /// Makes [`ChainConnector::connect`] refuse nodes on another chain.
    pub fn with_expected_chain_id(mut self, chain_id: u64) -> Self {
        self.expected_chain_id = Some(chain_id);
        self
    }

    /// The URL of the node.
    pub fn url(&self) -> &Url {
        &self.url
    }

    async fn read<C: SolCall>(&self, call: C) -> Result<Option<C::Return>, ChainError> {
        let Some(contract_address) = self.contract_address else {
            debug!("no contract bound, returning an empty result");
            return Ok(None);
        };
        let input = TransactionInput::new(Bytes::from(call.abi_encode()));
        let tx = TransactionRequest::default()
            .to(contract_address)
            .input(input);
        let output = self.reader.call(tx).await.inspect_err(|error| {
            warn!(%error, function = C::SIGNATURE, "contract read failed");
        })?;
        Ok(Some(C::abi_decode_returns(&output)?))
    }

    async fn write(&self, input: Vec<u8>, value: U256) -> Result<TransactionReceipt, ChainError> {
        let contract_address = self.contract_address.ok_or_else(|| {
            ChainError::ConnectionRejected("no contract address configured".to_string())
        })?;
        let (from, provider) = {
            let session = self.session.read().await;
            let session = session.as_ref().ok_or(ChainError::NotConnected)?;
            (session.address, session.provider.clone())
        };
        let tx = TransactionRequest::default()
            .from(from)
            .to(contract_address)
            .input(TransactionInput::new(Bytes::from(input)))
            .value(value);
        let result = async {
            let pending = provider.send_transaction(tx).await?;
            info!(tx_hash = %pending.tx_hash(), "transaction submitted");
            Ok::<_, ChainError>(pending.get_receipt().await?)
        }
        .await;
        let receipt = result.inspect_err(|error| warn!(%error, "transaction failed"))?;
        convert_receipt(receipt)
    }
}

fn convert_receipt(receipt: RpcReceipt) -> Result<TransactionReceipt, ChainError> {
    if !receipt.status() {
        return Err(ChainError::TransactionRejected {
            by_user: false,
            reason: format!("transaction {} reverted", receipt.transaction_hash),
        });
    }
    Ok(TransactionReceipt {
        transaction_hash: receipt.transaction_hash,
        block_number: receipt.block_number,
        from: receipt.from,
        logs: receipt
            .inner
            .logs()
            .iter()
            .map(|log| log.inner.clone())
            .collect(),
    })
}

#[async_trait]
impl ChainConnector for EthereumConnector {
    async fn current_address(&self) -> Option<Address> {
        self.session.read().await.as_ref().map(|session| session.address)
    }

    #[instrument(skip(self), fields(url = %self.url))]
    async fn connect(&self) -> Result<Address, ChainError> {
        let signer = self.signer.clone().ok_or(ChainError::NoWalletAvailable)?;
        let address = signer.address();
        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::from(signer))
            .connect_http(self.url.clone())
            .erased();
        let chain_id = provider.get_chain_id().await?;
        if let Some(expected) = self.expected_chain_id {
            if chain_id != expected {
                return Err(ChainError::ConnectionRejected(format!(
                    "node is on chain {chain_id}, expected chain {expected}"
                )));
            }
        }
        *self.session.write().await = Some(WalletSession { address, provider });
        info!(%address, chain_id, "wallet connected");
        Ok(address)
    }

    async fn disconnect(&self) {
        if let Some(session) = self.session.write().await.take() {
            info!(address = %session.address, "wallet disconnected");
        }
    }

    #[instrument(skip(self))]
    async fn get_campaigns(&self) -> Result<Vec<Campaign>, ChainError> {
        let campaigns = self.read(getCampaignsCall {}).await?.unwrap_or_default();
        debug!(count = campaigns.len(), "fetched campaigns");
        Ok(campaigns)
    }

    #[instrument(skip(self))]
    async fn get_donators(&self, campaign_id: U256) -> Result<DonatorLists, ChainError> {
        Ok(self
            .read(getDonatorsCall { id: campaign_id })
            .await?
            .unwrap_or(DonatorLists {
                donators: Vec::new(),
                donations: Vec::new(),
            }))
    }

    #[instrument(skip(self))]
    async fn get_winners_by_category(&self) -> Result<Vec<CategoryWinner>, ChainError> {
        Ok(self
            .read(getWinnersByCategoryCall {})
            .await?
            .unwrap_or_default())
    }

    #[instrument(skip_all, fields(title = %args.title))]
    async fn create_campaign(
        &self,
        args: CreateCampaignArgs,
    ) -> Result<TransactionReceipt, ChainError> {
        self.write(args.abi_encode(), U256::ZERO).await
    }

    #[instrument(skip(self))]
    async fn donate_to_campaign(
        &self,
        campaign_id: U256,
        value: U256,
    ) -> Result<TransactionReceipt, ChainError> {
        self.write(donateToCampaignCall { id: campaign_id }.abi_encode(), value)
            .await
    }
}
