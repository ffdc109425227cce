use alloy_network::{EthereumWallet, TransactionBuilder};
use alloy_primitives::{Address, B256, Bytes, Signature, U256, keccak256};
use alloy_provider::fillers::{
    BlobGasFiller, ChainIdFiller, FillProvider, GasFiller, JoinFill, NonceFiller, WalletFiller,
};
use alloy_provider::{Identity, Provider, ProviderBuilder, RootProvider};
use alloy_rpc_client::RpcClient;
use alloy_rpc_types_eth::{BlockId, Filter, Log, TransactionReceipt, TransactionRequest};
use alloy_signer::Signer;
use alloy_signer_local::PrivateKeySigner;
use alloy_sol_types::{SolCall, SolEvent};
use alloy_transport::TransportError;
use alloy_transport::layers::{FallbackLayer, ThrottleLayer};
use alloy_transport_http::Http;
use std::num::NonZeroUsize;
use std::str::FromStr;
use tower::ServiceBuilder;

use bridge_types::chain::FromConfig;
use bridge_types::config::RpcConfig;

use crate::config::EvmChainConfig;
use crate::erc20::{IERC20, IMultiSigWallet};

/// Combined filler type for gas, blob gas, nonce, and chain ID.
pub type InnerFiller =
    JoinFill<GasFiller, JoinFill<BlobGasFiller, JoinFill<NonceFiller, ChainIdFiller>>>;

/// The fully composed Ethereum provider type used by the bridge.
pub type InnerProvider = FillProvider<
    JoinFill<JoinFill<Identity, InnerFiller>, WalletFiller<EthereumWallet>>,
    RootProvider,
>;

/// Chain-A (EVM) client: wraps a signing provider bound to exactly one signer
/// key, the one identifying this process among the multisig wallet's owners.
#[derive(Debug)]
pub struct EvmChainClient {
    chain_id: u64,
    eip1559: bool,
    receipt_timeout_secs: u64,
    confirmations: u64,
    multisig_address: Address,
    address: Address,
    signer: PrivateKeySigner,
    inner: InnerProvider,
}

#[derive(Debug, thiserror::Error)]
pub enum EvmClientError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    PendingTransaction(#[from] alloy_provider::PendingTransactionError),
    #[error("invalid multisig address: {0}")]
    InvalidAddress(String),
    #[error("invalid signer key: {0}")]
    InvalidSigner(String),
    #[error("no usable RPC transport configured")]
    NoTransport,
    #[error("contract call reverted: {0}")]
    Revert(String),
}

impl EvmClientError {
    /// Whether retrying the same operation stands a reasonable chance of succeeding.
    pub fn is_retriable(&self) -> bool {
        matches!(
            self,
            EvmClientError::Transport(_) | EvmClientError::PendingTransaction(_)
        )
    }

    pub fn is_fatal(&self) -> bool {
        !self.is_retriable()
    }
}

impl EvmChainClient {
    fn rpc_client(rpc: &[RpcConfig]) -> Result<RpcClient, EvmClientError> {
        let transports = rpc
            .iter()
            .filter_map(|provider_config| {
                let scheme = provider_config.http.scheme();
                if scheme != "http" && scheme != "https" {
                    return None;
                }
                let rate_limit = provider_config.rate_limit.unwrap_or(u32::MAX);
                let service = ServiceBuilder::new()
                    .layer(ThrottleLayer::new(rate_limit))
                    .service(Http::new(provider_config.http.clone()));
                Some(service)
            })
            .collect::<Vec<_>>();
        let count = NonZeroUsize::new(transports.len()).ok_or(EvmClientError::NoTransport)?;
        let fallback = ServiceBuilder::new()
            .layer(FallbackLayer::default().with_active_transport_count(count))
            .service(transports);
        Ok(RpcClient::new(fallback, false))
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn multisig_address(&self) -> Address {
        self.multisig_address
    }

    /// Fetch `Submission` logs on the multisig wallet in a block range: new
    /// A→B locks for `EventStream`/`SignerA` to validate, and new B→A
    /// broadcasts for `LeaderA` to watch for quorum.
    pub async fn fetch_submissions(
        &self,
        from_block: u64,
        to_block: u64,
    ) -> Result<Vec<Log>, EvmClientError> {
        let filter = Filter::new()
            .address(self.multisig_address)
            .event_signature(IMultiSigWallet::Submission::SIGNATURE_HASH)
            .from_block(from_block)
            .to_block(to_block);
        Ok(self.inner.get_logs(&filter).await?)
    }

    pub async fn latest_block(&self) -> Result<u64, EvmClientError> {
        Ok(self.inner.get_block_number().await?)
    }

    /// Reads a submitted transaction's `(destination, value, data, executed)`
    /// tuple from the multisig wallet.
    pub async fn get_transaction(
        &self,
        transaction_id: U256,
    ) -> Result<(Address, U256, Bytes, bool), EvmClientError> {
        let call = IMultiSigWallet::transactionsCall { transactionId: transaction_id };
        let txr = TransactionRequest::default()
            .with_to(self.multisig_address)
            .with_input(Bytes::from(call.abi_encode()));
        let raw = self.inner.call(txr).await?;
        let decoded = IMultiSigWallet::transactionsCall::abi_decode_returns(&raw)
            .map_err(|e| EvmClientError::Revert(e.to_string()))?;
        Ok((
            decoded.destination,
            decoded.value,
            decoded.data,
            decoded.executed,
        ))
    }

    /// Whether `owner` has already confirmed `transaction_id` — used to avoid
    /// a redundant (and gas-wasting) re-confirmation.
    pub async fn has_confirmed(
        &self,
        transaction_id: U256,
        owner: Address,
    ) -> Result<bool, EvmClientError> {
        let call = IMultiSigWallet::confirmationsCall {
            transactionId: transaction_id,
            owner,
        };
        let txr = TransactionRequest::default()
            .with_to(self.multisig_address)
            .with_input(Bytes::from(call.abi_encode()));
        let raw = self.inner.call(txr).await?;
        let decoded = IMultiSigWallet::confirmationsCall::abi_decode_returns(&raw)
            .map_err(|e| EvmClientError::Revert(e.to_string()))?;
        Ok(decoded)
    }

    /// Whether `transaction_id` has reached its on-chain confirmation quorum,
    /// the signal `LeaderA` waits on before minting the B-side counterpart.
    pub async fn is_confirmed(&self, transaction_id: U256) -> Result<bool, EvmClientError> {
        let call = IMultiSigWallet::isConfirmedCall { transactionId: transaction_id };
        let txr = TransactionRequest::default()
            .with_to(self.multisig_address)
            .with_input(Bytes::from(call.abi_encode()));
        let raw = self.inner.call(txr).await?;
        let decoded = IMultiSigWallet::isConfirmedCall::abi_decode_returns(&raw)
            .map_err(|e| EvmClientError::Revert(e.to_string()))?;
        Ok(decoded)
    }

    /// Decodes an ERC-20 `transfer(recipient, amount)` call, as embedded in a
    /// token-bridge multisig submission's `data` field.
    pub fn decode_erc20_transfer(data: &Bytes) -> Option<(Address, U256)> {
        let decoded = IERC20::transferCall::abi_decode(data).ok()?;
        Some((decoded.recipient, decoded.amount))
    }

    /// ABI-encodes a would-be `submitTransaction` call. Used both to submit it
    /// directly and, for the B→A pipeline, as the exact byte string each
    /// signer signs off-chain before the leader broadcasts it.
    pub fn encode_release_payload(destination: Address, value: U256, data: &Bytes) -> Bytes {
        let call = IMultiSigWallet::submitTransactionCall {
            destination,
            value,
            data: data.clone(),
        };
        Bytes::from(call.abi_encode())
    }

    /// Decodes a previously-encoded release payload back into its call arguments.
    pub fn decode_release_payload(payload: &Bytes) -> Result<(Address, U256, Bytes), EvmClientError> {
        let decoded = IMultiSigWallet::submitTransactionCall::abi_decode(payload)
            .map_err(|e| EvmClientError::Revert(e.to_string()))?;
        Ok((decoded.destination, decoded.value, decoded.data))
    }

    /// Signs a B→A release payload with this process's chain-A key. The
    /// signature is over the payload's raw keccak256 hash, not a full
    /// transaction — each signer signs the same payload independently, and
    /// the leader later checks the recovered addresses before broadcasting.
    pub async fn sign_payload(&self, payload: &Bytes) -> Result<Bytes, EvmClientError> {
        let hash = keccak256(payload);
        let signature = self
            .signer
            .sign_hash(&hash)
            .await
            .map_err(|e| EvmClientError::InvalidSigner(e.to_string()))?;
        Ok(Bytes::from(signature.as_bytes().to_vec()))
    }

    /// Recovers the address that produced `signature` over `payload`, without
    /// needing a live signer — used by the leader to verify collected
    /// signatures before assembling and broadcasting a release.
    pub fn recover_payload_signer(
        payload: &Bytes,
        signature: &Bytes,
    ) -> Result<Address, EvmClientError> {
        let hash = keccak256(payload);
        let sig = Signature::from_raw(signature)
            .map_err(|e| EvmClientError::Revert(e.to_string()))?;
        sig.recover_address_from_prehash(&hash)
            .map_err(|e| EvmClientError::Revert(e.to_string()))
    }

    /// Submit a new B→A release transaction to the multisig wallet, returning the
    /// assigned transaction id once the submission is mined.
    pub async fn submit_release(
        &self,
        destination: Address,
        value: U256,
        data: Bytes,
    ) -> Result<TransactionReceipt, EvmClientError> {
        let call = IMultiSigWallet::submitTransactionCall {
            destination,
            value,
            data,
        };
        self.send_call(self.multisig_address, call.into()).await
    }

    /// Add this signer's confirmation to an already-submitted release transaction.
    pub async fn confirm_release(
        &self,
        transaction_id: U256,
    ) -> Result<TransactionReceipt, EvmClientError> {
        let call = IMultiSigWallet::confirmTransactionCall { transactionId: transaction_id };
        self.send_call(self.multisig_address, call.into()).await
    }

    async fn send_call(&self, to: Address, calldata: Bytes) -> Result<TransactionReceipt, EvmClientError> {
        let mut txr = TransactionRequest::default()
            .with_to(to)
            .with_from(self.address)
            .with_input(calldata);

        if !self.eip1559 {
            let gas = self.inner.get_gas_price().await?;
            txr.set_gas_price(gas);
        }
        if txr.gas.is_none() {
            let gas_limit = self
                .inner
                .estimate_gas(txr.clone())
                .block(BlockId::pending())
                .await?;
            txr.set_gas_limit(gas_limit);
        }

        let pending_tx = self.inner.send_transaction(txr).await?;
        let timeout = std::time::Duration::from_secs(self.receipt_timeout_secs);
        let watcher = pending_tx
            .with_required_confirmations(self.confirmations)
            .with_timeout(Some(timeout));
        Ok(watcher.get_receipt().await?)
    }
}

#[async_trait::async_trait]
impl FromConfig<EvmChainConfig> for EvmChainClient {
    type Error = EvmClientError;

    async fn from_config(config: &EvmChainConfig) -> Result<Self, Self::Error> {
        let key_bytes = B256::from_slice(config.signer.inner().as_bytes());
        let signer = PrivateKeySigner::from_bytes(&key_bytes)
            .map_err(|e| EvmClientError::InvalidSigner(e.to_string()))?
            .with_chain_id(Some(config.chain_id));
        let address = signer.address();
        let wallet = EthereumWallet::from(signer.clone());

        let multisig_address = Address::from_str(&config.multisig_address)
            .map_err(|e| EvmClientError::InvalidAddress(e.to_string()))?;

        let client = Self::rpc_client(&config.rpc)?;
        let filler = JoinFill::new(
            GasFiller,
            JoinFill::new(
                BlobGasFiller::default(),
                JoinFill::new(NonceFiller::default(), ChainIdFiller::default()),
            ),
        );
        let inner: InnerProvider = ProviderBuilder::default()
            .filler(filler)
            .wallet(wallet)
            .connect_client(client);

        tracing::info!(chain_id = config.chain_id, signer = %address, "chain-a client ready");

        Ok(Self {
            chain_id: config.chain_id,
            eip1559: config.eip1559,
            receipt_timeout_secs: config.receipt_timeout_secs,
            confirmations: config.confirmations,
            multisig_address,
            address,
            signer,
            inner,
        })
    }
}
