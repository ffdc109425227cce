#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Chain-A client: the EVM side of the bridge.
//!
//! Talks to a deployed multisig wallet contract that holds locked funds and
//! gates B→A releases behind M-of-N confirmations. Each process instantiates
//! exactly one [`client::EvmChainClient`], bound to the signer key identifying
//! it among the wallet's owners.

pub mod client;
pub mod config;
pub mod erc20;
pub mod types;

pub use client::{EvmChainClient, EvmClientError};
pub use config::EvmChainConfig;
