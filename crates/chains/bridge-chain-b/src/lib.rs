#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Chain-B client: the confidential-contract side of the bridge.
//!
//! Reads (swap/burn queries) go over JSON-RPC via [`client::ChainBClient`].
//! Writes (signing, multisig assembly, broadcast) are delegated to an
//! external CLI binary via [`cli_tool::CliTool`] — chain B never has its
//! signing key held in this process's memory.

pub mod client;
pub mod cli_tool;
pub mod config;
pub mod types;

pub use client::ChainBClient;
pub use cli_tool::{CliTool, CliToolError};
pub use config::ChainBConfig;
