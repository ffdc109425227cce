#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Core types shared across the cross-chain bridge.
//!
//! This crate is intentionally chain-agnostic: it holds the swap/signature/checkpoint
//! data model, the token map, and configuration plumbing (`LiteralOrEnv`, `RpcConfig`)
//! reused by both chain clients and by the bridge binary itself.
//!
//! # Modules
//!
//! - [`model`] - Swap, signature, checkpoint, and token map types
//! - [`chain`] - The `FromConfig` construction convention shared by chain clients
//! - [`config`] - RPC config and environment-variable-aware config values

pub mod chain;
pub mod config;
pub mod model;
