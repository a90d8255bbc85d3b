//! Coursenft - IPFS metadata client for NFT-gated yoga courses
//!
//! This library crate exposes the metadata pipeline and its configuration.

pub mod config;
pub mod metadata;
