//! Chain Access Module
//! 
//! This module is the validator's only window onto Ethereum:
//! - Binds typed readers over minipool delegate contracts
//! - Reads plain account balances
//! 
//! The validator talks to the `ChainClient` trait, so tests can swap the
//! ethers-backed client for an in-memory one.

mod client;
mod minipool;

pub use client::{ChainClient, ChainError, MinipoolReader};
pub use minipool::{EthersChainClient, EthersMinipool, MinipoolDelegate};
