#![forbid(unsafe_code)]
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/", env!("CARGO_PKG_README")))]

pub mod error;
pub mod manager;
mod node;
pub mod tree;

pub use error::{Error, Result};
pub use manager::KeyValueManager;
pub use tree::KeyChainTree;

#[cfg(test)]
mod proptests;
