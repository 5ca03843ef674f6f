//! Snapshot provider implementations

pub mod dexscreener;

pub use dexscreener::DexScreenerProvider;
