//! Result caching - key derivation and the cache contract

mod key;
mod store;

pub use key::CacheKey;
pub use store::ResultCache;

#[cfg(test)]
pub use store::mock::MockResultCache;
