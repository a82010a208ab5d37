pub mod dashmap_throttle_store;
pub mod hashmap_account_store;
pub mod hashmap_group_registry;

pub use dashmap_throttle_store::DashMapThrottleStore;
pub use hashmap_account_store::HashMapAccountStore;
pub use hashmap_group_registry::HashMapGroupRegistry;
