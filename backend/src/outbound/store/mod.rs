//! Account store adapters.

mod memory;

pub use memory::InMemoryAccountStore;
