//! Platform directory implementations

mod memory;

pub use memory::InMemoryDirectory;
