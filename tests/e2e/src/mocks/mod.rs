//! Test data factories for building realistic vault contents.

pub mod fixtures;

pub use fixtures::{VaultFactory, VaultScenario};
