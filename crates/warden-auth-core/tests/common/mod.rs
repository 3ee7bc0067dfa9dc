//! Common test utilities for warden-auth-core integration tests

pub mod mock_repos;

#[allow(unused_imports)]
pub use mock_repos::{MockFamilyRepository, MockPrincipalRepository};
