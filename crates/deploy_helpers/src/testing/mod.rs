pub mod fixture;
pub mod local_chain;

pub use fixture::{DeployFixture, deploy_fixture, deploy_fixture_with_config};

// Re-export the in-process chain for scripts and tests that drive it directly
pub use local_chain::{DEFAULT_NETWORK, DEV_ACCOUNTS, LocalChain, link_total_supply};
