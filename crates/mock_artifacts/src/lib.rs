//! # Mock Artifacts
//!
//! Interface descriptions of the mock contracts that stand in for live
//! dependencies on local networks.
//!
//! Each contract has its own folder under `contracts/` named after the
//! contract, containing an `abi.json` file in the standard Solidity JSON ABI
//! format.

/// Chainlink `MockV3Aggregator` artifacts
pub mod mock_v3_aggregator {
    /// Mock price feed aggregator ABI
    ///
    /// Constructed with the feed decimals and an initial answer.
    pub const ABI: &str = include_str!("../contracts/mock_v3_aggregator/abi.json");
}

/// Chainlink `VRFCoordinatorMock` artifacts
pub mod vrf_coordinator_mock {
    /// Mock randomness coordinator ABI
    ///
    /// Constructed with the address of the LINK token it accepts fees in.
    pub const ABI: &str = include_str!("../contracts/vrf_coordinator_mock/abi.json");
}

/// Chainlink `LinkToken` artifacts
pub mod link_token {
    /// ERC-677 LINK token ABI
    pub const ABI: &str = include_str!("../contracts/link_token/abi.json");
}
