//! Mock contract types and the logical names deployment scripts use for them.
//!
//! Every dependency a deployment script can ask for by name maps to exactly one
//! mock [`ContractType`]. On local networks that mock is deployed in place of the
//! live dependency; on every other network its ABI is used to wrap the configured
//! live address.

use serde::{Deserialize, Serialize};
use snafu::{ResultExt, Snafu};
use std::fmt::{Display, Formatter, Result as FmtResult};

#[derive(Debug, Snafu)]
pub enum ContractAbiError {
    #[snafu(display("Failed to parse ABI for {contract}: {source}"))]
    AbiParse {
        contract: String,
        source: serde_json::Error,
    },
}

/// The mock contracts that stand in for live dependencies on local networks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContractType {
    /// Chainlink price feed aggregator mock
    MockV3Aggregator,
    /// Chainlink VRF coordinator mock
    VRFCoordinatorMock,
    /// ERC-677 LINK token
    LinkToken,
}

impl ContractType {
    /// All mock types, in the order
    /// [`deploy_mocks`](crate::ContractManager::deploy_mocks) deploys them.
    pub const ALL: [ContractType; 3] = [
        ContractType::MockV3Aggregator,
        ContractType::LinkToken,
        ContractType::VRFCoordinatorMock,
    ];

    /// The contract name as known to the chain framework
    pub fn name(&self) -> &'static str {
        match self {
            ContractType::MockV3Aggregator => "MockV3Aggregator",
            ContractType::VRFCoordinatorMock => "VRFCoordinatorMock",
            ContractType::LinkToken => "LinkToken",
        }
    }

    pub fn abi_json(&self) -> &'static str {
        match self {
            ContractType::MockV3Aggregator => mock_artifacts::mock_v3_aggregator::ABI,
            ContractType::VRFCoordinatorMock => mock_artifacts::vrf_coordinator_mock::ABI,
            ContractType::LinkToken => mock_artifacts::link_token::ABI,
        }
    }

    /// Parse the interface description bundled for this contract.
    pub fn abi(&self) -> Result<ContractAbi, ContractAbiError> {
        ContractAbi::from_json(self.name(), self.abi_json())
    }
}

impl Display for ContractType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.name())
    }
}

/// The fixed set of dependency names deployment scripts resolve contracts by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalContract {
    EthUsdPriceFeed,
    VrfCoordinator,
    LinkToken,
}

impl LogicalContract {
    pub const ALL: [LogicalContract; 3] = [
        LogicalContract::EthUsdPriceFeed,
        LogicalContract::VrfCoordinator,
        LogicalContract::LinkToken,
    ];

    /// The name used for this dependency in network configuration
    pub fn as_str(&self) -> &'static str {
        match self {
            LogicalContract::EthUsdPriceFeed => "eth_usd_price_feed",
            LogicalContract::VrfCoordinator => "vrf_coordinator",
            LogicalContract::LinkToken => "link_token",
        }
    }

    /// Look up a dependency by its configuration name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == name)
    }

    /// The mock deployed for this dependency on local networks
    pub fn contract_type(&self) -> ContractType {
        match self {
            LogicalContract::EthUsdPriceFeed => ContractType::MockV3Aggregator,
            LogicalContract::VrfCoordinator => ContractType::VRFCoordinatorMock,
            LogicalContract::LinkToken => ContractType::LinkToken,
        }
    }
}

impl Display for LogicalContract {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// A single parameter of an ABI constructor, function or event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbiParam {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// A single entry of a Solidity JSON ABI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbiItem {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub inputs: Vec<AbiParam>,
}

/// The interface description attached to a contract handle.
///
/// Only the shape of the interface is kept: which functions exist and how many
/// arguments they take. Encoding calls against it is left to the chain framework.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContractAbi(Vec<AbiItem>);

impl ContractAbi {
    pub fn from_json(contract: &str, json: &str) -> Result<Self, ContractAbiError> {
        serde_json::from_str(json).context(AbiParseSnafu { contract })
    }

    pub fn items(&self) -> &[AbiItem] {
        &self.0
    }

    /// Constructor parameters, empty when the ABI declares no constructor.
    pub fn constructor_inputs(&self) -> &[AbiParam] {
        self.0
            .iter()
            .find(|item| item.kind == "constructor")
            .map(|item| item.inputs.as_slice())
            .unwrap_or_default()
    }

    pub fn function(&self, name: &str) -> Option<&AbiItem> {
        self.0
            .iter()
            .find(|item| item.kind == "function" && item.name.as_deref() == Some(name))
    }

    pub fn has_function(&self, name: &str) -> bool {
        self.function(name).is_some()
    }
}
