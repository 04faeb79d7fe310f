use std::sync::Arc;

use alloy_primitives::U256;
use log::{debug, info};
use snafu::Snafu;

use crate::clients::account_manager::{AccountManager, AccountManagerError};
use crate::clients::environment::{CallArg, ChainEnvironment, ContractHandle, EnvironmentError};
use crate::config::{ConfigError, DeployConfig};
use crate::contracts::{ContractAbiError, ContractType, LogicalContract};
use crate::events::{Config, EventData, EventType, MocksDeployedEventData};

/// Decimals of the mock price feed
pub const DECIMALS: u8 = 8;
/// Initial answer of the mock price feed (2,000 with 8 decimals)
pub const INITIAL_VALUE: i128 = 200_000_000_000;

#[derive(Debug, Snafu)]
pub enum ContractManagerError {
    #[snafu(display("Unknown contract name: {name}"))]
    UnknownContract { name: String },
    #[snafu(display("Contract config error: {source}"))]
    Config { source: ConfigError },
    #[snafu(display("Contract ABI error: {source}"))]
    Abi { source: ContractAbiError },
    #[snafu(display("Account error: {source}"))]
    Account { source: AccountManagerError },
    #[snafu(display("Deployment error: {source}"))]
    Environment { source: EnvironmentError },
    #[snafu(display("No {contract_type} deployed on {network} after deploying mocks"))]
    MockMissing {
        contract_type: ContractType,
        network: String,
    },
}

impl From<ConfigError> for ContractManagerError {
    fn from(e: ConfigError) -> Self {
        Self::Config { source: e }
    }
}

impl From<ContractAbiError> for ContractManagerError {
    fn from(e: ContractAbiError) -> Self {
        Self::Abi { source: e }
    }
}

impl From<AccountManagerError> for ContractManagerError {
    fn from(e: AccountManagerError) -> Self {
        Self::Account { source: e }
    }
}

impl From<EnvironmentError> for ContractManagerError {
    fn from(e: EnvironmentError) -> Self {
        Self::Environment { source: e }
    }
}

/// The three mocks created by one call to [`ContractManager::deploy_mocks`].
#[derive(Debug, Clone)]
pub struct MockDeployment {
    pub price_feed: Arc<ContractHandle>,
    pub link_token: Arc<ContractHandle>,
    pub vrf_coordinator: Arc<ContractHandle>,
}

/// Resolves dependency contracts, deploying mocks in their place on local networks.
#[derive(Clone)]
pub struct ContractManager {
    env: Arc<dyn ChainEnvironment>,
    config: Arc<DeployConfig>,
    account_manager: AccountManager,
}

impl ContractManager {
    pub fn new(
        env: Arc<dyn ChainEnvironment>,
        config: Arc<DeployConfig>,
        account_manager: AccountManager,
    ) -> Self {
        Self {
            env,
            config,
            account_manager,
        }
    }

    /// Resolve a dependency contract by its logical name.
    ///
    /// On a local network this returns the most recent deployment of the matching
    /// mock, deploying the mock set first if none exists. Forked and live networks
    /// wrap the address configured under `networks.<network>.<name>` with the
    /// mock's ABI.
    pub async fn get_contract(
        &self,
        name: &str,
    ) -> Result<Arc<ContractHandle>, ContractManagerError> {
        let logical = LogicalContract::from_name(name).ok_or_else(|| {
            ContractManagerError::UnknownContract {
                name: name.to_string(),
            }
        })?;
        let contract_type = logical.contract_type();
        let network = self.account_manager.network();

        if network.is_local() {
            // The registry check and the deployment below are not atomic
            if self.env.deployments(contract_type).is_empty() {
                debug!("No {contract_type} on {}, deploying mocks", network.name);
                self.deploy_mocks(DECIMALS, INITIAL_VALUE).await?;
            }

            return self
                .env
                .deployments(contract_type)
                .last()
                .cloned()
                .ok_or(ContractManagerError::MockMissing {
                    contract_type,
                    network: network.name,
                });
        }

        let address = self.config.contract_address(&network.name, logical.as_str())?;
        debug!("Using {contract_type} at {address} on {}", network.name);
        Ok(self
            .env
            .contract_at(contract_type, address, contract_type.abi()?))
    }

    /// Deploy a price feed aggregator, a LINK token and a VRF coordinator bound to that token.
    ///
    /// Every call deploys a fresh set; callers that need a single set must check
    /// the environment's deployments first.
    pub async fn deploy_mocks(
        &self,
        decimals: u8,
        initial_value: i128,
    ) -> Result<MockDeployment, ContractManagerError> {
        let account = self.account_manager.get_account(None, None).await?;
        let network = self.env.active_network();
        info!("Deploying mocks on {network} from {}", account.address);

        let price_feed = self
            .env
            .deploy(
                ContractType::MockV3Aggregator,
                vec![
                    CallArg::Uint(U256::from(decimals)),
                    CallArg::Int(initial_value),
                ],
                &account,
            )
            .await?;
        let link_token = self
            .env
            .deploy(ContractType::LinkToken, vec![], &account)
            .await?;
        let vrf_coordinator = self
            .env
            .deploy(
                ContractType::VRFCoordinatorMock,
                vec![CallArg::Address(link_token.address)],
                &account,
            )
            .await?;

        info!("Deployed!");
        Config::events().emit(
            EventType::MocksDeployed,
            EventData::MocksDeployed(MocksDeployedEventData {
                network,
                price_feed: price_feed.address,
                link_token: link_token.address,
                vrf_coordinator: vrf_coordinator.address,
            }),
        );

        Ok(MockDeployment {
            price_feed,
            link_token,
            vrf_coordinator,
        })
    }
}
