use std::sync::Arc;

use alloy_primitives::{Address, U256};
use log::info;
use snafu::Snafu;

use crate::clients::account_manager::{AccountManager, AccountManagerError};
use crate::clients::contract_manager::{ContractManager, ContractManagerError, MockDeployment};
use crate::clients::environment::{
    Account, CallArg, ChainEnvironment, ContractHandle, EnvironmentError, TransactionReceipt,
};
use crate::clients::network::NetworkDetails;
use crate::config::{ConfigError, DeployConfig};
use crate::contracts::LogicalContract;
use crate::events::{Config, ContractFundedEventData, EventData, EventType};

/// 0.25 LINK
pub const DEFAULT_FUND_AMOUNT: u64 = 250_000_000_000_000_000;

/// Confirmations awaited after a funding transfer
const FUND_CONFIRMATIONS: u64 = 1;

#[derive(Debug, Snafu)]
pub enum DeployHelperError {
    #[snafu(display("Config error: {source}"))]
    ConfigError { source: ConfigError },
    #[snafu(display("Account error: {source}"))]
    AccountError { source: AccountManagerError },
    #[snafu(display("Contract error: {source}"))]
    ContractError { source: ContractManagerError },
    #[snafu(display("Transaction error: {source}"))]
    TransactionError { source: EnvironmentError },
}

impl From<ConfigError> for DeployHelperError {
    fn from(e: ConfigError) -> Self {
        Self::ConfigError { source: e }
    }
}

impl From<AccountManagerError> for DeployHelperError {
    fn from(e: AccountManagerError) -> Self {
        Self::AccountError { source: e }
    }
}

impl From<ContractManagerError> for DeployHelperError {
    fn from(e: ContractManagerError) -> Self {
        Self::ContractError { source: e }
    }
}

impl From<EnvironmentError> for DeployHelperError {
    fn from(e: EnvironmentError) -> Self {
        Self::TransactionError { source: e }
    }
}

/// Parameters for [`DeployHelper::fund_with_link`]. Unset fields fall back to defaults.
#[derive(Debug, Clone, Default)]
pub struct FundWithLinkParams {
    /// Contract receiving the tokens
    pub contract_address: Address,
    /// Sender, defaults to the account resolved with no selectors
    pub account: Option<Account>,
    /// Token to send, defaults to the resolved `link_token` dependency
    pub link_token: Option<Arc<ContractHandle>>,
    /// Amount in the token's base unit, defaults to [`DEFAULT_FUND_AMOUNT`]
    pub amount: Option<U256>,
}

/// A helper that brokers access to account selection, dependency resolution and
/// funding on top of a chain environment.
#[derive(Clone)]
pub struct DeployHelper {
    env: Arc<dyn ChainEnvironment>,
    config: Arc<DeployConfig>,
    account_manager: AccountManager,
    contract_manager: ContractManager,
}

impl DeployHelper {
    pub fn new(env: Arc<dyn ChainEnvironment>, config: DeployConfig) -> Self {
        let config = Arc::new(config);
        let account_manager = AccountManager::new(env.clone(), config.clone());
        let contract_manager =
            ContractManager::new(env.clone(), config.clone(), account_manager.clone());

        Self {
            env,
            config,
            account_manager,
            contract_manager,
        }
    }

    /// Build a helper with config loaded per [`DeployConfig::from_environment`].
    pub fn from_environment(env: Arc<dyn ChainEnvironment>) -> Result<Self, DeployHelperError> {
        Ok(Self::new(env, DeployConfig::from_environment()?))
    }

    pub fn config(&self) -> &DeployConfig {
        &self.config
    }

    pub fn environment(&self) -> &Arc<dyn ChainEnvironment> {
        &self.env
    }

    /// Get access to the AccountManager for signer selection
    pub fn accounts(&self) -> &AccountManager {
        &self.account_manager
    }

    /// Get access to the ContractManager for dependency resolution
    pub fn contracts(&self) -> &ContractManager {
        &self.contract_manager
    }

    pub fn network(&self) -> NetworkDetails {
        self.account_manager.network()
    }

    pub async fn get_account(
        &self,
        index: Option<usize>,
        id: Option<&str>,
    ) -> Result<Account, DeployHelperError> {
        Ok(self.account_manager.get_account(index, id).await?)
    }

    pub async fn get_contract(&self, name: &str) -> Result<Arc<ContractHandle>, DeployHelperError> {
        Ok(self.contract_manager.get_contract(name).await?)
    }

    pub async fn deploy_mocks(
        &self,
        decimals: u8,
        initial_value: i128,
    ) -> Result<MockDeployment, DeployHelperError> {
        Ok(self
            .contract_manager
            .deploy_mocks(decimals, initial_value)
            .await?)
    }

    /// Transfer LINK to a contract and wait for one confirmation.
    pub async fn fund_with_link(
        &self,
        params: FundWithLinkParams,
    ) -> Result<TransactionReceipt, DeployHelperError> {
        let account = match params.account {
            Some(account) => account,
            None => self.account_manager.get_account(None, None).await?,
        };
        let link_token = match params.link_token {
            Some(token) => token,
            None => {
                self.contract_manager
                    .get_contract(LogicalContract::LinkToken.as_str())
                    .await?
            }
        };
        let amount = params.amount.unwrap_or(U256::from(DEFAULT_FUND_AMOUNT));

        let tx_hash = self
            .env
            .transact(
                &link_token,
                "transfer",
                vec![
                    CallArg::Address(params.contract_address),
                    CallArg::Uint(amount),
                ],
                &account,
            )
            .await?;
        let receipt = self
            .env
            .wait_for_confirmations(tx_hash, FUND_CONFIRMATIONS)
            .await?;

        info!("Funded Contract!");
        if Config::debug() {
            info!("Funding receipt: {receipt:?}");
        }
        Config::events().emit(
            EventType::ContractFunded,
            EventData::ContractFunded(ContractFundedEventData {
                contract_address: params.contract_address,
                token: link_token.address,
                amount,
                transaction_hash: receipt.transaction_hash,
            }),
        );

        Ok(receipt)
    }
}
