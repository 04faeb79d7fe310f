pub mod clients;
pub mod config;
pub mod contracts;
pub mod events;
pub mod testing;

pub use clients::{
    Account, AccountManager, AccountManagerError, AccountSource, CallArg, ChainEnvironment,
    ContractHandle, ContractManager, ContractManagerError, DECIMALS, DEFAULT_FUND_AMOUNT,
    DeployHelper, DeployHelperError, EnvironmentError, FundWithLinkParams, INITIAL_VALUE,
    MockDeployment, NetworkDetails, NetworkKind, TransactionReceipt, TxHash,
};
pub use config::{ConfigError, DeployConfig};
pub use contracts::{ContractAbi, ContractType, LogicalContract};
pub use testing::{DeployFixture, LocalChain, deploy_fixture, deploy_fixture_with_config};
