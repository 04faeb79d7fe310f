pub mod account_manager;
pub mod contract_manager;
pub mod deploy_helper;
pub mod environment;
pub mod network;

// Re-export commonly used client types
pub use account_manager::{AccountManager, AccountManagerError};
pub use contract_manager::{
    ContractManager, ContractManagerError, DECIMALS, INITIAL_VALUE, MockDeployment,
};
pub use deploy_helper::{DEFAULT_FUND_AMOUNT, DeployHelper, DeployHelperError, FundWithLinkParams};
pub use environment::{
    Account, AccountSource, CallArg, ChainEnvironment, ContractHandle, EnvironmentError,
    TransactionReceipt, TxHash,
};
pub use network::{NetworkDetails, NetworkKind};
