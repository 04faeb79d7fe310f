use std::sync::Arc;

use alloy_primitives::{Address, B256, U256};
use async_trait::async_trait;
use snafu::Snafu;

use crate::contracts::{ContractAbi, ContractType};

/// Hash identifying a submitted transaction.
pub type TxHash = B256;

#[derive(Debug, Snafu)]
pub enum EnvironmentError {
    #[snafu(display("Chain environment error: {message}"))]
    Chain { message: String },
}

impl EnvironmentError {
    pub fn new(message: impl Into<String>) -> Self {
        Self::Chain {
            message: message.into(),
        }
    }
}

/// Where the chain environment obtained a signing account from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountSource {
    /// One of the environment's unlocked accounts, by position
    Index(usize),
    /// An account stored in the environment's keystore under an identifier
    Keystore(String),
    /// An account added from a raw private key
    PrivateKey,
}

/// An opaque handle to a key pair held by the chain environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub address: Address,
    pub source: AccountSource,
}

/// A deployed contract as known to the chain environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractHandle {
    pub contract_type: ContractType,
    pub address: Address,
    pub abi: ContractAbi,
}

impl ContractHandle {
    pub fn name(&self) -> &'static str {
        self.contract_type.name()
    }
}

/// An argument passed to a constructor or contract function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallArg {
    Address(Address),
    Uint(U256),
    Int(i128),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionReceipt {
    pub transaction_hash: TxHash,
    pub block_number: u64,
    pub from: Address,
    pub to: Address,
    pub method: String,
    /// Number of blocks mined on top of (and including) the transaction's block
    pub confirmations: u64,
}

/// The chain framework the deployment helpers delegate to.
///
/// Implementations own every piece of chain state: unlocked accounts, the
/// registry of deployed contracts and the network connection. The helpers in
/// this crate only decide *which* of these operations to invoke.
///
/// By default, this trait requires the implementing type to be `Send + Sync`.
#[async_trait]
pub trait ChainEnvironment: Send + Sync {
    /// Name of the network the environment is currently connected to.
    fn active_network(&self) -> String;

    async fn account(&self, index: usize) -> Result<Account, EnvironmentError>;

    async fn load_account(&self, id: &str) -> Result<Account, EnvironmentError>;

    async fn add_account(&self, private_key: &str) -> Result<Account, EnvironmentError>;

    async fn deploy(
        &self,
        contract_type: ContractType,
        args: Vec<CallArg>,
        from: &Account,
    ) -> Result<Arc<ContractHandle>, EnvironmentError>;

    /// Deployed instances of a contract type, oldest first.
    fn deployments(&self, contract_type: ContractType) -> Vec<Arc<ContractHandle>>;

    /// Wrap an already deployed contract from its address and interface description.
    fn contract_at(
        &self,
        contract_type: ContractType,
        address: Address,
        abi: ContractAbi,
    ) -> Arc<ContractHandle>;

    async fn transact(
        &self,
        contract: &ContractHandle,
        method: &str,
        args: Vec<CallArg>,
        from: &Account,
    ) -> Result<TxHash, EnvironmentError>;

    /// Block until the transaction has at least `confirmations` confirmations.
    async fn wait_for_confirmations(
        &self,
        tx_hash: TxHash,
        confirmations: u64,
    ) -> Result<TransactionReceipt, EnvironmentError>;
}
