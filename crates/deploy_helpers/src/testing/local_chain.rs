use std::collections::HashMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use alloy_primitives::{Address, B256, U256, address, keccak256};
use async_trait::async_trait;
use log::debug;

use crate::clients::environment::{
    Account, AccountSource, CallArg, ChainEnvironment, ContractHandle, EnvironmentError,
    TransactionReceipt, TxHash,
};
use crate::config::DeployConfig;
use crate::contracts::{ContractAbi, ContractType};

/// Network name used when none is given
pub const DEFAULT_NETWORK: &str = "development";

/// Unlocked accounts of the standard development mnemonic.
pub const DEV_ACCOUNTS: [Address; 10] = [
    address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"),
    address!("0x70997970C51812dc3A010C7d01b50e0d17dc79C8"),
    address!("0x3C44CdDdB6a900fa2b585dd299e03d12FA4293BC"),
    address!("0x90F79bf6EB2c4f870365E785982E1f101E93b906"),
    address!("0x15d34AAf54267DB7D7c367839AAf71A00a2C6A65"),
    address!("0x9965507D1a55bcC2695C58ba16FB37d819B0A4dc"),
    address!("0x976EA74026E726554dB657fA54763abd0C3a0aa9"),
    address!("0x14dC79964da2C08b23698B3D3cc7Ca32193d9955"),
    address!("0x23618e81E3f5cdF7f54C3d65f7FBc0aBf5B21E8f"),
    address!("0xa0Ee7A142d267C1f36714E4a8F75612F20a79720"),
];

/// LINK minted to the deployer of a `LinkToken` (10^27 base units)
pub fn link_total_supply() -> U256 {
    U256::from(10u64).pow(U256::from(27u64))
}

#[derive(Default)]
struct ChainState {
    block_number: u64,
    nonces: HashMap<Address, u64>,
    keystore: HashMap<String, Address>,
    deployments: HashMap<ContractType, Vec<Arc<ContractHandle>>>,
    constructor_args: HashMap<Address, Vec<CallArg>>,
    /// Keyed by (token, holder)
    balances: HashMap<(Address, Address), U256>,
    receipts: HashMap<TxHash, TransactionReceipt>,
}

impl ChainState {
    fn next_nonce(&mut self, sender: Address) -> u64 {
        let nonce = self.nonces.entry(sender).or_default();
        let current = *nonce;
        *nonce += 1;
        current
    }

    fn mine(&mut self) -> u64 {
        self.block_number += 1;
        self.block_number
    }

    fn balance(&self, token: Address, holder: Address) -> U256 {
        self.balances
            .get(&(token, holder))
            .copied()
            .unwrap_or_default()
    }

    fn transfer(
        &mut self,
        token: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), EnvironmentError> {
        let available = self.balance(token, from);
        if available < amount {
            return Err(EnvironmentError::new(format!(
                "transfer reverted: {from} holds {available} of token {token}, needs {amount}"
            )));
        }
        self.balances.insert((token, from), available - amount);
        let received = self.balance(token, to) + amount;
        self.balances.insert((token, to), received);
        Ok(())
    }
}

/// An in-process, automining chain implementing [`ChainEnvironment`].
///
/// Blocks are mined only when a deployment or transaction is submitted, one per
/// submission. Only `LinkToken` transfers change state; other calls are recorded
/// with a receipt but have no effect. Keys are never held: accounts added from a
/// private key get an address derived by hashing the key.
pub struct LocalChain {
    network: String,
    state: Mutex<ChainState>,
}

impl Default for LocalChain {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalChain {
    pub fn new() -> Self {
        Self::with_network(DEFAULT_NETWORK)
    }

    /// A chain reporting `network` as its active network.
    pub fn with_network(network: impl Into<String>) -> Self {
        Self {
            network: network.into(),
            state: Mutex::new(ChainState::default()),
        }
    }

    /// A chain connected to the config's default network, or `development`.
    pub fn from_config(config: &DeployConfig) -> Self {
        Self::with_network(config.default_network().unwrap_or(DEFAULT_NETWORK))
    }

    fn state(&self) -> MutexGuard<'_, ChainState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store an account in the keystore under `id`.
    pub fn add_keystore_account(&self, id: impl Into<String>, address: Address) {
        self.state().keystore.insert(id.into(), address);
    }

    pub fn balance_of(&self, token: Address, holder: Address) -> U256 {
        self.state().balance(token, holder)
    }

    /// Credit tokens to a holder without a transaction, e.g. on a wrapped live address.
    pub fn mint(&self, token: Address, holder: Address, amount: U256) {
        let mut state = self.state();
        let balance = state.balance(token, holder) + amount;
        state.balances.insert((token, holder), balance);
    }

    /// Constructor arguments a contract was deployed with.
    pub fn constructor_args(&self, contract: Address) -> Option<Vec<CallArg>> {
        self.state().constructor_args.get(&contract).cloned()
    }

    pub fn block_number(&self) -> u64 {
        self.state().block_number
    }

    /// Mine empty blocks, adding confirmations to earlier transactions.
    pub fn mine_blocks(&self, count: u64) {
        let mut state = self.state();
        for _ in 0..count {
            state.mine();
        }
    }

    pub fn transaction_count(&self) -> usize {
        self.state().receipts.len()
    }

    fn tx_hash(sender: Address, nonce: u64) -> TxHash {
        let mut preimage = sender.to_vec();
        preimage.extend_from_slice(&nonce.to_be_bytes());
        keccak256(preimage)
    }
}

#[async_trait]
impl ChainEnvironment for LocalChain {
    fn active_network(&self) -> String {
        self.network.clone()
    }

    async fn account(&self, index: usize) -> Result<Account, EnvironmentError> {
        let address = DEV_ACCOUNTS.get(index).copied().ok_or_else(|| {
            EnvironmentError::new(format!(
                "account index {index} out of range, {} accounts available",
                DEV_ACCOUNTS.len()
            ))
        })?;

        Ok(Account {
            address,
            source: AccountSource::Index(index),
        })
    }

    async fn load_account(&self, id: &str) -> Result<Account, EnvironmentError> {
        let address = self
            .state()
            .keystore
            .get(id)
            .copied()
            .ok_or_else(|| EnvironmentError::new(format!("no keystore account named {id}")))?;

        Ok(Account {
            address,
            source: AccountSource::Keystore(id.to_string()),
        })
    }

    async fn add_account(&self, private_key: &str) -> Result<Account, EnvironmentError> {
        let key = B256::from_str(private_key.trim())
            .map_err(|e| EnvironmentError::new(format!("invalid private key: {e}")))?;
        let digest = keccak256(key.as_slice());

        Ok(Account {
            address: Address::from_slice(&digest[12..]),
            source: AccountSource::PrivateKey,
        })
    }

    async fn deploy(
        &self,
        contract_type: ContractType,
        args: Vec<CallArg>,
        from: &Account,
    ) -> Result<Arc<ContractHandle>, EnvironmentError> {
        let abi = contract_type
            .abi()
            .map_err(|e| EnvironmentError::new(e.to_string()))?;
        let expected = abi.constructor_inputs().len();
        if expected != args.len() {
            return Err(EnvironmentError::new(format!(
                "{contract_type} constructor takes {expected} arguments, got {}",
                args.len()
            )));
        }

        let mut state = self.state();
        let nonce = state.next_nonce(from.address);
        let handle = Arc::new(ContractHandle {
            contract_type,
            address: from.address.create(nonce),
            abi,
        });

        if contract_type == ContractType::LinkToken {
            state
                .balances
                .insert((handle.address, from.address), link_total_supply());
        }
        state.constructor_args.insert(handle.address, args);
        state
            .deployments
            .entry(contract_type)
            .or_default()
            .push(handle.clone());
        let block = state.mine();

        debug!(
            "Deployed {contract_type} at {} in block {block}",
            handle.address
        );
        Ok(handle)
    }

    fn deployments(&self, contract_type: ContractType) -> Vec<Arc<ContractHandle>> {
        self.state()
            .deployments
            .get(&contract_type)
            .cloned()
            .unwrap_or_default()
    }

    fn contract_at(
        &self,
        contract_type: ContractType,
        address: Address,
        abi: ContractAbi,
    ) -> Arc<ContractHandle> {
        Arc::new(ContractHandle {
            contract_type,
            address,
            abi,
        })
    }

    async fn transact(
        &self,
        contract: &ContractHandle,
        method: &str,
        args: Vec<CallArg>,
        from: &Account,
    ) -> Result<TxHash, EnvironmentError> {
        let function = contract.abi.function(method).ok_or_else(|| {
            EnvironmentError::new(format!("{} has no function {method}", contract.name()))
        })?;
        if function.inputs.len() != args.len() {
            return Err(EnvironmentError::new(format!(
                "{}.{method} takes {} arguments, got {}",
                contract.name(),
                function.inputs.len(),
                args.len()
            )));
        }

        let mut state = self.state();
        match (contract.contract_type, method, args.as_slice()) {
            (
                ContractType::LinkToken,
                "transfer",
                [CallArg::Address(to), CallArg::Uint(amount)],
            ) => {
                state.transfer(contract.address, from.address, *to, *amount)?;
            }
            (ContractType::LinkToken, "transfer", _) => {
                return Err(EnvironmentError::new(
                    "LinkToken.transfer expects (address, uint256)",
                ));
            }
            _ => debug!("{}.{method} has no simulated effect", contract.name()),
        }

        let nonce = state.next_nonce(from.address);
        let transaction_hash = Self::tx_hash(from.address, nonce);
        let block_number = state.mine();
        state.receipts.insert(
            transaction_hash,
            TransactionReceipt {
                transaction_hash,
                block_number,
                from: from.address,
                to: contract.address,
                method: method.to_string(),
                confirmations: 1,
            },
        );

        Ok(transaction_hash)
    }

    async fn wait_for_confirmations(
        &self,
        tx_hash: TxHash,
        confirmations: u64,
    ) -> Result<TransactionReceipt, EnvironmentError> {
        let state = self.state();
        let mut receipt = state
            .receipts
            .get(&tx_hash)
            .cloned()
            .ok_or_else(|| EnvironmentError::new(format!("unknown transaction {tx_hash}")))?;

        receipt.confirmations = state.block_number - receipt.block_number + 1;
        if receipt.confirmations < confirmations {
            return Err(EnvironmentError::new(format!(
                "transaction {tx_hash} has {} of {confirmations} confirmations and no blocks are pending",
                receipt.confirmations
            )));
        }

        Ok(receipt)
    }
}
