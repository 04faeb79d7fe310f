use std::sync::Arc;

use log::debug;
use snafu::Snafu;

use crate::clients::environment::{Account, ChainEnvironment, EnvironmentError};
use crate::clients::network::NetworkDetails;
use crate::config::DeployConfig;

#[derive(Debug, Snafu)]
pub enum AccountManagerError {
    #[snafu(display("No wallets.from_key configured for live network {network}"))]
    MissingPrivateKey { network: String },
    #[snafu(display("Failed to load account: {source}"))]
    Environment { source: EnvironmentError },
}

impl From<EnvironmentError> for AccountManagerError {
    fn from(e: EnvironmentError) -> Self {
        Self::Environment { source: e }
    }
}

/// Picks the signing account deployment scripts should use.
#[derive(Clone)]
pub struct AccountManager {
    env: Arc<dyn ChainEnvironment>,
    config: Arc<DeployConfig>,
}

impl AccountManager {
    pub fn new(env: Arc<dyn ChainEnvironment>, config: Arc<DeployConfig>) -> Self {
        Self { env, config }
    }

    pub fn network(&self) -> NetworkDetails {
        NetworkDetails::new(self.env.active_network(), &self.config.environments)
    }

    /// Resolve a signing account.
    ///
    /// Exactly one strategy applies, in this order:
    /// 1. `index`: the environment's unlocked account at that position
    /// 2. `id`: the keystore account stored under that identifier
    /// 3. on local and forked networks, the first unlocked account
    /// 4. otherwise, an account added from `wallets.from_key`
    pub async fn get_account(
        &self,
        index: Option<usize>,
        id: Option<&str>,
    ) -> Result<Account, AccountManagerError> {
        if let Some(index) = index {
            debug!("Using account at index {index}");
            return Ok(self.env.account(index).await?);
        }

        if let Some(id) = id {
            debug!("Loading keystore account {id}");
            return Ok(self.env.load_account(id).await?);
        }

        let network = self.network();
        if network.has_default_accounts() {
            debug!(
                "Using default account on {} network {}",
                network.kind.as_str(),
                network.name
            );
            return Ok(self.env.account(0).await?);
        }

        let private_key = self.config.wallets.from_key.as_deref().ok_or_else(|| {
            AccountManagerError::MissingPrivateKey {
                network: network.name.clone(),
            }
        })?;
        debug!("Adding account from configured key on {}", network.name);
        Ok(self.env.add_account(private_key).await?)
    }
}
