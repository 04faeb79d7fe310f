use std::sync::Arc;

use super::local_chain::LocalChain;
use crate::clients::environment::ChainEnvironment;
use crate::{DeployConfig, DeployHelper};

/// A [`DeployHelper`] wired to a fresh [`LocalChain`], with the chain kept at hand
/// for inspecting balances and deployments.
pub struct DeployFixture {
    pub chain: Arc<LocalChain>,
    pub helper: DeployHelper,
}

impl DeployFixture {
    pub fn new(chain: LocalChain, config: DeployConfig) -> Self {
        let chain = Arc::new(chain);
        let env: Arc<dyn ChainEnvironment> = chain.clone();
        let helper = DeployHelper::new(env, config);

        Self { chain, helper }
    }
}

/// Fixture on the default `development` network with default config.
pub async fn deploy_fixture() -> Result<DeployFixture, Box<dyn std::error::Error + Send + Sync>> {
    Ok(DeployFixture::new(LocalChain::new(), DeployConfig::default()))
}

/// Fixture connected to the config's default network.
pub async fn deploy_fixture_with_config(
    config: DeployConfig,
) -> Result<DeployFixture, Box<dyn std::error::Error + Send + Sync>> {
    Ok(DeployFixture::new(LocalChain::from_config(&config), config))
}
