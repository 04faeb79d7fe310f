use std::str::FromStr;
use std::sync::Arc;

use alloy_primitives::{Address, U256};
use deploy_helpers::testing::{DEV_ACCOUNTS, DeployFixture};
use deploy_helpers::{
    CallArg, ChainEnvironment, ConfigError, ContractManagerError, ContractType, DECIMALS,
    DeployHelper, DeployHelperError, INITIAL_VALUE, LocalChain, LogicalContract,
};
use rstest::*;

use crate::common::logging::init_test_logging;
use crate::common::{
    DeployFixtureResult, RINKEBY_LINK_TOKEN, RINKEBY_PRICE_FEED, RINKEBY_VRF_COORDINATOR,
    RecordingEnvironment, TestResult, fixture_on, live_config, local_fixture,
};

#[rstest]
#[tokio::test]
async fn test_unknown_name_fails(#[future] local_fixture: DeployFixtureResult) -> TestResult {
    let DeployFixture { chain, helper } = local_fixture.await?;

    let result = helper.contracts().get_contract("btc_usd_price_feed").await;

    assert!(
        matches!(result, Err(ContractManagerError::UnknownContract { ref name }) if name == "btc_usd_price_feed")
    );
    // lookup fails before anything is deployed
    assert_eq!(chain.block_number(), 0);
    Ok(())
}

#[rstest]
#[tokio::test]
async fn test_unknown_name_fails_on_live_network() -> TestResult {
    init_test_logging();
    let DeployFixture { helper, .. } = fixture_on("rinkeby");

    let result = helper.get_contract("MockV3Aggregator").await;

    assert!(matches!(
        result,
        Err(DeployHelperError::ContractError {
            source: ContractManagerError::UnknownContract { .. }
        })
    ));
    Ok(())
}

#[rstest]
#[case::price_feed("eth_usd_price_feed", ContractType::MockV3Aggregator)]
#[case::vrf_coordinator("vrf_coordinator", ContractType::VRFCoordinatorMock)]
#[case::link_token("link_token", ContractType::LinkToken)]
#[tokio::test]
async fn test_local_resolution_deploys_mocks_once(
    #[future] local_fixture: DeployFixtureResult,
    #[case] name: &str,
    #[case] contract_type: ContractType,
) -> TestResult {
    let DeployFixture { chain, helper } = local_fixture.await?;

    let first = helper.get_contract(name).await?;
    let second = helper.get_contract(name).await?;

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.contract_type, contract_type);
    for mock in ContractType::ALL {
        assert_eq!(chain.deployments(mock).len(), 1, "{mock}");
    }
    Ok(())
}

#[rstest]
#[tokio::test]
async fn test_local_resolution_shares_one_mock_set(
    #[future] local_fixture: DeployFixtureResult,
) -> TestResult {
    let DeployFixture { chain, helper } = local_fixture.await?;

    for logical in LogicalContract::ALL {
        helper.get_contract(logical.as_str()).await?;
    }

    // three deployments, one block each
    assert_eq!(chain.block_number(), 3);
    Ok(())
}

#[rstest]
#[tokio::test]
async fn test_local_resolution_returns_most_recent_mock(
    #[future] local_fixture: DeployFixtureResult,
) -> TestResult {
    let DeployFixture { chain, helper } = local_fixture.await?;

    helper.deploy_mocks(DECIMALS, INITIAL_VALUE).await?;
    let latest = helper.deploy_mocks(18, 1).await?;
    let resolved = helper.get_contract("eth_usd_price_feed").await?;

    assert_eq!(chain.deployments(ContractType::MockV3Aggregator).len(), 2);
    assert!(Arc::ptr_eq(&resolved, &latest.price_feed));
    Ok(())
}

#[rstest]
#[tokio::test]
async fn test_local_resolution_only_inspects_registry() -> TestResult {
    init_test_logging();
    let chain = Arc::new(LocalChain::new());
    let recording = Arc::new(RecordingEnvironment::new(chain.clone()));
    let helper = DeployHelper::new(recording.clone(), live_config());

    helper.get_contract("vrf_coordinator").await?;
    recording.clear();
    helper.get_contract("vrf_coordinator").await?;

    assert_eq!(
        recording.calls(),
        [
            "deployments(VRFCoordinatorMock)",
            "deployments(VRFCoordinatorMock)"
        ]
    );
    Ok(())
}

#[rstest]
#[tokio::test]
async fn test_deploy_mocks_creates_one_of_each(
    #[future] local_fixture: DeployFixtureResult,
) -> TestResult {
    let DeployFixture { chain, helper } = local_fixture.await?;

    let mocks = helper.deploy_mocks(DECIMALS, INITIAL_VALUE).await?;

    for mock in ContractType::ALL {
        assert_eq!(chain.deployments(mock).len(), 1, "{mock}");
    }
    assert_eq!(
        chain.constructor_args(mocks.vrf_coordinator.address),
        Some(vec![CallArg::Address(mocks.link_token.address)])
    );
    assert_eq!(
        chain.constructor_args(mocks.price_feed.address),
        Some(vec![
            CallArg::Uint(U256::from(DECIMALS)),
            CallArg::Int(INITIAL_VALUE)
        ])
    );
    // deployed from the default account, in order
    assert_eq!(mocks.price_feed.address, DEV_ACCOUNTS[0].create(0));
    assert_eq!(mocks.link_token.address, DEV_ACCOUNTS[0].create(1));
    assert_eq!(mocks.vrf_coordinator.address, DEV_ACCOUNTS[0].create(2));
    Ok(())
}

#[rstest]
#[tokio::test]
async fn test_deploy_mocks_is_not_idempotent(
    #[future] local_fixture: DeployFixtureResult,
) -> TestResult {
    let DeployFixture { chain, helper } = local_fixture.await?;

    let first = helper.deploy_mocks(DECIMALS, INITIAL_VALUE).await?;
    let second = helper.deploy_mocks(DECIMALS, INITIAL_VALUE).await?;

    assert_ne!(first.link_token.address, second.link_token.address);
    assert_eq!(
        chain.constructor_args(second.vrf_coordinator.address),
        Some(vec![CallArg::Address(second.link_token.address)])
    );
    for mock in ContractType::ALL {
        assert_eq!(chain.deployments(mock).len(), 2, "{mock}");
    }
    Ok(())
}

#[rstest]
#[case::price_feed("eth_usd_price_feed", RINKEBY_PRICE_FEED, ContractType::MockV3Aggregator)]
#[case::vrf_coordinator(
    "vrf_coordinator",
    RINKEBY_VRF_COORDINATOR,
    ContractType::VRFCoordinatorMock
)]
#[case::link_token("link_token", RINKEBY_LINK_TOKEN, ContractType::LinkToken)]
#[tokio::test]
async fn test_live_resolution_wraps_configured_address(
    #[case] name: &str,
    #[case] address: &str,
    #[case] contract_type: ContractType,
) -> TestResult {
    init_test_logging();
    let DeployFixture { chain, helper } = fixture_on("rinkeby");

    let contract = helper.get_contract(name).await?;

    assert_eq!(contract.address, Address::from_str(address)?);
    assert_eq!(contract.contract_type, contract_type);
    assert_eq!(contract.abi, contract_type.abi()?);
    assert!(chain.deployments(contract_type).is_empty());
    Ok(())
}

#[rstest]
#[tokio::test]
async fn test_forked_network_uses_config_not_mocks() -> TestResult {
    init_test_logging();
    let DeployFixture { chain, helper } = fixture_on("mainnet-fork");

    let feed = helper.get_contract("eth_usd_price_feed").await?;
    let missing = helper.contracts().get_contract("link_token").await;

    assert_eq!(
        feed.address,
        Address::from_str("0x5f4eC3Df9cbd43714FE2740f5E3616155c5b8419")?
    );
    assert!(matches!(
        missing,
        Err(ContractManagerError::Config {
            source: ConfigError::MissingAddress { .. }
        })
    ));
    assert_eq!(chain.block_number(), 0);
    Ok(())
}

#[rstest]
#[tokio::test]
async fn test_live_network_without_config_section_fails() -> TestResult {
    init_test_logging();
    let DeployFixture { helper, .. } = fixture_on("kovan");

    let result = helper.contracts().get_contract("vrf_coordinator").await;

    assert!(matches!(
        result,
        Err(ContractManagerError::Config {
            source: ConfigError::MissingAddress { ref network, ref contract }
        }) if network == "kovan" && contract == "vrf_coordinator"
    ));
    Ok(())
}

#[rstest]
#[tokio::test]
async fn test_deploy_mocks_on_live_network_needs_key() -> TestResult {
    init_test_logging();
    let env: Arc<dyn ChainEnvironment> = Arc::new(LocalChain::with_network("rinkeby"));
    let helper = DeployHelper::new(env, Default::default());

    let result = helper.contracts().deploy_mocks(DECIMALS, INITIAL_VALUE).await;

    assert!(matches!(result, Err(ContractManagerError::Account { .. })));
    Ok(())
}
