use alloy_primitives::{Address, U256};
use once_cell::sync::Lazy;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::broadcast;

use crate::clients::environment::TxHash;

/// Deployment lifecycle event types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    /// Emitted after the full set of mocks has been deployed
    MocksDeployed,
    /// Emitted once a token funding transfer is confirmed
    ContractFunded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MocksDeployedEventData {
    pub network: String,
    pub price_feed: Address,
    pub link_token: Address,
    pub vrf_coordinator: Address,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractFundedEventData {
    pub contract_address: Address,
    pub token: Address,
    pub amount: U256,
    pub transaction_hash: TxHash,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventData {
    MocksDeployed(MocksDeployedEventData),
    ContractFunded(ContractFundedEventData),
}

/// Broadcasts mock deployment and funding events to every live subscriber.
#[derive(Clone)]
pub struct AsyncEventEmitter {
    sender: broadcast::Sender<(EventType, EventData)>,
}

impl AsyncEventEmitter {
    /// `buffer` bounds how many undelivered events a subscriber may fall behind by.
    pub fn new(buffer: usize) -> Self {
        let (sender, _receiver) = broadcast::channel(buffer);
        Self { sender }
    }

    /// Receive events emitted from now on. A receiver that falls more than
    /// `buffer` events behind gets `RecvError::Lagged` and resumes at the oldest
    /// retained event.
    pub fn subscribe(&self) -> broadcast::Receiver<(EventType, EventData)> {
        self.sender.subscribe()
    }

    pub fn emit(&self, event_type: EventType, data: EventData) {
        // nobody listening
        let _ = self.sender.send((event_type, data));
    }
}

static DEBUG: AtomicBool = AtomicBool::new(false);
static EVENTS: Lazy<AsyncEventEmitter> = Lazy::new(|| AsyncEventEmitter::new(32));

/// Process-wide switches for deployment helpers: receipt logging and the event stream.
pub struct Config;

impl Config {
    /// When set, full transaction receipts are logged at info level
    pub fn debug() -> bool {
        DEBUG.load(Ordering::Relaxed)
    }

    pub fn events() -> AsyncEventEmitter {
        EVENTS.clone()
    }

    pub fn configure(new_debug: Option<bool>) {
        if let Some(d) = new_debug {
            DEBUG.store(d, Ordering::Relaxed);
        }
    }
}
