use std::sync::Arc;

use derivative::Derivative;
use derive_setters::Setters;
use hlsbridge_engine::{EngineConfig, EngineFactory};

/// Configuration of a [`MediaBridge`](crate::MediaBridge).
#[derive(Clone, Derivative, Setters)]
#[derivative(Debug, Default)]
#[setters(prefix = "with_", strip_option)]
pub struct BridgeConfig {
    /// Options handed to every engine the bridge constructs.
    pub engine: EngineConfig,
    /// Constructs engines for HLS sources. Required.
    #[derivative(Debug = "ignore")]
    pub factory: Option<Arc<dyn EngineFactory>>,
    /// Capacity of the bridge event channel. Default: 64.
    #[derivative(Default(value = "64"))]
    pub event_capacity: usize,
}
