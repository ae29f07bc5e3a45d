use hlsbridge_engine::EngineError;
use thiserror::Error;

pub type BridgeResult<T> = Result<T, BridgeError>;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BridgeError {
    #[error(
        "no streaming engine configured: pass an engine factory with `BridgeConfig::with_factory`"
    )]
    EngineNotConfigured,

    #[error("the configured streaming engine cannot run on this host")]
    EngineUnsupported,

    #[error("cannot attach an engine while the previous one is being detached")]
    Detaching,

    #[error("engine error: {0}")]
    Engine(#[from] EngineError),
}
