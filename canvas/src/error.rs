//! Error types for layout reads and configuration.
//!
//! None of these cross the public measurement or collision API: layout
//! failures are caught inside the measurement service and routed to the
//! fallback rect. They exist so layout providers and config loading can use
//! `Result` and `?` like everything else.

use crate::block::BlockId;

/// Failure reading rendered layout from a host-provided handle.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutError {
    #[error("no rendered element registered for block {0}")]
    NotMounted(BlockId),
    #[error("canvas root is not bound")]
    RootUnbound,
    #[error("canvas root has no usable size")]
    RootCollapsed,
    #[error("rendered element is detached from the document")]
    Detached,
    #[error("layout engine error: {0}")]
    Engine(String),
}

/// Invalid configuration value.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
    #[error("{var} must be {expected}, got {value}")]
    OutOfRange { var: &'static str, expected: &'static str, value: f64 },
}
