//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! serde defaults
//!     → optional TOML file (loader.rs)
//!     → environment / .env overlay (loader.rs)
//!     → validation.rs (semantic checks)
//!     → AttesterConfig (validated, immutable)
//!     → shared by value or Arc with all subsystems
//! ```
//!
//! Private keys never pass through this module.

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_config_for, ConfigError};
pub use validation::ValidationScope;
pub use schema::{
    AttesterConfig, BadgeConfig, ChainConfig, EasConfig, EligibilityRule, ObservabilityConfig,
    ProxyDomainConfig, ReferralConfig, ServerConfig,
};
