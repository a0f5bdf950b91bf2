//! Delegated EAS badge attester.

pub mod badges;
pub mod chain;
pub mod config;
pub mod eas;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod referral;
pub mod revert;

pub use config::schema::AttesterConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
