pub mod schema;

pub use schema::{Config, FrontendConfig, GatewayConfig, LoggingConfig};
