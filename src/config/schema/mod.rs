mod core;
mod frontend;
mod gateway;
mod loader;
mod logging;

pub use core::Config;
pub use frontend::FrontendConfig;
pub use gateway::GatewayConfig;
pub use logging::LoggingConfig;
