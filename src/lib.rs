pub mod config;
pub mod logging;
pub mod services;
pub mod types;
pub mod utils;

pub use config::Config;
pub use services::SyncService;
pub use types::*;
