pub mod config;
pub mod hotspot;
pub mod poller;
pub mod state;

pub use config::{ApiConfig, LoggingConfig, PollingConfig, SocConfig, API_URL_ENV};
pub use hotspot::Hotspot;
pub use poller::Dashboard;
pub use state::DashboardState;
