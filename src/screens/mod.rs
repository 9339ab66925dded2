//! TUI screens.

pub mod dashboard;
pub mod login;

pub use dashboard::DashboardScreen;
pub use login::LoginScreen;
