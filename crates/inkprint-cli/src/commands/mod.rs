//! Command implementations.

pub mod capture;
pub mod config;
pub mod extract;
pub mod keywords;

pub use self::capture::execute_capture;
pub use self::config::execute_config;
pub use self::extract::execute_extract;
pub use self::keywords::execute_keywords;
