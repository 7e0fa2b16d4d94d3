pub mod locator_config;

pub use locator_config::*;
