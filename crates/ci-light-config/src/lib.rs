//! Configuration for ci-light
//!
//! This crate provides:
//! - Configuration file lookup (TOML)
//! - Application configuration (AppConfig) with validation
//! - Bearer token resolution from the environment

pub mod app_config;
pub mod config_file;
pub mod paths;
pub mod token;

pub use app_config::{AppConfig, BrightnessConfig, LedColor, Mode, PaletteConfig, RibbonConfig};
pub use config_file::load_config_file;
pub use token::TokenResolver;
