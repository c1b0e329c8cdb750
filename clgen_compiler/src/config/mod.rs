//! Configuration module for the checklist compiler
//!
//! Compile-time limits are generated by build.rs from the TOML profile in
//! `<workspace>/config/`. User preferences are read from `CLGEN_*`
//! environment variables at runtime.

// Generated `compile_time` module
include!(concat!(env!("OUT_DIR"), "/constants.rs"));

pub mod runtime;

/// Build information and configuration metadata
pub mod build_info {
    /// Configuration profile used during build
    pub fn profile() -> &'static str {
        option_env!("CLGEN_BUILD_PROFILE").unwrap_or("development")
    }

    /// Configuration directory used during build
    pub fn config_dir() -> &'static str {
        option_env!("CLGEN_CONFIG_DIR").unwrap_or("config")
    }

    /// Configuration source information
    pub fn source_info() -> String {
        format!("Generated from {}/{}.toml", config_dir(), profile())
    }
}
