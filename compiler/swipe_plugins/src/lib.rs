//! Built-in Swipe plugins.
//!
//! - [`config`]: load a struct from environment variables and flags.
//! - [`service`]: go-kit endpoints, middleware and HTTP transports for
//!   interfaces.

pub mod config;
pub mod service;

#[cfg(test)]
mod test_support;

use swipe_gen::PluginRegistry;

/// Registry holding every built-in plugin.
pub fn registry() -> PluginRegistry {
    let mut registry = PluginRegistry::new();
    registry
        .register(config::ID, config::STUB, config::ConfigPlugin::boxed)
        .register(service::ID, service::STUB, service::ServicePlugin::boxed);
    registry
}
