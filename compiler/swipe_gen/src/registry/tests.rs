use pretty_assertions::assert_eq;

use super::PluginRegistry;
use crate::test_support::{FakePlugin, ECHO_STUB};

#[test]
fn plugins_are_listed_by_id() {
    let mut registry = PluginRegistry::new();
    registry
        .register("Service", "", FakePlugin::boxed)
        .register("Echo", ECHO_STUB, FakePlugin::boxed)
        .register("Config", "", FakePlugin::boxed);
    assert_eq!(registry.ids(), vec!["Config", "Echo", "Service"]);
    assert_eq!(registry.len(), 3);
}

#[test]
fn entries_create_plugins_and_expose_stubs() {
    let mut registry = PluginRegistry::new();
    registry.register("Echo", ECHO_STUB, FakePlugin::boxed);
    let entry = registry
        .get("Echo")
        .unwrap_or_else(|| panic!("Echo not registered"));
    assert_eq!(entry.package_name(), "echo");
    assert!(entry.stub.contains("@swipe:\"Echo\""));
    let plugin = registry
        .create("Echo")
        .unwrap_or_else(|| panic!("Echo not created"));
    assert_eq!(plugin.id(), "Echo");
    assert!(registry.create("Missing").is_none());
}

#[test]
fn empty_registry() {
    let registry = PluginRegistry::new();
    assert!(registry.is_empty());
    assert_eq!(registry.iter().count(), 0);
}
