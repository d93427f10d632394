//! Module lifecycle tests
//!
//! Tests for license-gated init, settings collection and shutdown.

use serde_json::json;
use std::sync::Arc;

use module_registry::config::{LicenseConfig, RegistryConfig};
use module_registry::module::builtin::{registry_from_config, EXTERNAL_SECRETS_LICENSE};
use module_registry::module::{ModuleName, RegistryError, StaticLicense, StaticModuleCatalog};

use super::test_utils::*;

const FEAT_BAZ: &str = "feat:baz";

async fn booted(fixture: &RegistryFixture, modules: &[&str]) {
    fixture
        .registry
        .load_modules(Some(names(modules).as_slice()))
        .await
        .unwrap();
    fixture.registry.init_modules().await.unwrap();
}

#[tokio::test]
async fn test_unlicensed_module_is_skipped() {
    let log = CallLog::default();
    let baz = MockModule::new("baz", &log).with_settings(json!({ "a": 1 }));
    let fixture = RegistryFixture::new(
        StaticModuleCatalog::new().standard(baz.declaration().licensed(FEAT_BAZ.into())),
        StaticLicense::unlicensed(),
        &log,
    );

    booted(&fixture, &["baz"]).await;

    assert!(!fixture.registry.is_active(&name("baz")));
    assert!(fixture.registry.settings_for(&name("baz")).is_none());
    assert_eq!(log.count("baz:init"), 0);
}

#[tokio::test]
async fn test_licensed_module_reports_settings() {
    let log = CallLog::default();
    let baz = MockModule::new("baz", &log).with_settings(json!({ "a": 1 }));
    let fixture = RegistryFixture::new(
        StaticModuleCatalog::new().standard(baz.declaration().licensed(FEAT_BAZ.into())),
        licensed(&[FEAT_BAZ]),
        &log,
    );

    booted(&fixture, &["baz"]).await;

    assert_eq!(fixture.registry.settings_for(&name("baz")), Some(json!({ "a": 1 })));
    assert_eq!(fixture.registry.active_modules(), vec![name("baz")]);
    assert_eq!(log.calls(), vec!["baz:entities", "baz:load_dir", "baz:init", "baz:settings"]);
}

#[tokio::test]
async fn test_module_without_settings_is_still_active() {
    let log = CallLog::default();
    let fixture = RegistryFixture::new(
        StaticModuleCatalog::new().standard(MockModule::new("quiet", &log).declaration()),
        StaticLicense::unlicensed(),
        &log,
    );

    booted(&fixture, &["quiet"]).await;

    assert!(fixture.registry.is_active(&name("quiet")));
    assert!(fixture.registry.settings().is_empty());
}

#[tokio::test]
async fn test_shutdown_is_repeatable() {
    let log = CallLog::default();
    let fixture = RegistryFixture::new(
        StaticModuleCatalog::new()
            .standard(MockModule::new("foo", &log).declaration())
            .standard(MockModule::new("bar", &log).declaration()),
        StaticLicense::unlicensed(),
        &log,
    );
    booted(&fixture, &["foo", "bar"]).await;

    fixture.registry.shutdown_module(&name("foo")).await.unwrap();
    assert_eq!(fixture.registry.active_modules(), vec![name("bar")]);

    fixture.registry.shutdown_module(&name("foo")).await.unwrap();
    assert_eq!(log.count("foo:shutdown"), 2);
    assert_eq!(fixture.registry.active_modules(), vec![name("bar")]);
}

#[tokio::test]
async fn test_shutdown_of_unregistered_module_is_a_noop() {
    let log = CallLog::default();
    let fixture = RegistryFixture::new(
        StaticModuleCatalog::new().standard(MockModule::new("foo", &log).declaration()),
        StaticLicense::unlicensed(),
        &log,
    );
    booted(&fixture, &["foo"]).await;

    fixture.registry.shutdown_module(&name("nope")).await.unwrap();
    assert_eq!(fixture.registry.active_modules(), vec![name("foo")]);
    assert_eq!(log.count("foo:shutdown"), 0);
}

#[tokio::test]
async fn test_shutdown_failure_keeps_module_active() {
    let log = CallLog::default();
    let fixture = RegistryFixture::new(
        StaticModuleCatalog::new()
            .standard(MockModule::new("stuck", &log).failing_on("shutdown").declaration()),
        StaticLicense::unlicensed(),
        &log,
    );
    booted(&fixture, &["stuck"]).await;

    let err = fixture
        .registry
        .shutdown_module(&name("stuck"))
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::Shutdown { ref name, .. } if name.as_str() == "stuck"));
    assert!(fixture.registry.is_active(&name("stuck")));
}

#[tokio::test]
async fn test_init_failure_aborts_remaining_modules() {
    let log = CallLog::default();
    let fixture = RegistryFixture::new(
        StaticModuleCatalog::new()
            .standard(MockModule::new("first", &log).declaration())
            .standard(MockModule::new("broken", &log).failing_on("init").declaration())
            .standard(MockModule::new("last", &log).declaration()),
        StaticLicense::unlicensed(),
        &log,
    );
    fixture
        .registry
        .load_modules(Some(names(&["first", "broken", "last"]).as_slice()))
        .await
        .unwrap();

    let err = fixture.registry.init_modules().await.unwrap_err();
    assert!(matches!(err, RegistryError::Init { ref name, .. } if name.as_str() == "broken"));
    assert_eq!(fixture.registry.active_modules(), vec![name("first")]);
    assert_eq!(log.count("last:init"), 0);
    assert_eq!(log.count("broken:settings"), 0);
}

#[tokio::test]
async fn test_settings_failure_leaves_module_inactive() {
    let log = CallLog::default();
    let fixture = RegistryFixture::new(
        StaticModuleCatalog::new()
            .standard(MockModule::new("chatty", &log).failing_on("settings").declaration()),
        StaticLicense::unlicensed(),
        &log,
    );
    fixture
        .registry
        .load_modules(Some(names(&["chatty"]).as_slice()))
        .await
        .unwrap();

    let err = fixture.registry.init_modules().await.unwrap_err();
    assert!(matches!(err, RegistryError::Settings { .. }));
    assert!(fixture.registry.active_modules().is_empty());
}

#[tokio::test]
async fn test_reinit_after_shutdown() {
    let log = CallLog::default();
    let fixture = RegistryFixture::new(
        StaticModuleCatalog::new().standard(MockModule::new("foo", &log).declaration()),
        StaticLicense::unlicensed(),
        &log,
    );
    booted(&fixture, &["foo"]).await;
    fixture.registry.shutdown_all().await.unwrap();
    assert!(fixture.registry.active_modules().is_empty());

    fixture.registry.init_modules().await.unwrap();
    assert_eq!(fixture.registry.active_modules(), vec![name("foo")]);
    assert_eq!(log.count("foo:init"), 2);
}

#[tokio::test]
async fn test_shutdown_all_runs_in_reverse_order() {
    let log = CallLog::default();
    let fixture = RegistryFixture::new(
        StaticModuleCatalog::new()
            .standard(MockModule::new("foo", &log).declaration())
            .standard(MockModule::new("bar", &log).declaration()),
        StaticLicense::unlicensed(),
        &log,
    );
    booted(&fixture, &["foo", "bar"]).await;
    fixture.registry.shutdown_all().await.unwrap();

    let shutdowns: Vec<_> = log
        .calls()
        .into_iter()
        .filter(|call| call.ends_with(":shutdown"))
        .collect();
    assert_eq!(shutdowns, vec!["bar:shutdown", "foo:shutdown"]);
}

#[test]
fn test_eligibility_follows_config_changes() {
    let log = CallLog::default();
    let fixture = RegistryFixture::new(StaticModuleCatalog::new(), StaticLicense::unlicensed(), &log);

    assert!(fixture.registry.eligible_modules().unwrap().is_empty());

    fixture.enable(&["foo", "bar"]);
    assert_eq!(fixture.registry.eligible_modules().unwrap(), names(&["foo", "bar"]));

    fixture.disable(&["bar"]);
    let err = fixture.registry.eligible_modules().unwrap_err();
    assert!(err.to_string().contains("bar"));
}

#[tokio::test]
async fn test_registry_is_shareable_across_tasks() {
    let log = CallLog::default();
    let fixture = RegistryFixture::new(
        StaticModuleCatalog::new()
            .standard(MockModule::new("foo", &log).declaration())
            .standard(MockModule::new("bar", &log).declaration()),
        StaticLicense::unlicensed(),
        &log,
    );

    let registry = Arc::clone(&fixture.registry);
    tokio::spawn(async move {
        registry
            .load_modules(Some(names(&["foo", "bar"]).as_slice()))
            .await
            .unwrap();
        registry.init_modules().await.unwrap();
    })
    .await
    .unwrap();

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let registry = Arc::clone(&fixture.registry);
            tokio::spawn(async move { registry.active_modules() })
        })
        .collect();
    for reader in readers {
        assert_eq!(reader.await.unwrap(), names(&["foo", "bar"]));
    }
}

#[tokio::test]
async fn test_builtin_registry_without_license() {
    let registry = registry_from_config(&RegistryConfig::default());
    assert_eq!(
        registry.eligible_modules().unwrap(),
        vec![ModuleName::INSIGHTS, ModuleName::EXTERNAL_SECRETS]
    );

    registry.load_modules(None).await.unwrap();
    registry.init_modules().await.unwrap();

    assert_eq!(registry.active_modules(), vec![ModuleName::INSIGHTS]);
    let insights = registry.settings_for(&ModuleName::INSIGHTS).unwrap();
    assert_eq!(insights["summary"], json!(true));
    assert!(registry.settings_for(&ModuleName::EXTERNAL_SECRETS).is_none());

    registry.shutdown_all().await.unwrap();
    assert!(registry.active_modules().is_empty());
}

#[tokio::test]
async fn test_builtin_registry_with_license() {
    let config = RegistryConfig {
        license: LicenseConfig {
            features: vec![EXTERNAL_SECRETS_LICENSE],
        },
        ..Default::default()
    };
    let registry = registry_from_config(&config);

    registry.load_modules(None).await.unwrap();
    registry.init_modules().await.unwrap();

    assert_eq!(
        registry.active_modules(),
        vec![ModuleName::INSIGHTS, ModuleName::EXTERNAL_SECRETS]
    );
    let secrets = registry.settings_for(&ModuleName::EXTERNAL_SECRETS).unwrap();
    assert_eq!(secrets["updateIntervalSeconds"], json!(300));
    assert!(!registry.entities().is_empty());
}
