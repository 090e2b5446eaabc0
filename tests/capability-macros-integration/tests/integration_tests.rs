//! `#[derive(Capability)]` 的集成测试

use async_trait::async_trait;
use config_impl::InMemoryConfigurationRegistry;
use di_abstractions::{CapabilityRegistry, CapabilityResolver, TypeSource};
use di_impl::{BindingRegistry, CapabilityResolverImpl, InventoryTypeSource};
use infrastructure_common::{
    Capability, CapabilityBase, Configuration, LifecycleState, Outcome, Service,
};
use std::sync::Arc;
use uuid::Uuid;

#[async_trait]
pub trait Store: Send + Sync {
    fn backend(&self) -> &'static str;

    async fn put(&self, key: &str, value: &str) -> Outcome<()>;
}

#[derive(Debug)]
pub struct DiskCfg {
    id: Uuid,
    name: String,
}

#[derive(Debug)]
pub struct MemoryCfg {
    id: Uuid,
    name: String,
}

impl Configuration for DiskCfg {
    fn id(&self) -> Uuid {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Configuration for MemoryCfg {
    fn id(&self) -> Uuid {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

mod stores {
    use super::*;
    use capability_macros::Capability;
    use infrastructure_common::{DependencyError, LifecycleCell};
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default, Capability)]
    #[capability(interface = dyn Store, config = DiskCfg, name = "disk", lifecycle = state)]
    pub struct DiskStore {
        pub state: LifecycleCell,
    }

    #[async_trait]
    impl Store for DiskStore {
        fn backend(&self) -> &'static str {
            "disk"
        }

        async fn put(&self, _key: &str, _value: &str) -> Outcome<()> {
            Outcome::done()
        }
    }

    #[async_trait]
    impl Service for DiskStore {
        async fn start(&self) -> Outcome<()> {
            let started = self
                .state
                .transition(LifecycleState::Starting)
                .and_then(|_| self.state.transition(LifecycleState::Running));
            match started {
                Ok(_) => Outcome::done(),
                Err(e) => Outcome::failure(infrastructure_common::Message::custom(
                    "SVC_001",
                    e.to_string(),
                    infrastructure_common::Severity::Error,
                )),
            }
        }

        async fn stop(&self) -> Outcome<()> {
            let _ = self.state.transition(LifecycleState::Stopping);
            let _ = self.state.transition(LifecycleState::Stopped);
            Outcome::done()
        }

        fn state(&self) -> LifecycleState {
            self.state.get()
        }
    }

    #[derive(Capability)]
    #[capability(interface = dyn Store, config = MemoryCfg, activate = MemoryStore::warm)]
    pub struct MemoryStore {
        pub entries: Mutex<HashMap<String, String>>,
    }

    impl MemoryStore {
        fn warm() -> Result<Self, DependencyError> {
            let entries = HashMap::from([("seed".to_string(), "1".to_string())]);
            Ok(Self {
                entries: Mutex::new(entries),
            })
        }
    }

    impl Capability for MemoryStore {
        fn name(&self) -> &str {
            "memory"
        }

        fn is_running(&self) -> bool {
            true
        }
    }

    #[async_trait]
    impl Store for MemoryStore {
        fn backend(&self) -> &'static str {
            "memory"
        }

        async fn put(&self, key: &str, value: &str) -> Outcome<()> {
            if let Ok(mut entries) = self.entries.lock() {
                entries.insert(key.to_string(), value.to_string());
            }
            Outcome::done()
        }
    }

    #[derive(Default, Capability)]
    #[capability(interface = dyn Store, config = MemoryCfg, name = "manual", skip_inventory)]
    pub struct ManualStore;

    #[async_trait]
    impl Store for ManualStore {
        fn backend(&self) -> &'static str {
            "manual"
        }

        async fn put(&self, _key: &str, _value: &str) -> Outcome<()> {
            Outcome::done()
        }
    }
}

mod plugins {
    use super::*;
    use capability_macros::Capability;

    #[derive(Default, Capability)]
    #[capability(interface = dyn Store, config = DiskCfg, name = "plugin-disk")]
    pub struct PluginDiskStore;

    #[async_trait]
    impl Store for PluginDiskStore {
        fn backend(&self) -> &'static str {
            "plugin-disk"
        }

        async fn put(&self, _key: &str, _value: &str) -> Outcome<()> {
            Outcome::done()
        }
    }
}

use plugins::PluginDiskStore;
use stores::{DiskStore, ManualStore, MemoryStore};

fn stores_module() -> String {
    format!("{}::stores", module_path!())
}

#[test]
fn test_derive_declares_marker_types() {
    let descriptor = di_abstractions::CapabilityDescriptor::of::<DiskStore>();

    assert!(descriptor.interface.is::<dyn Store>());
    assert!(descriptor.configuration.is::<DiskCfg>());
    assert!(<MemoryStore as CapabilityBase>::activate().is_ok());
}

#[test]
fn test_inventory_filters_by_module() {
    let source = InventoryTypeSource::for_module(stores_module());

    let candidates = source.candidates();

    assert_eq!(candidates.len(), 2);
    assert!(candidates.iter().any(|c| c.type_info().is::<DiskStore>()));
    assert!(candidates.iter().any(|c| c.type_info().is::<MemoryStore>()));
    assert!(!candidates.iter().any(|c| c.type_info().is::<ManualStore>()));
    assert!(!candidates.iter().any(|c| c.type_info().is::<PluginDiskStore>()));
}

#[test]
fn test_whole_crate_inventory_includes_plugins() {
    let candidates = InventoryTypeSource::for_module(module_path!()).candidates();

    assert_eq!(candidates.len(), 3);
    assert!(candidates.iter().any(|c| c.type_info().is::<PluginDiskStore>()));
}

#[test]
fn test_custom_activate_function_is_used() {
    let registry = BindingRegistry::default();
    registry
        .register_sources(&[&InventoryTypeSource::for_module(stores_module())])
        .into_value();

    let memory = registry.binding_of::<MemoryStore>().unwrap().concrete::<MemoryStore>().unwrap();

    assert_eq!(memory.entries.lock().unwrap().get("seed").map(String::as_str), Some("1"));
}

#[test]
fn test_skipped_type_can_be_registered_manually() {
    let registry = BindingRegistry::default();

    registry.register_instance(Arc::new(ManualStore)).into_value();

    assert_eq!(registry.factory::<dyn Store>().unwrap().backend(), "manual");
}

#[tokio::test]
async fn test_derived_capability_resolves_and_reports_health() {
    let registry = Arc::new(BindingRegistry::default());
    registry
        .register_sources(&[&InventoryTypeSource::for_module(stores_module())])
        .into_value();

    let configurations = Arc::new(InMemoryConfigurationRegistry::new());
    configurations
        .insert_typed(DiskCfg {
            id: Uuid::new_v4(),
            name: "primary".to_string(),
        })
        .unwrap();
    let resolver = CapabilityResolverImpl::new(registry.clone(), configurations);

    let store = resolver.get::<dyn Store, _>("primary").into_value();
    assert_eq!(store.backend(), "disk");
    assert!(store.put("k", "v").await.is_success());

    let disk = registry.binding_of::<DiskStore>().unwrap().concrete::<DiskStore>().unwrap();
    assert_eq!(disk.name(), "disk");
    assert!(!disk.is_running());
    assert!(disk.health().await.is_unhealthy());

    assert!(disk.start().await.is_success());
    assert_eq!(disk.state(), LifecycleState::Running);
    let report = registry.health_report().await;
    assert!(report.by_name()["disk"].is_healthy());

    assert!(disk.stop().await.is_success());
    assert!(!disk.is_running());
}
