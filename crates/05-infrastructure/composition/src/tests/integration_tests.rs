//! 能力宿主构建器集成测试

use crate::builder::{CapabilityHostBuilder, LoggingConfig};
use async_trait::async_trait;
use config_abstractions::{ConfigurationRegistry, FnValidator};
use di_abstractions::{CapabilityRegistry, CapabilityResolver, RegistrationPolicy};
use infrastructure_common::{Configuration, InfrastructureError, Outcome, ValidationError};
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Once;
use tempfile::TempDir;
use uuid::Uuid;

static INIT_LOGGER: Once = Once::new();

/// 初始化测试日志系统（只初始化一次）
fn init_test_logger() {
    INIT_LOGGER.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("debug")
            .try_init()
            .ok();
    });
}

#[async_trait]
pub trait Conn: Send + Sync {
    fn kind(&self) -> &'static str;

    async fn fetch(&self, key: &str) -> Outcome<String>;
}

#[derive(Debug, Deserialize)]
pub struct FileCfg {
    id: Uuid,
    name: String,
    path: String,
}

#[derive(Debug, Deserialize)]
pub struct MemCfg {
    id: Uuid,
    name: String,
    #[serde(default)]
    capacity: usize,
}

impl Configuration for FileCfg {
    fn id(&self) -> Uuid {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Configuration for MemCfg {
    fn id(&self) -> Uuid {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

mod connections {
    use super::*;
    use capability_macros::Capability;

    #[derive(Default, Capability)]
    #[capability(interface = dyn Conn, config = FileCfg, name = "file-conn")]
    pub struct FileConn;

    #[async_trait]
    impl Conn for FileConn {
        fn kind(&self) -> &'static str {
            "file"
        }

        async fn fetch(&self, key: &str) -> Outcome<String> {
            Outcome::success(format!("file:{}", key))
        }
    }

    #[derive(Default, Capability)]
    #[capability(interface = dyn Conn, config = MemCfg, name = "mem-conn")]
    pub struct MemConn;

    #[async_trait]
    impl Conn for MemConn {
        fn kind(&self) -> &'static str {
            "mem"
        }

        async fn fetch(&self, key: &str) -> Outcome<String> {
            Outcome::success(format!("mem:{}", key))
        }
    }
}

mod competing {
    use super::*;
    use capability_macros::Capability;

    #[derive(Default, Capability)]
    #[capability(interface = dyn Conn, config = FileCfg, name = "mirror-conn")]
    pub struct MirrorConn;

    #[async_trait]
    impl Conn for MirrorConn {
        fn kind(&self) -> &'static str {
            "mirror"
        }

        async fn fetch(&self, key: &str) -> Outcome<String> {
            Outcome::success(format!("mirror:{}", key))
        }
    }
}

fn connections_module() -> String {
    format!("{}::connections", module_path!())
}

fn competing_module() -> String {
    format!("{}::competing", module_path!())
}

fn write_config(dir: &TempDir, host: &str, memory_capacity: usize) -> PathBuf {
    let path = dir.path().join("capabilities.toml");
    let content = format!(
        r#"{host}

[[configurations]]
kind = "file"
id = "{file_id}"
name = "primary"
path = "/var/lib/demo"

[[configurations]]
kind = "memory"
id = "{mem_id}"
name = "scratch"
capacity = {memory_capacity}
"#,
        host = host,
        file_id = Uuid::new_v4(),
        mem_id = Uuid::new_v4(),
        memory_capacity = memory_capacity,
    );
    std::fs::write(&path, content).unwrap();
    path
}

fn builder() -> CapabilityHostBuilder {
    CapabilityHostBuilder::new()
        .register_kind::<FileCfg>("file")
        .register_kind::<MemCfg>("memory")
        .add_validator::<MemCfg, _>(FnValidator::new("capacity", |cfg: &MemCfg| {
            if cfg.capacity == 0 {
                Err(vec![ValidationError::invalid_field_value("capacity", "0", "必须大于 0")])
            } else {
                Ok(())
            }
        }))
}

#[tokio::test]
async fn test_host_resolves_capabilities_from_file() {
    init_test_logger();
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, "", 16);

    let host = builder()
        .add_config_file(&path)
        .unwrap()
        .scan_module(connections_module())
        .build()
        .unwrap();

    assert_eq!(host.configuration_names(), vec!["primary", "scratch"]);
    assert_eq!(host.registration().discovered.len(), 2);
    let file_cfg = host.configurations().get_by_name("primary").unwrap();
    assert_eq!(file_cfg.downcast_ref::<FileCfg>().unwrap().path, "/var/lib/demo");

    let primary = host.get::<dyn Conn, _>("primary").into_value();
    assert_eq!(primary.kind(), "file");
    assert_eq!(primary.fetch("a").await.into_value(), "file:a");

    let scratch = host.resolve::<dyn Conn, _>("scratch").into_value();
    assert_eq!(scratch.capability.kind(), "mem");
    let cfg = scratch.configuration.downcast_ref::<MemCfg>().unwrap();
    assert_eq!(cfg.capacity, 16);

    assert!(host.get::<dyn Conn, _>("missing").is_failure_with("CFG_001"));
}

#[tokio::test]
async fn test_validation_failures_are_reported() {
    init_test_logger();
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, "", 0);

    let host = builder()
        .add_config_file(&path)
        .unwrap()
        .scan_module(connections_module())
        .build()
        .unwrap();

    let messages = host.load_report().failure_messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].code(), "CFG_002");
    assert_eq!(host.configuration_names(), vec!["primary"]);
    assert!(host.get::<dyn Conn, _>("scratch").is_failure_with("CFG_001"));
}

#[tokio::test]
async fn test_reject_invalid_from_host_section() {
    init_test_logger();
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, "[host]\nreject_invalid = true", 0);

    let result = builder().add_config_file(&path).unwrap().build();

    assert!(matches!(
        result,
        Err(InfrastructureError::ConfigError { .. })
    ));
}

#[tokio::test]
async fn test_first_wins_is_the_default_policy() {
    init_test_logger();
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, "", 16);

    let host = builder()
        .add_config_file(&path)
        .unwrap()
        .scan_module(connections_module())
        .scan_module(competing_module())
        .build()
        .unwrap();

    assert_eq!(host.options().policy, RegistrationPolicy::FirstWins);
    assert!(!host.registration().ambiguities.is_empty());
    assert_eq!(host.get::<dyn Conn, _>("primary").into_value().kind(), "file");
    assert_eq!(host.registry().len(), 2);
}

#[tokio::test]
async fn test_strict_policy_from_host_section() {
    init_test_logger();
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, "[host]\npolicy = \"strict\"", 16);

    let result = builder()
        .add_config_file(&path)
        .unwrap()
        .scan_module(connections_module())
        .scan_module(competing_module())
        .build();

    match result {
        Err(InfrastructureError::RegistrationRejected { message }) => {
            assert_eq!(message.code(), "DI_002");
        }
        other => panic!("expected strict rejection, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn test_health_report_after_build() {
    let host = builder()
        .with_logging(LoggingConfig::development())
        .scan_module(connections_module())
        .build()
        .unwrap();

    let report = host.health_report().await;

    assert_eq!(report.entries.len(), 2);
    assert!(report.overall().is_healthy());
    assert_eq!(host.registry().bindings().len(), 2);
}
