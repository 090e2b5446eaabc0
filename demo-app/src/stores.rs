//! 示例键值存储能力
//!
//! 两种实现共用同一个能力接口 [`KeyValue`]，按配置类型区分：
//! `FileStoreCfg` 解析到 [`FileStore`]，`MemoryStoreCfg` 解析到 [`MemoryStore`]。

use async_trait::async_trait;
use capability_macros::Capability;
use infrastructure_common::{
    messages, CancellationToken, Configuration, ConfigurationType, Execute, Message, Outcome,
    Severity,
};
use parking_lot::Mutex;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;

/// 存储读写失败
pub const STORAGE_FAILED: Message = Message::new("KV_001", "存储操作失败: {0}", Severity::Error);

/// 内存存储容量已满
pub const CAPACITY_EXCEEDED: Message =
    Message::new("KV_002", "存储 {0} 已满, 容量 {1}", Severity::Warning);

/// 键不是单一的普通路径段
pub const INVALID_KEY: Message = Message::new("KV_003", "无效的键: {0}", Severity::Error);

/// 键值操作
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KvOp {
    /// 读取
    Get { key: String },
    /// 写入
    Put { key: String, value: String },
}

/// 键值命令：操作及其所属的配置
#[derive(Debug, Clone)]
pub struct KvCommand {
    /// 选中能力的配置
    pub configuration: Arc<dyn Configuration>,
    /// 操作
    pub op: KvOp,
}

/// 键值存储能力接口
pub trait KeyValue: Execute<KvCommand, Output = Option<String>> {}

impl<T> KeyValue for T where T: Execute<KvCommand, Output = Option<String>> {}

/// 文件存储配置
#[derive(Debug, Deserialize)]
pub struct FileStoreCfg {
    pub id: Uuid,
    pub name: String,
    pub root: PathBuf,
}

impl Configuration for FileStoreCfg {
    fn id(&self) -> Uuid {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// 内存存储配置
#[derive(Debug, Deserialize)]
pub struct MemoryStoreCfg {
    pub id: Uuid,
    pub name: String,
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

fn default_capacity() -> usize {
    1024
}

impl Configuration for MemoryStoreCfg {
    fn id(&self) -> Uuid {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

fn typed<K: Configuration>(command: &KvCommand) -> Outcome<&K> {
    match command.configuration.downcast_ref::<K>() {
        Some(config) => Outcome::success(config),
        None => Outcome::failure(messages::TYPE_MISMATCH.format([
            std::any::type_name::<K>().to_string(),
            command.configuration.type_info().to_string(),
        ])),
    }
}

/// 键在 `root` 下对应的文件路径；只接受普通路径段，不允许跳出 `root`
fn key_path(root: &Path, key: &str) -> Outcome<PathBuf> {
    let relative = Path::new(key);
    let mut components = relative.components().peekable();
    let normal = components.peek().is_some()
        && components.all(|component| matches!(component, Component::Normal(_)));
    if !normal {
        return Outcome::failure(INVALID_KEY.format([key]));
    }
    Outcome::success(root.join(relative))
}

/// 文件存储：每个键对应 `root` 下的一个文件
#[derive(Default, Capability)]
#[capability(interface = dyn KeyValue, config = FileStoreCfg, name = "file-store")]
pub struct FileStore;

#[async_trait]
impl Execute<KvCommand> for FileStore {
    type Output = Option<String>;

    async fn execute(&self, command: KvCommand, cancellation: CancellationToken) -> Outcome<Option<String>> {
        if cancellation.is_cancelled() {
            return Outcome::failure(messages::OPERATION_CANCELLED.format(["file-store"]));
        }

        let config = match typed::<FileStoreCfg>(&command) {
            Outcome::Success(config) => config,
            Outcome::Failure(message) => return Outcome::failure(message),
        };

        let key = match &command.op {
            KvOp::Get { key } | KvOp::Put { key, .. } => key,
        };
        let path = match key_path(&config.root, key) {
            Outcome::Success(path) => path,
            Outcome::Failure(message) => return Outcome::failure(message),
        };

        match &command.op {
            KvOp::Get { .. } => match tokio::fs::read_to_string(&path).await {
                Ok(value) => Outcome::success(Some(value)),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Outcome::success(None),
                Err(e) => Outcome::failure(STORAGE_FAILED.format([e])),
            },
            KvOp::Put { value, .. } => {
                let written = async {
                    if let Some(parent) = path.parent() {
                        tokio::fs::create_dir_all(parent).await?;
                    }
                    tokio::fs::write(&path, value).await
                };
                match written.await {
                    Ok(()) => Outcome::success(None),
                    Err(e) => Outcome::failure(STORAGE_FAILED.format([e])),
                }
            }
        }
    }
}

/// 内存存储：按配置隔离的键值表
#[derive(Default, Capability)]
#[capability(interface = dyn KeyValue, config = MemoryStoreCfg, name = "memory-store")]
pub struct MemoryStore {
    tables: Mutex<HashMap<Uuid, HashMap<String, String>>>,
}

#[async_trait]
impl Execute<KvCommand> for MemoryStore {
    type Output = Option<String>;

    async fn execute(&self, command: KvCommand, cancellation: CancellationToken) -> Outcome<Option<String>> {
        if cancellation.is_cancelled() {
            return Outcome::failure(messages::OPERATION_CANCELLED.format(["memory-store"]));
        }

        let config = match typed::<MemoryStoreCfg>(&command) {
            Outcome::Success(config) => config,
            Outcome::Failure(message) => return Outcome::failure(message),
        };

        let mut tables = self.tables.lock();
        let table = tables.entry(config.id).or_default();
        match &command.op {
            KvOp::Get { key } => Outcome::success(table.get(key).cloned()),
            KvOp::Put { key, value } => {
                if !table.contains_key(key) && table.len() >= config.capacity {
                    return Outcome::failure(CAPACITY_EXCEEDED.format([
                        config.name.clone(),
                        config.capacity.to_string(),
                    ]));
                }
                Outcome::success(table.insert(key.clone(), value.clone()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_cfg(capacity: usize) -> Arc<dyn Configuration> {
        Arc::new(MemoryStoreCfg {
            id: Uuid::new_v4(),
            name: "scratch".to_string(),
            capacity,
        })
    }

    fn put(configuration: &Arc<dyn Configuration>, key: &str, value: &str) -> KvCommand {
        KvCommand {
            configuration: Arc::clone(configuration),
            op: KvOp::Put {
                key: key.to_string(),
                value: value.to_string(),
            },
        }
    }

    #[tokio::test]
    async fn test_memory_store_respects_capacity() {
        let store = MemoryStore::default();
        let cfg = memory_cfg(1);

        assert!(store.execute(put(&cfg, "a", "1"), CancellationToken::new()).await.is_success());
        let outcome = store.execute(put(&cfg, "b", "2"), CancellationToken::new()).await;

        assert!(outcome.is_failure_with("KV_002"));
        assert_eq!(outcome.message().unwrap().render(), "存储 scratch 已满, 容量 1");
    }

    #[tokio::test]
    async fn test_wrong_configuration_type_is_mismatch() {
        let store = FileStore;
        let command = put(&memory_cfg(1), "a", "1");

        let outcome = store.execute(command, CancellationToken::new()).await;

        assert!(outcome.is_failure_with("DI_004"));
    }

    #[tokio::test]
    async fn test_file_store_rejects_keys_outside_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("data");
        let cfg: Arc<dyn Configuration> = Arc::new(FileStoreCfg {
            id: Uuid::new_v4(),
            name: "primary".to_string(),
            root: root.clone(),
        });
        let store = FileStore;

        for key in ["../escaped", "/etc/passwd", "a/../../b", ""] {
            let outcome = store.execute(put(&cfg, key, "x"), CancellationToken::new()).await;
            assert!(outcome.is_failure_with("KV_003"), "key {:?} should be rejected", key);
        }
        assert!(!dir.path().join("escaped").exists());

        let nested = store.execute(put(&cfg, "logs/today", "ok"), CancellationToken::new()).await;
        assert!(nested.is_success());
        assert!(root.join("logs").join("today").exists());
    }

    #[tokio::test]
    async fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let cfg: Arc<dyn Configuration> = Arc::new(FileStoreCfg {
            id: Uuid::new_v4(),
            name: "primary".to_string(),
            root: dir.path().join("data"),
        });
        let store = FileStore;

        store.invoke(put(&cfg, "greeting", "hello")).await.into_value();
        let get = KvCommand {
            configuration: cfg,
            op: KvOp::Get {
                key: "greeting".to_string(),
            },
        };

        let value = store.execute(get, CancellationToken::new()).await.into_value();
        assert_eq!(value.as_deref(), Some("hello"));
    }
}
