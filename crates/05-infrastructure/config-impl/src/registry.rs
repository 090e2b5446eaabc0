//! 内存配置注册表实现

use config_abstractions::ConfigurationRegistry;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use infrastructure_common::{ConfigError, Configuration, ConfigurationType};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// 内存配置注册表
///
/// ID 和名称都必须唯一。
#[derive(Debug, Default)]
pub struct InMemoryConfigurationRegistry {
    by_id: DashMap<Uuid, Arc<dyn Configuration>>,
    by_name: DashMap<String, Uuid>,
}

impl InMemoryConfigurationRegistry {
    /// 创建空的注册表
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加配置
    pub fn insert(&self, config: Arc<dyn Configuration>) -> Result<(), ConfigError> {
        let id = config.id();
        let name = config.name().to_string();

        match self.by_name.entry(name.clone()) {
            Entry::Occupied(_) => {
                return Err(ConfigError::DuplicateConfiguration { id: name });
            }
            Entry::Vacant(slot) => match self.by_id.entry(id) {
                Entry::Occupied(_) => {
                    return Err(ConfigError::DuplicateConfiguration { id: id.to_string() });
                }
                Entry::Vacant(id_slot) => {
                    debug!(
                        "添加配置: {} ({}) -> {}",
                        name,
                        id,
                        config.type_info()
                    );
                    id_slot.insert(config);
                    slot.insert(id);
                }
            },
        }

        Ok(())
    }

    /// 添加具体类型的配置
    pub fn insert_typed<K: Configuration>(&self, config: K) -> Result<(), ConfigError> {
        self.insert(Arc::new(config))
    }

    /// 配置数量
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

impl ConfigurationRegistry for InMemoryConfigurationRegistry {
    fn get(&self, id: Uuid) -> Option<Arc<dyn Configuration>> {
        self.by_id.get(&id).map(|entry| Arc::clone(entry.value()))
    }

    fn get_by_name(&self, name: &str) -> Option<Arc<dyn Configuration>> {
        let id = *self.by_name.get(name)?.value();
        self.get(id)
    }

    fn get_all(&self) -> Vec<Arc<dyn Configuration>> {
        let mut all: Vec<Arc<dyn Configuration>> = self
            .by_id
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();
        all.sort_by(|a, b| a.name().cmp(b.name()));
        all
    }
}
