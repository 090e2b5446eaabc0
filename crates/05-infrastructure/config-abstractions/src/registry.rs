//! 配置注册表抽象接口

use infrastructure_common::{Configuration, ConfigurationKey};
use std::sync::Arc;
use uuid::Uuid;

/// 配置注册表 trait
///
/// 解析门面通过它按ID或名称取得配置；配置的运行时类型决定绑定形状。
pub trait ConfigurationRegistry: Send + Sync {
    /// 按ID获取配置
    fn get(&self, id: Uuid) -> Option<Arc<dyn Configuration>>;

    /// 按名称获取配置
    fn get_by_name(&self, name: &str) -> Option<Arc<dyn Configuration>>;

    /// 获取全部配置
    fn get_all(&self) -> Vec<Arc<dyn Configuration>>;

    /// 按查找键获取配置
    fn find(&self, key: &ConfigurationKey) -> Option<Arc<dyn Configuration>> {
        match key {
            ConfigurationKey::Id(id) => self.get(*id),
            ConfigurationKey::Name(name) => self.get_by_name(name),
        }
    }
}

impl<R: ConfigurationRegistry + ?Sized> ConfigurationRegistry for Arc<R> {
    fn get(&self, id: Uuid) -> Option<Arc<dyn Configuration>> {
        (**self).get(id)
    }

    fn get_by_name(&self, name: &str) -> Option<Arc<dyn Configuration>> {
        (**self).get_by_name(name)
    }

    fn get_all(&self) -> Vec<Arc<dyn Configuration>> {
        (**self).get_all()
    }
}
