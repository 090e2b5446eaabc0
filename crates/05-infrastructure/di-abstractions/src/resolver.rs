//! 能力解析抽象接口

use infrastructure_common::{Configuration, ConfigurationKey, Outcome};
use std::fmt;
use std::sync::Arc;

/// 解析结果：能力实例及其配置
pub struct Resolved<I: ?Sized> {
    /// 能力实例
    pub capability: Arc<I>,
    /// 选中该能力的配置
    pub configuration: Arc<dyn Configuration>,
}

impl<I: ?Sized> Clone for Resolved<I> {
    fn clone(&self) -> Self {
        Self {
            capability: Arc::clone(&self.capability),
            configuration: Arc::clone(&self.configuration),
        }
    }
}

impl<I: ?Sized> fmt::Debug for Resolved<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolved")
            .field("configuration", &self.configuration)
            .finish()
    }
}

/// 能力解析器 trait
///
/// 按配置ID或名称解析能力：先查配置，再按 `Factory<I, 配置类型>` 查找绑定。
pub trait CapabilityResolver: Send + Sync {
    /// 解析能力及其配置
    fn resolve<I, K>(&self, key: K) -> Outcome<Resolved<I>>
    where
        I: ?Sized + Send + Sync + 'static,
        K: Into<ConfigurationKey>;

    /// 解析能力
    ///
    /// 配置不存在返回 `CFG_001`，形状未绑定返回 `DI_001`。
    fn get<I, K>(&self, key: K) -> Outcome<Arc<I>>
    where
        I: ?Sized + Send + Sync + 'static,
        K: Into<ConfigurationKey>,
    {
        self.resolve::<I, K>(key).map(|resolved| resolved.capability)
    }

    /// 尝试解析能力
    fn try_get<I, K>(&self, key: K) -> Option<Arc<I>>
    where
        I: ?Sized + Send + Sync + 'static,
        K: Into<ConfigurationKey>,
    {
        self.get::<I, K>(key).ok()
    }
}
