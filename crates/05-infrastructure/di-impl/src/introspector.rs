//! 类型内省器
//!
//! 沿候选类型的祖先链查找最近的能力标记，提取 `(具体类型, 能力接口, 配置类型)`。

use di_abstractions::{Ancestor, CapabilityDescriptor, TypeCandidate};
use tracing::debug;

/// 提取候选类型的能力描述符
///
/// 规则：
/// - 最近的能力标记胜出；
/// - 标记的类型参数未封闭时跳过；
/// - 祖先链中没有标记时跳过；
/// - 从祖先继承来的标记，其具体类型必须与候选类型一致，否则无法激活，跳过。
pub fn introspect(candidate: &TypeCandidate) -> Option<CapabilityDescriptor> {
    let anchor = candidate.ancestry().iter().find(|a| a.is_anchor());

    match anchor {
        None => {
            debug!("跳过 {}: 未声明能力标记", candidate.type_info());
            None
        }
        Some(Ancestor::OpenCapability { definition }) => {
            debug!(
                "跳过 {}: 能力标记 {} 的类型参数未封闭",
                candidate.type_info(),
                definition
            );
            None
        }
        Some(Ancestor::Capability(descriptor)) => {
            if descriptor.concrete != candidate.type_info() {
                debug!(
                    "跳过 {}: 继承的能力标记属于 {}",
                    candidate.type_info(),
                    descriptor.concrete
                );
                return None;
            }
            debug!("识别能力: {}", descriptor);
            Some(*descriptor)
        }
        Some(Ancestor::Plain(_)) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use infrastructure_common::{Capability, CapabilityBase, Configuration, DependencyError};
    use std::sync::Arc;
    use uuid::Uuid;

    trait Store: Send + Sync {}
    trait Cache: Send + Sync {}

    #[derive(Debug)]
    struct StoreCfg;

    impl Configuration for StoreCfg {
        fn id(&self) -> Uuid {
            Uuid::nil()
        }

        fn name(&self) -> &str {
            "store"
        }
    }

    #[derive(Default)]
    struct DiskStore;

    impl Store for DiskStore {}
    impl Cache for DiskStore {}

    impl Capability for DiskStore {
        fn name(&self) -> &str {
            "disk"
        }

        fn is_running(&self) -> bool {
            true
        }
    }

    impl CapabilityBase for DiskStore {
        type Interface = dyn Store;
        type Config = StoreCfg;

        fn activate() -> Result<Self, DependencyError> {
            Ok(Self)
        }

        fn into_interface(self: Arc<Self>) -> Arc<dyn Store> {
            self
        }
    }

    struct Helper;

    #[test]
    fn test_direct_anchor_is_extracted() {
        let descriptor = introspect(&TypeCandidate::capability::<DiskStore>()).unwrap();

        assert!(descriptor.concrete.is::<DiskStore>());
        assert!(descriptor.interface.is::<dyn Store>());
        assert!(descriptor.configuration.is::<StoreCfg>());
    }

    #[test]
    fn test_plain_type_is_skipped() {
        assert!(introspect(&TypeCandidate::plain::<Helper>()).is_none());
    }

    #[test]
    fn test_open_anchor_is_skipped() {
        let candidate = TypeCandidate::plain::<Helper>().extends_open("StoreBase<I, K>");
        assert!(introspect(&candidate).is_none());
    }

    #[test]
    fn test_nearest_anchor_wins() {
        let candidate = TypeCandidate::capability::<DiskStore>().extends_open("StoreBase<I, K>");
        assert!(introspect(&candidate).is_some());

        let candidate = TypeCandidate::plain::<Helper>()
            .extends_open("StoreBase<I, K>")
            .extends(TypeCandidate::capability::<DiskStore>());
        assert!(introspect(&candidate).is_none());
    }

    #[test]
    fn test_inherited_anchor_of_other_type_is_skipped() {
        let candidate = TypeCandidate::plain::<Helper>().extends(TypeCandidate::capability::<DiskStore>());
        assert!(introspect(&candidate).is_none());
    }
}
