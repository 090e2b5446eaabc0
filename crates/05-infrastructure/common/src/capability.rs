//! 能力契约
//!
//! 服务、连接和工具都是能力：具有名称、运行/健康状态，以及
//! `execute(command) -> Outcome<T>`。
//!
//! [`CapabilityBase`] 是静态声明的能力标记，携带两个类型参数：
//! 能力接口（通常是 `dyn Trait`）和配置类型。注册层只依赖这个标记，
//! 不做任何基于名称的运行时推断。

use crate::configuration::Configuration;
use crate::errors::DependencyError;
use crate::health::HealthStatus;
use crate::lifecycle::LifecycleState;
use crate::message::messages;
use crate::outcome::Outcome;
use async_trait::async_trait;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// 能力基础 trait
#[async_trait]
pub trait Capability: Send + Sync + 'static {
    /// 能力名称
    fn name(&self) -> &str;

    /// 是否运行中
    fn is_running(&self) -> bool;

    /// 健康检查
    async fn health(&self) -> HealthStatus {
        if self.is_running() {
            HealthStatus::healthy()
        } else {
            HealthStatus::unhealthy(messages::NOT_RUNNING.format([self.name()]).render())
        }
    }
}

/// 命令执行
///
/// 以命令类型参数化，使强类型调用方在编译期获得检查。
#[async_trait]
pub trait Execute<C>: Capability
where
    C: Send + 'static,
{
    /// 执行结果类型
    type Output: Send + 'static;

    /// 执行命令
    ///
    /// 取消令牌只负责透传，具体如何响应取消由实现决定。
    async fn execute(&self, command: C, cancellation: CancellationToken) -> Outcome<Self::Output>;

    /// 执行命令并丢弃结果值
    async fn invoke(&self, command: C) -> Outcome<()> {
        self.execute(command, CancellationToken::new())
            .await
            .map(|_| ())
    }
}

/// 服务能力
#[async_trait]
pub trait Service: Capability {
    /// 启动服务
    async fn start(&self) -> Outcome<()>;

    /// 停止服务
    async fn stop(&self) -> Outcome<()>;

    /// 当前生命周期状态
    fn state(&self) -> LifecycleState;
}

/// 连接能力
#[async_trait]
pub trait Connection: Capability {
    /// 打开连接
    async fn open(&self, cancellation: CancellationToken) -> Outcome<()>;

    /// 关闭连接
    async fn close(&self) -> Outcome<()>;

    /// 连接是否已打开
    fn is_open(&self) -> bool;
}

/// 能力标记
///
/// 声明具体类型满足的能力接口和配置类型。每个类型最多实现一次，
/// 因此一个具体类型最多产生一个能力描述符。
///
/// ```ignore
/// impl CapabilityBase for FileConn {
///     type Interface = dyn Store;
///     type Config = FileCfg;
///
///     fn activate() -> Result<Self, DependencyError> {
///         Ok(Self::default())
///     }
///
///     fn into_interface(self: Arc<Self>) -> Arc<dyn Store> {
///         self
///     }
/// }
/// ```
pub trait CapabilityBase: Capability + Sized {
    /// 能力接口
    type Interface: ?Sized + Send + Sync + 'static;

    /// 配置类型
    type Config: Configuration;

    /// 创建能力实例（注册时调用一次）
    fn activate() -> Result<Self, DependencyError>;

    /// 转换为能力接口
    fn into_interface(self: Arc<Self>) -> Arc<Self::Interface>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    #[derive(Default)]
    struct Counter {
        running: AtomicBool,
        hits: AtomicUsize,
    }

    impl Capability for Counter {
        fn name(&self) -> &str {
            "counter"
        }

        fn is_running(&self) -> bool {
            self.running.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Execute<usize> for Counter {
        type Output = usize;

        async fn execute(&self, command: usize, cancellation: CancellationToken) -> Outcome<usize> {
            if cancellation.is_cancelled() {
                return Outcome::failure(messages::OPERATION_CANCELLED.format([self.name()]));
            }
            Outcome::success(self.hits.fetch_add(command, Ordering::SeqCst) + command)
        }
    }

    #[tokio::test]
    async fn test_execute_and_invoke() {
        let counter = Counter::default();

        let outcome = counter.execute(2, CancellationToken::new()).await;
        assert_eq!(outcome.into_value(), 2);

        assert!(counter.invoke(3).await.is_success());
        assert_eq!(counter.hits.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn test_cancellation_token_is_passed_through() {
        let counter = Counter::default();
        let token = CancellationToken::new();
        token.cancel();

        let outcome = counter.execute(1, token).await;
        assert!(outcome.is_failure_with("GEN_002"));
    }

    #[tokio::test]
    async fn test_default_health_follows_running_flag() {
        let counter = Counter::default();
        assert!(counter.health().await.is_unhealthy());

        counter.running.store(true, Ordering::SeqCst);
        assert!(counter.health().await.is_healthy());
    }
}
