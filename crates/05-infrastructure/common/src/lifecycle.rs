//! 服务生命周期状态

use crate::errors::LifecycleError;
use parking_lot::RwLock;
use std::fmt;

/// 生命周期状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// 已停止（初始状态）
    Stopped,
    /// 启动中
    Starting,
    /// 运行中
    Running,
    /// 停止中
    Stopping,
    /// 故障
    Faulted,
}

impl Default for LifecycleState {
    fn default() -> Self {
        Self::Stopped
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl LifecycleState {
    /// 是否允许转换到目标状态
    pub fn can_transition_to(self, next: LifecycleState) -> bool {
        use LifecycleState::*;
        matches!(
            (self, next),
            (Stopped, Starting)
                | (Faulted, Starting)
                | (Starting, Running)
                | (Starting, Faulted)
                | (Running, Stopping)
                | (Running, Faulted)
                | (Stopping, Stopped)
                | (Stopping, Faulted)
        )
    }
}

/// 线程安全的生命周期状态单元
///
/// 供服务实现内部记录状态，只允许合法转换。
#[derive(Debug, Default)]
pub struct LifecycleCell {
    state: RwLock<LifecycleState>,
}

impl LifecycleCell {
    /// 创建处于 `Stopped` 的状态单元
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前状态
    pub fn get(&self) -> LifecycleState {
        *self.state.read()
    }

    /// 是否运行中
    pub fn is_running(&self) -> bool {
        self.get() == LifecycleState::Running
    }

    /// 转换到目标状态
    pub fn transition(&self, next: LifecycleState) -> Result<LifecycleState, LifecycleError> {
        let mut state = self.state.write();
        if !state.can_transition_to(next) {
            return Err(LifecycleError::InvalidTransition {
                from: state.to_string(),
                to: next.to_string(),
            });
        }
        let previous = *state;
        *state = next;
        Ok(previous)
    }
}
