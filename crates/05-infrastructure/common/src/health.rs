//! 健康检查相关定义

use crate::metadata::TypeInfo;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 健康状态
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", content = "data")]
pub enum HealthStatus {
    /// 健康状态
    Healthy,
    /// 降级状态
    Degraded { message: String },
    /// 不健康状态
    Unhealthy { error: String },
}

impl HealthStatus {
    /// 创建健康状态
    pub fn healthy() -> Self {
        Self::Healthy
    }

    /// 创建降级状态
    pub fn degraded(message: impl Into<String>) -> Self {
        Self::Degraded {
            message: message.into(),
        }
    }

    /// 创建不健康状态
    pub fn unhealthy(error: impl Into<String>) -> Self {
        Self::Unhealthy {
            error: error.into(),
        }
    }

    /// 检查是否健康
    pub fn is_healthy(&self) -> bool {
        matches!(self, Self::Healthy)
    }

    /// 检查是否降级
    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }

    /// 检查是否不健康
    pub fn is_unhealthy(&self) -> bool {
        matches!(self, Self::Unhealthy { .. })
    }
}

/// 单个能力的健康检查结果
#[derive(Debug, Clone)]
pub struct CapabilityHealth {
    /// 能力名称
    pub name: String,
    /// 具体类型
    pub concrete: TypeInfo,
    /// 健康状态
    pub status: HealthStatus,
    /// 检查时间
    pub checked_at: chrono::DateTime<chrono::Utc>,
}

impl CapabilityHealth {
    /// 创建新的健康检查结果
    pub fn new(name: impl Into<String>, concrete: TypeInfo, status: HealthStatus) -> Self {
        Self {
            name: name.into(),
            concrete,
            status,
            checked_at: chrono::Utc::now(),
        }
    }
}

/// 健康报告
#[derive(Debug, Clone, Default)]
pub struct HealthReport {
    /// 各能力的检查结果
    pub entries: Vec<CapabilityHealth>,
}

impl HealthReport {
    /// 整体健康状态
    ///
    /// 任一能力不健康则整体不健康，其次是降级。
    pub fn overall(&self) -> HealthStatus {
        let unhealthy: Vec<&str> = self
            .entries
            .iter()
            .filter(|e| e.status.is_unhealthy())
            .map(|e| e.name.as_str())
            .collect();
        if !unhealthy.is_empty() {
            return HealthStatus::unhealthy(format!(
                "{}个能力不健康: {}",
                unhealthy.len(),
                unhealthy.join(", ")
            ));
        }

        let degraded = self.entries.iter().filter(|e| e.status.is_degraded()).count();
        if degraded > 0 {
            return HealthStatus::degraded(format!("{}个能力降级", degraded));
        }

        HealthStatus::healthy()
    }

    /// 按能力名称索引
    pub fn by_name(&self) -> HashMap<&str, &HealthStatus> {
        self.entries
            .iter()
            .map(|e| (e.name.as_str(), &e.status))
            .collect()
    }
}
