// ==========================================
// 校园宿舍分配系统 - 运行时配置
// ==========================================
// 职责: 分配事务相关的可调参数
// 约束: 纯值对象，不做持久化
// ==========================================

use serde::{Deserialize, Serialize};

use crate::db::DEFAULT_BUSY_TIMEOUT_MS;

/// 分配核心运行时配置
///
/// # 字段
/// - busy_timeout_ms: SQLite busy_timeout，写锁等待上限
/// - max_allocation_retries: 分配事务遇到瞬态失败（busy 超时）时的重试次数
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResidencyConfig {
    pub busy_timeout_ms: u64,
    pub max_allocation_retries: u32,
}

impl Default for ResidencyConfig {
    fn default() -> Self {
        Self {
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            max_allocation_retries: 2,
        }
    }
}
