// ==========================================
// 校园宿舍分配系统 - 视图失效协作方接口
// ==========================================
// 职责: 成功变更后通知展示层按标签失效缓存
// 约束: 只在事务提交后调用；失败的分配不产生任何失效通知
// ==========================================

/// 缓存标签常量
pub mod tags {
    pub const HOUSES: &str = "houses";
    pub const ROOMS: &str = "rooms";
}

/// 视图失效协作方
///
/// 实际缓存/页面再验证由展示层提供（不在本库范围内）
pub trait ViewInvalidator: Send + Sync {
    /// 按标签失效视图缓存
    fn invalidate(&self, tags: &[&str]);
}

/// 空实现（无展示层缓存时使用）
pub struct NoopInvalidator;

impl ViewInvalidator for NoopInvalidator {
    fn invalidate(&self, _tags: &[&str]) {}
}
