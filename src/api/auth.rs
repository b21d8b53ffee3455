// ==========================================
// 校园宿舍分配系统 - 授权协作方接口
// ==========================================
// 职责: 定义权限校验的外部协作接口
// 约束: 权限失败必须在任何事务开始前短路
// ==========================================

use crate::api::error::{ApiError, ApiResult};

/// 权限名称常量
pub mod permissions {
    pub const CREATE_ROOMS: &str = "create:rooms";
    pub const VIEW_ROOMS: &str = "view:rooms";
    pub const CREATE_HOUSES: &str = "create:houses";
    pub const VIEW_HOUSES: &str = "view:houses";
    pub const EDIT_HOUSES: &str = "edit:houses";
    pub const DELETE_HOUSES: &str = "delete:houses";
}

/// 权限校验协作方
///
/// 实际鉴权由外部系统提供（会话/角色体系不在本库范围内）
pub trait PermissionChecker: Send + Sync {
    /// 校验操作者是否持有指定权限
    ///
    /// # 参数
    /// - actor: 操作者标识
    /// - permission_names: 所需权限名列表
    /// - require_all: true 要求全部持有，false 任一即可
    fn check_permissions(&self, actor: &str, permission_names: &[&str], require_all: bool)
        -> bool;
}

/// 校验辅助: 权限不足返回 Forbidden
pub fn require_permissions(
    checker: &dyn PermissionChecker,
    actor: &str,
    permission_names: &[&str],
) -> ApiResult<()> {
    if checker.check_permissions(actor, permission_names, true) {
        Ok(())
    } else {
        Err(ApiError::Forbidden(permission_names.join(", ")))
    }
}

/// 全放行实现（单机部署/测试环境用）
pub struct AllowAllPermissions;

impl PermissionChecker for AllowAllPermissions {
    fn check_permissions(&self, _actor: &str, _permission_names: &[&str], _require_all: bool) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct DenyAll;
    impl PermissionChecker for DenyAll {
        fn check_permissions(&self, _: &str, _: &[&str], _: bool) -> bool {
            false
        }
    }

    #[test]
    fn test_allow_all() {
        let checker = AllowAllPermissions;
        assert!(require_permissions(&checker, "alice", &[permissions::CREATE_ROOMS]).is_ok());
    }

    #[test]
    fn test_deny_surfaces_forbidden_with_permission_names() {
        let checker = DenyAll;
        let err = require_permissions(&checker, "bob", &[permissions::DELETE_HOUSES]).unwrap_err();
        match err {
            ApiError::Forbidden(msg) => assert!(msg.contains("delete:houses")),
            other => panic!("Expected Forbidden, got {other:?}"),
        }
    }
}
