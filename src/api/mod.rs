// ==========================================
// 校园宿舍分配系统 - API 层
// ==========================================
// 职责: 提供权限门控的业务 API 接口，供上层 handler 调用
// ==========================================

pub mod auth;
pub mod error;
pub mod house_api;
pub mod invalidate;
pub mod room_api;

// 重导出核心类型
pub use auth::{permissions, require_permissions, AllowAllPermissions, PermissionChecker};
pub use error::{ApiError, ApiResult, OCCUPANCY_PLAN_MISSING_MESSAGE};
pub use house_api::{HouseApi, NewHouseRequest, UpdateHouseRequest};
pub use invalidate::{tags, NoopInvalidator, ViewInvalidator};
pub use room_api::RoomApi;
