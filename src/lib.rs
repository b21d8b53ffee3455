// ==========================================
// 校园宿舍分配系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 学校管理系统的住宿分配核心
//           （容量约束 + 性别门禁 + 并发安全的房间分配）
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 业务规则
pub mod engine;

// 配置层 - 运行时配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA/建表统一）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{
    Gender, GenderOccupancy, GenderUsage, House, NewRoomRequest, OccupancyPlan, ResidencyType,
    Room,
};

// 引擎
pub use engine::{
    ensure_gender_compatibility, generate_room_code, next_sequence_number, preview_usage,
    UsagePreview, GENDER_MISMATCH_MESSAGE, SEQUENCE_LENGTH,
};

// API
pub use api::{
    ApiError, ApiResult, HouseApi, NewHouseRequest, PermissionChecker, RoomApi,
    UpdateHouseRequest, ViewInvalidator,
};

// 仓储
pub use repository::{HouseRepository, RepositoryError, RoomRepository};

// 配置
pub use config::ResidencyConfig;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "校园宿舍分配系统";
