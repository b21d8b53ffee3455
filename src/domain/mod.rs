// ==========================================
// 校园宿舍分配系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、业务规则接口
// 红线: 不含数据访问逻辑，不含引擎逻辑
// ==========================================

pub mod house;
pub mod room;
pub mod types;

// 重导出核心类型
pub use house::{GenderOccupancy, House, OccupancyPlan, PlanError};
pub use room::{GenderUsage, NewRoomRequest, Room};
pub use types::{Gender, ResidencyType};
