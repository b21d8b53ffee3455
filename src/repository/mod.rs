// ==========================================
// 校园宿舍分配系统 - 数据仓储层
// ==========================================
// 职责: 提供数据访问接口，屏蔽数据库细节
// 红线: Repository 不含业务逻辑
// 约束: 所有查询使用参数化，防止 SQL 注入
// ==========================================

pub mod error;
pub mod house_repo;
pub mod room_repo;

// 重导出核心仓储
pub use error::{RepositoryError, RepositoryResult};
pub use house_repo::HouseRepository;
pub use room_repo::RoomRepository;
