// ==========================================
// 校园宿舍分配系统 - API层错误类型
// ==========================================
// 职责: 定义对外错误分类，转换 Repository 错误为调用方可渲染的错误
// 约束: 领域类错误携带固定文案，调用方原样渲染 message
// ==========================================

use thiserror::Error;

use crate::domain::types::Gender;
use crate::engine::gender_check::IncompatibleGender;
use crate::repository::error::RepositoryError;

/// 对外固定文案: 所选性别没有对应的入住规划分桶
pub const OCCUPANCY_PLAN_MISSING_MESSAGE: &str = "Occupancy plan missing for selected gender.";

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 权限错误（事务开始前短路）
    // ==========================================
    #[error("Caller lacks required permission: {0}")]
    Forbidden(String),

    // ==========================================
    // 业务规则错误
    // ==========================================
    #[error("{0}")]
    NotFound(String),

    /// 性别门禁、缺失分桶规划、入住规划形状漂移、非法输入
    #[error("{0}")]
    BadRequest(String),

    /// 房间数超过分桶上限
    #[error("Number of rooms exceeds the limit for the specified gender")]
    RoomCountExceeded {
        gender: Gender,
        limit: u32,
        attempted: u32,
    },

    /// 床位数超过分桶上限
    #[error("Bed capacity exceeds the limit for the specified gender")]
    RoomCapacityExceeded {
        gender: Gender,
        limit: u32,
        attempted: u32,
    },

    // ==========================================
    // 持久化约束错误
    // ==========================================
    #[error("Unique constraint violated: {0}")]
    UniqueConstraint(String),

    #[error("Foreign key constraint violated: {0}")]
    ForeignKeyError(String),

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    /// 事务获取/提交失败（含 busy 超时，调用方可重试）
    #[error("数据库事务失败: {0}")]
    DatabaseTransactionError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ==========================================
// 从 RepositoryError 转换
// 目的: 将仓储层的技术错误归入对外错误分类；
//       无法归类的错误透传，不吞错
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{entity}(id={id}) not found"))
            }
            RepositoryError::UniqueConstraintViolation(msg) => ApiError::UniqueConstraint(msg),
            RepositoryError::ForeignKeyViolation(msg) => ApiError::ForeignKeyError(msg),

            // 入住规划形状漂移/字段非法 -> 请求级错误（响亮失败）
            RepositoryError::ValidationError(msg) => ApiError::BadRequest(msg),
            RepositoryError::FieldValueError { field, message } => {
                ApiError::BadRequest(format!("字段{field}错误: {message}"))
            }

            RepositoryError::DatabaseConnectionError(msg) => ApiError::DatabaseConnectionError(msg),
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseConnectionError(format!("数据库锁获取失败: {msg}"))
            }
            RepositoryError::DatabaseTransactionError(msg) => {
                ApiError::DatabaseTransactionError(msg)
            }
            RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),

            RepositoryError::InternalError(msg) => ApiError::InternalError(msg),
            RepositoryError::Other(err) => ApiError::Other(err),
        }
    }
}

// 性别门禁违规 -> BadRequest，携带固定文案
impl From<IncompatibleGender> for ApiError {
    fn from(err: IncompatibleGender) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
