// ==========================================
// 校园宿舍分配系统 - 引擎层
// ==========================================
// 职责: 纯业务规则（编码生成、性别门禁、占用预览）
// 红线: 引擎不做持久化，不持有连接
// ==========================================

pub mod capacity;
pub mod gender_check;
pub mod room_code;

// 重导出核心接口
pub use capacity::{preview_usage, UsagePreview};
pub use gender_check::{ensure_gender_compatibility, IncompatibleGender, GENDER_MISMATCH_MESSAGE};
pub use room_code::{generate_room_code, next_sequence_number, SEQUENCE_LENGTH};
