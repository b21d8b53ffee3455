// ==========================================
// 校园宿舍分配系统 - 房间领域模型
// ==========================================
// 职责: Room 实体与分配请求/聚合值对象
// 红线: Room 只能经由分配事务创建，编码由系统生成
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::types::Gender;

// ==========================================
// Room - 房间实体
// ==========================================

/// 房间实体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub room_id: String,
    pub code: String,      // 生成的唯一编码，如 BH-0001
    pub house_id: String,  // 所属宿舍楼
    pub rm_gender: Gender, // MALE / FEMALE / BOTH
    pub capacity: u32,     // 床位数（正整数）
    pub created_at: NaiveDateTime,
}

impl Room {
    /// 创建新的房间实体（生成 room_id 与时间戳）
    pub fn new(house_id: String, code: String, rm_gender: Gender, capacity: u32) -> Self {
        Self {
            room_id: Uuid::new_v4().to_string(),
            code,
            house_id,
            rm_gender,
            capacity,
            created_at: chrono::Local::now().naive_local(),
        }
    }
}

// ==========================================
// NewRoomRequest - 分配请求
// ==========================================

/// 房间分配请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRoomRequest {
    pub house_id: String,
    pub rm_gender: Gender,
    pub capacity: u32,
}

// ==========================================
// GenderUsage - 分桶占用聚合
// ==========================================

/// 某宿舍楼某性别分桶的当前占用
///
/// 权威口径: 按 rm_gender 精确匹配聚合（见 RoomRepository::aggregate_usage_tx）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenderUsage {
    pub room_count: u32, // 已有房间数
    pub bed_count: u32,  // 已有床位总数
}
