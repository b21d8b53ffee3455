// ==========================================
// 校园宿舍分配系统 - 宿舍楼领域模型
// ==========================================
// 职责: House 实体与入住规划（Occupancy Plan）值对象
// 红线: 入住规划以 JSON 列持久化，每次读取都必须重新解析校验，
//       形状不符时必须"响亮失败"，禁止静默降级
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::types::{Gender, ResidencyType};

// ==========================================
// 入住规划错误
// ==========================================

/// 入住规划解析/校验错误
#[derive(Error, Debug)]
pub enum PlanError {
    #[error("入住规划JSON解析失败: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("入住规划不合法: {0}")]
    Invalid(String),
}

// ==========================================
// GenderOccupancy - 单性别分桶规划
// ==========================================

/// 单性别分桶规划
///
/// # 字段
/// - room_count: 该分桶允许的最大房间数（0 表示禁止建房）
/// - room_capacity: 该分桶允许的最大总床位数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GenderOccupancy {
    pub room_count: u32,
    pub room_capacity: u32,
}

impl GenderOccupancy {
    /// 空规划（禁止建房）
    pub fn zero() -> Self {
        Self {
            room_count: 0,
            room_capacity: 0,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.room_count == 0 && self.room_capacity == 0
    }
}

// ==========================================
// OccupancyPlan - 宿舍楼入住规划
// ==========================================
// 约束: 两个分桶都必须存在；未知字段视为形状漂移，解析失败

/// 宿舍楼入住规划（按性别分桶）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OccupancyPlan {
    pub male_occupancy: GenderOccupancy,
    pub female_occupancy: GenderOccupancy,
}

impl OccupancyPlan {
    pub fn new(male_occupancy: GenderOccupancy, female_occupancy: GenderOccupancy) -> Self {
        Self {
            male_occupancy,
            female_occupancy,
        }
    }

    /// 从持久化 JSON 解析入住规划
    ///
    /// # 返回
    /// - Ok(OccupancyPlan): 解析成功
    /// - Err(PlanError::Malformed): 存储数据与期望形状不符
    pub fn from_json(json: &str) -> Result<Self, PlanError> {
        let plan: OccupancyPlan = serde_json::from_str(json)?;
        Ok(plan)
    }

    /// 序列化为持久化 JSON
    pub fn to_json(&self) -> Result<String, PlanError> {
        Ok(serde_json::to_string(self)?)
    }

    /// 选择与房间性别匹配的分桶规划
    ///
    /// BOTH 没有对应分桶（设计上未定义），返回 None，由调用方报错
    pub fn sub_plan(&self, gender: Gender) -> Option<&GenderOccupancy> {
        match gender {
            Gender::Male => Some(&self.male_occupancy),
            Gender::Female => Some(&self.female_occupancy),
            Gender::Both => None,
        }
    }

    /// 校验规划与宿舍楼性别的一致性
    ///
    /// 规则: 单一性别宿舍楼只允许对应分桶有值，另一分桶必须为零
    pub fn validate_for_house_gender(&self, house_gender: Gender) -> Result<(), PlanError> {
        match house_gender {
            Gender::Both => Ok(()),
            Gender::Male if !self.female_occupancy.is_zero() => Err(PlanError::Invalid(
                "male house must not declare a female occupancy plan".to_string(),
            )),
            Gender::Female if !self.male_occupancy.is_zero() => Err(PlanError::Invalid(
                "female house must not declare a male occupancy plan".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

// ==========================================
// House - 宿舍楼实体
// ==========================================

/// 宿舍楼实体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct House {
    pub house_id: String,
    pub name: String,              // 唯一
    pub house_gender: Gender,      // MALE / FEMALE / BOTH
    pub residency_type: ResidencyType,
    pub occupancy_plan: OccupancyPlan,
    pub house_master_id: Option<String>, // 外部教职工引用，不在本库强约束
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl House {
    /// 创建新的宿舍楼实体（生成 house_id 与时间戳）
    pub fn new(
        name: String,
        house_gender: Gender,
        residency_type: ResidencyType,
        occupancy_plan: OccupancyPlan,
        house_master_id: Option<String>,
    ) -> Self {
        let now = chrono::Local::now().naive_local();
        Self {
            house_id: Uuid::new_v4().to_string(),
            name,
            house_gender,
            residency_type,
            occupancy_plan,
            house_master_id,
            created_at: now,
            updated_at: now,
        }
    }
}
