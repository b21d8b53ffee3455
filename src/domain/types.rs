// ==========================================
// 校园宿舍分配系统 - 领域类型定义
// ==========================================
// 红线: 性别与住宿类型为封闭枚举，不接受自由文本
// 序列化格式: SCREAMING_SNAKE_CASE (与数据库一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 性别分组 (Gender)
// ==========================================
// BOTH 仅对宿舍楼/混合房间有意义；容量规划只按 MALE/FEMALE 分桶
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    Male,   // 男
    Female, // 女
    Both,   // 混合
}

impl Gender {
    /// 数据库存储形式
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "MALE",
            Gender::Female => "FEMALE",
            Gender::Both => "BOTH",
        }
    }

    /// 从数据库文本解析（非法值返回 None）
    pub fn parse(s: &str) -> Option<Gender> {
        match s {
            "MALE" => Some(Gender::Male),
            "FEMALE" => Some(Gender::Female),
            "BOTH" => Some(Gender::Both),
            _ => None,
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 住宿类型 (Residency Type)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResidencyType {
    Mixed,    // 走读+寄宿混合
    Day,      // 走读
    Boarding, // 寄宿
}

impl ResidencyType {
    /// 数据库存储形式
    pub fn as_str(&self) -> &'static str {
        match self {
            ResidencyType::Mixed => "MIXED",
            ResidencyType::Day => "DAY",
            ResidencyType::Boarding => "BOARDING",
        }
    }

    /// 从数据库文本解析（非法值返回 None）
    pub fn parse(s: &str) -> Option<ResidencyType> {
        match s {
            "MIXED" => Some(ResidencyType::Mixed),
            "DAY" => Some(ResidencyType::Day),
            "BOARDING" => Some(ResidencyType::Boarding),
            _ => None,
        }
    }
}

impl fmt::Display for ResidencyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gender_round_trip() {
        for gender in [Gender::Male, Gender::Female, Gender::Both] {
            assert_eq!(Gender::parse(gender.as_str()), Some(gender));
        }
        assert_eq!(Gender::parse("OTHER"), None);
        assert_eq!(Gender::parse("male"), None);
    }

    #[test]
    fn test_gender_serde_format() {
        let json = serde_json::to_string(&Gender::Female).unwrap();
        assert_eq!(json, "\"FEMALE\"");
        let parsed: Gender = serde_json::from_str("\"BOTH\"").unwrap();
        assert_eq!(parsed, Gender::Both);
    }

    #[test]
    fn test_residency_type_round_trip() {
        for rt in [ResidencyType::Mixed, ResidencyType::Day, ResidencyType::Boarding] {
            assert_eq!(ResidencyType::parse(rt.as_str()), Some(rt));
        }
        assert_eq!(ResidencyType::parse(""), None);
    }
}
