// ==========================================
// 校园宿舍分配系统 - 性别相容性检查引擎
// ==========================================
// 职责: 校验房间性别与宿舍楼性别策略的相容性
// 红线: 纯谓词，无副作用；错误消息为对外固定文案
// ==========================================

use thiserror::Error;

use crate::domain::types::Gender;

/// 对外固定文案（调用方原样渲染）
pub const GENDER_MISMATCH_MESSAGE: &str = "Room gender must align with the selected house.";

/// 性别不相容错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Room gender must align with the selected house.")]
pub struct IncompatibleGender {
    pub house_gender: Gender,
    pub room_gender: Gender,
}

/// 校验房间性别与宿舍楼性别策略
///
/// 规则:
/// - 混合楼（BOTH）接受任何房间性别（含 BOTH）
/// - 单一性别楼要求房间性别精确相等，且不接受 BOTH
pub fn ensure_gender_compatibility(
    house_gender: Gender,
    room_gender: Gender,
) -> Result<(), IncompatibleGender> {
    if house_gender == Gender::Both || house_gender == room_gender {
        return Ok(());
    }
    Err(IncompatibleGender {
        house_gender,
        room_gender,
    })
}
