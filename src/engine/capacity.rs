// ==========================================
// 校园宿舍分配系统 - 占用预览引擎
// ==========================================
// 职责: 提交前 UX 预览用的分桶占用估算
// 红线: 仅供前端预览展示。BOTH 性别房间会被同时计入男女两个分桶
//       （有意的重复计数，帮助用户看到"最坏占用"）。
//       分配事务的权威校验走 RoomRepository::aggregate_usage_tx
//       的 rm_gender 精确匹配口径，绝不调用本模块。
// ==========================================

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::domain::room::{GenderUsage, Room};
use crate::domain::types::Gender;

/// 分桶占用预览（男女两桶）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsagePreview {
    pub male: GenderUsage,
    pub female: GenderUsage,
}

/// 计算宿舍楼的占用预览
///
/// BOTH 房间同时计入两个分桶；结果只用于表单预览，不参与容量校验
#[instrument(skip(rooms), fields(rooms_count = rooms.len()))]
pub fn preview_usage(rooms: &[Room]) -> UsagePreview {
    let mut preview = UsagePreview::default();

    for room in rooms {
        if matches!(room.rm_gender, Gender::Male | Gender::Both) {
            preview.male.room_count += 1;
            preview.male.bed_count += room.capacity;
        }
        if matches!(room.rm_gender, Gender::Female | Gender::Both) {
            preview.female.room_count += 1;
            preview.female.bed_count += room.capacity;
        }
    }

    preview
}
