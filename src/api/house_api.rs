// ==========================================
// 校园宿舍分配系统 - 宿舍楼生命周期 API
// ==========================================
// 职责: 宿舍楼创建、查询、更新、删除、批量删除
// 约束: 入住规划每次读写都重新解析校验；
//       更新收紧规划时不回溯校验既有房间（房间只在创建时校验）
// ==========================================

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::api::auth::{permissions, require_permissions, PermissionChecker};
use crate::api::error::{ApiError, ApiResult};
use crate::api::invalidate::{tags, ViewInvalidator};
use crate::domain::house::{House, OccupancyPlan};
use crate::domain::types::{Gender, ResidencyType};
use crate::engine::room_code::SEQUENCE_LENGTH;
use crate::repository::house_repo::HouseRepository;

/// 单楼单性别可规划的房间数上限（受编码序号宽度约束）
const MAX_PLAN_ROOM_COUNT: u32 = 10u32.pow(SEQUENCE_LENGTH as u32) - 1;

// ==========================================
// 请求类型
// ==========================================

/// 创建宿舍楼请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewHouseRequest {
    pub name: String,
    pub house_gender: Gender,
    pub residency_type: ResidencyType,
    pub occupancy_plan: OccupancyPlan,
    pub house_master_id: Option<String>,
}

/// 更新宿舍楼请求（全量字段）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateHouseRequest {
    pub house_id: String,
    pub name: String,
    pub house_gender: Gender,
    pub residency_type: ResidencyType,
    pub occupancy_plan: OccupancyPlan,
    pub house_master_id: Option<String>,
}

// ==========================================
// HouseApi - 宿舍楼生命周期 API
// ==========================================

/// 宿舍楼生命周期API
///
/// 职责：
/// 1. 宿舍楼 CRUD（含入住规划校验）
/// 2. 批量删除（单事务）
/// 3. 变更后的视图失效
pub struct HouseApi {
    house_repo: Arc<HouseRepository>,
    permissions: Arc<dyn PermissionChecker>,
    invalidator: Arc<dyn ViewInvalidator>,
}

impl HouseApi {
    /// 创建新的HouseApi实例
    pub fn new(
        house_repo: Arc<HouseRepository>,
        permissions: Arc<dyn PermissionChecker>,
        invalidator: Arc<dyn ViewInvalidator>,
    ) -> Self {
        Self {
            house_repo,
            permissions,
            invalidator,
        }
    }

    /// 创建宿舍楼
    ///
    /// # 返回
    /// - Err(BadRequest): 名称为空或规划与楼栋性别不一致
    /// - Err(UniqueConstraint): 名称重复
    #[instrument(skip(self, request), fields(name = %request.name, house_gender = %request.house_gender))]
    pub fn create_house(&self, actor: &str, request: NewHouseRequest) -> ApiResult<House> {
        require_permissions(self.permissions.as_ref(), actor, &[permissions::CREATE_HOUSES])?;

        if request.name.trim().is_empty() {
            return Err(ApiError::BadRequest("House name must not be empty.".to_string()));
        }
        request
            .occupancy_plan
            .validate_for_house_gender(request.house_gender)
            .map_err(|e| ApiError::BadRequest(e.to_string()))?;
        validate_plan_room_counts(&request.occupancy_plan)?;

        let house = House::new(
            request.name,
            request.house_gender,
            request.residency_type,
            request.occupancy_plan,
            request.house_master_id,
        );
        self.house_repo.insert(&house)?;

        info!(house_id = %house.house_id, "宿舍楼创建成功");
        self.invalidator.invalidate(&[tags::HOUSES]);
        Ok(house)
    }

    /// 查询全部宿舍楼
    pub fn get_houses(&self, actor: &str) -> ApiResult<Vec<House>> {
        require_permissions(self.permissions.as_ref(), actor, &[permissions::VIEW_HOUSES])?;
        Ok(self.house_repo.find_all()?)
    }

    /// 按 ID 查询宿舍楼
    ///
    /// # 返回
    /// - Err(NotFound): house_id 不存在
    pub fn get_house_by_id(&self, actor: &str, house_id: &str) -> ApiResult<House> {
        require_permissions(self.permissions.as_ref(), actor, &[permissions::VIEW_HOUSES])?;

        self.house_repo
            .find_by_id(house_id)?
            .ok_or_else(|| ApiError::NotFound(format!("House(id={house_id}) not found")))
    }

    /// 更新宿舍楼
    ///
    /// 入住规划整体替换并重新校验。既有房间不随规划收紧而重新校验，
    /// 房间约束只在创建时生效。
    #[instrument(skip(self, request), fields(house_id = %request.house_id))]
    pub fn update_house(&self, actor: &str, request: UpdateHouseRequest) -> ApiResult<House> {
        require_permissions(self.permissions.as_ref(), actor, &[permissions::EDIT_HOUSES])?;

        if request.name.trim().is_empty() {
            return Err(ApiError::BadRequest("House name must not be empty.".to_string()));
        }
        request
            .occupancy_plan
            .validate_for_house_gender(request.house_gender)
            .map_err(|e| ApiError::BadRequest(e.to_string()))?;
        validate_plan_room_counts(&request.occupancy_plan)?;

        let mut house = self
            .house_repo
            .find_by_id(&request.house_id)?
            .ok_or_else(|| ApiError::NotFound(format!("House(id={}) not found", request.house_id)))?;

        house.name = request.name;
        house.house_gender = request.house_gender;
        house.residency_type = request.residency_type;
        house.occupancy_plan = request.occupancy_plan;
        house.house_master_id = request.house_master_id;
        house.updated_at = chrono::Local::now().naive_local();

        self.house_repo.update(&house)?;

        info!(house_id = %house.house_id, "宿舍楼更新成功");
        self.invalidator.invalidate(&[tags::HOUSES]);
        Ok(house)
    }

    /// 删除宿舍楼
    ///
    /// 级联行为: 所属房间随外键 ON DELETE CASCADE 一并删除
    ///
    /// # 返回
    /// - Err(NotFound): house_id 不存在
    #[instrument(skip(self))]
    pub fn delete_house(&self, actor: &str, house_id: &str) -> ApiResult<()> {
        require_permissions(self.permissions.as_ref(), actor, &[permissions::DELETE_HOUSES])?;

        let deleted = self.house_repo.delete(house_id)?;
        if !deleted {
            return Err(ApiError::NotFound(format!("House(id={house_id}) not found")));
        }

        info!(house_id, "宿舍楼删除成功");
        self.invalidator.invalidate(&[tags::HOUSES, tags::ROOMS]);
        Ok(())
    }

    /// 批量删除宿舍楼（单事务）
    ///
    /// # 返回
    /// - Ok(usize): 实际删除的楼栋数（不存在的 ID 跳过）
    #[instrument(skip(self, house_ids), fields(requested = house_ids.len()))]
    pub fn bulk_delete_houses(&self, actor: &str, house_ids: &[String]) -> ApiResult<usize> {
        require_permissions(self.permissions.as_ref(), actor, &[permissions::DELETE_HOUSES])?;

        if house_ids.is_empty() {
            return Err(ApiError::BadRequest("House id list must not be empty.".to_string()));
        }

        let deleted = self.house_repo.bulk_delete(house_ids)?;

        info!(deleted, "宿舍楼批量删除完成");
        self.invalidator.invalidate(&[tags::HOUSES, tags::ROOMS]);
        Ok(deleted)
    }
}

/// 规划的房间数不得超出编码序号的固定宽度所能表示的范围，
/// 否则分配到边界时编码会失去定宽与唯一性
fn validate_plan_room_counts(plan: &OccupancyPlan) -> ApiResult<()> {
    for bucket in [&plan.male_occupancy, &plan.female_occupancy] {
        if bucket.room_count > MAX_PLAN_ROOM_COUNT {
            return Err(ApiError::BadRequest(format!(
                "Room count per gender must not exceed {MAX_PLAN_ROOM_COUNT}."
            )));
        }
    }
    Ok(())
}
