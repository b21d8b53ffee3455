// ==========================================
// 校园宿舍分配系统 - 房间分配 API
// ==========================================
// 职责: 房间分配事务（核心）、房间查询、占用预览
// 红线: 分配事务整体运行在 BEGIN IMMEDIATE（写锁先行）之下，
//       性别门禁 -> 容量校验 -> 序号推导 -> 编码生成 -> 落库
//       的校验顺序严格不可打乱；任何一步失败整体回滚
// ==========================================

use rusqlite::{Connection, TransactionBehavior};
use std::sync::{Arc, Mutex};
use tracing::{info, instrument, warn};

use crate::api::auth::{permissions, require_permissions, PermissionChecker};
use crate::api::error::{ApiError, ApiResult, OCCUPANCY_PLAN_MISSING_MESSAGE};
use crate::api::invalidate::{tags, ViewInvalidator};
use crate::config::ResidencyConfig;
use crate::domain::room::{NewRoomRequest, Room};
use crate::engine::capacity::{preview_usage, UsagePreview};
use crate::engine::gender_check::ensure_gender_compatibility;
use crate::engine::room_code::{generate_room_code, next_sequence_number};
use crate::repository::house_repo::HouseRepository;
use crate::repository::room_repo::RoomRepository;

// ==========================================
// RoomApi - 房间分配 API
// ==========================================

/// 房间分配API
///
/// 职责：
/// 1. 房间分配事务（容量约束 + 性别门禁 + 编码生成，原子提交）
/// 2. 房间列表查询
/// 3. 提交前占用预览（仅供 UX，非权威口径）
pub struct RoomApi {
    conn: Arc<Mutex<Connection>>,
    room_repo: Arc<RoomRepository>,
    permissions: Arc<dyn PermissionChecker>,
    invalidator: Arc<dyn ViewInvalidator>,
    config: ResidencyConfig,
}

impl RoomApi {
    /// 创建新的RoomApi实例
    ///
    /// # 参数
    /// - conn: 共享数据库连接（分配事务在其上执行）
    /// - room_repo: 房间仓储（查询用，应基于同一连接构建）
    /// - permissions: 授权协作方
    /// - invalidator: 视图失效协作方
    /// - config: 运行时配置
    pub fn new(
        conn: Arc<Mutex<Connection>>,
        room_repo: Arc<RoomRepository>,
        permissions: Arc<dyn PermissionChecker>,
        invalidator: Arc<dyn ViewInvalidator>,
        config: ResidencyConfig,
    ) -> Self {
        Self {
            conn,
            room_repo,
            permissions,
            invalidator,
            config,
        }
    }

    // ==========================================
    // 核心操作: 房间分配事务
    // ==========================================

    /// 分配房间
    ///
    /// 事务内步骤（顺序固定，NotFound 永远先于其他校验）:
    /// 1. 加载宿舍楼（不存在 -> NotFound）
    /// 2. 容量入参校验（capacity = 0 -> BadRequest）
    /// 3. 性别门禁
    /// 4. 解析入住规划并选择分桶（BOTH 无分桶 -> BadRequest）
    /// 5. 聚合当前占用（rm_gender 精确匹配）
    /// 6. 房间数上限校验 -> RoomCountExceeded
    /// 7. 床位数上限校验 -> RoomCapacityExceeded
    /// 8. 推导下一序号（最近编码尾部，畸形回退 1）
    /// 9. 生成编码
    /// 10. 落库（唯一/外键冲突翻译为对应错误）
    ///
    /// 提交成功后触发 houses/rooms 视图失效。
    /// busy 超时视为瞬态失败，按配置重试。
    ///
    /// # 返回
    /// - Ok(Room): 分配成功的房间
    /// - Err(ApiError): 见 §错误分类
    #[instrument(skip(self, request), fields(
        house_id = %request.house_id,
        rm_gender = %request.rm_gender,
        capacity = request.capacity
    ))]
    pub fn create_room(&self, actor: &str, request: NewRoomRequest) -> ApiResult<Room> {
        // 权限校验先行，事务开始前短路
        require_permissions(self.permissions.as_ref(), actor, &[permissions::CREATE_ROOMS])?;

        let mut attempt: u32 = 0;
        let room = loop {
            match self.try_allocate(&request) {
                Err(ApiError::DatabaseTransactionError(msg))
                    if attempt < self.config.max_allocation_retries =>
                {
                    // busy 超时等瞬态失败，重试
                    attempt += 1;
                    warn!(attempt, error = %msg, "房间分配事务瞬态失败，重试");
                }
                other => break other?,
            }
        };

        info!(room_id = %room.room_id, code = %room.code, "房间分配成功");
        self.invalidator.invalidate(&[tags::HOUSES, tags::ROOMS]);
        Ok(room)
    }

    /// 单次分配尝试（一个 BEGIN IMMEDIATE 事务）
    fn try_allocate(&self, request: &NewRoomRequest) -> ApiResult<Room> {
        let mut conn = self
            .conn
            .lock()
            .map_err(|e| ApiError::DatabaseConnectionError(e.to_string()))?;

        // 写锁先行: 并发分配者在此串行化，后到者看到先提交者的聚合结果
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|e| ApiError::DatabaseTransactionError(e.to_string()))?;

        // 任何一步出错，tx 在此丢弃即回滚
        let room = Self::allocate_in_tx(&tx, request)?;

        tx.commit()
            .map_err(|e| ApiError::DatabaseTransactionError(e.to_string()))?;
        Ok(room)
    }

    /// 事务内分配步骤（校验顺序严格固定）
    fn allocate_in_tx(conn: &Connection, request: &NewRoomRequest) -> ApiResult<Room> {
        // 1. 加载宿舍楼
        let house = HouseRepository::find_by_id_tx(conn, &request.house_id)?.ok_or_else(|| {
            ApiError::NotFound(format!("House(id={}) not found", request.house_id))
        })?;

        // 2. 容量入参校验（楼栋存在性判定先行）
        if request.capacity == 0 {
            return Err(ApiError::BadRequest(
                "Room capacity must be a positive integer.".to_string(),
            ));
        }

        // 3. 性别门禁
        ensure_gender_compatibility(house.house_gender, request.rm_gender)?;

        // 4. 选择分桶规划（BOTH 无定义分桶）
        let plan = house
            .occupancy_plan
            .sub_plan(request.rm_gender)
            .ok_or_else(|| ApiError::BadRequest(OCCUPANCY_PLAN_MISSING_MESSAGE.to_string()))?;

        // 5. 聚合当前占用（权威口径: 精确匹配）
        let usage = RoomRepository::aggregate_usage_tx(conn, &house.house_id, request.rm_gender)?;

        // 6. 房间数上限（含本次新建）
        let next_room_count = usage.room_count + 1;
        if next_room_count > plan.room_count {
            return Err(ApiError::RoomCountExceeded {
                gender: request.rm_gender,
                limit: plan.room_count,
                attempted: next_room_count,
            });
        }

        // 7. 床位数上限（含本次新建）
        let next_bed_total = usage.bed_count + request.capacity;
        if next_bed_total > plan.room_capacity {
            return Err(ApiError::RoomCapacityExceeded {
                gender: request.rm_gender,
                limit: plan.room_capacity,
                attempted: next_bed_total,
            });
        }

        // 8. 推导下一序号（必须在本事务内读取最近编码）
        let last_code = RoomRepository::latest_code_tx(conn, &house.house_id)?;
        let sequence = next_sequence_number(last_code.as_deref());

        // 9. 生成编码
        let code = generate_room_code(&house.name, sequence);

        // 10. 落库
        let room = Room::new(house.house_id.clone(), code, request.rm_gender, request.capacity);
        RoomRepository::insert_tx(conn, &room)?;

        Ok(room)
    }

    // ==========================================
    // 查询操作
    // ==========================================

    /// 查询宿舍楼的全部房间
    ///
    /// # 返回
    /// - Ok(Vec<Room>): 按创建顺序排列
    /// - Err(NotFound): 宿舍楼不存在
    pub fn list_rooms(&self, actor: &str, house_id: &str) -> ApiResult<Vec<Room>> {
        require_permissions(self.permissions.as_ref(), actor, &[permissions::VIEW_ROOMS])?;

        self.ensure_house_exists(house_id)?;
        Ok(self.room_repo.find_by_house(house_id)?)
    }

    /// 提交前占用预览
    ///
    /// 预览口径: BOTH 房间计入两个分桶（见 engine::capacity 的说明）。
    /// 仅供表单展示，权威校验以分配事务内的精确匹配聚合为准。
    pub fn preview_usage(&self, actor: &str, house_id: &str) -> ApiResult<UsagePreview> {
        require_permissions(self.permissions.as_ref(), actor, &[permissions::VIEW_ROOMS])?;

        self.ensure_house_exists(house_id)?;
        let rooms = self.room_repo.find_by_house(house_id)?;
        Ok(preview_usage(&rooms))
    }

    fn ensure_house_exists(&self, house_id: &str) -> ApiResult<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| ApiError::DatabaseConnectionError(e.to_string()))?;
        HouseRepository::find_by_id_tx(&conn, house_id)?
            .map(|_| ())
            .ok_or_else(|| ApiError::NotFound(format!("House(id={house_id}) not found")))
    }
}
