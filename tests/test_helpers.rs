// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的数据库初始化、API 组装、测试数据生成
// ==========================================

use std::error::Error;
use std::sync::{Arc, Mutex};

use tempfile::NamedTempFile;

use campus_residency::api::{AllowAllPermissions, HouseApi, NoopInvalidator, RoomApi};
use campus_residency::config::ResidencyConfig;
use campus_residency::db;
use campus_residency::domain::{Gender, GenderOccupancy, OccupancyPlan, ResidencyType};
use campus_residency::api::NewHouseRequest;
use campus_residency::repository::{HouseRepository, RoomRepository};

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file.path().to_str().unwrap().to_string();

    let conn = db::open_sqlite_connection(&db_path)?;
    db::init_schema(&conn)?;

    Ok((temp_file, db_path))
}

/// 完整 API 栈（全放行权限 + 空视图失效）
pub struct TestStack {
    pub house_api: Arc<HouseApi>,
    pub room_api: Arc<RoomApi>,
    pub house_repo: Arc<HouseRepository>,
    pub room_repo: Arc<RoomRepository>,
}

/// 组装测试 API 栈（共享单连接，与生产装配方式一致）
pub fn build_stack(db_path: &str) -> TestStack {
    let conn = Arc::new(Mutex::new(db::open_sqlite_connection(db_path).unwrap()));

    let house_repo = Arc::new(HouseRepository::from_connection(conn.clone()));
    let room_repo = Arc::new(RoomRepository::from_connection(conn.clone()));
    let permissions = Arc::new(AllowAllPermissions);
    let invalidator = Arc::new(NoopInvalidator);

    let house_api = Arc::new(HouseApi::new(
        house_repo.clone(),
        permissions.clone(),
        invalidator.clone(),
    ));
    let room_api = Arc::new(RoomApi::new(
        conn,
        room_repo.clone(),
        permissions,
        invalidator,
        ResidencyConfig::default(),
    ));

    TestStack {
        house_api,
        room_api,
        house_repo,
        room_repo,
    }
}

/// 构造入住规划
pub fn plan(mc: u32, mcap: u32, fc: u32, fcap: u32) -> OccupancyPlan {
    OccupancyPlan::new(
        GenderOccupancy {
            room_count: mc,
            room_capacity: mcap,
        },
        GenderOccupancy {
            room_count: fc,
            room_capacity: fcap,
        },
    )
}

/// 构造创建宿舍楼请求（默认寄宿类型）
pub fn house_request(name: &str, gender: Gender, occupancy_plan: OccupancyPlan) -> NewHouseRequest {
    NewHouseRequest {
        name: name.to_string(),
        house_gender: gender,
        residency_type: ResidencyType::Boarding,
        occupancy_plan,
        house_master_id: None,
    }
}
