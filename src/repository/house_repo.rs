// ==========================================
// 校园宿舍分配系统 - 宿舍楼数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 约束: 所有查询使用参数化，防止 SQL 注入
// 约束: occupancy_json 每次读取都重新解析校验，形状不符即报错
// ==========================================

use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::db;
use crate::domain::house::{House, OccupancyPlan};
use crate::domain::types::{Gender, ResidencyType};
use crate::repository::error::{RepositoryError, RepositoryResult};

// ==========================================
// 行中间表示
// ==========================================
// 说明: 性别/类型/规划的解析可能失败，放在行闭包外做，
//       避免把领域校验错误塞进 rusqlite::Error

struct RawHouseRow {
    house_id: String,
    name: String,
    house_gender: String,
    residency_type: String,
    occupancy_json: String,
    house_master_id: Option<String>,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

impl RawHouseRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            house_id: row.get(0)?,
            name: row.get(1)?,
            house_gender: row.get(2)?,
            residency_type: row.get(3)?,
            occupancy_json: row.get(4)?,
            house_master_id: row.get(5)?,
            created_at: row.get(6)?,
            updated_at: row.get(7)?,
        })
    }

    fn into_house(self) -> RepositoryResult<House> {
        let house_gender = Gender::parse(&self.house_gender).ok_or_else(|| {
            RepositoryError::FieldValueError {
                field: "house_gender".to_string(),
                message: format!("非法性别值: {}", self.house_gender),
            }
        })?;
        let residency_type = ResidencyType::parse(&self.residency_type).ok_or_else(|| {
            RepositoryError::FieldValueError {
                field: "residency_type".to_string(),
                message: format!("非法住宿类型值: {}", self.residency_type),
            }
        })?;
        let occupancy_plan = OccupancyPlan::from_json(&self.occupancy_json)?;

        Ok(House {
            house_id: self.house_id,
            name: self.name,
            house_gender,
            residency_type,
            occupancy_plan,
            house_master_id: self.house_master_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const SELECT_COLUMNS: &str = "house_id, name, house_gender, residency_type, \
                              occupancy_json, house_master_id, created_at, updated_at";

// ==========================================
// HouseRepository - 宿舍楼仓储
// ==========================================

/// 宿舍楼仓储
/// 职责: 管理 house 表的 CRUD 操作
pub struct HouseRepository {
    conn: Arc<Mutex<Connection>>,
}

impl HouseRepository {
    /// 创建新的宿舍楼仓储实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    ///
    /// # 返回
    /// - Ok(HouseRepository): 仓储实例
    /// - Err: 数据库连接错误
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = db::open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 插入宿舍楼
    ///
    /// # 返回
    /// - Err(UniqueConstraintViolation): 名称重复
    pub fn insert(&self, house: &House) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        Self::insert_tx(&conn, house)
    }

    /// 事务作用域插入（调用方持有连接/事务）
    pub fn insert_tx(conn: &Connection, house: &House) -> RepositoryResult<()> {
        let occupancy_json = house.occupancy_plan.to_json()?;
        conn.execute(
            r#"
            INSERT INTO house (
                house_id, name, house_gender, residency_type,
                occupancy_json, house_master_id, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                house.house_id,
                house.name,
                house.house_gender.as_str(),
                house.residency_type.as_str(),
                occupancy_json,
                house.house_master_id,
                house.created_at,
                house.updated_at,
            ],
        )?;
        Ok(())
    }

    /// 按 ID 查询宿舍楼
    ///
    /// # 返回
    /// - Ok(Some(House)): 找到
    /// - Ok(None): 未找到
    pub fn find_by_id(&self, house_id: &str) -> RepositoryResult<Option<House>> {
        let conn = self.get_conn()?;
        Self::find_by_id_tx(&conn, house_id)
    }

    /// 事务作用域查询（分配事务在同一连接上读取宿舍楼）
    pub fn find_by_id_tx(conn: &Connection, house_id: &str) -> RepositoryResult<Option<House>> {
        let sql = format!("SELECT {SELECT_COLUMNS} FROM house WHERE house_id = ?1");
        let raw = conn
            .query_row(&sql, params![house_id], RawHouseRow::from_row)
            .optional()?;
        raw.map(RawHouseRow::into_house).transpose()
    }

    /// 查询全部宿舍楼（按名称排序）
    pub fn find_all(&self) -> RepositoryResult<Vec<House>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {SELECT_COLUMNS} FROM house ORDER BY name");
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map([], RawHouseRow::from_row)?;

        let mut houses = Vec::new();
        for row in rows {
            houses.push(row?.into_house()?);
        }
        Ok(houses)
    }

    /// 更新宿舍楼
    ///
    /// # 返回
    /// - Err(NotFound): house_id 不存在
    pub fn update(&self, house: &House) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let occupancy_json = house.occupancy_plan.to_json()?;
        let affected = conn.execute(
            r#"
            UPDATE house SET
                name = ?2, house_gender = ?3, residency_type = ?4,
                occupancy_json = ?5, house_master_id = ?6, updated_at = ?7
            WHERE house_id = ?1
            "#,
            params![
                house.house_id,
                house.name,
                house.house_gender.as_str(),
                house.residency_type.as_str(),
                occupancy_json,
                house.house_master_id,
                house.updated_at,
            ],
        )?;

        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "House".to_string(),
                id: house.house_id.to_string(),
            });
        }
        Ok(())
    }

    /// 删除宿舍楼
    ///
    /// 级联行为: room.house_id 外键 ON DELETE CASCADE，所属房间一并删除
    ///
    /// # 返回
    /// - Ok(true): 删除了一行
    /// - Ok(false): house_id 不存在
    pub fn delete(&self, house_id: &str) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM house WHERE house_id = ?1", params![house_id])?;
        Ok(affected > 0)
    }

    /// 批量删除宿舍楼（单事务）
    ///
    /// # 返回
    /// - Ok(usize): 实际删除的行数
    pub fn bulk_delete(&self, house_ids: &[String]) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        let mut deleted = 0usize;
        {
            let mut stmt = tx.prepare("DELETE FROM house WHERE house_id = ?1")?;
            for house_id in house_ids {
                deleted += stmt.execute(params![house_id])?;
            }
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(deleted)
    }
}
