// ==========================================
// 校园宿舍分配系统 - 房间数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 约束: 分配事务的读写必须走 *_tx 方法，保证在同一连接/事务上执行
// ==========================================

use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::db;
use crate::domain::room::{GenderUsage, Room};
use crate::domain::types::Gender;
use crate::repository::error::{RepositoryError, RepositoryResult};

// ==========================================
// 行中间表示
// ==========================================

struct RawRoomRow {
    room_id: String,
    code: String,
    house_id: String,
    rm_gender: String,
    capacity: i64,
    created_at: NaiveDateTime,
}

impl RawRoomRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            room_id: row.get(0)?,
            code: row.get(1)?,
            house_id: row.get(2)?,
            rm_gender: row.get(3)?,
            capacity: row.get(4)?,
            created_at: row.get(5)?,
        })
    }

    fn into_room(self) -> RepositoryResult<Room> {
        let rm_gender = Gender::parse(&self.rm_gender).ok_or_else(|| {
            RepositoryError::FieldValueError {
                field: "rm_gender".to_string(),
                message: format!("非法性别值: {}", self.rm_gender),
            }
        })?;
        let capacity = u32::try_from(self.capacity).map_err(|_| {
            RepositoryError::FieldValueError {
                field: "capacity".to_string(),
                message: format!("床位数超出范围: {}", self.capacity),
            }
        })?;

        Ok(Room {
            room_id: self.room_id,
            code: self.code,
            house_id: self.house_id,
            rm_gender,
            capacity,
            created_at: self.created_at,
        })
    }
}

const SELECT_COLUMNS: &str = "room_id, code, house_id, rm_gender, capacity, created_at";

// ==========================================
// RoomRepository - 房间仓储
// ==========================================

/// 房间仓储
/// 职责: 管理 room 表的查询与事务作用域写入
pub struct RoomRepository {
    conn: Arc<Mutex<Connection>>,
}

impl RoomRepository {
    /// 创建新的房间仓储实例
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

    /// 查询宿舍楼的全部房间（按创建顺序）
    pub fn find_by_house(&self, house_id: &str) -> RepositoryResult<Vec<Room>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {SELECT_COLUMNS} FROM room WHERE house_id = ?1 ORDER BY rowid");
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![house_id], RawRoomRow::from_row)?;

        let mut rooms = Vec::new();
        for row in rows {
            rooms.push(row?.into_room()?);
        }
        Ok(rooms)
    }

    /// 按编码查询房间
    pub fn find_by_code(&self, code: &str) -> RepositoryResult<Option<Room>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {SELECT_COLUMNS} FROM room WHERE code = ?1");
        let raw = conn
            .query_row(&sql, params![code], RawRoomRow::from_row)
            .optional()?;
        raw.map(RawRoomRow::into_room).transpose()
    }

    /// 聚合某宿舍楼某性别分桶的当前占用（权威口径: rm_gender 精确匹配）
    pub fn aggregate_usage(&self, house_id: &str, gender: Gender) -> RepositoryResult<GenderUsage> {
        let conn = self.get_conn()?;
        Self::aggregate_usage_tx(&conn, house_id, gender)
    }

    /// 事务作用域聚合
    ///
    /// 说明: 分配事务的容量校验必须在持有写锁的事务内调用本方法，
    ///       否则并发分配会在同一聚合快照上同时通过校验
    pub fn aggregate_usage_tx(
        conn: &Connection,
        house_id: &str,
        gender: Gender,
    ) -> RepositoryResult<GenderUsage> {
        let (room_count, bed_count): (i64, i64) = conn.query_row(
            r#"
            SELECT COUNT(*), COALESCE(SUM(capacity), 0)
            FROM room
            WHERE house_id = ?1 AND rm_gender = ?2
            "#,
            params![house_id, gender.as_str()],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        Ok(GenderUsage {
            room_count: room_count as u32,
            bed_count: bed_count as u32,
        })
    }

    /// 查询宿舍楼最近创建房间的编码（创建顺序倒序）
    ///
    /// # 返回
    /// - Ok(Some(String)): 最近一个房间的编码
    /// - Ok(None): 该宿舍楼尚无房间
    pub fn latest_code_tx(conn: &Connection, house_id: &str) -> RepositoryResult<Option<String>> {
        let code = conn
            .query_row(
                "SELECT code FROM room WHERE house_id = ?1 ORDER BY rowid DESC LIMIT 1",
                params![house_id],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(code)
    }

    /// 事务作用域插入
    ///
    /// # 返回
    /// - Err(UniqueConstraintViolation): 编码冲突
    /// - Err(ForeignKeyViolation): house_id 不存在
    pub fn insert_tx(conn: &Connection, room: &Room) -> RepositoryResult<()> {
        conn.execute(
            r#"
            INSERT INTO room (room_id, code, house_id, rm_gender, capacity, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                room.room_id,
                room.code,
                room.house_id,
                room.rm_gender.as_str(),
                room.capacity,
                room.created_at,
            ],
        )?;
        Ok(())
    }

    /// 统计宿舍楼房间总数（测试与巡检用）
    pub fn count_by_house(&self, house_id: &str) -> RepositoryResult<u32> {
        let conn = self.get_conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM room WHERE house_id = ?1",
            params![house_id],
            |row| row.get(0),
        )?;
        Ok(count as u32)
    }
}
