// ==========================================
// 校园宿舍分配系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为，避免"部分模块外键开启/部分不开启"
// - 统一 busy_timeout，减少并发分配时的偶发 busy 错误
// - 统一建表入口，保证 house/room 外键级联一致
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::time::Duration;

use crate::config::ResidencyConfig;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version
///
/// 说明：
/// - 版本号用于**提示/告警**（不做自动迁移），避免静默在旧库上运行导致隐性错误
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要"每个连接"单独开启（room.house_id 级联删除依赖它）
/// - busy_timeout 需要"每个连接"单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    configure_sqlite_connection_with(conn, DEFAULT_BUSY_TIMEOUT_MS)
}

/// 配置 SQLite 连接（自定义 busy_timeout）
pub fn configure_sqlite_connection_with(
    conn: &Connection,
    busy_timeout_ms: u64,
) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(busy_timeout_ms))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 按运行时配置打开 SQLite 连接
pub fn open_sqlite_connection_with(
    db_path: &str,
    config: &ResidencyConfig,
) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection_with(&conn, config.busy_timeout_ms)?;
    Ok(conn)
}

/// 初始化数据库 schema
///
/// 约束:
/// - house.name 唯一
/// - room.code 唯一（房间编码全局唯一）
/// - room.house_id 外键，宿舍楼删除时级联删除房间
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS house (
            house_id        TEXT PRIMARY KEY,
            name            TEXT NOT NULL UNIQUE,
            house_gender    TEXT NOT NULL CHECK (house_gender IN ('MALE', 'FEMALE', 'BOTH')),
            residency_type  TEXT NOT NULL CHECK (residency_type IN ('MIXED', 'DAY', 'BOARDING')),
            occupancy_json  TEXT NOT NULL,
            house_master_id TEXT,
            created_at      TEXT NOT NULL,
            updated_at      TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS room (
            room_id    TEXT PRIMARY KEY,
            code       TEXT NOT NULL UNIQUE,
            house_id   TEXT NOT NULL REFERENCES house(house_id) ON DELETE CASCADE,
            rm_gender  TEXT NOT NULL CHECK (rm_gender IN ('MALE', 'FEMALE', 'BOTH')),
            capacity   INTEGER NOT NULL CHECK (capacity > 0),
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_room_house ON room(house_id);
        CREATE INDEX IF NOT EXISTS idx_room_house_gender ON room(house_id, rm_gender);

        INSERT OR IGNORE INTO schema_version (version) VALUES (1);
        "#,
    )?;
    Ok(())
}

/// 读取 schema_version（若表不存在则返回 None）
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> =
        conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}
