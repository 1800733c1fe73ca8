//! SeaORM 数据库迁移模块
//!
//! 使用 SeaORM Migration 管理数据库版本

use sea_orm_migration::prelude::*;

mod m20240101_000001_create_permission_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20240101_000001_create_permission_tables::Migration)]
    }
}
