//! 创建权限模板相关表结构

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建 groups 表
        manager
            .create_table(
                Table::create()
                    .table(Groups::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Groups::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Groups::Name).string().not_null().unique_key())
                    .col(ColumnDef::new(Groups::Description).string())
                    .col(
                        ColumnDef::new(Groups::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建 users 表
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Login).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::Name).string().not_null())
                    .col(ColumnDef::new(Users::Active).boolean().not_null().default(true))
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建 permission_templates 表
        manager
            .create_table(
                Table::create()
                    .table(PermissionTemplates::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PermissionTemplates::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PermissionTemplates::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(PermissionTemplates::Kee)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(PermissionTemplates::Description).string())
                    .col(ColumnDef::new(PermissionTemplates::KeyPattern).string())
                    .col(
                        ColumnDef::new(PermissionTemplates::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(PermissionTemplates::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建 perm_templates_groups 表，group_id 为空表示 Anyone
        manager
            .create_table(
                Table::create()
                    .table(PermTemplatesGroups::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PermTemplatesGroups::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PermTemplatesGroups::GroupId).integer())
                    .col(
                        ColumnDef::new(PermTemplatesGroups::TemplateId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PermTemplatesGroups::PermissionReference)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PermTemplatesGroups::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_perm_templates_groups_template")
                            .from(PermTemplatesGroups::Table, PermTemplatesGroups::TemplateId)
                            .to(PermissionTemplates::Table, PermissionTemplates::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_perm_templates_groups_group")
                            .from(PermTemplatesGroups::Table, PermTemplatesGroups::GroupId)
                            .to(Groups::Table, Groups::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建 perm_templates_users 表
        manager
            .create_table(
                Table::create()
                    .table(PermTemplatesUsers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PermTemplatesUsers::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PermTemplatesUsers::UserId).integer().not_null())
                    .col(
                        ColumnDef::new(PermTemplatesUsers::TemplateId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PermTemplatesUsers::PermissionReference)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PermTemplatesUsers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_perm_templates_users_template")
                            .from(PermTemplatesUsers::Table, PermTemplatesUsers::TemplateId)
                            .to(PermissionTemplates::Table, PermissionTemplates::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_perm_templates_users_user")
                            .from(PermTemplatesUsers::Table, PermTemplatesUsers::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建索引以优化查询性能
        manager
            .create_index(
                Index::create()
                    .name("idx_perm_templates_groups_lookup")
                    .table(PermTemplatesGroups::Table)
                    .col(PermTemplatesGroups::TemplateId)
                    .col(PermTemplatesGroups::PermissionReference)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // group_id 为 NULL 时唯一索引不生效，Anyone 的去重由 DAO 负责
        manager
            .create_index(
                Index::create()
                    .name("idx_perm_templates_groups_unique")
                    .table(PermTemplatesGroups::Table)
                    .col(PermTemplatesGroups::TemplateId)
                    .col(PermTemplatesGroups::GroupId)
                    .col(PermTemplatesGroups::PermissionReference)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_perm_templates_users_unique")
                    .table(PermTemplatesUsers::Table)
                    .col(PermTemplatesUsers::TemplateId)
                    .col(PermTemplatesUsers::UserId)
                    .col(PermTemplatesUsers::PermissionReference)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PermTemplatesUsers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PermTemplatesGroups::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PermissionTemplates::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Groups::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Groups {
    Table,
    Id,
    Name,
    Description,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Login,
    Name,
    Active,
    CreatedAt,
}

#[derive(DeriveIden)]
enum PermissionTemplates {
    Table,
    Id,
    Name,
    Kee,
    Description,
    KeyPattern,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum PermTemplatesGroups {
    Table,
    Id,
    GroupId,
    TemplateId,
    PermissionReference,
    CreatedAt,
}

#[derive(DeriveIden)]
enum PermTemplatesUsers {
    Table,
    Id,
    UserId,
    TemplateId,
    PermissionReference,
    CreatedAt,
}
