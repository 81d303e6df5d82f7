use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RequestLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RequestLogs::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(RequestLogs::UserId).uuid().null())
                    .col(ColumnDef::new(RequestLogs::Identity).string().not_null())
                    .col(ColumnDef::new(RequestLogs::ClientIp).string().not_null())
                    .col(ColumnDef::new(RequestLogs::Method).string().not_null())
                    .col(ColumnDef::new(RequestLogs::Path).text().not_null())
                    .col(ColumnDef::new(RequestLogs::Query).text().null())
                    .col(ColumnDef::new(RequestLogs::Status).integer().not_null())
                    .col(
                        ColumnDef::new(RequestLogs::DurationMs)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RequestLogs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AuthLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AuthLogs::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AuthLogs::UserId).uuid().null())
                    .col(ColumnDef::new(AuthLogs::Username).string().null())
                    .col(ColumnDef::new(AuthLogs::Success).boolean().not_null())
                    .col(ColumnDef::new(AuthLogs::Message).text().not_null())
                    .col(ColumnDef::new(AuthLogs::ClientIp).string().not_null())
                    .col(ColumnDef::new(AuthLogs::Endpoint).string().not_null())
                    .col(ColumnDef::new(AuthLogs::Method).string().not_null())
                    .col(
                        ColumnDef::new(AuthLogs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(RateLimitLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RateLimitLogs::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(RateLimitLogs::UserId).uuid().null())
                    .col(ColumnDef::new(RateLimitLogs::Identity).string().not_null())
                    .col(ColumnDef::new(RateLimitLogs::Route).text().not_null())
                    .col(ColumnDef::new(RateLimitLogs::Policy).string().not_null())
                    .col(
                        ColumnDef::new(RateLimitLogs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_request_logs_created_at")
                    .table(RequestLogs::Table)
                    .col(RequestLogs::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RateLimitLogs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AuthLogs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RequestLogs::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum RequestLogs {
    Table,
    Id,
    UserId,
    Identity,
    ClientIp,
    Method,
    Path,
    Query,
    Status,
    DurationMs,
    CreatedAt,
}

#[derive(DeriveIden)]
enum AuthLogs {
    Table,
    Id,
    UserId,
    Username,
    Success,
    Message,
    ClientIp,
    Endpoint,
    Method,
    CreatedAt,
}

#[derive(DeriveIden)]
enum RateLimitLogs {
    Table,
    Id,
    UserId,
    Identity,
    Route,
    Policy,
    CreatedAt,
}
