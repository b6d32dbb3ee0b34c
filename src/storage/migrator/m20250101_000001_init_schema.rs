//! Collections, saved requests and history

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Collections::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Collections::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Collections::Name).text().not_null())
                    .col(ColumnDef::new(Collections::Description).text().not_null().default(""))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Requests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Requests::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Requests::Name).text().not_null())
                    .col(ColumnDef::new(Requests::Url).text().not_null())
                    .col(ColumnDef::new(Requests::Method).string_len(16).not_null())
                    .col(ColumnDef::new(Requests::Headers).text().not_null().default("{}"))
                    .col(ColumnDef::new(Requests::Body).text().not_null().default(""))
                    .col(ColumnDef::new(Requests::CollectionId).big_integer().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_requests_collection")
                            .from(Requests::Table, Requests::CollectionId)
                            .to(Collections::Table, Collections::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(History::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(History::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(History::Url).text().not_null())
                    .col(ColumnDef::new(History::Method).string_len(16).not_null())
                    .col(ColumnDef::new(History::StatusCode).integer().not_null())
                    .col(ColumnDef::new(History::DurationMs).big_integer().not_null())
                    .col(ColumnDef::new(History::Timestamp).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_history_timestamp")
                    .table(History::Table)
                    .col(History::Timestamp)
                    .to_owned(),
            )
            .await?;

        let db = manager.get_connection();
        db.execute_unprepared(
            "INSERT INTO collections (id, name, description) VALUES (1, 'Default', 'Default collection')
             ON CONFLICT (id) DO NOTHING",
        )
        .await?;
        // Explicit id above doesn't advance the sequence
        db.execute_unprepared(
            "SELECT setval(pg_get_serial_sequence('collections', 'id'), (SELECT MAX(id) FROM collections))",
        )
        .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(History::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Requests::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Collections::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Collections {
    Table,
    Id,
    Name,
    Description,
}

#[derive(DeriveIden)]
enum Requests {
    Table,
    Id,
    Name,
    Url,
    Method,
    Headers,
    Body,
    CollectionId,
}

#[derive(DeriveIden)]
enum History {
    Table,
    Id,
    Url,
    Method,
    StatusCode,
    DurationMs,
    Timestamp,
}
