use sea_orm_migration::prelude::*;

/// Name of the secondary index on `todolist.date`
const DATE_INDEX: &str = "indexdate";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Column order is (id, date, title, description, status); rows are
        // nevertheless read back by name.
        manager
            .create_table(
                Table::create()
                    .table(Todolist::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Todolist::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Todolist::Date).date())
                    .col(ColumnDef::new(Todolist::Title).text())
                    .col(ColumnDef::new(Todolist::Description).text())
                    .col(ColumnDef::new(Todolist::Status).text())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name(DATE_INDEX)
                    .table(Todolist::Table)
                    .col(Todolist::Date)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .if_exists()
                    .name(DATE_INDEX)
                    .table(Todolist::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Todolist::Table).if_exists().to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Todolist {
    Table,
    Id,
    Date,
    Title,
    Description,
    Status,
}
