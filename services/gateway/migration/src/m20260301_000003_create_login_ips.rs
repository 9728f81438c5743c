use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(LoginIps::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(LoginIps::UserId).integer().not_null())
                    .col(ColumnDef::new(LoginIps::Ip).string().not_null())
                    .col(
                        ColumnDef::new(LoginIps::Occurrences)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .primary_key(Index::create().col(LoginIps::UserId).col(LoginIps::Ip))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(LoginIps::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum LoginIps {
    Table,
    UserId,
    Ip,
    Occurrences,
}
