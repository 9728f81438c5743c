use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // No unique key on (user_id, ip): concurrent gateway visits may each insert a row.
        manager
            .create_table(
                Table::create()
                    .table(ChallengeTokens::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ChallengeTokens::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ChallengeTokens::UserId).integer().not_null())
                    .col(ColumnDef::new(ChallengeTokens::Token).string_len(8).not_null())
                    .col(ColumnDef::new(ChallengeTokens::Ip).string().not_null())
                    .col(
                        ColumnDef::new(ChallengeTokens::ExpiresAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ChallengeTokens::Delivered)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(ChallengeTokens::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(ChallengeTokens::Table)
                    .col(ChallengeTokens::UserId)
                    .col(ChallengeTokens::Ip)
                    .name("idx_challenge_tokens_user_id_ip")
                    .to_owned(),
            )
            .await?;

        // Sweeper range scans.
        manager
            .create_index(
                Index::create()
                    .table(ChallengeTokens::Table)
                    .col(ChallengeTokens::ExpiresAt)
                    .name("idx_challenge_tokens_expires_at")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ChallengeTokens::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ChallengeTokens {
    Table,
    Id,
    UserId,
    Token,
    Ip,
    ExpiresAt,
    Delivered,
    CreatedAt,
}
