//! Budgets and scheduled (recurring) transactions.

use sea_orm_migration::prelude::*;

use super::m20260301_000001_initial::{Accounts, Categories, Users, timestamp};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Budgets {
    Table,
    Id,
    UserId,
    CategoryId,
    AmountCents,
    Criteria,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum ScheduledTransactions {
    Table,
    Id,
    UserId,
    Name,
    AmountCents,
    Repetition,
    RepeatAt,
    CategoryId,
    AccountId,
    CreatedAt,
    UpdatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Budgets::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Budgets::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Budgets::UserId).integer().not_null())
                    .col(ColumnDef::new(Budgets::CategoryId).integer().not_null())
                    .col(ColumnDef::new(Budgets::AmountCents).big_integer().not_null())
                    .col(ColumnDef::new(Budgets::Criteria).string_len(16).not_null())
                    .col(timestamp(Budgets::CreatedAt))
                    .col(timestamp(Budgets::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-budgets-user_id")
                            .from(Budgets::Table, Budgets::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-budgets-category_id")
                            .from(Budgets::Table, Budgets::CategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ScheduledTransactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ScheduledTransactions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ScheduledTransactions::UserId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ScheduledTransactions::Name).string().not_null())
                    .col(
                        ColumnDef::new(ScheduledTransactions::AmountCents)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ScheduledTransactions::Repetition)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(timestamp(ScheduledTransactions::RepeatAt))
                    .col(
                        ColumnDef::new(ScheduledTransactions::CategoryId)
                            .integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ScheduledTransactions::AccountId)
                            .integer()
                            .null(),
                    )
                    .col(timestamp(ScheduledTransactions::CreatedAt))
                    .col(timestamp(ScheduledTransactions::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-scheduled_transactions-user_id")
                            .from(ScheduledTransactions::Table, ScheduledTransactions::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-scheduled_transactions-category_id")
                            .from(
                                ScheduledTransactions::Table,
                                ScheduledTransactions::CategoryId,
                            )
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-scheduled_transactions-account_id")
                            .from(
                                ScheduledTransactions::Table,
                                ScheduledTransactions::AccountId,
                            )
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-budgets-user_id-category_id")
                    .table(Budgets::Table)
                    .col(Budgets::UserId)
                    .col(Budgets::CategoryId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-scheduled_transactions-user_id-repeat_at")
                    .table(ScheduledTransactions::Table)
                    .col(ScheduledTransactions::UserId)
                    .col(ScheduledTransactions::RepeatAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ScheduledTransactions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Budgets::Table).to_owned())
            .await
    }
}
