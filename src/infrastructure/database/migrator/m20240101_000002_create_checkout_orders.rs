//! Create checkout_orders table
//!
//! Provider orders opened by the first checkout phase, keyed by provider
//! order id and owned by the user who opened them.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CheckoutOrders::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CheckoutOrders::OrderId)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CheckoutOrders::UserId).string().not_null())
                    .col(ColumnDef::new(CheckoutOrders::ReferenceId).string().not_null())
                    .col(
                        ColumnDef::new(CheckoutOrders::Description)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(CheckoutOrders::TotalSource)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CheckoutOrders::AmountCents)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CheckoutOrders::Currency)
                            .string_len(3)
                            .not_null()
                            .default("USD"),
                    )
                    .col(
                        ColumnDef::new(CheckoutOrders::Status)
                            .string()
                            .not_null()
                            .default("CREATED"),
                    )
                    .col(ColumnDef::new(CheckoutOrders::CaptureId).string())
                    .col(
                        ColumnDef::new(CheckoutOrders::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CheckoutOrders::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_checkout_orders_user")
                    .table(CheckoutOrders::Table)
                    .col(CheckoutOrders::UserId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CheckoutOrders::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum CheckoutOrders {
    Table,
    OrderId,
    UserId,
    ReferenceId,
    Description,
    TotalSource,
    AmountCents,
    Currency,
    Status,
    CaptureId,
    CreatedAt,
    UpdatedAt,
}
