//! Create bookings table
//!
//! Confirmed, paid reservations. A slot (user, scheduled time, service type,
//! duration) can be booked once, and one provider order pays for one booking.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Bookings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Bookings::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Bookings::UserId).string().not_null())
                    .col(ColumnDef::new(Bookings::ServiceType).string().not_null())
                    .col(
                        ColumnDef::new(Bookings::ScheduledAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Bookings::DurationMins).integer().not_null())
                    .col(
                        ColumnDef::new(Bookings::PriceCents)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Bookings::PaymentProvider)
                            .string()
                            .not_null()
                            .default("paypal"),
                    )
                    .col(ColumnDef::new(Bookings::PaymentOrderId).string().not_null())
                    .col(ColumnDef::new(Bookings::PaymentCaptureId).string())
                    .col(
                        ColumnDef::new(Bookings::PaymentStatus)
                            .string()
                            .not_null()
                            .default("CREATED"),
                    )
                    .col(ColumnDef::new(Bookings::Notes).string_len(500))
                    .col(
                        ColumnDef::new(Bookings::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Bookings::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_bookings_slot")
                    .table(Bookings::Table)
                    .col(Bookings::UserId)
                    .col(Bookings::ScheduledAt)
                    .col(Bookings::ServiceType)
                    .col(Bookings::DurationMins)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_bookings_payment_order")
                    .table(Bookings::Table)
                    .col(Bookings::PaymentOrderId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bookings_user_created")
                    .table(Bookings::Table)
                    .col(Bookings::UserId)
                    .col(Bookings::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Bookings::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Bookings {
    Table,
    Id,
    UserId,
    ServiceType,
    ScheduledAt,
    DurationMins,
    PriceCents,
    PaymentProvider,
    PaymentOrderId,
    PaymentCaptureId,
    PaymentStatus,
    Notes,
    CreatedAt,
    UpdatedAt,
}
