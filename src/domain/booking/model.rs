//! Booking domain entity

use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, SubsecRound, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::payment::OrderStatus;
use crate::shared::errors::{CheckoutError, CheckoutResult};

/// Only payment provider bookings are paid through.
pub const PAYMENT_PROVIDER: &str = "paypal";

/// Upper bound for customer notes, in characters.
pub const MAX_NOTES_LEN: usize = 500;

/// Walk service offered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceType {
    /// 30 minute walk
    ShortWalk,
    /// 60 minute walk
    LongWalk,
    /// Walk plus feeding and grooming
    FullService,
}

impl ServiceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ShortWalk => "short-walk",
            Self::LongWalk => "long-walk",
            Self::FullService => "full-service",
        }
    }
}

impl FromStr for ServiceType {
    type Err = CheckoutError;

    /// Accepts the catalogue slugs used by older frontends as well.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "short-walk" | "paseo-30" => Ok(Self::ShortWalk),
            "long-walk" | "paseo-60" => Ok(Self::LongWalk),
            "full-service" | "full" => Ok(Self::FullService),
            other => Err(CheckoutError::Validation(format!(
                "unknown service_type '{}'",
                other
            ))),
        }
    }
}

impl std::fmt::Display for ServiceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Payment status stored with a booking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    Created,
    Approved,
    Completed,
    Voided,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "CREATED",
            Self::Approved => "APPROVED",
            Self::Completed => "COMPLETED",
            Self::Voided => "VOIDED",
            Self::Failed => "FAILED",
        }
    }

    /// Read back a stored column value. Values this build does not know
    /// (hand-edited rows, a newer schema) read as `Failed` so they are never
    /// mistaken for a paid booking.
    pub fn from_stored(s: &str) -> Self {
        match s {
            "CREATED" => Self::Created,
            "APPROVED" => Self::Approved,
            "COMPLETED" => Self::Completed,
            "VOIDED" => Self::Voided,
            _ => Self::Failed,
        }
    }

    /// Collapse a provider order status onto the stored enumeration.
    pub fn from_order_status(status: &OrderStatus) -> Self {
        match status {
            OrderStatus::Completed => Self::Completed,
            OrderStatus::Approved => Self::Approved,
            OrderStatus::Voided => Self::Voided,
            OrderStatus::Created | OrderStatus::Saved | OrderStatus::PayerActionRequired => {
                Self::Created
            }
            OrderStatus::Other(_) => Self::Failed,
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Payment sub-record embedded in a booking
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentInfo {
    pub provider: String,
    pub order_id: String,
    pub capture_id: Option<String>,
    pub status: PaymentStatus,
}

impl PaymentInfo {
    pub fn new(order_id: impl Into<String>, capture_id: Option<String>, status: PaymentStatus) -> Self {
        Self {
            provider: PAYMENT_PROVIDER.to_string(),
            order_id: order_id.into(),
            capture_id,
            status,
        }
    }
}

/// The tuple that may be booked at most once.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BookingSlot {
    pub user_id: String,
    pub scheduled_at: DateTime<Utc>,
    pub service_type: ServiceType,
    pub duration_mins: i32,
}

/// A confirmed reservation. Created only after a completed capture.
#[derive(Debug, Clone, PartialEq)]
pub struct Booking {
    pub id: Uuid,
    pub user_id: String,
    pub service_type: ServiceType,
    pub scheduled_at: DateTime<Utc>,
    pub duration_mins: i32,
    /// Target-currency price, two decimals
    pub price: Decimal,
    pub payment: PaymentInfo,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    pub fn slot(&self) -> BookingSlot {
        BookingSlot {
            user_id: self.user_id.clone(),
            scheduled_at: self.scheduled_at,
            service_type: self.service_type,
            duration_mins: self.duration_mins,
        }
    }
}

/// Booking about to be written to the ledger
#[derive(Debug, Clone, PartialEq)]
pub struct NewBooking {
    pub user_id: String,
    pub service_type: ServiceType,
    pub scheduled_at: DateTime<Utc>,
    pub duration_mins: i32,
    pub price: Decimal,
    pub payment: PaymentInfo,
    pub notes: Option<String>,
}

impl NewBooking {
    pub fn validate(&self) -> CheckoutResult<()> {
        if self.user_id.trim().is_empty() {
            return Err(CheckoutError::MissingField("user_id"));
        }
        if self.duration_mins < 1 {
            return Err(CheckoutError::Validation(
                "duration_mins must be at least 1".to_string(),
            ));
        }
        if self.price < Decimal::ZERO {
            return Err(CheckoutError::Validation(
                "price must not be negative".to_string(),
            ));
        }
        if let Some(notes) = &self.notes {
            if notes.chars().count() > MAX_NOTES_LEN {
                return Err(CheckoutError::Validation(format!(
                    "notes must not exceed {} characters",
                    MAX_NOTES_LEN
                )));
            }
        }
        if self.payment.order_id.trim().is_empty() {
            return Err(CheckoutError::MissingField("order_id"));
        }
        Ok(())
    }

    pub fn slot(&self) -> BookingSlot {
        BookingSlot {
            user_id: self.user_id.clone(),
            scheduled_at: self.scheduled_at,
            service_type: self.service_type,
            duration_mins: self.duration_mins,
        }
    }

    /// Materialize the booking with a fresh id and timestamps.
    pub fn into_booking(self, now: DateTime<Utc>) -> Booking {
        Booking {
            id: Uuid::new_v4(),
            user_id: self.user_id,
            service_type: self.service_type,
            scheduled_at: self.scheduled_at,
            duration_mins: self.duration_mins,
            price: self.price,
            payment: self.payment,
            notes: self.notes,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Parse the scheduled date-time of a booking.
///
/// RFC 3339 with offset is preferred; a bare `YYYY-MM-DDTHH:MM[:SS]` is read as
/// UTC. Slots have second resolution, so sub-second parts are dropped.
pub fn parse_scheduled_at(raw: &str) -> CheckoutResult<DateTime<Utc>> {
    let raw = raw.trim();
    let parsed = DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
                .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M"))
                .map(|naive| naive.and_utc())
        })
        .map_err(|_| CheckoutError::Validation(format!("invalid date_time '{}'", raw)))?;
    Ok(parsed.trunc_subsecs(0))
}

// ── Tests ──────────────────────────────────────────────────────
