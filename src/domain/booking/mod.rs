//! Booking aggregate
//!
//! Contains the Booking entity, its payment sub-record, and the ledger interface.

pub mod model;
pub mod repository;

pub use model::{
    parse_scheduled_at, Booking, BookingSlot, NewBooking, PaymentInfo, PaymentStatus,
    ServiceType, MAX_NOTES_LEN, PAYMENT_PROVIDER,
};
pub use repository::BookingRepository;
