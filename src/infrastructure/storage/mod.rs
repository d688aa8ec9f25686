//! In-memory repository implementations

mod memory;

pub use memory::{
    InMemoryBookingRepository, InMemoryCheckoutOrderRepository, InMemoryRepositoryProvider,
};
