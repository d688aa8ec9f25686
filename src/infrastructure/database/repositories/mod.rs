//! Database repository implementations
//!
//! Per-aggregate SeaORM repositories + unified RepositoryProvider.

pub mod booking_repository;
pub mod checkout_order_repository;
pub mod repository_provider;

pub use booking_repository::SeaOrmBookingRepository;
pub use checkout_order_repository::SeaOrmCheckoutOrderRepository;
pub use repository_provider::SeaOrmRepositoryProvider;
