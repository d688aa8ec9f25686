//! Infrastructure layer - external concerns

pub mod crypto;
pub mod database;
pub mod paypal;
pub mod storage;

pub use database::{init_database, DatabaseConfig};
pub use paypal::{PayPalGateway, PayPalSettings, ProviderCredentials};
pub use storage::InMemoryRepositoryProvider;
