//! # Paseo Amigo checkout service
//!
//! Payment-authorized booking checkout for the Paseo Amigo pet-walking
//! service. A customer's cart (priced in CLP) becomes a PayPal order in USD;
//! once the payer approves it the order is captured and, only when PayPal
//! reports `COMPLETED`, a booking is written to the ledger. The ledger's
//! unique constraint makes repeated captures of the same slot or order
//! harmless.
//!
//! ## Architecture
//!
//! - **domain**: bookings, provider orders, money, repository and gateway ports
//! - **application**: the two-phase checkout coordinator
//! - **infrastructure**: PayPal adapter with token cache, SeaORM ledger,
//!   in-memory repositories, JWT verification
//! - **interfaces**: REST API with Swagger documentation
//! - **server**: runtime assembly and graceful shutdown

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, resolve_config_path, AppConfig};

pub use application::{CheckoutCoordinator, CheckoutSettings};
pub use infrastructure::database::repositories::SeaOrmRepositoryProvider;
pub use infrastructure::{init_database, DatabaseConfig, PayPalGateway, PayPalSettings};
pub use interfaces::create_api_router;
pub use shared::errors::{CheckoutError, ConfigError};
