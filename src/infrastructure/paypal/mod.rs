//! PayPal REST adapter
//!
//! - `token_cache` - OAuth client-credentials token, refreshed on demand
//! - `gateway` - Orders v2 create / capture behind `PaymentGateway`
//! - `wire` - request and response bodies

pub mod gateway;
pub mod token_cache;
mod wire;

pub use gateway::{PayPalGateway, PayPalSettings};
pub use token_cache::{ProviderCredentials, TokenCache};
