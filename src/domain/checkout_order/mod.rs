pub mod model;
pub mod repository;

pub use model::CheckoutOrder;
pub use repository::CheckoutOrderRepository;
