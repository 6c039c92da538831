//! Business logic services for the Kitchen Stock Tracker

pub mod auth;
pub mod catalog;
pub mod portions;
pub mod reporting;
pub mod serving;
pub mod stock;
pub mod users;

pub use auth::AuthService;
pub use catalog::CatalogService;
pub use portions::PortionService;
pub use reporting::ReportingService;
pub use serving::ServingService;
pub use stock::StockService;
pub use users::UserService;
