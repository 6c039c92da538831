//! Domain models for the Kitchen Stock Tracker

mod meal;
mod product;
mod report;
mod serving;
mod user;

pub use meal::*;
pub use product::*;
pub use report::*;
pub use serving::*;
pub use user::*;
