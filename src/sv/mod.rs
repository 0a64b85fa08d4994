//! Business logic services

pub mod hwid;
pub mod license;
pub mod subscription;
pub mod user;

pub use hwid::Hwid;
pub use license::License;
pub use subscription::Subscription;
pub use user::User;
