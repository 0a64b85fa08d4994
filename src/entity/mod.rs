//! SeaORM entity definitions for the licensing store

pub mod blacklist;
pub mod license;
pub mod subscription;
pub mod used_license;
pub mod user;
