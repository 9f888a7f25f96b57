//! Services that draw catalog data and drawn paths for the user

pub mod preview;
pub mod route;
