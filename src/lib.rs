pub mod capability;
pub mod classify;
pub mod config;
pub mod device;
pub mod dispatch;
pub mod error;
