pub mod access;
pub mod api;
pub mod error;
pub mod feature;
pub mod path;
pub mod property;
