pub mod application;
pub mod docs;
pub mod error;
pub mod runtime;
