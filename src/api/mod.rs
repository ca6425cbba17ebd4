mod client;
mod error;
mod service;

pub use client::LmsClient;
pub use error::ApiError;
pub use service::AssignmentService;
