pub mod dto;
pub mod gateway;
mod upload_body;

pub use crate::dto::HealthResponse;
pub use crate::gateway::ApiGateway;
