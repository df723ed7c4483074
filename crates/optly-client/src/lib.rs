// ABOUTME: Outbound HTTP adapters: the Optimizely API client, the report-function
// ABOUTME: client, auth-context normalization, and the tagged response-body reader.

pub mod auth;
pub mod optimizely;
pub mod reports;
pub mod response;

pub use auth::{AuthPayload, Credentials};
pub use optimizely::OptimizelyClient;
pub use reports::{ReportClient, ReportResponse};
pub use response::ApiBody;
