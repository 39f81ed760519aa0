#![forbid(unsafe_code)]

pub mod api;
pub mod http;
pub mod memory;

pub use api::{
    CatalogGateway, Gateway, GatewayError, QuizSessionData, SessionGateway, SettingsGateway,
    SubmitReceipt, TaskGateway, TaskStatusReport, TaskTicket,
};
pub use http::HttpGateway;
pub use memory::InMemoryGateway;
