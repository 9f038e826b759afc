pub mod app;
pub mod config;
pub mod context;
pub mod domain;
pub mod outbound;
pub mod telemetry;

pub use domain::user;
pub use outbound::repositories;
