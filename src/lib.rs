pub mod environment;
pub mod error;
pub mod export;
pub mod extract;
pub mod oracle;
pub mod pipeline;
pub mod store;
pub mod web;

pub use web::start_web_server;
