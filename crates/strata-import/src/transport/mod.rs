//! Transports for the remote import operations

mod http;

pub use http::HttpImportClient;
