//! Strata bulk import pipeline
//!
//! Drives a user through importing entities (from CSV or JSON) or attribute
//! templates (from JSON): upload, field and attribute mapping, a server-side
//! review, and the final commit.
//!
//! # Architecture
//!
//! - **Services**: session state machine, intake, column resolution, mapping,
//!   review and commit, coordinated by `ImportController`
//! - **Transport**: `ImportClient` over the GraphQL API
//! - **Notifications**: transient user-facing messages and host view callbacks

pub mod config;
pub mod notifications;
pub mod services;
pub mod transport;

pub use config::{HttpClientConfig, ImportConfig};
pub use notifications::{
    HostView, Notification, NotificationLevel, Notifier, RecordingNotifier, TracingNotifier,
};
pub use services::{AttributeSource, ImportController, Progress, Step};
pub use transport::HttpImportClient;
