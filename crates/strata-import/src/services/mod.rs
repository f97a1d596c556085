//! Import pipeline services

mod columns;
mod commit;
mod controller;
mod intake;
mod mapping;
mod remote;
mod review;
mod session;

pub use columns::{ColumnResolver, ColumnSet};
pub use commit::CommitEngine;
pub use controller::{ImportController, Progress, Step};
pub use intake::FileIntake;
pub use mapping::{AttributeSource, MappingContext, ValueConstraint};
pub use remote::{PendingCall, RemoteReply, RemoteRequest, Ticket};
pub use review::{ReviewEngine, ReviewRow};
pub use session::{ImportSession, SessionEvent};
