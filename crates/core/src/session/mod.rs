//! Authenticated request pipeline
//!
//! ```text
//! caller ──► RequestDispatcher ──► Exchange ──► Transport
//!                  │ 401
//!                  ▼
//!            RefreshCoordinator ──► refresh exchange
//!                  │        │
//!                  │        └─ failure ──► SessionTerminator ──► Navigator
//!                  └─ success ──► CredentialStore, then parked retries
//! ```

pub mod coordinator;
pub mod dispatcher;
pub mod exchange;
pub mod pending;
pub mod ports;

pub use coordinator::RefreshCoordinator;
pub use dispatcher::RequestDispatcher;
pub use exchange::Exchange;
pub use pending::{PendingOutcome, PendingQueue, PendingRequest, RefreshState};
pub use ports::{CredentialStore, Navigator, SessionTerminator, Transport};
