//! # Queue Store and Admission Control
//!
//! - [`store`]: [`QueueStore`], the waiting FIFO plus the assigned-session
//!   set
//! - [`admission`]: [`admit`], the accept/refuse decision for new chats
//!
//! ## Lifecycle
//!
//! ```text
//!  create_session ──► admit ──► FIFO ──► drain ──► active set ──► sweep ──► removed
//!                       │                  ▲  │
//!                       ▼                  └──┘ requeue at front
//!                    refused
//! ```

pub mod admission;
pub mod store;

pub use admission::{admit, Admission};
pub use store::QueueStore;
