//! # Core Application Logic
//!
//! Folio's business logic. It knows nothing about browsers, terminals, or
//! HTTP clients.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • State (app data)     │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │  • Storage slots        │
//!                    └───────────┬─────────────┘
//!                                │
//!            ┌───────────────────┼───────────────────┐
//!            ▼                   ▼                   ▼
//!     ┌────────────┐      ┌────────────┐      ┌────────────┐
//!     │   Render   │      │   Views    │      │   Shell    │
//!     │    loop    │      │  (markup)  │      │  (stdin)   │
//!     └────────────┘      └────────────┘      └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: `AppState`, everything a pass reads
//! - [`action`]: the `Action` enum and the `update()` reducer
//! - [`storage`]: the three persisted slots and their backends
//! - [`config`]: layered configuration for the CLI host

pub mod action;
pub mod config;
pub mod state;
pub mod storage;

pub use action::{Action, Effect, OAuthProvider, Submission};
pub use state::{AppState, Draft, Theme};
