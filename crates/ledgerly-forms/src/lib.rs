//! # ledgerly-forms: Document Form State
//!
//! This is the layer the frontend talks to. It owns the mutable state of
//! a document screen and delegates all pricing to `ledgerly-core`.
//!
//! ## Module Structure
//! ```text
//! ledgerly_forms/
//! ├── lib.rs           ◄── YOU ARE HERE (logging setup)
//! ├── config.rs        ◄── FormsConfig (env overrides, currency format)
//! ├── document.rs      ◄── DocumentForm, LineEdit, DocumentPayload
//! ├── submission.rs    ◄── SubmissionState, DocumentBackend, submit_document
//! ├── preferences.rs   ◄── TablePreferences, PreferencesRepository
//! └── error.rs         ◄── ApiError, BackendError
//! ```
//!
//! ## State Ownership
//! No ambient state: the caller holds a `DocumentForm` and a
//! `SubmissionState` per open screen, plus one `FormsConfig` and one
//! `PreferencesRepository` for the session, and passes them where needed.

pub mod config;
pub mod document;
pub mod error;
pub mod preferences;
pub mod submission;

pub use config::FormsConfig;
pub use document::{DocumentForm, DocumentPayload, LineEdit};
pub use error::{ApiError, BackendError, ErrorCode, FormResult};
pub use preferences::{InMemoryPreferences, PreferencesRepository, TablePreferences};
pub use submission::{submit_document, DocumentBackend, SubmissionState};

use tracing_subscriber::EnvFilter;

/// Initializes the tracing subscriber.
///
/// ## Configuration
/// - Default level: INFO
/// - Override with RUST_LOG environment variable
/// - Example: RUST_LOG=ledgerly_forms=debug
///
/// Safe to call more than once; later calls keep the first subscriber.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
