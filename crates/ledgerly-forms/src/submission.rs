//! # Document Submission
//!
//! Explicit request/response state for saving a document, kept apart from
//! the pricing functions (which stay synchronous).
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   ┌──────┐  begin()   ┌────────────┐  succeed(attempt)  ┌───────────┐  │
//! │   │ Idle │──────────►│ Submitting │───────────────────►│ Succeeded │  │
//! │   └──────┘            └─────┬──────┘                    └───────────┘  │
//! │      ▲                      │ fail(attempt)                   │        │
//! │      │                      ▼                                 │        │
//! │      │                ┌──────────┐  begin() (retry)           │        │
//! │      │                │  Failed  │──────────► Submitting      │        │
//! │      │                └──────────┘                            │        │
//! │      └──────────────── reset() ───────────────────────────────┘        │
//! │                                                                         │
//! │  begin() while Submitting → SUBMISSION_CONFLICT                         │
//! │  succeed()/fail() with a stale attempt id → SUBMISSION_CONFLICT         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::document::{DocumentForm, DocumentPayload};
use crate::error::{ApiError, BackendError, FormResult};

// =============================================================================
// Backend Seam
// =============================================================================

/// The HTTP backend that stores documents.
///
/// Implemented outside this crate (bearer-token client). Returns the id the
/// backend assigned to the saved document.
#[async_trait]
pub trait DocumentBackend: Send + Sync {
    async fn submit(&self, payload: &DocumentPayload) -> Result<String, BackendError>;
}

// =============================================================================
// Submission State
// =============================================================================

/// Where a document's save request currently stands.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SubmissionState {
    #[default]
    Idle,
    #[serde(rename_all = "camelCase")]
    Submitting {
        attempt_id: Uuid,
        started_at: DateTime<Utc>,
    },
    #[serde(rename_all = "camelCase")]
    Succeeded {
        attempt_id: Uuid,
        document_id: String,
        finished_at: DateTime<Utc>,
    },
    #[serde(rename_all = "camelCase")]
    Failed {
        attempt_id: Uuid,
        error: ApiError,
        finished_at: DateTime<Utc>,
    },
}

impl SubmissionState {
    /// Starts a new attempt and returns its id.
    pub fn begin(&mut self) -> FormResult<Uuid> {
        if let SubmissionState::Submitting { attempt_id, .. } = self {
            return Err(ApiError::conflict(format!(
                "Submission {} is already in progress",
                attempt_id
            )));
        }

        let attempt_id = Uuid::new_v4();
        *self = SubmissionState::Submitting {
            attempt_id,
            started_at: Utc::now(),
        };
        Ok(attempt_id)
    }

    /// Completes `attempt` successfully.
    pub fn succeed(&mut self, attempt: Uuid, document_id: impl Into<String>) -> FormResult<()> {
        self.ensure_current(attempt)?;
        *self = SubmissionState::Succeeded {
            attempt_id: attempt,
            document_id: document_id.into(),
            finished_at: Utc::now(),
        };
        Ok(())
    }

    /// Completes `attempt` with an error.
    pub fn fail(&mut self, attempt: Uuid, error: ApiError) -> FormResult<()> {
        self.ensure_current(attempt)?;
        *self = SubmissionState::Failed {
            attempt_id: attempt,
            error,
            finished_at: Utc::now(),
        };
        Ok(())
    }

    /// Returns to idle (e.g. when the form is reopened).
    pub fn reset(&mut self) {
        *self = SubmissionState::Idle;
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self, SubmissionState::Submitting { .. })
    }

    fn ensure_current(&self, attempt: Uuid) -> FormResult<()> {
        match self {
            SubmissionState::Submitting { attempt_id, .. } if *attempt_id == attempt => Ok(()),
            _ => Err(ApiError::conflict(format!(
                "Submission {} is not the one in progress",
                attempt
            ))),
        }
    }
}

/// Runs one save attempt for `form` through `backend`.
///
/// The state ends in `Succeeded` or `Failed`; the backend error is also
/// returned so the caller can surface it.
pub async fn submit_document<B>(
    form: &DocumentForm,
    backend: &B,
    state: &mut SubmissionState,
) -> FormResult<String>
where
    B: DocumentBackend + ?Sized,
{
    let attempt = state.begin()?;
    let payload = form.payload();
    info!(%attempt, kind = ?form.kind(), items = payload.items.len(), "Submitting document");

    match backend.submit(&payload).await {
        Ok(document_id) => {
            info!(%attempt, %document_id, "Document saved");
            state.succeed(attempt, document_id.clone())?;
            Ok(document_id)
        }
        Err(err) => {
            warn!(%attempt, error = %err, "Document submission failed");
            let api_error = ApiError::from(err);
            state.fail(attempt, api_error.clone())?;
            Err(api_error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_happy_path() {
        let mut state = SubmissionState::default();
        let attempt = state.begin().unwrap();
        assert!(state.is_submitting());

        state.succeed(attempt, "inv-1").unwrap();
        assert!(matches!(
            state,
            SubmissionState::Succeeded { ref document_id, .. } if document_id == "inv-1"
        ));
    }

    #[test]
    fn test_double_begin_is_rejected() {
        let mut state = SubmissionState::default();
        state.begin().unwrap();

        let err = state.begin().unwrap_err();
        assert_eq!(err.code, ErrorCode::SubmissionConflict);
    }

    #[test]
    fn test_stale_attempt_is_rejected() {
        let mut state = SubmissionState::default();
        let first = state.begin().unwrap();
        state.fail(first, ApiError::validation("bad")).unwrap();

        let second = state.begin().unwrap();
        assert!(state.succeed(first, "inv-1").is_err());
        assert!(state.succeed(second, "inv-2").is_ok());
    }

    #[test]
    fn test_retry_after_failure_and_reset() {
        let mut state = SubmissionState::default();
        let attempt = state.begin().unwrap();
        state.fail(attempt, ApiError::validation("bad")).unwrap();
        assert!(matches!(state, SubmissionState::Failed { .. }));

        assert!(state.begin().is_ok());
        state.reset();
        assert_eq!(state, SubmissionState::Idle);
    }

    #[test]
    fn test_serializes_with_status_tag() {
        let json = serde_json::to_value(SubmissionState::Idle).unwrap();
        assert_eq!(json["status"], "idle");

        let mut state = SubmissionState::default();
        state.begin().unwrap();
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["status"], "submitting");
        assert!(json["attemptId"].is_string());
    }
}
