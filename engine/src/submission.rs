//! Form submission
//!
//! Validates a value tree and hands it to the invocation port, one attempt
//! per submission, with at most one submission in flight per controller.
//!
//! ```text
//! Idle -> Validating -> Idle                      (missing required field)
//!                    -> Submitting -> Succeeded | Failed
//! Succeeded | Failed -> Idle                      (next edit or submission)
//! ```

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use uuid::Uuid;

use crate::error::{FormError, FormResult};
use crate::schema_form::SchemaNode;
use crate::store::ValueTree;
use crate::validator::validate_required;

/// What the invocation port receives for one submission
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct InvocationRequest {
    pub tool: String,
    pub arguments: ValueTree,
    /// Per-invocation id: unique, orders chronologically, no other meaning
    pub correlation_id: String,
}

/// Port that executes a tool with validated arguments
#[async_trait]
pub trait ToolInvoker: Send + Sync {
    /// Run the tool and return its raw result payload
    async fn invoke(&self, request: &InvocationRequest) -> anyhow::Result<Value>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmissionState {
    Idle,
    Validating,
    Submitting { correlation_id: String },
    Succeeded { correlation_id: String },
    Failed { correlation_id: String, message: String },
}

/// Fresh correlation id (UUIDv7, so ids sort by creation time)
pub fn new_correlation_id() -> String {
    Uuid::now_v7().to_string()
}

/// Clears the in-flight flag however the submit future ends
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct SubmissionController {
    invoker: Arc<dyn ToolInvoker>,
    in_flight: AtomicBool,
    state: Mutex<SubmissionState>,
}

impl SubmissionController {
    pub fn new(invoker: Arc<dyn ToolInvoker>) -> Self {
        Self {
            invoker,
            in_flight: AtomicBool::new(false),
            state: Mutex::new(SubmissionState::Idle),
        }
    }

    pub fn state(&self) -> SubmissionState {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Return to `Idle` after an edit, unless a submission is running
    pub fn acknowledge(&self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if matches!(
            *state,
            SubmissionState::Succeeded { .. } | SubmissionState::Failed { .. }
        ) {
            *state = SubmissionState::Idle;
        }
    }

    fn set_state(&self, next: SubmissionState) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = next;
    }

    /// Validate `tree` against `schema` and invoke `tool` with it.
    ///
    /// Returns the raw result payload. A second call while one is in flight
    /// is rejected with [`FormError::SubmissionInFlight`] and does not touch
    /// the running one.
    pub async fn submit(&self, tool: &str, schema: &SchemaNode, tree: &ValueTree) -> FormResult<Value> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            log::warn!("Rejected submission of '{}': another is in flight", tool);
            return Err(FormError::SubmissionInFlight);
        }
        let _in_flight = InFlight(&self.in_flight);

        self.set_state(SubmissionState::Validating);
        if let Err(err) = validate_required(schema, tree) {
            log::info!("Submission of '{}' blocked: {}", tool, err);
            self.set_state(SubmissionState::Idle);
            return Err(err);
        }

        let request = InvocationRequest {
            tool: tool.to_string(),
            arguments: tree.clone(),
            correlation_id: new_correlation_id(),
        };
        self.set_state(SubmissionState::Submitting {
            correlation_id: request.correlation_id.clone(),
        });
        log::info!("Submitting '{}' [{}]", tool, request.correlation_id);

        match self.invoker.invoke(&request).await {
            Ok(result) => {
                log::info!("Invocation of '{}' [{}] succeeded", tool, request.correlation_id);
                self.set_state(SubmissionState::Succeeded {
                    correlation_id: request.correlation_id,
                });
                Ok(result)
            }
            Err(err) => {
                let message = format!("{:#}", err);
                log::warn!(
                    "Invocation of '{}' [{}] failed: {}",
                    tool,
                    request.correlation_id,
                    message
                );
                self.set_state(SubmissionState::Failed {
                    correlation_id: request.correlation_id,
                    message: message.clone(),
                });
                Err(FormError::Invocation(message))
            }
        }
    }
}
