//! # toolform-engine
//!
//! Schema-driven form state for remotely discovered tools.
//!
//! A tool publishes a JSON-Schema-like description of its parameters. This
//! crate turns that description into a [`SchemaNode`] tree, seeds a nested
//! value tree from it, lets callers edit fields through dotted key-paths,
//! switch between `oneOf`/`anyOf` variants, and validates and submits the
//! result through a [`ToolInvoker`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use serde_json::json;
//! use toolform_engine::{FormSession, KeyPath, SchemaNode, ToolInvoker};
//!
//! async fn fill(invoker: Arc<dyn ToolInvoker>) -> toolform_engine::FormResult<()> {
//!     let schema = SchemaNode::from_value(&json!({
//!         "type": "object",
//!         "properties": { "query": { "type": "string" } },
//!         "required": ["query"]
//!     }));
//!     let mut form = FormSession::new("search", Arc::new(schema), invoker);
//!     form.edit(&KeyPath::parse("query")?, "rust forms")?;
//!     let result = form.submit().await?;
//!     println!("{}", result);
//!     Ok(())
//! }
//! ```
//!
//! ## Layout
//!
//! - [`schema_form`]: schema model, resolution, default derivation, variants
//!   and the rendering contract
//! - [`store`]: the key-path addressed value tree
//! - [`validator`]: required-field checks
//! - [`submission`]: the submit state machine and the invocation port
//! - [`session`]: one form instance tying the above together

pub mod error;
pub mod schema_form;
pub mod session;
pub mod store;
pub mod submission;
pub mod validator;

pub use error::{FormError, FormResult};
pub use schema_form::*;
pub use session::FormSession;
pub use store::{ValueStore, ValueTree};
pub use submission::{InvocationRequest, SubmissionController, SubmissionState, ToolInvoker};
