//! Schema-Driven Form Model
//!
//! Builds editable form state from tool parameter schemas:
//! - Resolve raw JSON Schema into a closed [`SchemaNode`] tree
//! - Derive initial values for each field
//! - Switch between `oneOf`/`anyOf` variants
//! - Describe the control each field renders as, and coerce raw input

pub mod types;
pub mod resolver;
pub mod generator;
pub mod fields;
pub mod array_field;
pub mod variant_selector;

pub use types::*;
pub use resolver::{resolve_schema, SchemaResolutionContext, DEFAULT_MAX_DEPTH};
pub use generator::{derive_default, seed_tree};
pub use fields::{coerce_input, describe_fields, describe_variant_fields, display_value, FieldControl, FieldDescriptor};
pub use array_field::{format_list, parse_list};
pub use variant_selector::{apply_variant, variant_options, VariantOption};
