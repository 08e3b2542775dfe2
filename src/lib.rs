//! # Toolform - Schema-Driven Tool Forms
//!
//! Toolform discovers tools from a Strata-style tool gateway, builds an
//! editable form from each tool's parameter schema, and submits the filled-in
//! form back through the gateway.
//!
//! ## Features
//!
//! - **Schema-driven forms**: typed defaults, nested groups, oneOf/anyOf variants
//! - **Key-path edits**: `filters.lang=en` style addressing of nested values
//! - **Validation**: required fields are checked before anything is sent
//! - **Correlation ids**: every invocation carries a fresh `X-Request-ID`
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use toolform::adapters::strata_client::StrataClient;
//! use toolform::config::Settings;
//! use toolform::domain::ToolCatalogPort;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // Load configuration
//!     let settings = Settings::from_path(std::path::Path::new("toolform.toml"))?;
//!
//!     let client = StrataClient::new(&settings.gateway)?;
//!     for tool in client.list_tools().await? {
//!         println!("{}", tool.name);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! Toolform follows Hexagonal Architecture:
//! - **Domain**: catalog types and the catalog port
//! - **Engine** (`toolform-engine`): form state, validation and submission
//! - **Adapters**: the gateway HTTP client
//! - **Config**: Configuration management

pub mod adapters;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
