//! Command handlers behind the CLI subcommands

use anyhow::Context;
use serde_json::Value;
use std::sync::Arc;
use toolform_engine::{
    describe_fields, display_value, variant_options, FieldControl, FieldDescriptor, FormResult,
    FormSession, SchemaNode, ToolInvoker, VariantOption,
};
use tracing::{info, warn};

use crate::adapters::strata_client::StrataClient;
use crate::cli::{Assignment, Cli, Command, VariantChoice};
use crate::config::{FormSettings, Settings};
use crate::domain::{Tool, ToolCatalogPort};

/// Edits applied to a fresh form before it is submitted
#[derive(Debug, Clone, Default)]
pub struct FormEdits {
    pub variants: Vec<VariantChoice>,
    pub set: Vec<Assignment>,
    pub input: Vec<Assignment>,
}

pub async fn run(cli: Cli, settings: Settings) -> anyhow::Result<()> {
    let client = Arc::new(StrataClient::new(&settings.gateway)?);

    match cli.command {
        Command::Health => {
            let health = client.health().await?;
            println!("{}: {} ({} tools)", client.base_url(), health.status, health.tools);
        }
        Command::Tools => {
            let tools = client.list_tools().await?;
            print!("{}", render_tools(&tools));
        }
        Command::Fields { tool } => {
            let tool = client.get_tool(&tool).await?;
            print!("{}", render_form(&form_schema(&tool, &settings.form)));
        }
        Command::Invoke {
            tool,
            set,
            input,
            variant,
            pretty,
        } => {
            let edits = FormEdits {
                variants: variant,
                set,
                input,
            };
            let result = invoke_tool(client.as_ref(), client.clone(), &settings.form, &tool, &edits).await?;
            if pretty {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("{}", result);
            }
        }
    }

    Ok(())
}

pub fn form_schema(tool: &Tool, form: &FormSettings) -> SchemaNode {
    SchemaNode::from_value_with_depth(&tool.schema, form.max_schema_depth)
}

/// Build a form for `tool_name`, apply `edits`, and submit it once
pub async fn invoke_tool(
    catalog: &dyn ToolCatalogPort,
    invoker: Arc<dyn ToolInvoker>,
    form: &FormSettings,
    tool_name: &str,
    edits: &FormEdits,
) -> anyhow::Result<Value> {
    let tool = catalog.get_tool(tool_name).await?;
    let mut session = FormSession::new(tool.name.clone(), Arc::new(form_schema(&tool, form)), invoker);

    apply_edits(&mut session, edits).context("Failed to fill in form")?;

    let missing = session.missing_required();
    if missing.len() > 1 {
        warn!("Missing required fields: {}", missing.join(", "));
    }

    let result = session
        .submit()
        .await
        .with_context(|| format!("Submission of '{}' failed", tool.name))?;
    info!("Tool '{}' completed", tool.name);
    Ok(result)
}

/// Variants first so their defaults never overwrite explicit values
pub fn apply_edits(session: &mut FormSession, edits: &FormEdits) -> FormResult<()> {
    for choice in &edits.variants {
        session.select_variant(choice.path.as_ref(), choice.index)?;
    }
    for assignment in &edits.set {
        session.set(&assignment.path, parse_json_or_string(&assignment.value))?;
    }
    for assignment in &edits.input {
        session.edit(&assignment.path, &assignment.value)?;
    }
    Ok(())
}

fn parse_json_or_string(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

pub fn render_tools(tools: &[Tool]) -> String {
    if tools.is_empty() {
        return "No tools available\n".to_string();
    }
    let width = tools.iter().map(|t| t.name.len()).max().unwrap_or(0);
    tools
        .iter()
        .map(|tool| format!("{:width$}  {}\n", tool.name, tool.description, width = width))
        .collect()
}

/// Text rendering of a tool's form: one line per field, nested groups
/// indented, followed by the root variant selector if there is one.
pub fn render_form(schema: &SchemaNode) -> String {
    let mut out = String::new();
    let fields = describe_fields(schema);
    if fields.is_empty() && !schema.has_variants() {
        out.push_str("(no parameters)\n");
    }
    write_fields(&mut out, &fields, 0);

    let root_variants = variant_options(schema);
    if !root_variants.is_empty() {
        out.push_str("variants (--variant .=INDEX):\n");
        write_variants(&mut out, &root_variants, 0);
    }
    out
}

fn write_fields(out: &mut String, fields: &[FieldDescriptor], depth: usize) {
    let indent = "  ".repeat(depth);
    for field in fields {
        let required = if field.required { ", required" } else { "" };
        out.push_str(&format!(
            "{}{} \"{}\" ({}{}): {}\n",
            indent,
            field.path,
            field.label,
            field.type_name,
            required,
            control_label(&field.control)
        ));
        if let Some(description) = &field.description {
            out.push_str(&format!("{}    {}\n", indent, description));
        }
        if !field.variants.is_empty() {
            out.push_str(&format!("{}  variants (--variant {}=INDEX):\n", indent, field.path));
            write_variants(out, &field.variants, depth + 1);
        }
        if let FieldControl::Group { fields } = &field.control {
            write_fields(out, fields, depth + 1);
        }
    }
}

fn write_variants(out: &mut String, variants: &[VariantOption], depth: usize) {
    let indent = "  ".repeat(depth);
    for option in variants {
        out.push_str(&format!("{}  [{}] {}\n", indent, option.index, option.title));
    }
}

fn control_label(control: &FieldControl) -> String {
    match control {
        FieldControl::Select { options } => format!(
            "one of {}",
            options.iter().map(display_value).collect::<Vec<_>>().join(" | ")
        ),
        FieldControl::Numeric { integer: true } => "whole number".to_string(),
        FieldControl::Numeric { integer: false } => "number".to_string(),
        FieldControl::Toggle => "true/false".to_string(),
        FieldControl::List => "comma-separated list".to_string(),
        FieldControl::Group { .. } => "group".to_string(),
        FieldControl::Text => "text".to_string(),
    }
}
