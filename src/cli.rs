use clap::{Parser, Subcommand};
use std::path::PathBuf;
use toolform_engine::KeyPath;

/// Toolform - fill in and invoke gateway tools from their parameter schemas
#[derive(Parser, Debug, Clone)]
#[command(name = "toolform", version, about, long_about = None)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, env = "TOOLFORM_CONFIG", default_value = "toolform.toml")]
    pub config: PathBuf,

    /// Tool gateway base URL
    #[arg(long, env = "TOOLFORM_URL")]
    pub url: Option<String>,

    /// Gateway request timeout in seconds
    #[arg(long, env = "TOOLFORM_TIMEOUT")]
    pub timeout: Option<u64>,

    /// Log level used when RUST_LOG is unset
    #[arg(long, env = "TOOLFORM_LOG")]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Check that the gateway is up
    Health,

    /// List the tools the gateway offers
    Tools,

    /// Show the form fields for a tool
    Fields {
        /// Tool name
        tool: String,
    },

    /// Fill in a tool's form and submit it once
    Invoke {
        /// Tool name
        tool: String,

        /// Store a JSON value at a field path (non-JSON text is stored as a string)
        #[arg(long = "set", value_name = "PATH=JSON", value_parser = parse_assignment)]
        set: Vec<Assignment>,

        /// Type raw text into the control at a field path
        #[arg(long = "input", value_name = "PATH=TEXT", value_parser = parse_assignment)]
        input: Vec<Assignment>,

        /// Select a variant by 0-based index; the root is "."
        #[arg(long = "variant", value_name = "PATH=INDEX", value_parser = parse_variant)]
        variant: Vec<VariantChoice>,

        /// Pretty-print the result
        #[arg(long)]
        pretty: bool,
    },
}

/// `path=value` pair from the command line
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub path: KeyPath,
    pub value: String,
}

/// `path=index` variant selection; `path` is `None` for the schema root
#[derive(Debug, Clone, PartialEq)]
pub struct VariantChoice {
    pub path: Option<KeyPath>,
    pub index: usize,
}

fn split_pair(s: &str) -> Result<(&str, &str), String> {
    s.split_once('=')
        .ok_or_else(|| format!("expected PATH=VALUE, got '{}'", s))
}

fn parse_assignment(s: &str) -> Result<Assignment, String> {
    let (path, value) = split_pair(s)?;
    Ok(Assignment {
        path: KeyPath::parse(path).map_err(|e| e.to_string())?,
        value: value.to_string(),
    })
}

fn parse_variant(s: &str) -> Result<VariantChoice, String> {
    let (path, index) = split_pair(s)?;
    let index = index
        .trim()
        .parse::<usize>()
        .map_err(|_| format!("variant index must be a non-negative integer, got '{}'", index))?;
    let path = match path {
        "." => None,
        other => Some(KeyPath::parse(other).map_err(|e| e.to_string())?),
    };
    Ok(VariantChoice { path, index })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["toolform", "tools"]);
        assert_eq!(cli.config, PathBuf::from("toolform.toml"));
        assert!(cli.url.is_none());
        assert!(cli.timeout.is_none());
        assert!(cli.log_level.is_none());
        assert!(matches!(cli.command, Command::Tools));
    }

    #[test]
    fn test_cli_with_args() {
        let cli = Cli::parse_from([
            "toolform",
            "--config",
            "custom.toml",
            "--url",
            "http://localhost:9000",
            "invoke",
            "search",
            "--set",
            "limit=5",
            "--input",
            "filters.tags=a, b",
            "--variant",
            ".=1",
            "--variant",
            "target=0",
            "--pretty",
        ]);
        assert_eq!(cli.config, PathBuf::from("custom.toml"));
        assert_eq!(cli.url, Some("http://localhost:9000".to_string()));

        match cli.command {
            Command::Invoke { tool, set, input, variant, pretty } => {
                assert_eq!(tool, "search");
                assert_eq!(set[0].path.to_string(), "limit");
                assert_eq!(set[0].value, "5");
                assert_eq!(input[0].path.to_string(), "filters.tags");
                assert_eq!(input[0].value, "a, b");
                assert_eq!(variant[0], VariantChoice { path: None, index: 1 });
                assert_eq!(variant[1].path, Some(KeyPath::field("target")));
                assert!(pretty);
            }
            other => panic!("expected invoke, got {:?}", other),
        }
    }

    #[test]
    fn test_assignment_value_may_contain_equals() {
        let assignment = parse_assignment("query=a=b").unwrap();
        assert_eq!(assignment.value, "a=b");
    }

    #[test]
    fn test_bad_pairs_rejected() {
        assert!(parse_assignment("novalue").is_err());
        assert!(parse_assignment("a..b=1").is_err());
        assert!(parse_variant("target=-1").is_err());
        assert!(parse_variant("=0").is_err());
    }
}
