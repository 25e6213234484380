//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)
//!
//! Human output of `list` can be replaced by a template, e.g.
//! `'{id}:\t{source}'`.

use anyhow::Result;

use linkman_core::{Link, StorageError};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Check if output is in quiet mode
    pub fn is_quiet(&self) -> bool {
        matches!(self.format, OutputFormat::Quiet)
    }

    /// Print a single link
    pub fn print_link(&self, link: &Link) -> Result<()> {
        match self.format {
            OutputFormat::Human => {
                println!("  ID:     {}", id_text(link));
                println!("  URL:    {}", link.url);
                println!("  Source: {}", link.source);
                println!("  Title:  {}", link.title);
                println!("  List:   {}", link.list);
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(link)?);
            }
            OutputFormat::Quiet => {
                println!("{}", id_text(link));
            }
        }
        Ok(())
    }

    /// Print a list of links, optionally through a template
    pub fn print_links(&self, links: &[Link], template: Option<&str>) -> Result<()> {
        match self.format {
            OutputFormat::Human => match template {
                Some(template) => {
                    let template = unescape_template(template);
                    for link in links {
                        println!("{}", render_template(&template, link));
                    }
                }
                None => {
                    if links.is_empty() {
                        println!("No links found.");
                        return Ok(());
                    }
                    for link in links {
                        println!();
                        print!("{}", list_entry(link));
                    }
                    println!("\n{} link(s)", links.len());
                }
            },
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(links)?);
            }
            OutputFormat::Quiet => {
                for link in links {
                    println!("{}", id_text(link));
                }
            }
        }
        Ok(())
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print a warning to stderr (suppressed in quiet mode)
    pub fn warn(&self, msg: &str) {
        if !self.is_quiet() {
            eprintln!("⚠ {}", msg);
        }
    }
}

/// Recovery suggestion for a storage failure anywhere in the error chain
pub fn recovery_hint(err: &anyhow::Error) -> Option<&'static str> {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<StorageError>())
        .and_then(StorageError::recovery_suggestion)
}

/// Default human-readable block for one link of a listing
fn list_entry(link: &Link) -> String {
    format!(
        "ID:     {}\nSource: {}\nTitle:  {}\nURL:    {}\nList:   {}\n",
        id_text(link),
        link.source,
        link.title,
        link.url,
        link.list
    )
}

fn id_text(link: &Link) -> String {
    link.id()
        .map(|id| id.to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Turn `\t`, `\n` and `\\` escapes typed on the command line into characters
pub fn unescape_template(template: &str) -> String {
    let mut result = String::with_capacity(template.len());
    let mut chars = template.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => result.push('\t'),
            Some('n') => result.push('\n'),
            Some('\\') => result.push('\\'),
            Some(other) => {
                result.push('\\');
                result.push(other);
            }
            None => result.push('\\'),
        }
    }

    result
}

/// Substitute `{field}` placeholders with the link's values
///
/// Unknown placeholders are left as they are.
pub fn render_template(template: &str, link: &Link) -> String {
    let mut result = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        result.push_str(&rest[..start]);
        let after = &rest[start + 1..];

        match after.find('}') {
            Some(end) => {
                let field = &after[..end];
                match field_value(field, link) {
                    Some(value) => result.push_str(&value),
                    None => {
                        result.push('{');
                        result.push_str(field);
                        result.push('}');
                    }
                }
                rest = &after[end + 1..];
            }
            None => {
                result.push_str(&rest[start..]);
                rest = "";
            }
        }
    }

    result.push_str(rest);
    result
}

fn field_value(field: &str, link: &Link) -> Option<String> {
    let value = match field {
        "id" => id_text(link),
        "source" => link.source.clone(),
        "title" => link.title.clone(),
        "url" => link.url.to_string(),
        "list" => link.list.clone(),
        "archived" => link.is_archived().to_string(),
        _ => return None,
    };
    Some(value)
}
