//! Colored output helpers for CLI
//!
//! Provides consistent, colored terminal output for mdlint-agents, including
//! the live conversation transcript.

use crate::markdown::Violation;
use crate::types::{ChatMessage, MessageRole};
use owo_colors::OwoColorize;

const SEPARATOR: &str = "--------------------------------------------------------------------------------";

/// Output style configuration
#[derive(Debug, Clone, Copy)]
pub struct Output {
    /// Whether to use colored output
    pub colored: bool,
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

impl Output {
    /// Create a new output helper with colors enabled
    pub fn new() -> Self {
        Self { colored: true }
    }

    /// Create a new output helper with colors disabled
    pub fn no_color() -> Self {
        Self { colored: false }
    }

    /// Print a success message with a checkmark
    pub fn success(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "✓".green().bold(), message.green());
        } else {
            println!("  [OK] {}", message);
        }
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "⚠".yellow().bold(), message.yellow());
        } else {
            println!("  [WARN] {}", message);
        }
    }

    /// Print an error message
    pub fn error(&self, message: &str) {
        if self.colored {
            eprintln!("  {} {}", "✗".red().bold(), message.red());
        } else {
            eprintln!("  [ERROR] {}", message);
        }
    }

    /// Print a header for a section
    pub fn header(&self, title: &str) {
        if self.colored {
            println!("\n  {}", title.bright_white().bold().underline());
        } else {
            println!("\n  === {} ===", title);
        }
    }

    /// Print a key-value pair
    pub fn kv(&self, key: &str, value: &str) {
        if self.colored {
            println!("    {}: {}", key.dimmed(), value.bright_white());
        } else {
            println!("    {}: {}", key, value);
        }
    }

    /// Print a list item
    pub fn list_item(&self, item: &str) {
        if self.colored {
            println!("    {} {}", "•".blue(), item);
        } else {
            println!("    - {}", item);
        }
    }

    /// Print one lint violation
    pub fn violation(&self, violation: &Violation) {
        if self.colored {
            println!(
                "    {} {} {}",
                format!("{:>4}", violation.line).dimmed(),
                format!("{}/{}", violation.rule_id, violation.rule_name).yellow(),
                violation.message
            );
        } else {
            println!("    {}", violation);
        }
    }

    /// Print a table header row
    pub fn table_header(&self, columns: &[&str]) {
        let header: String = columns
            .iter()
            .map(|c| format!("{:<28}", c))
            .collect::<Vec<_>>()
            .join(" ");
        if self.colored {
            println!("    {}", header.bright_white().bold());
            println!("    {}", "─".repeat(columns.len() * 29).dimmed());
        } else {
            println!("    {}", header);
            println!("    {}", "-".repeat(columns.len() * 29));
        }
    }

    /// Print a table row
    pub fn table_row(&self, values: &[&str]) {
        let row: String = values
            .iter()
            .map(|v| format!("{:<28}", v))
            .collect::<Vec<_>>()
            .join(" ");
        println!("    {}", row);
    }

    /// Print one conversation message as `sender (to recipient):`
    pub fn message(&self, message: &ChatMessage, recipient: &str) {
        println!("{}", self.render_message(message, recipient));
    }

    fn render_message(&self, message: &ChatMessage, recipient: &str) -> String {
        let sender = message.name.as_deref().unwrap_or("system");
        let mut out = if self.colored {
            format!("{} (to {}):\n\n", sender.yellow().bold(), recipient)
        } else {
            format!("{} (to {}):\n\n", sender, recipient)
        };

        match message.role {
            MessageRole::Tool => {
                let id = message.tool_call_id.as_deref().unwrap_or("-");
                let banner = format!("***** Response from calling tool ({}) *****", id);
                self.push_banner(&mut out, &banner);
                out.push_str(&message.content);
                out.push('\n');
                self.push_banner(&mut out, &"*".repeat(banner.chars().count()));
            }
            _ => {
                if !message.content.is_empty() {
                    out.push_str(&message.content);
                    out.push('\n');
                }
                for call in &message.tool_calls {
                    let banner = format!("***** Suggested tool call ({}): {} *****", call.id, call.name);
                    self.push_banner(&mut out, &banner);
                    out.push_str("Arguments: \n");
                    out.push_str(&call.arguments.to_string());
                    out.push('\n');
                    self.push_banner(&mut out, &"*".repeat(banner.chars().count()));
                }
            }
        }

        out.push('\n');
        out.push_str(SEPARATOR);
        out
    }

    fn push_banner(&self, out: &mut String, banner: &str) {
        if self.colored {
            out.push_str(&banner.green().to_string());
        } else {
            out.push_str(banner);
        }
        out.push('\n');
    }
}
