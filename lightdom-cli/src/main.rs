//! lightdom CLI
//!
//! Parses a file or an inline string and prints the resulting tree, the
//! serialized markup, or a JSON snapshot, optionally narrowed by a selector.

use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use lightdom::dom::{DomTree, NodeId, NodeType};
use lightdom::{Document, SelfClosingConfig, set_custom_self_closing};
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;

/// Parse markup with lightdom and inspect the result
#[derive(Parser, Debug)]
#[command(name = "lightdom")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Print the tree of a file
    lightdom page.html

    # Parse an inline fragment and print the markup of matching elements
    lightdom --html '<div class="a"><i id="x">hi</i></div>' --select '[id]' --outer

    # Treat ISML-style tags as self-closing
    lightdom template.isml --self-closing-pattern 'is(?:else|set)'

    # Dump the document as JSON
    lightdom page.html --json

Set RUST_LOG=debug for parser diagnostics on stderr."#)]
struct Cli {
    /// Path to a markup file
    #[arg(value_name = "FILE", required_unless_present = "html")]
    path: Option<PathBuf>,

    /// Parse this string instead of a file
    #[arg(long, value_name = "HTML", conflicts_with = "path")]
    html: Option<String>,

    /// Only show elements matching this selector list
    #[arg(short, long, value_name = "SELECTOR")]
    select: Option<String>,

    /// Extra tag names to treat as self-closing
    #[arg(long, value_name = "TAGS", value_delimiter = ',')]
    self_closing_tags: Vec<String>,

    /// Pattern; tags whose names contain a match are self-closing
    #[arg(long, value_name = "REGEX", conflicts_with = "self_closing_tags")]
    self_closing_pattern: Option<String>,

    /// Self-closing configuration as JSON: a list of names, a pattern
    /// string, or {"pattern": "..."}
    #[arg(
        long,
        value_name = "JSON",
        conflicts_with_all = ["self_closing_tags", "self_closing_pattern"]
    )]
    self_closing_json: Option<String>,

    /// Print serialized markup instead of the tree
    #[arg(long, conflicts_with = "json")]
    outer: bool,

    /// Print a JSON snapshot instead of the tree
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn self_closing_config(&self) -> Result<Option<SelfClosingConfig>> {
        if let Some(ref raw) = self.self_closing_json {
            let value: serde_json::Value =
                serde_json::from_str(raw).context("--self-closing-json is not valid JSON")?;
            return Ok(Some(SelfClosingConfig::try_from(value)?));
        }
        if let Some(ref pattern) = self.self_closing_pattern {
            return Ok(Some(SelfClosingConfig::PatternString(pattern.clone())));
        }
        if !self.self_closing_tags.is_empty() {
            return Ok(Some(SelfClosingConfig::Names(self.self_closing_tags.clone())));
        }
        Ok(None)
    }

    fn load_markup(&self) -> Result<String> {
        if let Some(ref html) = self.html {
            return Ok(html.clone());
        }
        let Some(ref path) = self.path else {
            anyhow::bail!("a file path or --html is required");
        };
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
    }
}

/// Nesting limit for `--json`; serde serializes nested values recursively.
const MAX_JSON_DEPTH: usize = 4096;

/// Levels below `root`, counting `root` itself as one.
fn subtree_depth(tree: &DomTree, root: NodeId) -> usize {
    let mut deepest = 0;
    let mut stack = vec![(root, 1usize)];
    while let Some((id, depth)) = stack.pop() {
        deepest = deepest.max(depth);
        stack.extend(tree.children(id).iter().map(|&child| (child, depth + 1)));
    }
    deepest
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    set_custom_self_closing(cli.self_closing_config()?)
        .context("invalid self-closing configuration")?;

    let markup = cli.load_markup()?;
    let doc = Document::new(&markup).context("failed to parse document")?;
    let tree = doc.tree();

    let nodes = match cli.select {
        Some(ref selector) => {
            let matches = doc.query_selector_all(selector);
            tracing::info!(selector, count = matches.len(), "selector matched");
            matches
        }
        None => vec![NodeId::ROOT],
    };

    if cli.json {
        let depth = nodes.iter().map(|&id| subtree_depth(tree, id)).max().unwrap_or(0);
        anyhow::ensure!(
            depth <= MAX_JSON_DEPTH,
            "tree is {depth} levels deep; --json supports at most {MAX_JSON_DEPTH} (use --outer)"
        );
        let json = if cli.select.is_some() {
            let snapshots: Vec<_> = nodes.iter().filter_map(|&id| tree.snapshot(id)).collect();
            serde_json::to_string_pretty(&snapshots)?
        } else {
            serde_json::to_string_pretty(&tree.snapshot(NodeId::ROOT))?
        };
        println!("{json}");
        return Ok(());
    }

    for id in nodes {
        if cli.outer {
            println!("{}", tree.outer_html(id));
        } else {
            print_tree(tree, id);
        }
    }

    Ok(())
}

/// Print the subtree at `root` with one node per line, indented by depth.
fn print_tree(tree: &DomTree, root: NodeId) {
    let mut stack = vec![(root, 0usize)];

    while let Some((id, depth)) = stack.pop() {
        let Some(node) = tree.get(id) else { continue };
        let indent = "  ".repeat(depth);

        match &node.node_type {
            NodeType::Document => println!("{indent}{}", "#document".bold()),
            NodeType::Element(data) => {
                let mut line = format!("{indent}<{}", data.tag_name.cyan());
                for attr in &data.attrs {
                    let value = format!("\"{}\"", attr.value);
                    let _ = write!(line, " {}={}", attr.name.yellow(), value.green());
                }
                line.push('>');
                println!("{line}");
            }
            NodeType::Text(text) => {
                let display = text.replace('\n', "\\n");
                println!("{indent}{}", format!("\"{display}\"").dimmed());
            }
        }

        stack.extend(tree.children(id).iter().rev().map(|&child| (child, depth + 1)));
    }
}
