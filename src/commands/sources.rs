//! # Sources Command Implementation
//!
//! This module implements `config sources`, which shows the directory levels
//! that took part in a resolution and the files loaded at each one, in load
//! order. Levels are listed closest first.
//!
//! This command is a safe, read-only operation that does not modify any files.

use std::borrow::Cow;
use std::io;

use anyhow::{Context, Result};
use clap::Args;
use ptree::TreeItem;

use cascade_config::output::OutputConfig;
use cascade_config::ResolvedConfig;

use super::options::ConfigOptions;

/// Show which directories and files contributed to the configuration
#[derive(Args, Debug)]
pub struct SourcesArgs {
    #[command(flatten)]
    pub config: ConfigOptions,
}

/// Execute the `config sources` command.
pub fn execute(args: SourcesArgs, output: &OutputConfig) -> Result<()> {
    let config = args.config.resolve()?;
    let tree = build_tree(&config, output);
    ptree::write_tree(&tree, io::stdout()).context("Failed to display sources")?;
    Ok(())
}

fn build_tree(config: &ResolvedConfig, output: &OutputConfig) -> TreeNode {
    let children = config
        .levels()
        .iter()
        .map(|level| {
            let mut label = output
                .style(level.directory.display().to_string())
                .bold()
                .to_string();
            if level.files.is_empty() {
                label.push_str(" (no files)");
            }
            TreeNode {
                label,
                children: level
                    .files
                    .iter()
                    .map(|file| TreeNode {
                        label: file.display().to_string(),
                        children: Vec::new(),
                    })
                    .collect(),
            }
        })
        .collect();

    TreeNode {
        label: format!("Configuration for {}", config.source_path().display()),
        children,
    }
}

/// Tree node structure for ptree visualization
#[derive(Clone)]
struct TreeNode {
    label: String,
    children: Vec<TreeNode>,
}

impl TreeItem for TreeNode {
    type Child = TreeNode;

    fn write_self<W: io::Write>(&self, f: &mut W, _style: &ptree::Style) -> io::Result<()> {
        write!(f, "{}", self.label)
    }

    fn children(&self) -> Cow<'_, [Self::Child]> {
        Cow::Borrowed(&self.children)
    }
}
