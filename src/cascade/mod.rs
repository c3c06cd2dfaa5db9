//! # Cascade Resolution
//!
//! This module resolves the effective configuration for a path by walking
//! from that path up to the filesystem root and merging what it finds.
//!
//! ## Process
//!
//! 1.  **Search groups (`search`)**: every directory from the start directory
//!     to the root is a level, and each level has the same list of candidate
//!     file names (`config.yaml`, `config.json` by default).
//! 2.  **Sibling loading (`siblings`)**: the candidates of a level are loaded
//!     in order. Candidates are exact paths; only `import` declarations may
//!     be glob patterns. Each file may pull in further files through
//!     `import`, and may be reshaped by an environment overlay
//!     (`environment`) first.
//! 3.  **Level merge**: the nodes of one level are merged into a single
//!     mapping. If that mapping sets `settings.inherit: true`, the walk
//!     continues with the parent directory; otherwise it stops.
//! 4.  **Cascade merge**: levels are merged farthest first, so the directory
//!     closest to the start path wins.
//!
//! Every file is loaded at most once per resolution, which makes import
//! cycles harmless.
//!
//! ## Example
//!
//! ```no_run
//! use cascade_config::{resolve, ResolveOptions};
//!
//! let options = ResolveOptions::default().with_environment("test");
//! let config = resolve("/srv/app/current", &options)?;
//! if let Some(host) = config.find("database.host")? {
//!     println!("{:?}", host);
//! }
//! # Ok::<(), cascade_config::error::Error>(())
//! ```

pub mod environment;
pub mod resolved;
pub mod search;
pub mod siblings;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use log::debug;
use serde_yaml::Mapping;

use crate::config::{ConfigNode, Settings};
use crate::defaults::{self, DEFAULT_SEARCH_PATHS};
use crate::error::{Error, Result};
use crate::merge::apply_policy;
use crate::parser::{ConfigParser, FileParser};
use crate::path::{absolute, normalize};

pub use environment::apply_environment;
pub use resolved::{LevelSummary, ResolvedConfig};
pub use search::{search_groups, SearchGroup};
pub use siblings::{load_candidates, load_siblings, Candidate, Sibling};

/// Maximum number of distinct files loaded by one resolution
pub const MAX_LOADED_FILES: usize = 10_000;

/// Hook run on every loaded node after its environment overlay
pub type Initializer = dyn Fn(&mut ConfigNode) -> Result<()> + Send + Sync;

/// Options controlling one resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Environment overlay to apply to every loaded node
    pub environment: Option<String>,
    /// Number of parent levels to keep; `None` keeps all of them
    pub max_inherit_depth: Option<usize>,
    /// Whether `import` declarations are followed
    pub load_imports: bool,
    /// Candidate file names searched for in each directory
    pub search_paths: Vec<String>,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            environment: None,
            max_inherit_depth: None,
            load_imports: true,
            search_paths: DEFAULT_SEARCH_PATHS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ResolveOptions {
    /// Defaults, with search paths taken from `CASCADE_CONFIG_SEARCH_PATHS`
    /// when it is set
    pub fn from_env() -> Self {
        Self {
            search_paths: defaults::search_paths(),
            ..Self::default()
        }
    }

    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = Some(environment.into());
        self
    }

    pub fn with_max_inherit_depth(mut self, depth: Option<usize>) -> Self {
        self.max_inherit_depth = depth;
        self
    }

    pub fn with_load_imports(mut self, load_imports: bool) -> Self {
        self.load_imports = load_imports;
        self
    }

    pub fn with_search_paths<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.search_paths = paths.into_iter().map(Into::into).collect();
        self
    }
}

/// State shared by every load within one resolution
pub struct ResolveContext<'r> {
    parser: &'r dyn ConfigParser,
    environment: Option<&'r str>,
    initializer: Option<&'r Initializer>,
    load_imports: bool,
    visited: HashSet<PathBuf>,
    environment_applied: bool,
}

impl<'r> ResolveContext<'r> {
    pub fn new(
        parser: &'r dyn ConfigParser,
        environment: Option<&'r str>,
        load_imports: bool,
    ) -> Self {
        Self {
            parser,
            environment,
            initializer: None,
            load_imports,
            visited: HashSet::new(),
            environment_applied: false,
        }
    }

    pub fn with_initializer(mut self, initializer: &'r Initializer) -> Self {
        self.initializer = Some(initializer);
        self
    }

    /// Whether any loaded node declared the requested environment
    pub fn environment_applied(&self) -> bool {
        self.environment_applied
    }

    /// Files loaded so far
    pub fn loaded(&self) -> usize {
        self.visited.len()
    }

    /// Record `file` as loaded, returning `false` if it already was
    fn visit(&mut self, file: &Path) -> Result<bool> {
        let file = normalize(file);
        if self.visited.contains(&file) {
            return Ok(false);
        }
        if self.visited.len() >= MAX_LOADED_FILES {
            return Err(Error::LoadLimit {
                limit: MAX_LOADED_FILES,
            });
        }
        self.visited.insert(file);
        Ok(true)
    }
}

/// Resolves cascading configuration with a given parser
pub struct Resolver<P = FileParser> {
    parser: P,
    options: ResolveOptions,
    initializer: Option<Box<Initializer>>,
}

impl Resolver<FileParser> {
    /// Create a resolver reading files from disk
    pub fn new(options: ResolveOptions) -> Self {
        Self::with_parser(FileParser::default(), options)
    }
}

impl<P: ConfigParser> Resolver<P> {
    /// Create a resolver using a custom parser
    pub fn with_parser(parser: P, options: ResolveOptions) -> Self {
        Self {
            parser,
            options,
            initializer: None,
        }
    }

    /// Run `initializer` on every loaded node
    pub fn with_initializer<F>(mut self, initializer: F) -> Self
    where
        F: Fn(&mut ConfigNode) -> Result<()> + Send + Sync + 'static,
    {
        self.initializer = Some(Box::new(initializer));
        self
    }

    pub fn options(&self) -> &ResolveOptions {
        &self.options
    }

    /// Resolve the configuration that applies to `start`
    ///
    /// `start` may be a directory or a file. A file is loaded first, as a
    /// required import, and the walk continues from its directory.
    ///
    /// # Errors
    ///
    /// Any failure loading a file aborts the resolution; see
    /// [`Error`](crate::error::Error) for the cases.
    pub fn resolve(&self, start: impl AsRef<Path>) -> Result<ResolvedConfig> {
        let start = absolute(start.as_ref())?;
        let (start_dir, explicit) = if start.is_file() {
            let directory = start
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| start.clone());
            (directory, Some(start.clone()))
        } else {
            (start.clone(), None)
        };

        let mut ctx = ResolveContext::new(
            &self.parser,
            self.options.environment.as_deref(),
            self.options.load_imports,
        );
        if let Some(initializer) = self.initializer.as_deref() {
            ctx = ctx.with_initializer(initializer);
        }

        let mut levels: Vec<Level> = Vec::new();
        for group in search_groups(&start_dir, &self.options.search_paths) {
            let mut candidates: Vec<Candidate> =
                group.paths.iter().map(Candidate::optional).collect();
            if levels.is_empty() {
                if let Some(file) = &explicit {
                    candidates.insert(0, Candidate::required(file));
                }
            }

            let siblings = load_candidates(&mut ctx, candidates)?;
            let level = merge_level(group.directory, siblings)?;
            let inherits = level.node.settings().inherits();
            if !inherits {
                debug!(
                    "Stopping at {}: inherit is not enabled",
                    level.summary.directory.display()
                );
            }
            levels.push(level);

            if !inherits {
                break;
            }
            if let Some(depth) = self.options.max_inherit_depth {
                if levels.len() > depth {
                    debug!("Stopping at inherit depth {}", depth);
                    break;
                }
            }
        }

        if let Some(depth) = self.options.max_inherit_depth {
            levels.truncate(depth + 1);
        }

        // Closest level last so it wins; its settings pick the policy.
        let policy = levels
            .first()
            .map(|level| level.node.settings().merge_policy())
            .unwrap_or_default();
        let data = apply_policy(
            Mapping::new(),
            levels.iter().rev().map(|level| level.node.data()),
            policy,
        );
        let settings = Settings::from_mapping(&data, &start)?;

        debug!(
            "Resolved {} from {} level(s), {} file(s)",
            start.display(),
            levels.len(),
            ctx.loaded()
        );

        Ok(ResolvedConfig::new(
            data,
            settings,
            start,
            start_dir,
            levels.into_iter().map(|level| level.summary).collect(),
            ctx.environment_applied(),
        ))
    }
}

/// Resolve the configuration for `start` with files read from disk
pub fn resolve(start: impl AsRef<Path>, options: &ResolveOptions) -> Result<ResolvedConfig> {
    Resolver::new(options.clone()).resolve(start)
}

struct Level {
    node: ConfigNode,
    summary: LevelSummary,
}

fn merge_level(directory: PathBuf, siblings: Vec<Sibling>) -> Result<Level> {
    let files = siblings
        .iter()
        .flat_map(|sibling| {
            sibling
                .imports
                .iter()
                .chain(std::iter::once(&sibling.node))
                .map(|node| node.source_path().to_path_buf())
        })
        .collect();

    // The first candidate of a level wins, so it is merged last.
    let nodes: Vec<ConfigNode> = siblings.into_iter().rev().flat_map(Sibling::flatten).collect();
    let policy = nodes
        .last()
        .map(|node| node.settings().merge_policy())
        .unwrap_or_default();
    let data = apply_policy(Mapping::new(), nodes.iter().map(ConfigNode::data), policy);

    debug!(
        "Merged {} node(s) at {}",
        nodes.len(),
        directory.display()
    );

    Ok(Level {
        node: ConfigNode::synthetic(data, directory.clone())?,
        summary: LevelSummary { directory, files },
    })
}
