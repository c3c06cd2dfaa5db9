//! # Cascade Config Library
//!
//! This library resolves hierarchical configuration. Given a path, it looks
//! for configuration files in that directory and, when asked to, in every
//! parent directory up to the filesystem root, then merges what it finds so
//! that closer files override farther ones. It powers the `cascade-config`
//! command-line tool but is meant to be embedded in any application that
//! wants directory-scoped settings.
//!
//! ## Quick Example
//!
//! ```
//! use cascade_config::{resolve, ResolveOptions};
//! use serde_yaml::Value;
//!
//! let root = tempfile::tempdir().unwrap();
//! let child = root.path().join("service");
//! std::fs::create_dir(&child).unwrap();
//! std::fs::write(root.path().join("config.yaml"), "x: 1\ny: 2\n").unwrap();
//! std::fs::write(
//!     child.join("config.yaml"),
//!     "settings:\n  inherit: true\nx: 3\n",
//! )
//! .unwrap();
//!
//! let config = resolve(&child, &ResolveOptions::default()).unwrap();
//! assert_eq!(config.get("x"), Some(&Value::from(3)));
//! assert_eq!(config.get("y"), Some(&Value::from(2)));
//! ```
//!
//! ## Core Concepts
//!
//! - **Cascade (`cascade`)**: walks directory levels, loads their files and
//!   merges the levels into a [`ResolvedConfig`].
//! - **Nodes (`config`)**: one loaded file plus its typed `settings` and
//!   `import` declarations.
//! - **Imports (`imports`)**: files a node pulls in by path or glob pattern.
//! - **Merge (`merge`)**: the deep merge engine shared by every step.
//! - **Queries (`query`)**: dotted path lookups such as `servers[0].host`.
//! - **Parsing (`parser`)**: YAML and JSON decoding behind the
//!   [`parser::ConfigParser`] trait.
//!
//! ## Reserved Keys
//!
//! `import`, `environments` and `settings` control the cascade itself. The
//! `import` key is consumed while loading; the other two remain in the
//! merged data, and [`ResolvedConfig::effective`] filters all three.

pub mod cascade;
pub mod config;
pub mod defaults;
pub mod error;
pub mod imports;
pub mod merge;
pub mod output;
pub mod parser;
pub mod path;
pub mod query;

#[cfg(test)]
mod merge_proptest;
#[cfg(test)]
mod path_proptest;

pub use cascade::{resolve, ResolveOptions, ResolvedConfig, Resolver};
pub use config::{ConfigNode, ImportSpec, Settings};
pub use error::{Error, Result};
