//! Sibling loading
//!
//! Loads the files of one directory level, or the imports of one node, in
//! queue order. Each loaded file becomes a [`Sibling`]: the node itself plus
//! the nodes its imports pulled in, recursively.
//!
//! Precedence, lowest to highest, is fixed as follows:
//!
//! 1. a node's imports, earlier declarations first;
//! 2. the node itself.
//!
//! Within a directory level the first-declared candidate wins, so the level
//! merge walks the siblings in reverse queue order.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use log::debug;

use super::environment::apply_environment;
use super::ResolveContext;
use crate::config::{ConfigNode, ImportSpec};
use crate::error::Result;
use crate::imports::{resolve_import, resolve_literal};

/// One loaded file with everything it imported
#[derive(Debug, Clone, PartialEq)]
pub struct Sibling {
    /// Imported nodes, lowest precedence first
    pub imports: Vec<ConfigNode>,
    /// The loaded node
    pub node: ConfigNode,
}

impl Sibling {
    /// The nodes in ascending precedence: imports, then the node
    pub fn flatten(self) -> impl Iterator<Item = ConfigNode> {
        self.imports.into_iter().chain(std::iter::once(self.node))
    }
}

/// An exact file a directory level may contain
///
/// Candidates name concrete paths and are never expanded as glob patterns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Absolute path of the file
    pub path: PathBuf,
    /// Whether a missing file is an error
    pub required: bool,
}

impl Candidate {
    /// A search-path candidate that may be absent
    pub fn optional(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            required: false,
        }
    }

    /// A file the caller named explicitly
    pub fn required(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            required: true,
        }
    }
}

enum Pending<'a> {
    Declared(ImportSpec, &'a Path),
    Candidate(Candidate),
    Expanded(PathBuf),
}

/// Load the files named by `imports`, resolved against `search_from`
///
/// Glob matches are loaded in place of the pattern, ahead of the remaining
/// declarations. Files already loaded during this resolution are skipped.
/// Loading stops after a node whose `inherit_siblings` setting is false.
///
/// # Errors
///
/// Propagates import resolution, parse, metadata, overlay and hook errors.
pub fn load_siblings(
    ctx: &mut ResolveContext<'_>,
    imports: Vec<ImportSpec>,
    search_from: &Path,
) -> Result<Vec<Sibling>> {
    let queue = imports
        .into_iter()
        .map(|spec| Pending::Declared(spec, search_from))
        .collect();
    load_queue(ctx, queue)
}

/// Load the candidate files of one directory level, first candidate first
///
/// Behaves like [`load_siblings`] except that candidate paths are taken
/// literally.
///
/// # Errors
///
/// Returns `Error::ImportNotFound` for a missing required candidate and
/// propagates parse, metadata, overlay and hook errors.
pub fn load_candidates(
    ctx: &mut ResolveContext<'_>,
    candidates: Vec<Candidate>,
) -> Result<Vec<Sibling>> {
    load_queue(ctx, candidates.into_iter().map(Pending::Candidate).collect())
}

fn load_queue(
    ctx: &mut ResolveContext<'_>,
    mut queue: VecDeque<Pending<'_>>,
) -> Result<Vec<Sibling>> {
    let mut siblings = Vec::new();

    while let Some(pending) = queue.pop_front() {
        let file = match pending {
            Pending::Expanded(file) => file,
            Pending::Candidate(candidate) => {
                match resolve_literal(candidate.path, candidate.required)? {
                    Some(file) => file,
                    None => continue,
                }
            }
            Pending::Declared(spec, search_from) => {
                let mut matches = resolve_import(&spec, search_from)?;
                if matches.len() > 1 {
                    for found in matches.into_iter().rev() {
                        queue.push_front(Pending::Expanded(found));
                    }
                    continue;
                }
                match matches.pop() {
                    Some(file) => file,
                    None => continue,
                }
            }
        };

        if !ctx.visit(&file)? {
            debug!("Skipping already imported {}", file.display());
            continue;
        }

        let sibling = load_file(ctx, &file)?;
        let inherit_siblings = sibling.node.settings().inherit_siblings;
        siblings.push(sibling);

        if !inherit_siblings {
            debug!(
                "{} disables sibling inheritance, skipping {} remaining",
                file.display(),
                queue.len()
            );
            break;
        }
    }

    Ok(siblings)
}

fn load_file(ctx: &mut ResolveContext<'_>, file: &Path) -> Result<Sibling> {
    debug!("Loading {}", file.display());
    let data = ctx.parser.parse(file)?;
    let mut node = ConfigNode::new(data, file)?;

    if let Some(environment) = ctx.environment {
        if apply_environment(&mut node, environment)? {
            ctx.environment_applied = true;
        }
    }

    if let Some(initializer) = ctx.initializer {
        initializer(&mut node)?;
        node.refresh()?;
    }

    let mut imports = Vec::new();
    if ctx.load_imports {
        if node.settings().allow_imports && !node.imports().is_empty() {
            let declared = node.imports().to_vec();
            let directory = node.source_directory().to_path_buf();
            imports = load_siblings(ctx, declared, &directory)?
                .into_iter()
                .flat_map(Sibling::flatten)
                .collect();
        }
        node.strip_imports();
    }

    Ok(Sibling { imports, node })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::parser::FileParser;
    use serde_yaml::Value;
    use std::fs;
    use tempfile::TempDir;

    fn tree(files: &[(&str, &str)]) -> TempDir {
        let temp = TempDir::new().unwrap();
        for (name, content) in files {
            let path = temp.path().join(name);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
        temp
    }

    fn load(temp: &TempDir, imports: &[&str]) -> Result<Vec<Sibling>> {
        let parser = FileParser::default();
        let mut ctx = ResolveContext::new(&parser, None, true);
        let imports = imports.iter().map(|p| ImportSpec::new(*p, false)).collect();
        load_siblings(&mut ctx, imports, temp.path())
    }

    fn names(sibling: &Sibling) -> Vec<String> {
        sibling
            .clone()
            .flatten()
            .map(|n| n.source_path().file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_imports_precede_node() {
        let temp = tree(&[
            ("main.yaml", "import: [a.yaml, b.yaml]\nk: main\n"),
            ("a.yaml", "k: a\n"),
            ("b.yaml", "k: b\n"),
        ]);
        let siblings = load(&temp, &["main.yaml"]).unwrap();
        assert_eq!(siblings.len(), 1);
        assert_eq!(names(&siblings[0]), vec!["a.yaml", "b.yaml", "main.yaml"]);
        assert!(siblings[0].node.get("import").is_none());
    }

    #[test]
    fn test_nested_imports_flatten_depth_first() {
        let temp = tree(&[
            ("main.yaml", "import: sub/a.yaml\n"),
            ("sub/a.yaml", "import: inner.yaml\n"),
            ("sub/inner.yaml", "k: inner\n"),
        ]);
        let siblings = load(&temp, &["main.yaml"]).unwrap();
        assert_eq!(
            names(&siblings[0]),
            vec!["inner.yaml", "a.yaml", "main.yaml"]
        );
    }

    #[test]
    fn test_glob_matches_load_in_sorted_order() {
        let temp = tree(&[
            ("conf/b.yaml", "k: b\n"),
            ("conf/a.yaml", "k: a\n"),
            ("last.yaml", "k: last\n"),
        ]);
        let siblings = load(&temp, &["conf/*.yaml", "last.yaml"]).unwrap();
        let loaded: Vec<String> = siblings.iter().flat_map(names).collect();
        assert_eq!(loaded, vec!["a.yaml", "b.yaml", "last.yaml"]);
    }

    #[test]
    fn test_self_import_is_skipped() {
        let temp = tree(&[("self.yaml", "import: self.yaml\nk: v\n")]);
        let siblings = load(&temp, &["self.yaml"]).unwrap();
        assert_eq!(siblings.len(), 1);
        assert!(siblings[0].imports.is_empty());
    }

    #[test]
    fn test_mutual_imports_terminate() {
        let temp = tree(&[
            ("a.yaml", "import: b.yaml\nfrom_a: 1\n"),
            ("b.yaml", "import: a.yaml\nfrom_b: 1\n"),
        ]);
        let siblings = load(&temp, &["a.yaml"]).unwrap();
        assert_eq!(names(&siblings[0]), vec!["b.yaml", "a.yaml"]);
    }

    #[test]
    fn test_duplicate_is_logged() {
        testing_logger::setup();
        let temp = tree(&[("a.yaml", "k: v\n")]);
        let siblings = load(&temp, &["a.yaml", "a.yaml"]).unwrap();
        assert_eq!(siblings.len(), 1);
        testing_logger::validate(|logs| {
            assert!(logs.iter().any(|entry| entry.level == log::Level::Debug
                && entry.body.starts_with("Skipping already imported")));
        });
    }

    #[test]
    fn test_inherit_siblings_false_stops_queue() {
        let temp = tree(&[
            ("first.yaml", "settings:\n  inherit_siblings: false\n"),
            ("second.yaml", "k: v\n"),
        ]);
        let siblings = load(&temp, &["first.yaml", "second.yaml"]).unwrap();
        assert_eq!(siblings.len(), 1);
    }

    #[test]
    fn test_allow_imports_false_skips_but_strips() {
        let temp = tree(&[
            ("main.yaml", "settings:\n  allow_imports: false\nimport: a.yaml\n"),
            ("a.yaml", "k: a\n"),
        ]);
        let siblings = load(&temp, &["main.yaml"]).unwrap();
        assert!(siblings[0].imports.is_empty());
        assert!(siblings[0].node.get("import").is_none());
    }

    #[test]
    fn test_load_imports_false_keeps_import_key() {
        let temp = tree(&[("main.yaml", "import: a.yaml\n"), ("a.yaml", "k: a\n")]);
        let parser = FileParser::default();
        let mut ctx = ResolveContext::new(&parser, None, false);
        let siblings =
            load_siblings(&mut ctx, vec![ImportSpec::new("main.yaml", true)], temp.path())
                .unwrap();
        assert!(siblings[0].imports.is_empty());
        assert_eq!(siblings[0].node.get("import"), Some(&Value::from("a.yaml")));
    }

    #[test]
    fn test_environment_imports_load_before_base_imports() {
        let temp = tree(&[
            (
                "main.yaml",
                "import: base.yaml\nenvironments:\n  test:\n    import: env.yaml\n",
            ),
            ("base.yaml", "k: base\n"),
            ("env.yaml", "k: env\n"),
        ]);
        let parser = FileParser::default();
        let mut ctx = ResolveContext::new(&parser, Some("test"), true);
        let siblings =
            load_siblings(&mut ctx, vec![ImportSpec::new("main.yaml", true)], temp.path())
                .unwrap();
        assert!(ctx.environment_applied());
        assert_eq!(
            names(&siblings[0]),
            vec!["env.yaml", "base.yaml", "main.yaml"]
        );
    }

    #[test]
    fn test_initializer_runs_per_node() {
        let temp = tree(&[("main.yaml", "import: a.yaml\n"), ("a.yaml", "k: a\n")]);
        let parser = FileParser::default();
        let mark = |node: &mut ConfigNode| -> Result<()> {
            node.data_mut()
                .insert(Value::from("marked"), Value::Bool(true));
            Ok(())
        };
        let mut ctx = ResolveContext::new(&parser, None, true).with_initializer(&mark);
        let siblings =
            load_siblings(&mut ctx, vec![ImportSpec::new("main.yaml", true)], temp.path())
                .unwrap();
        assert!(siblings[0]
            .clone()
            .flatten()
            .all(|n| n.get("marked") == Some(&Value::Bool(true))));
    }

    #[test]
    fn test_missing_required_import_fails() {
        let temp = tree(&[("main.yaml", "import: nope.yaml\n")]);
        assert!(matches!(
            load(&temp, &["main.yaml"]),
            Err(Error::ImportNotFound { .. })
        ));
    }

    #[test]
    fn test_candidates_under_bracketed_directory() {
        let temp = tree(&[
            ("app[prod]/config.yaml", "import: conf/*.yaml
k: v
"),
            ("app[prod]/conf/a.yaml", "a: 1
"),
            ("app[prod]/conf/b.yaml", "b: 1
"),
        ]);
        let directory = temp.path().join("app[prod]");
        let parser = FileParser::default();
        let mut ctx = ResolveContext::new(&parser, None, true);
        let siblings = load_candidates(
            &mut ctx,
            vec![
                Candidate::optional(directory.join("config.yaml")),
                Candidate::optional(directory.join("config.json")),
            ],
        )
        .unwrap();
        assert_eq!(siblings.len(), 1);
        assert_eq!(names(&siblings[0]), vec!["a.yaml", "b.yaml", "config.yaml"]);
    }

    #[test]
    fn test_wildcard_candidate_is_not_expanded() {
        let temp = tree(&[("a.yaml", "k: a
"), ("b.yaml", "k: b
")]);
        let parser = FileParser::default();
        let mut ctx = ResolveContext::new(&parser, None, true);
        let siblings =
            load_candidates(&mut ctx, vec![Candidate::optional(temp.path().join("*.yaml"))])
                .unwrap();
        assert!(siblings.is_empty());
    }

    #[test]
    fn test_missing_required_candidate_fails() {
        let temp = tree(&[]);
        let parser = FileParser::default();
        let mut ctx = ResolveContext::new(&parser, None, true);
        assert!(matches!(
            load_candidates(&mut ctx, vec![Candidate::required(temp.path().join("x.yaml"))]),
            Err(Error::ImportNotFound { .. })
        ));
    }
}
