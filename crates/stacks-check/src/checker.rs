//! Per-file analysis: parse errors, early semantic errors, unresolved names
//! and the file's imports.
//!
//! Everything produced here depends only on the file's text and the
//! analysis options, which is what makes it cacheable.

use std::path::Path;

use oxc_allocator::Allocator;
use oxc_ast::AstKind;
use oxc_diagnostics::OxcDiagnostic;
use oxc_parser::{Parser, ParserReturn};
use oxc_semantic::{AstNodes, NodeId, SemanticBuilder};
use oxc_span::{GetSpan, SourceType};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::diagnostic::FileDiagnostic;
use crate::globals::{declared_globals, is_known_global};
use crate::imports::{ImportRecord, collect_imports};
use crate::options::CompilerOptions;

pub(crate) const PARSE_ERROR: u32 = 1005;
pub(crate) const EARLY_ERROR: u32 = 1100;
pub(crate) const CANNOT_FIND_NAME: u32 = 2304;

/// Cacheable result of analyzing one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct FileAnalysis {
    pub syntactic: Vec<FileDiagnostic>,
    /// Early errors, sorted by start offset.
    pub semantic: Vec<FileDiagnostic>,
    /// References no scope in the file declares and the runtime does not
    /// provide, sorted by start offset.
    pub unresolved: Vec<UnresolvedName>,
    /// Names the file adds to the global scope with `declare global`.
    pub declared_globals: Vec<String>,
    pub imports: Vec<ImportRecord>,
    /// Whether semantic diagnostics are reported for this file at all.
    pub check_semantics: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct UnresolvedName {
    pub name: String,
    pub start: u32,
    pub length: u32,
}

impl FileAnalysis {
    /// Early errors plus a 2304 for every unresolved name that none of the
    /// program's `declare global` blocks provides.
    pub fn semantic_diagnostics(&self, ambient: &FxHashSet<String>) -> Vec<FileDiagnostic> {
        let mut diagnostics = self.semantic.clone();
        diagnostics.extend(
            self.unresolved
                .iter()
                .filter(|reference| !ambient.contains(&reference.name))
                .map(|reference| {
                    FileDiagnostic::error(
                        reference.start,
                        reference.length,
                        CANNOT_FIND_NAME,
                        format!("Cannot find name '{}'.", reference.name),
                    )
                }),
        );
        diagnostics.sort_by_key(|d| (d.start, d.code));
        diagnostics
    }
}

/// `// @ts-check` / `// @ts-nocheck` in the file's leading comments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CheckPragma {
    Check,
    NoCheck,
}

pub(crate) fn analyze_file(path: &Path, text: &str, options: &CompilerOptions) -> FileAnalysis {
    let is_js = CompilerOptions::is_js_file(path);
    let check_semantics = match leading_pragma(text) {
        Some(CheckPragma::NoCheck) => false,
        Some(CheckPragma::Check) => true,
        None => !is_js || options.check_js,
    };

    let allocator = Allocator::default();
    let ParserReturn {
        program,
        errors,
        panicked,
        ..
    } = Parser::new(&allocator, text, source_type_for(path, options)).parse();

    let syntactic: Vec<_> = errors
        .iter()
        .map(|error| to_file_diagnostic(error, PARSE_ERROR))
        .collect();

    let (imports, ambient) = if panicked {
        (Vec::new(), Vec::new())
    } else {
        (collect_imports(&program), declared_globals(&program))
    };

    // Semantic results on a broken tree are noise
    if !syntactic.is_empty() || !check_semantics {
        return FileAnalysis {
            syntactic,
            semantic: Vec::new(),
            unresolved: Vec::new(),
            declared_globals: ambient,
            imports,
            check_semantics,
        };
    }

    let semantic_ret = SemanticBuilder::new()
        .with_check_syntax_error(true)
        .build(&program);

    let mut semantic: Vec<_> = semantic_ret
        .errors
        .iter()
        .map(|error| to_file_diagnostic(error, EARLY_ERROR))
        .collect();
    semantic.sort_by_key(|d| (d.start, d.code));

    let semantic_model = semantic_ret.semantic;
    let scoping = semantic_model.scoping();
    let nodes = semantic_model.nodes();
    let mut unresolved = Vec::new();
    for (name, reference_ids) in scoping.root_unresolved_references().iter() {
        let name = name.to_string();
        if is_known_global(&name) || ambient.contains(&name) {
            continue;
        }
        for &reference_id in reference_ids.iter() {
            let node_id = scoping.get_reference(reference_id).node_id();
            if name == "arguments" && in_non_arrow_function(nodes, node_id) {
                continue;
            }
            let span = nodes.kind(node_id).span();
            unresolved.push(UnresolvedName {
                name: name.clone(),
                start: span.start,
                length: span.size(),
            });
        }
    }
    unresolved.sort_by_key(|reference| reference.start);

    FileAnalysis {
        syntactic,
        semantic,
        unresolved,
        declared_globals: ambient,
        imports,
        check_semantics,
    }
}

/// Whether `node_id` sits inside a non-arrow function, which binds its own
/// `arguments`. Arrow functions see the binding of the function around them.
fn in_non_arrow_function(nodes: &AstNodes<'_>, node_id: NodeId) -> bool {
    nodes
        .ancestor_kinds(node_id)
        .any(|kind| matches!(kind, AstKind::Function(_)))
}

/// `strict` parses everything as a module; otherwise plain JavaScript is a
/// script unless it uses module syntax.
fn source_type_for(path: &Path, options: &CompilerOptions) -> SourceType {
    let source_type = SourceType::from_path(path).unwrap_or_else(|_| SourceType::mjs());
    if options.strict {
        return source_type.with_module(true);
    }
    let is_mjs = path.extension().is_some_and(|ext| ext == "mjs");
    if CompilerOptions::is_js_file(path) && !is_mjs {
        return source_type.with_unambiguous(true);
    }
    source_type
}

fn to_file_diagnostic(error: &OxcDiagnostic, code: u32) -> FileDiagnostic {
    let (start, length) = error
        .labels
        .as_ref()
        .and_then(|labels| labels.first())
        .map_or((0, 0), |label| (label.offset() as u32, label.len() as u32));

    let message = match &error.help {
        Some(help) => format!("{} {}", error.message, help),
        None => error.message.to_string(),
    };

    FileDiagnostic::error(start, length, code, message)
}

/// Looks for a check pragma in the comments before the first statement.
fn leading_pragma(text: &str) -> Option<CheckPragma> {
    let mut in_block = false;
    for line in text.lines() {
        let line = line.trim();
        let is_comment = in_block
            || line.starts_with("//")
            || line.starts_with("/*")
            || line.starts_with("#!");
        if !is_comment && !line.is_empty() {
            break;
        }
        if line.contains("@ts-nocheck") {
            return Some(CheckPragma::NoCheck);
        }
        if line.contains("@ts-check") {
            return Some(CheckPragma::Check);
        }
        if line.starts_with("/*") {
            in_block = true;
        }
        if in_block && line.contains("*/") {
            in_block = false;
        }
    }
    None
}
