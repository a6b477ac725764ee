//! Module resolution for the program walk.
//!
//! Wraps `oxc_resolver` with Node-style lookup, `types` conditions first and
//! `.js` → `.ts` extension aliasing, then sorts the result into what the
//! program needs to know about it.

use std::path::{Component, Path, PathBuf};

use oxc_resolver::{ResolveError, ResolveOptions, Resolver};

use crate::options::{CompilerOptions, is_declaration_file};

/// Outcome of resolving one import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Resolved {
    /// A source file that becomes part of the program.
    Source(PathBuf),
    /// Resolved to something with type information (declaration file, JSON,
    /// a typed package) that is not itself analyzed.
    Typed,
    /// JavaScript without declarations outside the program.
    Untyped(PathBuf),
    /// A runtime builtin such as `fs` or `node:path`.
    Builtin,
    NotFound,
}

pub(crate) struct ModuleResolver {
    resolver: Resolver,
}

impl ModuleResolver {
    pub fn new() -> Self {
        let resolver = Resolver::new(ResolveOptions {
            extensions: [
                ".ts", ".tsx", ".d.ts", ".mts", ".cts", ".js", ".jsx", ".mjs", ".cjs", ".json",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            extension_alias: vec![
                (
                    ".js".into(),
                    vec![".ts".into(), ".tsx".into(), ".d.ts".into(), ".js".into()],
                ),
                (".mjs".into(), vec![".mts".into(), ".mjs".into()]),
                (".cjs".into(), vec![".cts".into(), ".cjs".into()]),
            ],
            condition_names: vec![
                "types".into(),
                "node".into(),
                "import".into(),
                "require".into(),
                "default".into(),
            ],
            main_fields: vec![
                "types".into(),
                "typings".into(),
                "module".into(),
                "main".into(),
            ],
            builtin_modules: true,
            ..Default::default()
        });

        Self { resolver }
    }

    /// Resolve `specifier` as imported from `importer`.
    pub fn resolve(&self, importer: &Path, specifier: &str, options: &CompilerOptions) -> Resolved {
        let dir = importer.parent().unwrap_or(importer);

        let path = match self.resolver.resolve(dir, specifier) {
            Ok(resolution) => resolution.path().to_path_buf(),
            Err(ResolveError::Builtin { .. }) => return Resolved::Builtin,
            Err(err) => {
                tracing::trace!(specifier, importer = %importer.display(), error = ?err, "unresolved import");
                return Resolved::NotFound;
            }
        };

        if is_declaration_file(&path) || is_json(&path) {
            return Resolved::Typed;
        }

        if in_node_modules(&path) {
            if has_sibling_declaration(&path) || self.has_types_package(dir, specifier) {
                return Resolved::Typed;
            }
            return Resolved::Untyped(path);
        }

        if options.accepts(&path) {
            return Resolved::Source(path);
        }

        if CompilerOptions::is_js_file(&path) && !has_sibling_declaration(&path) {
            return Resolved::Untyped(path);
        }

        Resolved::Typed
    }

    /// Whether `@types/<package>` resolves from `dir`.
    fn has_types_package(&self, dir: &Path, specifier: &str) -> bool {
        let package = stacks_core::package_name(specifier);
        let types_name = match package.strip_prefix('@') {
            Some(scoped) => scoped.replacen('/', "__", 1),
            None => package.to_string(),
        };
        self.resolver
            .resolve(dir, &format!("@types/{types_name}"))
            .is_ok()
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "json")
}

fn in_node_modules(path: &Path) -> bool {
    path.components()
        .any(|c| matches!(c, Component::Normal(name) if name == "node_modules"))
}

/// `lib/index.js` → does `lib/index.d.ts` exist?
fn has_sibling_declaration(path: &Path) -> bool {
    let declaration = match path.extension().and_then(|e| e.to_str()) {
        Some("mjs") => path.with_extension("d.mts"),
        Some("cjs") => path.with_extension("d.cts"),
        _ => path.with_extension("d.ts"),
    };
    declaration.is_file()
}
