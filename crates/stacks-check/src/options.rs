//! Compiler options for a [`Program`](crate::Program).

use std::path::{Path, PathBuf};

use stacks_core::StatePaths;

use crate::diagnostic::Diagnostic;

/// Options controlling how a program is analyzed and emitted.
///
/// `Default` turns everything off; [`CompilerOptions::for_check`] is the
/// fixed set used by [`check`](crate::check).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompilerOptions {
    /// Persist per-file results between runs in `build_info_file`.
    pub incremental: bool,
    pub build_info_file: Option<PathBuf>,
    /// Include JavaScript files in the program.
    pub allow_js: bool,
    /// Report semantic errors in JavaScript files.
    pub check_js: bool,
    pub no_emit: bool,
    /// Parse every file with module (strict mode) semantics.
    pub strict: bool,
    /// Report imports of untyped JavaScript packages.
    pub no_implicit_any: bool,
    /// Emit `.d.ts` files.
    pub declaration: bool,
    pub out_dir: Option<PathBuf>,
}

impl CompilerOptions {
    /// Options used to check the app rooted at `root`: JavaScript included and
    /// checked, strict, implicit `any` allowed, nothing emitted, incremental
    /// state kept in `<root>/.sst/tsbuildinfo`.
    pub fn for_check(root: &Path) -> Self {
        Self {
            incremental: true,
            build_info_file: Some(StatePaths::new(root).build_info_file()),
            allow_js: true,
            check_js: true,
            no_emit: true,
            strict: true,
            no_implicit_any: false,
            declaration: false,
            out_dir: None,
        }
    }

    /// Diagnostics for invalid option combinations.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();

        if self.check_js && !self.allow_js {
            diagnostics.push(Diagnostic::global(
                5052,
                "Option 'checkJs' cannot be specified without specifying option 'allowJs'.",
            ));
        }
        if self.declaration && self.no_emit {
            diagnostics.push(Diagnostic::global(
                5053,
                "Option 'declaration' cannot be specified with option 'noEmit'.",
            ));
        }
        if self.incremental && self.build_info_file.is_none() {
            diagnostics.push(Diagnostic::global(
                5074,
                "Option '--incremental' can only be specified using tsconfig, emitting to single file or when option '--tsBuildInfoFile' is specified.",
            ));
        }

        diagnostics
    }

    /// Whether the file at `path` is analyzed as JavaScript.
    pub(crate) fn is_js_file(path: &Path) -> bool {
        matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("js" | "jsx" | "mjs" | "cjs")
        )
    }

    /// Whether the file at `path` is TypeScript source (not a declaration file).
    pub(crate) fn is_ts_file(path: &Path) -> bool {
        !is_declaration_file(path)
            && matches!(
                path.extension().and_then(|e| e.to_str()),
                Some("ts" | "tsx" | "mts" | "cts")
            )
    }

    /// Whether the file at `path` belongs to a program built with these options.
    pub(crate) fn accepts(&self, path: &Path) -> bool {
        Self::is_ts_file(path) || (self.allow_js && Self::is_js_file(path))
    }

    /// Hash of every option that changes per-file results.
    ///
    /// Stored in the build info; a different fingerprint invalidates it.
    pub(crate) fn fingerprint(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(env!("CARGO_PKG_VERSION").as_bytes());
        for flag in [self.allow_js, self.check_js, self.strict] {
            hasher.update(&[u8::from(flag)]);
        }
        hasher.finalize().to_hex().to_string()
    }
}

pub(crate) fn is_declaration_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|name| {
            name.ends_with(".d.ts") || name.ends_with(".d.mts") || name.ends_with(".d.cts")
        })
}
