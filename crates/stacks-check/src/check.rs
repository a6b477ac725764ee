use std::path::Path;

use stacks_core::Config;

use crate::diagnostic::Diagnostic;
use crate::options::CompilerOptions;
use crate::program::Program;

/// Type-check the app at `root` starting from `config.main`.
///
/// Returns every pre-emit diagnostic followed by the diagnostics of the
/// (no-op) emit. Problems in user code are data, never errors.
pub fn check(root: &Path, config: &Config) -> Vec<Diagnostic> {
    let options = CompilerOptions::for_check(root);
    let program = Program::new(vec![config.entry_path(root)], options);

    let mut diagnostics = program.pre_emit_diagnostics();
    diagnostics.extend(program.emit().diagnostics);

    tracing::info!(
        entry = %config.main.display(),
        files = program.source_files().count(),
        reused = program.reused_file_count(),
        diagnostics = diagnostics.len(),
        "checked app"
    );

    diagnostics
}
