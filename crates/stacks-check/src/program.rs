//! The analyzed program: every source file reachable from the roots.

use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use path_clean::PathClean;
use rustc_hash::FxHashSet;

use crate::build_info::{BuildInfo, content_hash};
use crate::checker::{FileAnalysis, analyze_file};
use crate::declarations::{DECLARATION_ERROR, declaration_path, generate_declaration};
use crate::diagnostic::{Diagnostic, DiagnosticCategory, MessageChain, MessageText, SourceFile};
use crate::options::CompilerOptions;
use crate::resolver::{ModuleResolver, Resolved};

const CANNOT_FIND_MODULE: u32 = 2307;
const UNTYPED_MODULE: u32 = 7016;
const INSTALL_TYPES_HINT: u32 = 7035;
const CANNOT_READ_FILE: u32 = 5012;
const CANNOT_WRITE_FILE: u32 = 5033;
const FILE_NOT_FOUND: u32 = 6053;
const UNSUPPORTED_EXTENSION: u32 = 6054;
const JS_WITHOUT_ALLOW_JS: u32 = 6504;

/// Result of [`Program::emit`].
#[derive(Debug, Clone, Default)]
pub struct EmitResult {
    /// True when nothing was written besides the build info.
    pub emit_skipped: bool,
    pub diagnostics: Vec<Diagnostic>,
    pub emitted_files: Vec<PathBuf>,
}

struct ProgramFile {
    source: Arc<SourceFile>,
    analysis: FileAnalysis,
    /// Unresolvable or untyped imports; recomputed on every run.
    resolution_diagnostics: Vec<Diagnostic>,
}

/// A set of source files discovered from `root_names` by following imports.
///
/// Construction does all of the analysis; the diagnostic accessors only
/// assemble results.
pub struct Program {
    options: CompilerOptions,
    root_names: Vec<PathBuf>,
    files: Vec<ProgramFile>,
    global_diagnostics: Vec<Diagnostic>,
    build_info: BuildInfo,
    reused_files: usize,
}

impl Program {
    /// Discover and analyze every file reachable from `root_names`.
    ///
    /// Files are visited breadth-first in import order. With `incremental`,
    /// files whose content is unchanged since the last run reuse their
    /// stored analysis.
    pub fn new(root_names: Vec<PathBuf>, options: CompilerOptions) -> Self {
        let fingerprint = options.fingerprint();
        let previous = load_previous(&options, &fingerprint);
        let resolver = ModuleResolver::new();

        let mut program = Self {
            build_info: BuildInfo::new(fingerprint),
            options,
            root_names,
            files: Vec::new(),
            global_diagnostics: Vec::new(),
            reused_files: 0,
        };

        let mut seen = FxHashSet::default();
        let mut queue = VecDeque::new();
        let roots = program.root_names.clone();
        for root in &roots {
            if let Some(path) = program.accept_root(root) {
                if seen.insert(path.clone()) {
                    queue.push_back(path);
                }
            }
        }

        while let Some(path) = queue.pop_front() {
            let text = match fs::read_to_string(&path) {
                Ok(text) => text,
                Err(err) => {
                    program.global_diagnostics.push(Diagnostic::global(
                        CANNOT_READ_FILE,
                        format!("Cannot read file '{}': {}.", path.display(), err),
                    ));
                    continue;
                }
            };

            let hash = content_hash(&text);
            let analysis = match previous.as_ref().and_then(|info| info.get(&path, &hash)) {
                Some(analysis) => {
                    program.reused_files += 1;
                    analysis.clone()
                }
                None => analyze_file(&path, &text, &program.options),
            };

            let source = Arc::new(SourceFile::new(path.clone(), text));
            let mut resolution_diagnostics = Vec::new();
            for import in &analysis.imports {
                match resolver.resolve(&path, &import.specifier, &program.options) {
                    Resolved::Source(target) => {
                        if seen.insert(target.clone()) {
                            queue.push_back(target);
                        }
                    }
                    Resolved::Typed | Resolved::Builtin => {}
                    Resolved::Untyped(target) => {
                        if program.options.no_implicit_any {
                            resolution_diagnostics.push(Diagnostic::in_file(
                                Arc::clone(&source),
                                import.start,
                                import.length,
                                UNTYPED_MODULE,
                                untyped_module_message(&import.specifier, &target),
                            ));
                        }
                    }
                    Resolved::NotFound => resolution_diagnostics.push(Diagnostic::in_file(
                        Arc::clone(&source),
                        import.start,
                        import.length,
                        CANNOT_FIND_MODULE,
                        format!(
                            "Cannot find module '{}' or its corresponding type declarations.",
                            import.specifier
                        ),
                    )),
                }
            }

            program.build_info.insert(path, hash, analysis.clone());
            program.files.push(ProgramFile {
                source,
                analysis,
                resolution_diagnostics,
            });
        }

        tracing::debug!(
            files = program.files.len(),
            reused = program.reused_files,
            "program constructed"
        );

        program
    }

    fn accept_root(&mut self, root: &Path) -> Option<PathBuf> {
        if !root.is_file() {
            self.global_diagnostics.push(Diagnostic::global(
                FILE_NOT_FOUND,
                format!("File '{}' not found.", root.display()),
            ));
            return None;
        }

        if CompilerOptions::is_js_file(root) && !self.options.allow_js {
            self.global_diagnostics.push(Diagnostic::global(
                JS_WITHOUT_ALLOW_JS,
                format!(
                    "File '{}' is a JavaScript file. Did you mean to enable the 'allowJs' option?",
                    root.display()
                ),
            ));
            return None;
        }

        if !self.options.accepts(root) {
            self.global_diagnostics.push(Diagnostic::global(
                UNSUPPORTED_EXTENSION,
                format!(
                    "File '{}' has an unsupported extension. The only supported extensions are '.ts', '.tsx', '.mts', '.cts', '.js', '.jsx', '.mjs', '.cjs'.",
                    root.display()
                ),
            ));
            return None;
        }

        Some(fs::canonicalize(root).unwrap_or_else(|_| root.clean()))
    }

    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    pub fn root_names(&self) -> &[PathBuf] {
        &self.root_names
    }

    /// Files of the program in discovery order.
    pub fn source_files(&self) -> impl Iterator<Item = &Arc<SourceFile>> {
        self.files.iter().map(|file| &file.source)
    }

    pub fn get_source_file(&self, path: &Path) -> Option<&Arc<SourceFile>> {
        self.source_files().find(|file| file.file_name() == path)
    }

    /// Number of files whose analysis came from the build info.
    pub fn reused_file_count(&self) -> usize {
        self.reused_files
    }

    pub fn options_diagnostics(&self) -> Vec<Diagnostic> {
        self.options.diagnostics()
    }

    /// Diagnostics about the program as a whole (missing roots, unreadable files).
    pub fn global_diagnostics(&self) -> Vec<Diagnostic> {
        self.global_diagnostics.clone()
    }

    /// Parse errors of every file, in discovery order.
    pub fn syntactic_diagnostics(&self) -> Vec<Diagnostic> {
        self.files
            .iter()
            .flat_map(|file| {
                file.analysis
                    .syntactic
                    .iter()
                    .map(|diagnostic| diagnostic.attach(&file.source))
            })
            .collect()
    }

    /// Semantic errors of every file, in discovery order and by position
    /// within a file.
    pub fn semantic_diagnostics(&self) -> Vec<Diagnostic> {
        let ambient: FxHashSet<String> = self
            .files
            .iter()
            .flat_map(|file| file.analysis.declared_globals.iter().cloned())
            .collect();

        let mut diagnostics = Vec::new();
        for file in &self.files {
            if !file.analysis.check_semantics || !file.analysis.syntactic.is_empty() {
                continue;
            }

            let mut file_diagnostics: Vec<Diagnostic> = file
                .analysis
                .semantic_diagnostics(&ambient)
                .iter()
                .map(|diagnostic| diagnostic.attach(&file.source))
                .chain(file.resolution_diagnostics.iter().cloned())
                .collect();
            file_diagnostics.sort_by_key(|d| d.start.unwrap_or(0));
            diagnostics.extend(file_diagnostics);
        }
        diagnostics
    }

    /// Options, syntactic, global and semantic diagnostics, in that order.
    pub fn pre_emit_diagnostics(&self) -> Vec<Diagnostic> {
        let mut diagnostics = self.options_diagnostics();
        diagnostics.extend(self.syntactic_diagnostics());
        diagnostics.extend(self.global_diagnostics());
        diagnostics.extend(self.semantic_diagnostics());
        diagnostics
    }

    /// Write outputs: declaration files when enabled, and the build info
    /// when `incremental` is set. JavaScript is never emitted.
    pub fn emit(&self) -> EmitResult {
        let mut result = EmitResult::default();

        if !self.options.no_emit && self.options.declaration {
            self.emit_declarations(&mut result);
        }

        if self.options.incremental {
            if let Some(path) = &self.options.build_info_file {
                match self.build_info.save(path) {
                    Ok(()) => tracing::debug!(path = %path.display(), "wrote build info"),
                    Err(err) => result.diagnostics.push(Diagnostic::global(
                        CANNOT_WRITE_FILE,
                        format!("Could not write file '{}': {}.", path.display(), err),
                    )),
                }
            }
        }

        result.emit_skipped = result.emitted_files.is_empty();
        result
    }

    fn emit_declarations(&self, result: &mut EmitResult) {
        let source_root = self
            .files
            .first()
            .and_then(|file| file.source.file_name().parent())
            .map(Path::to_path_buf)
            .unwrap_or_default();

        for file in &self.files {
            let path = file.source.file_name();
            if !CompilerOptions::is_ts_file(path) {
                continue;
            }

            let text = match generate_declaration(path, file.source.text()) {
                Ok(Some(text)) => text,
                Ok(None) => continue,
                Err(errors) => {
                    result
                        .diagnostics
                        .extend(errors.into_iter().map(|(start, length, message)| {
                            Diagnostic::in_file(
                                Arc::clone(&file.source),
                                start,
                                length,
                                DECLARATION_ERROR,
                                message,
                            )
                        }));
                    continue;
                }
            };

            let target = declaration_path(path, &source_root, self.options.out_dir.as_deref());
            let written = target
                .parent()
                .map_or(Ok(()), fs::create_dir_all)
                .and_then(|()| fs::write(&target, text));
            match written {
                Ok(()) => result.emitted_files.push(target),
                Err(err) => result.diagnostics.push(Diagnostic::global(
                    CANNOT_WRITE_FILE,
                    format!("Could not write file '{}': {}.", target.display(), err),
                )),
            }
        }
    }
}

fn load_previous(options: &CompilerOptions, fingerprint: &str) -> Option<BuildInfo> {
    if !options.incremental {
        return None;
    }
    let path = options.build_info_file.as_ref()?;
    match BuildInfo::load(path, fingerprint) {
        Ok(Some(info)) => {
            tracing::debug!(path = %path.display(), files = info.len(), "loaded build info");
            Some(info)
        }
        Ok(None) => None,
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "ignoring build info");
            None
        }
    }
}

fn untyped_module_message(specifier: &str, resolved: &Path) -> MessageText {
    let head = MessageChain::new(
        format!(
            "Could not find a declaration file for module '{}'. '{}' implicitly has an 'any' type.",
            specifier,
            resolved.display()
        ),
        DiagnosticCategory::Error,
        UNTYPED_MODULE,
    );

    let is_package = !specifier.starts_with('.') && !Path::new(specifier).is_absolute();
    if !is_package {
        return MessageText::Chain(head);
    }

    let package = stacks_core::package_name(specifier);
    let types_name = match package.strip_prefix('@') {
        Some(scoped) => scoped.replacen('/', "__", 1),
        None => package.to_string(),
    };
    MessageText::Chain(head.with_next(MessageChain::new(
        format!(
            "Try `npm i --save-dev @types/{types_name}` if it exists or add a new declaration (.d.ts) file containing `declare module '{specifier}';`"
        ),
        DiagnosticCategory::Message,
        INSTALL_TYPES_HINT,
    )))
}
