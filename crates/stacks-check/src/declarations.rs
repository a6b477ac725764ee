//! `.d.ts` generation with isolated declarations.

use std::path::{Path, PathBuf};

use oxc_allocator::Allocator;
use oxc_codegen::Codegen;
use oxc_isolated_declarations::{IsolatedDeclarations, IsolatedDeclarationsOptions};
use oxc_parser::Parser;
use oxc_span::SourceType;

pub(crate) const DECLARATION_ERROR: u32 = 9005;

/// A problem found while generating declarations: offset, length, message.
pub(crate) type DeclarationError = (u32, u32, String);

/// Generate the declaration text for a TypeScript file.
///
/// Files that fail to parse produce no declarations and no errors; their
/// parse errors are reported elsewhere.
pub(crate) fn generate_declaration(
    path: &Path,
    text: &str,
) -> Result<Option<String>, Vec<DeclarationError>> {
    let allocator = Allocator::default();
    let source_type = SourceType::from_path(path).unwrap_or_else(|_| SourceType::ts());

    let parsed = Parser::new(&allocator, text, source_type).parse();
    if !parsed.errors.is_empty() {
        return Ok(None);
    }

    let options = IsolatedDeclarationsOptions {
        strip_internal: false,
    };
    let result = IsolatedDeclarations::new(&allocator, options).build(&parsed.program);

    if !result.errors.is_empty() {
        return Err(result
            .errors
            .iter()
            .map(|error| {
                let (start, length) = error
                    .labels
                    .as_ref()
                    .and_then(|labels| labels.first())
                    .map_or((0, 0), |label| (label.offset() as u32, label.len() as u32));
                (start, length, error.message.to_string())
            })
            .collect());
    }

    Ok(Some(Codegen::new().build(&result.program).code))
}

/// Where the declaration for `source` goes.
///
/// Mirrors the file's position below `source_root` inside `out_dir`, or sits
/// next to the source when there is no `out_dir`.
pub(crate) fn declaration_path(
    source: &Path,
    source_root: &Path,
    out_dir: Option<&Path>,
) -> PathBuf {
    let relative = match out_dir {
        Some(out_dir) => match source.strip_prefix(source_root) {
            Ok(relative) => out_dir.join(relative),
            Err(_) => out_dir.join(source.file_name().unwrap_or(source.as_os_str())),
        },
        None => source.to_path_buf(),
    };

    let extension = match relative.extension().and_then(|e| e.to_str()) {
        Some("mts") => "d.mts",
        Some("cts") => "d.cts",
        _ => "d.ts",
    };
    relative.with_extension(extension)
}
