//! End-to-end tests for `check`, `Program` and formatting.

use std::fs;
use std::path::{Path, PathBuf};

use stacks_check::{
    ColorChoice, CompilerOptions, FormatOptions, Program, check, format_diagnostics,
    format_diagnostics_with,
};
use stacks_core::{Config, StatePaths};
use tempfile::TempDir;

fn project(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for (relative, content) in files {
        let path = dir.path().join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }
    dir
}

fn codes(diagnostics: &[stacks_check::Diagnostic]) -> Vec<u32> {
    diagnostics.iter().map(|d| d.code).collect()
}

fn options_with_cache(root: &Path) -> CompilerOptions {
    CompilerOptions {
        no_emit: true,
        ..CompilerOptions::for_check(root)
    }
}

#[test]
fn undefined_reference_in_plain_javascript_is_reported() {
    let dir = project(&[("index.js", "const x = undefinedVariableRef;\n")]);

    let diagnostics = check(dir.path(), &Config::new("index.js"));

    assert_eq!(codes(&diagnostics), vec![2304]);
    let diagnostic = &diagnostics[0];
    assert!(diagnostic.message().contains("undefinedVariableRef"));
    assert!(diagnostic.file_name().unwrap().ends_with("index.js"));
}

#[test]
fn arguments_in_plain_javascript_functions_is_not_reported() {
    let dir = project(&[(
        "a.js",
        "function f() { return arguments.length; }\nf();\n",
    )]);

    let diagnostics = check(dir.path(), &Config::new("a.js"));

    assert!(diagnostics.is_empty(), "{diagnostics:?}");
}

#[test]
fn globals_declared_in_an_imported_file_resolve_everywhere() {
    let dir = project(&[
        (
            "stacks/index.ts",
            "import \"./env\";\nexport const stage: string = STAGE;\nconsole.log(UNKNOWN);\n",
        ),
        (
            "stacks/env.ts",
            "export {};\ndeclare global {\n  var STAGE: string;\n}\n",
        ),
    ]);

    let diagnostics = check(dir.path(), &Config::new("stacks/index.ts"));

    assert_eq!(codes(&diagnostics), vec![2304]);
    assert_eq!(diagnostics[0].message(), "Cannot find name 'UNKNOWN'.");
}

#[test]
fn clean_project_has_no_diagnostics_and_writes_build_info() {
    let dir = project(&[(
        "stacks/index.ts",
        "import { readFileSync } from \"fs\";\nexport const data: string = readFileSync(__filename, \"utf8\");\n",
    )]);

    let diagnostics = check(dir.path(), &Config::new("stacks/index.ts"));

    assert!(diagnostics.is_empty(), "{diagnostics:?}");
    assert!(StatePaths::new(dir.path()).build_info_file().is_file());
}

#[test]
fn follows_imports_into_other_files() {
    let dir = project(&[
        ("index.ts", "import { helper } from \"./lib/helper.js\";\nhelper();\n"),
        ("lib/helper.ts", "export function helper() { return missingInHelper; }\n"),
    ]);

    let diagnostics = check(dir.path(), &Config::new("index.ts"));

    assert_eq!(codes(&diagnostics), vec![2304]);
    assert!(diagnostics[0].file_name().unwrap().ends_with("lib/helper.ts"));
}

#[test]
fn follows_require_through_javascript() {
    let dir = project(&[
        ("index.js", "const util = require(\"./util\");\nutil.run();\n"),
        ("util.js", "module.exports = { run: () => notDefinedHere };\n"),
    ]);

    let diagnostics = check(dir.path(), &Config::new("index.js"));

    assert_eq!(codes(&diagnostics), vec![2304]);
    assert!(diagnostics[0].file_name().unwrap().ends_with("util.js"));
}

#[test]
fn unresolvable_import_is_reported_at_the_specifier() {
    let source = "import { thing } from \"./missing\";\nexport const value = thing;\n";
    let dir = project(&[("index.ts", source)]);

    let diagnostics = check(dir.path(), &Config::new("index.ts"));

    assert_eq!(codes(&diagnostics), vec![2307]);
    assert_eq!(
        diagnostics[0].message(),
        "Cannot find module './missing' or its corresponding type declarations."
    );
    assert_eq!(diagnostics[0].start, Some(source.find('"').unwrap() as u32));
}

#[test]
fn missing_entry_is_a_global_diagnostic() {
    let dir = project(&[]);

    let diagnostics = check(dir.path(), &Config::new("stacks/index.ts"));

    assert_eq!(codes(&diagnostics), vec![6053]);
    assert!(diagnostics[0].file.is_none());
    assert!(diagnostics[0].message().contains("stacks/index.ts"));
}

#[test]
fn syntax_errors_come_before_semantic_errors() {
    let dir = project(&[
        ("index.ts", "import \"./broken\";\nconst a = firstMissing;\n"),
        ("broken.ts", "export const = ;\n"),
    ]);

    let diagnostics = check(dir.path(), &Config::new("index.ts"));

    assert!(diagnostics.len() >= 2, "{diagnostics:?}");
    assert_eq!(diagnostics[0].code, 1005);
    assert!(diagnostics[0].file_name().unwrap().ends_with("broken.ts"));
    assert_eq!(diagnostics.last().unwrap().code, 2304);
}

#[test]
fn unchanged_files_reuse_the_build_info() {
    let dir = project(&[
        ("index.ts", "import { a } from \"./a\";\nexport const b = a + missing;\n"),
        ("a.ts", "export const a = 1;\n"),
    ]);
    let root = dir.path();
    let entry = vec![root.join("index.ts")];

    let first = Program::new(entry.clone(), options_with_cache(root));
    assert_eq!(first.reused_file_count(), 0);
    let first_diagnostics = first.pre_emit_diagnostics();
    assert!(first.emit().diagnostics.is_empty());

    let second = Program::new(entry.clone(), options_with_cache(root));
    assert_eq!(second.reused_file_count(), 2);
    assert_eq!(
        codes(&second.pre_emit_diagnostics()),
        codes(&first_diagnostics)
    );
    second.emit();

    fs::write(root.join("a.ts"), "export const a = 2;\n").unwrap();
    let third = Program::new(entry, options_with_cache(root));
    assert_eq!(third.reused_file_count(), 1);
}

#[test]
fn changed_options_ignore_the_build_info() {
    let dir = project(&[("index.ts", "export const a = 1;\n")]);
    let root = dir.path();
    let entry = vec![root.join("index.ts")];

    Program::new(entry.clone(), options_with_cache(root)).emit();

    let loose = CompilerOptions {
        strict: false,
        ..options_with_cache(root)
    };
    assert_eq!(Program::new(entry, loose).reused_file_count(), 0);
}

#[test]
fn corrupt_build_info_is_a_cold_start() {
    let dir = project(&[("index.ts", "export const a = missing;\n")]);
    let root = dir.path();
    let info = StatePaths::new(root).build_info_file();
    fs::create_dir_all(info.parent().unwrap()).unwrap();
    fs::write(&info, b"garbage").unwrap();

    let diagnostics = check(root, &Config::new("index.ts"));

    assert_eq!(codes(&diagnostics), vec![2304]);
}

#[test]
fn build_info_write_failure_is_an_emit_diagnostic() {
    let dir = project(&[("index.ts", "export const a = 1;\n"), ("blocker", "")]);
    let options = CompilerOptions {
        build_info_file: Some(dir.path().join("blocker").join("tsbuildinfo")),
        ..CompilerOptions::for_check(dir.path())
    };

    let program = Program::new(vec![dir.path().join("index.ts")], options);
    assert!(program.pre_emit_diagnostics().is_empty());

    let emit = program.emit();
    assert!(emit.emit_skipped);
    assert_eq!(codes(&emit.diagnostics), vec![5033]);
}

#[test]
fn untyped_package_needs_declarations_under_no_implicit_any() {
    let dir = project(&[
        ("index.ts", "import pad from \"left-pad\";\npad(\"x\");\n"),
        (
            "node_modules/left-pad/package.json",
            "{ \"name\": \"left-pad\", \"main\": \"index.js\" }",
        ),
        ("node_modules/left-pad/index.js", "module.exports = (s) => s;\n"),
    ]);
    let entry = vec![dir.path().join("index.ts")];

    let lenient = Program::new(entry.clone(), CompilerOptions::default());
    assert!(lenient.pre_emit_diagnostics().is_empty());

    let strict = CompilerOptions {
        no_implicit_any: true,
        ..CompilerOptions::default()
    };
    let diagnostics = Program::new(entry, strict).pre_emit_diagnostics();
    assert_eq!(codes(&diagnostics), vec![7016]);
    assert!(diagnostics[0].message().starts_with("Try `npm i --save-dev @types/left-pad`"));
}

#[test]
fn invalid_options_and_javascript_roots() {
    let dir = project(&[("index.js", "export const a = 1;\n")]);

    let options = CompilerOptions {
        check_js: true,
        ..CompilerOptions::default()
    };
    let program = Program::new(vec![dir.path().join("index.js")], options);

    assert_eq!(codes(&program.pre_emit_diagnostics()), vec![5052, 6504]);
    assert_eq!(program.source_files().count(), 0);
}

#[test]
fn javascript_is_only_parsed_without_check_js() {
    let dir = project(&[("index.js", "const x = notChecked;\n")]);
    let options = CompilerOptions {
        allow_js: true,
        ..CompilerOptions::default()
    };

    let program = Program::new(vec![dir.path().join("index.js")], options);

    assert!(program.pre_emit_diagnostics().is_empty());
    assert_eq!(program.source_files().count(), 1);
}

#[test]
fn declaration_emit_writes_dts_files() {
    let dir = project(&[
        (
            "src/index.ts",
            "export { add } from \"./math\";\nexport const version: string = \"1\";\n",
        ),
        (
            "src/math.ts",
            "export function add(a: number, b: number): number { return a + b; }\n",
        ),
    ]);
    let out_dir = dir.path().join("types");
    let options = CompilerOptions {
        declaration: true,
        out_dir: Some(out_dir.clone()),
        ..CompilerOptions::default()
    };

    let emit = Program::new(vec![dir.path().join("src/index.ts")], options).emit();

    assert!(emit.diagnostics.is_empty(), "{:?}", emit.diagnostics);
    assert!(!emit.emit_skipped);
    let mut emitted: Vec<PathBuf> = emit.emitted_files.clone();
    emitted.sort();
    assert_eq!(emitted.len(), 2);
    let math = fs::read_to_string(out_dir.join("math.d.ts")).unwrap();
    assert!(math.contains("add"));
    assert!(out_dir.join("index.d.ts").is_file());
}

#[test]
fn declaration_problems_are_emit_diagnostics() {
    let dir = project(&[("index.ts", "export function f() { return 1; }\n")]);
    let options = CompilerOptions {
        declaration: true,
        out_dir: Some(dir.path().join("types")),
        ..CompilerOptions::default()
    };

    let emit = Program::new(vec![dir.path().join("index.ts")], options).emit();

    assert!(!emit.diagnostics.is_empty());
    assert!(emit.diagnostics.iter().all(|d| d.code == 9005));
}

#[test]
fn formatted_check_output_points_at_the_line() {
    let dir = project(&[(
        "index.js",
        "// app\nconst x = undefinedVariableRef;\nmodule.exports = x;\n",
    )]);

    let diagnostics = check(dir.path(), &Config::new("index.js"));
    let plain = FormatOptions {
        colors: ColorChoice::Never,
    };
    let formatted = format_diagnostics_with(&diagnostics, &plain);

    assert_eq!(formatted.len(), diagnostics.len());
    let lines: Vec<_> = formatted[0].lines().collect();
    assert!(lines[0].ends_with("index.js (2,11): Cannot find name 'undefinedVariableRef'."));
    assert_eq!(lines[1], "1. // app");
    assert_eq!(lines[2], "2. const x = undefinedVariableRef;");
    assert_eq!(lines[3], "3. module.exports = x;");

    assert_eq!(format_diagnostics(&diagnostics).len(), 1);
}
