//! Collects the module specifiers a file depends on.

use oxc_ast::ast::{
    Argument, CallExpression, ExportAllDeclaration, ExportNamedDeclaration, Expression,
    ImportDeclaration, ImportExpression, Program, StringLiteral, TSImportEqualsDeclaration,
    TSModuleReference,
};
use oxc_ast_visit::{Visit, walk};
use serde::{Deserialize, Serialize};

/// A module specifier and the span of its string literal (quotes included).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct ImportRecord {
    pub specifier: String,
    pub start: u32,
    pub length: u32,
}

/// Every static import, re-export, dynamic `import("x")`, `require("x")` and
/// `import x = require("x")` in `program`, in source order.
pub(crate) fn collect_imports(program: &Program<'_>) -> Vec<ImportRecord> {
    let mut collector = ImportCollector::default();
    collector.visit_program(program);
    collector.imports
}

#[derive(Default)]
struct ImportCollector {
    imports: Vec<ImportRecord>,
}

impl ImportCollector {
    fn record(&mut self, literal: &StringLiteral<'_>) {
        self.imports.push(ImportRecord {
            specifier: literal.value.to_string(),
            start: literal.span.start,
            length: literal.span.size(),
        });
    }
}

impl<'a> Visit<'a> for ImportCollector {
    fn visit_import_declaration(&mut self, it: &ImportDeclaration<'a>) {
        self.record(&it.source);
        walk::walk_import_declaration(self, it);
    }

    fn visit_export_named_declaration(&mut self, it: &ExportNamedDeclaration<'a>) {
        if let Some(source) = &it.source {
            self.record(source);
        }
        walk::walk_export_named_declaration(self, it);
    }

    fn visit_export_all_declaration(&mut self, it: &ExportAllDeclaration<'a>) {
        self.record(&it.source);
        walk::walk_export_all_declaration(self, it);
    }

    fn visit_import_expression(&mut self, it: &ImportExpression<'a>) {
        if let Expression::StringLiteral(literal) = &it.source {
            self.record(literal);
        }
        walk::walk_import_expression(self, it);
    }

    fn visit_call_expression(&mut self, it: &CallExpression<'a>) {
        let is_require =
            matches!(&it.callee, Expression::Identifier(callee) if callee.name == "require");
        if is_require && it.arguments.len() == 1 {
            if let Some(Argument::StringLiteral(literal)) = it.arguments.first() {
                self.record(literal);
            }
        }
        walk::walk_call_expression(self, it);
    }

    fn visit_ts_import_equals_declaration(&mut self, it: &TSImportEqualsDeclaration<'a>) {
        if let TSModuleReference::ExternalModuleReference(reference) = &it.module_reference {
            self.record(&reference.expression);
        }
        walk::walk_ts_import_equals_declaration(self, it);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxc_allocator::Allocator;
    use oxc_parser::Parser;
    use oxc_span::SourceType;

    fn specifiers(source: &str) -> Vec<String> {
        let allocator = Allocator::default();
        let ret = Parser::new(&allocator, source, SourceType::ts()).parse();
        assert!(ret.errors.is_empty());
        collect_imports(&ret.program)
            .into_iter()
            .map(|r| r.specifier)
            .collect()
    }

    #[test]
    fn collects_every_import_form_in_order() {
        let source = r#"
import a from "./a";
export { b } from "./b";
export * from "./c";
const d = require("d");
const e = await import("./e");
import f = require("f");
"#;
        assert_eq!(specifiers(source), vec!["./a", "./b", "./c", "d", "./e", "f"]);
    }

    #[test]
    fn ignores_non_literal_and_local_exports() {
        let source = r#"
const name = "x";
export const local = 1;
export { local as renamed };
require(name);
import(name);
"#;
        assert!(specifiers(source).is_empty());
    }

    #[test]
    fn span_covers_the_quoted_literal() {
        let source = "import x from \"./x\";";
        let allocator = Allocator::default();
        let ret = Parser::new(&allocator, source, SourceType::ts()).parse();
        let record = &collect_imports(&ret.program)[0];
        assert_eq!(
            &source[record.start as usize..(record.start + record.length) as usize],
            "\"./x\""
        );
    }
}
