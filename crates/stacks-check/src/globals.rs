//! Names that resolve without a declaration in the program: the standard
//! library, the Node.js runtime, and the built-in TypeScript utility types.
//! Files can add to these with `declare global { ... }`.

use oxc_ast::ast::{Declaration, Program, Statement, TSGlobalDeclaration};
use oxc_ast_visit::Visit;

static KNOWN_GLOBALS: phf::Set<&'static str> = phf::phf_set! {
    // Value properties and functions
    "globalThis", "undefined", "NaN", "Infinity",
    "eval", "isFinite", "isNaN", "parseFloat", "parseInt",
    "decodeURI", "decodeURIComponent", "encodeURI", "encodeURIComponent",
    "escape", "unescape",
    // Fundamental objects
    "Object", "Function", "Boolean", "Symbol",
    "Error", "AggregateError", "EvalError", "RangeError", "ReferenceError",
    "SyntaxError", "TypeError", "URIError",
    // Numbers, text, collections
    "Number", "BigInt", "Math", "Date", "String", "RegExp",
    "Array", "Int8Array", "Uint8Array", "Uint8ClampedArray", "Int16Array",
    "Uint16Array", "Int32Array", "Uint32Array", "Float16Array", "Float32Array",
    "Float64Array", "BigInt64Array", "BigUint64Array",
    "Map", "Set", "WeakMap", "WeakSet", "WeakRef", "FinalizationRegistry",
    "ArrayBuffer", "SharedArrayBuffer", "DataView", "Atomics", "JSON",
    // Control abstraction and reflection
    "Promise", "Proxy", "Reflect", "Intl", "DisposableStack", "AsyncDisposableStack",
    "SuppressedError",
    // Node.js runtime
    "require", "module", "exports", "__dirname", "__filename",
    "process", "console", "Buffer", "global",
    "setTimeout", "clearTimeout", "setInterval", "clearInterval",
    "setImmediate", "clearImmediate", "queueMicrotask", "structuredClone",
    "URL", "URLSearchParams", "TextEncoder", "TextDecoder",
    "AbortController", "AbortSignal", "Event", "EventTarget", "CustomEvent",
    "fetch", "Request", "Response", "Headers", "FormData", "Blob", "File",
    "atob", "btoa", "performance", "crypto", "WebAssembly", "navigator",
    "DOMException", "MessageChannel", "MessagePort", "MessageEvent", "BroadcastChannel",
    "ReadableStream", "ReadableStreamDefaultReader", "ReadableByteStreamController",
    "WritableStream", "WritableStreamDefaultWriter", "TransformStream",
    "ByteLengthQueuingStrategy", "CountQueuingStrategy",
    "TextEncoderStream", "TextDecoderStream", "CompressionStream", "DecompressionStream",
    "WebSocket", "Worker", "PerformanceObserver", "PerformanceEntry",
    "Crypto", "CryptoKey", "SubtleCrypto",
    // Type-level names
    "NodeJS", "NodeRequire", "NodeModule", "BufferEncoding", "JSX",
    "RequestInit", "ResponseInit", "HeadersInit", "BodyInit", "RequestInfo",
    "PropertyKey", "PropertyDescriptor", "PropertyDescriptorMap",
    "ArrayLike", "ReadonlyArray", "ReadonlyMap", "ReadonlySet", "ConcatArray",
    "PromiseLike", "PromiseConstructorLike", "Awaited",
    "PromiseSettledResult", "PromiseFulfilledResult", "PromiseRejectedResult",
    "ArrayBufferLike", "ArrayBufferView", "ArrayBufferTypes", "IArguments",
    "CallableFunction", "NewableFunction", "WeakKey", "WeakKeyTypes",
    "Disposable", "AsyncDisposable", "IteratorObject", "AsyncIteratorObject",
    "IteratorYieldResult", "IteratorReturnResult", "BuiltinIteratorReturn",
    "Iterable", "Iterator", "IterableIterator", "IteratorResult",
    "AsyncIterable", "AsyncIterator", "AsyncIterableIterator",
    "Generator", "AsyncGenerator", "GeneratorFunction", "TemplateStringsArray",
    "Partial", "Required", "Readonly", "Record", "Pick", "Omit",
    "Exclude", "Extract", "NonNullable", "Parameters", "ConstructorParameters",
    "ReturnType", "InstanceType", "ThisParameterType", "OmitThisParameter",
    "ThisType", "NoInfer",
    "Uppercase", "Lowercase", "Capitalize", "Uncapitalize",
    "ClassDecorator", "PropertyDecorator", "MethodDecorator", "ParameterDecorator",
    "TypedPropertyDescriptor", "ErrorConstructor", "ObjectConstructor",
    "ArrayConstructor", "PromiseConstructor", "RegExpMatchArray", "RegExpExecArray",
    "FunctionConstructor", "NumberConstructor", "StringConstructor", "SymbolConstructor",
    "MapConstructor", "SetConstructor", "DateConstructor", "RegExpConstructor",
    "ArrayBufferConstructor", "TypedPropertyKey", "DecoratorContext",
    "ClassDecoratorContext", "ClassMethodDecoratorContext", "ClassFieldDecoratorContext",
    "ClassGetterDecoratorContext", "ClassSetterDecoratorContext",
    "ClassAccessorDecoratorContext", "ClassAccessorDecoratorTarget",
    "ClassAccessorDecoratorResult", "ClassMemberDecoratorContext",
    "Intrinsic",
};

/// Whether `name` is provided by the runtime or the standard library.
pub fn is_known_global(name: &str) -> bool {
    KNOWN_GLOBALS.contains(name)
}

/// Names `program` adds to the global scope inside `declare global` blocks.
pub(crate) fn declared_globals(program: &Program<'_>) -> Vec<String> {
    let mut collector = GlobalDeclarations::default();
    collector.visit_program(program);
    collector.names
}

#[derive(Default)]
struct GlobalDeclarations {
    names: Vec<String>,
}

impl GlobalDeclarations {
    fn declare(&mut self, declaration: &Declaration<'_>) {
        if let Declaration::VariableDeclaration(variables) = declaration {
            for declarator in &variables.declarations {
                for ident in declarator.id.get_binding_identifiers() {
                    self.names.push(ident.name.to_string());
                }
            }
        } else if let Some(ident) = declaration.id() {
            self.names.push(ident.name.to_string());
        }
    }
}

impl<'a> Visit<'a> for GlobalDeclarations {
    fn visit_ts_global_declaration(&mut self, it: &TSGlobalDeclaration<'a>) {
        for statement in &it.body.body {
            match statement {
                Statement::ExportNamedDeclaration(export) => {
                    if let Some(declaration) = &export.declaration {
                        self.declare(declaration);
                    }
                }
                other => {
                    if let Some(declaration) = other.as_declaration() {
                        self.declare(declaration);
                    }
                }
            }
        }
    }
}
