//! Symbol-reference extraction.
//!
//! Walks a parsed file and records every function call, path expression,
//! method call and macro invocation, resolving paths through the `use`
//! declarations, local items and module hierarchy that are visible at the
//! point of reference.
//!
//! Resolution is purely syntactic: method receivers are not typed, glob
//! imports are not followed and local bindings do not shadow imports.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use syn::punctuated::Punctuated;
use syn::visit::Visit;
use syn::{Expr, ExprCall, ExprMethodCall, ExprPath, Item, ItemFn, ItemImpl, ItemMod, Stmt};

use crate::context::FileContext;
use crate::types::{Location, Severity, Violation};
use crate::utils::{has_cfg_test, has_test_attr};

/// How a symbol is referenced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceKind {
    /// A path in call position: `std::process::exit(1)`.
    Call,
    /// A path used as a value: `.map(std::process::exit)`.
    Path,
    /// A method call; only the method name is known: `.unwrap`.
    Method,
    /// A macro invocation: `std::println!`.
    Macro,
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Call => write!(f, "call"),
            Self::Path => write!(f, "path"),
            Self::Method => write!(f, "method"),
            Self::Macro => write!(f, "macro"),
        }
    }
}

/// A resolved symbol reference in a source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    /// How the symbol is referenced.
    pub kind: ReferenceKind,
    /// Resolved path. Methods are `.name`, macros end in `!`.
    pub path: String,
    /// Where the reference appears.
    pub location: Location,
    /// Whether the reference sits in test code.
    pub in_test: bool,
}

impl Reference {
    /// Builds a violation located at this reference.
    #[must_use]
    pub fn violation(
        &self,
        code: &str,
        rule: &str,
        severity: Severity,
        message: impl Into<String>,
    ) -> Violation {
        Violation::new(code, rule, severity, self.location.clone(), message)
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} {}", self.location, self.kind, self.path)
    }
}

/// Collects every reference in `ast`.
#[must_use]
pub fn collect(ctx: &FileContext, ast: &syn::File) -> Vec<Reference> {
    let mut collector = ReferenceCollector {
        ctx,
        scopes: Vec::new(),
        modules: Vec::new(),
        self_types: Vec::new(),
        test_depth: usize::from(has_cfg_test(&ast.attrs)),
        references: Vec::new(),
    };

    collector.enter_module(ctx.module_path.clone(), &ast.items);
    for item in &ast.items {
        collector.visit_item(item);
    }
    collector.exit_module();

    collector.references
}

/// Unqualified names the std prelude brings into scope.
const PRELUDE: &[(&str, &str)] = &[
    ("drop", "std::mem::drop"),
    ("Box", "std::boxed::Box"),
    ("Vec", "std::vec::Vec"),
    ("String", "std::string::String"),
    ("Option", "std::option::Option"),
    ("Some", "std::option::Option::Some"),
    ("None", "std::option::Option::None"),
    ("Result", "std::result::Result"),
    ("Ok", "std::result::Result::Ok"),
    ("Err", "std::result::Result::Err"),
];

/// Macros exported at the std root.
const PRELUDE_MACROS: &[&str] = &[
    "assert",
    "assert_eq",
    "assert_ne",
    "cfg",
    "column",
    "compile_error",
    "concat",
    "dbg",
    "debug_assert",
    "debug_assert_eq",
    "debug_assert_ne",
    "env",
    "eprint",
    "eprintln",
    "file",
    "format",
    "format_args",
    "include",
    "include_bytes",
    "include_str",
    "line",
    "matches",
    "module_path",
    "option_env",
    "panic",
    "print",
    "println",
    "stringify",
    "todo",
    "unimplemented",
    "unreachable",
    "vec",
    "write",
    "writeln",
];

/// Names visible in one lexical scope.
#[derive(Debug, Default)]
struct ImportScope {
    /// Local name to fully resolved path.
    names: HashMap<String, String>,
    /// Whether lookups continue into the enclosing scope.
    inherits: bool,
}

/// One name introduced by a `use` tree.
#[derive(Debug, PartialEq, Eq)]
struct UseEntry {
    alias: String,
    path: Vec<String>,
}

/// Flattens a [`syn::UseTree`] into `(alias, path)` pairs.
///
/// `use std::io::{self, Write as W};` yields `io -> std::io` and
/// `W -> std::io::Write`. Globs and `_` renames introduce no names.
fn expand_use_tree(tree: &syn::UseTree, prefix: &[String], out: &mut Vec<UseEntry>) {
    match tree {
        syn::UseTree::Path(p) => {
            let mut next = prefix.to_vec();
            next.push(p.ident.to_string());
            expand_use_tree(&p.tree, &next, out);
        }
        syn::UseTree::Name(n) => {
            if n.ident == "self" {
                if let Some(last) = prefix.last() {
                    out.push(UseEntry {
                        alias: last.clone(),
                        path: prefix.to_vec(),
                    });
                }
            } else {
                let mut path = prefix.to_vec();
                path.push(n.ident.to_string());
                out.push(UseEntry {
                    alias: n.ident.to_string(),
                    path,
                });
            }
        }
        syn::UseTree::Rename(r) => {
            if r.rename == "_" {
                return;
            }
            let mut path = prefix.to_vec();
            if r.ident != "self" {
                path.push(r.ident.to_string());
            }
            out.push(UseEntry {
                alias: r.rename.to_string(),
                path,
            });
        }
        syn::UseTree::Glob(_) => {}
        syn::UseTree::Group(g) => {
            for item in &g.items {
                expand_use_tree(item, prefix, out);
            }
        }
    }
}

/// Name introduced by an item, if any.
fn item_ident(item: &Item) -> Option<&syn::Ident> {
    match item {
        Item::Fn(i) => Some(&i.sig.ident),
        Item::Struct(i) => Some(&i.ident),
        Item::Enum(i) => Some(&i.ident),
        Item::Union(i) => Some(&i.ident),
        Item::Trait(i) => Some(&i.ident),
        Item::Type(i) => Some(&i.ident),
        Item::Const(i) => Some(&i.ident),
        Item::Static(i) => Some(&i.ident),
        Item::Mod(i) => Some(&i.ident),
        Item::Macro(i) => i.ident.as_ref(),
        _ => None,
    }
}

struct ReferenceCollector<'a> {
    ctx: &'a FileContext<'a>,
    scopes: Vec<ImportScope>,
    modules: Vec<Vec<String>>,
    self_types: Vec<Option<String>>,
    test_depth: usize,
    references: Vec<Reference>,
}

impl ReferenceCollector<'_> {
    fn current_module(&self) -> &[String] {
        self.modules.last().map(Vec::as_slice).unwrap_or_default()
    }

    fn enter_module(&mut self, module: Vec<String>, items: &[Item]) {
        self.modules.push(module);
        self.scopes.push(ImportScope {
            names: HashMap::new(),
            inherits: false,
        });

        for item in items {
            if let Some(ident) = item_ident(item) {
                let mut path = self.current_module().to_vec();
                path.push(ident.to_string());
                self.declare(ident.to_string(), path.join("::"));
            }
        }
        self.declare_uses(items.iter());
    }

    fn exit_module(&mut self) {
        self.scopes.pop();
        self.modules.pop();
    }

    fn declare(&mut self, alias: String, path: String) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.names.insert(alias, path);
        }
    }

    fn declare_uses<'i>(&mut self, items: impl Iterator<Item = &'i Item>) {
        let mut entries = Vec::new();
        for item in items {
            if let Item::Use(u) = item {
                let prefix: Vec<String> = Vec::new();
                expand_use_tree(&u.tree, &prefix, &mut entries);
            }
        }

        for entry in entries {
            let resolved = self.resolve_import(&entry.path);
            self.declare(entry.alias, resolved);
        }
    }

    /// Resolves the path of a `use` declaration.
    ///
    /// Only module-relative keywords and local items are consulted; other
    /// imports are not, so declaration order never matters.
    fn resolve_import(&self, segments: &[String]) -> String {
        match self.resolve_relative(segments) {
            Some(resolved) => resolved,
            None => {
                let local = segments.first().and_then(|first| {
                    let scope = self.scopes.last()?;
                    let target = scope.names.get(first)?;
                    target
                        .starts_with("crate")
                        .then(|| join_with(target, &segments[1..]))
                });
                local.unwrap_or_else(|| segments.join("::"))
            }
        }
    }

    /// Handles `crate::`, `self::`, `super::` and `Self::` prefixes.
    fn resolve_relative(&self, segments: &[String]) -> Option<String> {
        let first = segments.first()?;
        match first.as_str() {
            "crate" => Some(segments.join("::")),
            "self" => Some(join_with(
                &self.current_module().join("::"),
                &segments[1..],
            )),
            "super" => {
                let supers = segments.iter().take_while(|s| *s == "super").count();
                let module = self.current_module();
                let keep = module.len().saturating_sub(supers).max(1).min(module.len());
                Some(join_with(&module[..keep].join("::"), &segments[supers..]))
            }
            "Self" => self
                .self_types
                .last()
                .and_then(Clone::clone)
                .map(|ty| join_with(&ty, &segments[1..])),
            _ => None,
        }
    }

    fn lookup(&self, name: &str) -> Option<&str> {
        for scope in self.scopes.iter().rev() {
            if let Some(path) = scope.names.get(name) {
                return Some(path);
            }
            if !scope.inherits {
                break;
            }
        }
        None
    }

    /// Resolves an expression or type path to its canonical string.
    ///
    /// Returns the resolved path and whether any resolution rule applied.
    fn resolve(&self, segments: &[String], leading_colon: bool, is_macro: bool) -> (String, bool) {
        let Some(first) = segments.first() else {
            return (String::new(), false);
        };
        if leading_colon {
            return (segments.join("::"), true);
        }
        if let Some(resolved) = self.resolve_relative(segments) {
            return (resolved, true);
        }
        if let Some(target) = self.lookup(first) {
            return (join_with(target, &segments[1..]), true);
        }
        if is_macro {
            if segments.len() == 1 && PRELUDE_MACROS.contains(&first.as_str()) {
                return (format!("std::{first}"), true);
            }
        } else if let Some((_, target)) = PRELUDE.iter().find(|(name, _)| name == first) {
            return (join_with(target, &segments[1..]), true);
        }
        (segments.join("::"), false)
    }

    fn resolve_expr_path(&self, node: &ExprPath) -> (String, bool) {
        let mut segments: Vec<String> = Vec::new();
        let mut leading_colon = node.path.leading_colon.is_some();

        if let Some(qself) = &node.qself {
            if qself.position == 0 {
                if let syn::Type::Path(tp) = &*qself.ty {
                    let (ty, _) = self.resolve(
                        &segment_names(&tp.path),
                        tp.path.leading_colon.is_some(),
                        false,
                    );
                    segments.extend(ty.split("::").map(String::from));
                    leading_colon = true;
                }
            }
        }
        segments.extend(segment_names(&node.path));
        self.resolve(&segments, leading_colon, false)
    }

    fn record(&mut self, kind: ReferenceKind, path: String, span: proc_macro2::Span) {
        let start = span.start();
        let end = span.end();
        let column = start.column + 1;
        let offset = self.ctx.offset_for(start.line, column);
        let length = self
            .ctx
            .offset_for(end.line, end.column + 1)
            .saturating_sub(offset);
        let location = Location::new(self.ctx.relative_path.clone(), start.line, column)
            .with_span(offset, length);

        self.references.push(Reference {
            kind,
            path,
            location,
            in_test: self.ctx.is_test || self.test_depth > 0,
        });
    }

    fn with_test_context(&mut self, is_test: bool, f: impl FnOnce(&mut Self)) {
        if is_test {
            self.test_depth += 1;
        }
        f(self);
        if is_test {
            self.test_depth -= 1;
        }
    }
}

fn segment_names(path: &syn::Path) -> Vec<String> {
    path.segments.iter().map(|s| s.ident.to_string()).collect()
}

fn join_with(base: &str, rest: &[String]) -> String {
    if rest.is_empty() {
        return base.to_string();
    }
    format!("{base}::{}", rest.join("::"))
}

fn last_ident_span(path: &syn::Path) -> proc_macro2::Span {
    path.segments
        .last()
        .map_or_else(proc_macro2::Span::call_site, |s| s.ident.span())
}

impl<'ast> Visit<'ast> for ReferenceCollector<'_> {
    fn visit_item_mod(&mut self, node: &'ast ItemMod) {
        let Some((_, items)) = &node.content else {
            return;
        };
        let mut module = self.current_module().to_vec();
        module.push(node.ident.to_string());

        self.with_test_context(has_cfg_test(&node.attrs), |this| {
            this.enter_module(module, items);
            for item in items {
                this.visit_item(item);
            }
            this.exit_module();
        });
    }

    fn visit_item_fn(&mut self, node: &'ast ItemFn) {
        let is_test = has_test_attr(&node.attrs) || has_cfg_test(&node.attrs);
        self.with_test_context(is_test, |this| syn::visit::visit_item_fn(this, node));
    }

    fn visit_impl_item_fn(&mut self, node: &'ast syn::ImplItemFn) {
        let is_test = has_test_attr(&node.attrs) || has_cfg_test(&node.attrs);
        self.with_test_context(is_test, |this| syn::visit::visit_impl_item_fn(this, node));
    }

    fn visit_item_impl(&mut self, node: &'ast ItemImpl) {
        let self_type = match &*node.self_ty {
            syn::Type::Path(tp) => Some(
                self.resolve(
                    &segment_names(&tp.path),
                    tp.path.leading_colon.is_some(),
                    false,
                )
                .0,
            ),
            _ => None,
        };
        self.self_types.push(self_type);
        self.with_test_context(has_cfg_test(&node.attrs), |this| {
            syn::visit::visit_item_impl(this, node);
        });
        self.self_types.pop();
    }

    fn visit_block(&mut self, node: &'ast syn::Block) {
        self.scopes.push(ImportScope {
            names: HashMap::new(),
            inherits: true,
        });
        self.declare_uses(node.stmts.iter().filter_map(|stmt| match stmt {
            Stmt::Item(item) => Some(item),
            _ => None,
        }));
        syn::visit::visit_block(self, node);
        self.scopes.pop();
    }

    fn visit_expr_call(&mut self, node: &'ast ExprCall) {
        if let Expr::Path(func) = &*node.func {
            let (path, _) = self.resolve_expr_path(func);
            self.record(ReferenceKind::Call, path, last_ident_span(&func.path));
            for attr in &node.attrs {
                self.visit_attribute(attr);
            }
            for arg in &node.args {
                self.visit_expr(arg);
            }
            return;
        }
        syn::visit::visit_expr_call(self, node);
    }

    fn visit_expr_path(&mut self, node: &'ast ExprPath) {
        let (path, resolved) = self.resolve_expr_path(node);
        // A bare unresolved identifier is a local binding, not a symbol.
        if resolved || node.path.segments.len() > 1 {
            self.record(ReferenceKind::Path, path, last_ident_span(&node.path));
        }
        syn::visit::visit_expr_path(self, node);
    }

    fn visit_expr_method_call(&mut self, node: &'ast ExprMethodCall) {
        self.record(
            ReferenceKind::Method,
            format!(".{}", node.method),
            node.method.span(),
        );
        syn::visit::visit_expr_method_call(self, node);
    }

    fn visit_macro(&mut self, node: &'ast syn::Macro) {
        if node.path.is_ident("macro_rules") {
            return;
        }
        let (path, _) = self.resolve(
            &segment_names(&node.path),
            node.path.leading_colon.is_some(),
            true,
        );
        self.record(
            ReferenceKind::Macro,
            format!("{path}!"),
            last_ident_span(&node.path),
        );

        // Most std macros take expression arguments; walk them when they parse.
        if let Ok(args) =
            node.parse_body_with(Punctuated::<Expr, syn::Token![,]>::parse_terminated)
        {
            for arg in &args {
                self.visit_expr(arg);
            }
        }
    }
}
