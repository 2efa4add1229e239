//! ES module parser.
//!
//! Uses tree-sitter's JavaScript grammar (JSX included) and lowers the
//! concrete syntax tree into a [`SourceModule`]: the ordered top-level
//! items with their export forms, plus a handful of facts collected over
//! the whole tree (`var` sites, `let` bindings, reassigned names, JSX).

use std::sync::Mutex;

use tracing::debug;
use tree_sitter::{Node, Parser};

use crate::domain::model::{
    DeclKind, Declarator, ExportForm, ExportSpecifier, ItemKind, LetBinding, SourceFile,
    SourceModule, Span, TopLevelItem, ValueShape,
};
use crate::utils::error::{LintError, Result};

const SNIPPET_LEN: usize = 40;

pub struct ModuleParser {
    /// tree-sitter parsers are not `Sync`
    parser: Mutex<Parser>,
}

impl ModuleParser {
    pub fn new() -> Result<Self> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_javascript::LANGUAGE.into())
            .map_err(|e| LintError::ParserSetupError {
                message: e.to_string(),
            })?;

        Ok(Self {
            parser: Mutex::new(parser),
        })
    }

    pub fn parse(&self, file: &SourceFile) -> Result<SourceModule> {
        let tree = {
            let mut parser = self.parser.lock().map_err(|_| LintError::ParserSetupError {
                message: "parser lock poisoned".to_string(),
            })?;
            parser.parse(&file.text, None)
        };

        let tree = tree.ok_or_else(|| LintError::ParseError {
            file: file.path.clone(),
            line: 1,
            column: 1,
            message: "parser produced no syntax tree".to_string(),
        })?;

        let root = tree.root_node();
        let source = file.text.as_bytes();

        if root.has_error() {
            return Err(syntax_error(root, source, &file.path));
        }

        let mut module = SourceModule::default();

        let mut cursor = root.walk();
        for node in root.named_children(&mut cursor) {
            if let Some(item) = lower_item(node, source, None) {
                module.items.push(item);
            }
        }

        collect_tree_facts(root, source, &mut module);

        debug!(
            file = %file.path,
            items = module.items.len(),
            jsx = module.has_jsx(),
            "Parsed module"
        );
        Ok(module)
    }
}

/// tree-sitter columns count bytes; diagnostics count characters.
fn span_of(node: Node<'_>, source: &[u8]) -> Span {
    let pos = node.start_position();
    let start = node.start_byte();
    let line_start = start.saturating_sub(pos.column);
    let column = source
        .get(line_start..start)
        .map(|prefix| String::from_utf8_lossy(prefix).chars().count())
        .unwrap_or(pos.column);
    Span::new(pos.row + 1, column + 1)
}

fn text_of<'s>(node: Node<'_>, source: &'s [u8]) -> &'s str {
    node.utf8_text(source).unwrap_or("")
}

fn field_text(node: Node<'_>, field: &str, source: &[u8]) -> Option<String> {
    node.child_by_field_name(field)
        .map(|child| text_of(child, source).to_string())
}

fn unquote(literal: &str) -> String {
    literal
        .trim_matches(|c| c == '\'' || c == '"' || c == '`')
        .to_string()
}

/// First error or missing node in document order, reported as a parse error.
fn syntax_error(root: Node<'_>, source: &[u8], path: &str) -> LintError {
    let mut first = None;
    walk(root, &mut |node| {
        if first.is_none() && (node.is_error() || node.is_missing()) {
            first = Some(node);
        }
    });

    let node = first.unwrap_or(root);
    let span = span_of(node, source);
    let message = if node.is_missing() {
        format!("missing `{}`", node.kind())
    } else {
        let snippet: String = text_of(node, source)
            .lines()
            .next()
            .unwrap_or("")
            .trim()
            .chars()
            .take(SNIPPET_LEN)
            .collect();
        if snippet.is_empty() {
            "unexpected end of input".to_string()
        } else {
            format!("unexpected `{}`", snippet)
        }
    };

    LintError::ParseError {
        file: path.to_string(),
        line: span.line,
        column: span.column,
        message,
    }
}

fn walk<'t>(node: Node<'t>, visit: &mut dyn FnMut(Node<'t>)) {
    visit(node);
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        walk(child, visit);
    }
}

fn contains_jsx(node: Node<'_>) -> bool {
    let mut found = false;
    walk(node, &mut |n| {
        if n.kind().starts_with("jsx_") {
            found = true;
        }
    });
    found
}

fn lower_item(node: Node<'_>, source: &[u8], export: Option<ExportForm>) -> Option<TopLevelItem> {
    let span = span_of(node, source);
    let kind = match node.kind() {
        "comment" | "hash_bang_line" | "empty_statement" => return None,
        "expression_statement" if is_directive(node) => return None,
        "import_statement" => lower_import(node, source),
        "export_statement" => return Some(lower_export(node, source)),
        "function_declaration" | "generator_function_declaration" => ItemKind::Function {
            name: field_text(node, "name", source),
            contains_jsx: contains_jsx(node),
        },
        "class_declaration" => ItemKind::Class {
            name: field_text(node, "name", source),
        },
        "lexical_declaration" | "variable_declaration" => lower_declaration(node, source),
        _ => ItemKind::Statement,
    };

    Some(TopLevelItem { kind, export, span })
}

/// `"use strict";` and friends
fn is_directive(node: Node<'_>) -> bool {
    node.named_child_count() == 1 && node.named_child(0).is_some_and(|c| c.kind() == "string")
}

fn lower_import(node: Node<'_>, source: &[u8]) -> ItemKind {
    let module = field_text(node, "source", source)
        .map(|s| unquote(&s))
        .unwrap_or_default();

    let mut bindings = Vec::new();
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if child.kind() == "import_clause" {
            walk(child, &mut |n| {
                if n.kind() == "identifier" {
                    bindings.push(text_of(n, source).to_string());
                }
            });
        }
    }

    ItemKind::Import {
        source: module,
        bindings,
    }
}

fn lower_export(node: Node<'_>, source: &[u8]) -> TopLevelItem {
    let span = span_of(node, source);

    let mut is_default = false;
    let mut is_star = false;
    let mut clause = None;
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "default" if !child.is_named() => is_default = true,
            "*" if !child.is_named() => is_star = true,
            "namespace_export" => is_star = true,
            "export_clause" => clause = Some(child),
            _ => {}
        }
    }
    let form = if is_default {
        ExportForm::Default
    } else {
        ExportForm::Named
    };

    if let Some(declaration) = node.child_by_field_name("declaration") {
        if let Some(mut item) = lower_item(declaration, source, Some(form)) {
            item.span = span;
            return item;
        }
    }

    if let Some(value) = node.child_by_field_name("value") {
        return TopLevelItem {
            kind: ItemKind::DefaultExpression {
                value: value_shape(value, source),
            },
            export: Some(ExportForm::Default),
            span,
        };
    }

    let from = field_text(node, "source", source).map(|s| unquote(&s));
    let mut names = Vec::new();
    if let Some(clause) = clause {
        let mut clause_cursor = clause.walk();
        for specifier in clause.named_children(&mut clause_cursor) {
            if specifier.kind() != "export_specifier" {
                continue;
            }
            let Some(local) = field_text(specifier, "name", source) else {
                continue;
            };
            let exported = field_text(specifier, "alias", source).unwrap_or_else(|| local.clone());
            names.push(ExportSpecifier {
                local: unquote(&local),
                exported: unquote(&exported),
            });
        }
    }

    TopLevelItem {
        kind: ItemKind::ExportList {
            names,
            from,
            star: is_star,
        },
        export: Some(ExportForm::Named),
        span,
    }
}

fn declaration_kind(node: Node<'_>) -> DeclKind {
    if node.kind() == "variable_declaration" {
        return DeclKind::Var;
    }
    match node.child(0).map(|c| c.kind()) {
        Some("let") => DeclKind::Let,
        _ => DeclKind::Const,
    }
}

fn lower_declaration(node: Node<'_>, source: &[u8]) -> ItemKind {
    let kind = declaration_kind(node);
    let mut declarators = Vec::new();

    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if child.kind() != "variable_declarator" {
            continue;
        }
        let name = child
            .child_by_field_name("name")
            .filter(|n| n.kind() == "identifier")
            .map(|n| text_of(n, source).to_string());
        let value = child
            .child_by_field_name("value")
            .map(|v| value_shape(v, source));
        declarators.push(Declarator {
            name,
            value,
            span: span_of(child, source),
        });
    }

    ItemKind::Declaration { kind, declarators }
}

/// Innermost callee of a (possibly curried) call: `connect(a)(B)` -> `connect`
fn callee_name(node: Node<'_>, source: &[u8]) -> (String, bool) {
    let mut function = node.child_by_field_name("function");
    let mut curried = false;
    while let Some(f) = function {
        if f.kind() == "call_expression" {
            curried = true;
            function = f.child_by_field_name("function");
        } else {
            return (text_of(f, source).to_string(), curried);
        }
    }
    (String::new(), curried)
}

fn value_shape(node: Node<'_>, source: &[u8]) -> ValueShape {
    match node.kind() {
        "arrow_function" => ValueShape::Arrow {
            contains_jsx: contains_jsx(node),
        },
        "function" | "function_expression" | "generator_function" | "function_declaration"
        | "generator_function_declaration" => ValueShape::Function {
            name: field_text(node, "name", source),
            contains_jsx: contains_jsx(node),
        },
        "class" | "class_declaration" => ValueShape::Class {
            name: field_text(node, "name", source),
        },
        "call_expression" => {
            let (callee, curried) = callee_name(node, source);
            ValueShape::Call { callee, curried }
        }
        "string" => ValueShape::String(unquote(text_of(node, source))),
        "identifier" => ValueShape::Identifier(text_of(node, source).to_string()),
        "object" => ValueShape::Object,
        "parenthesized_expression" => {
            let mut cursor = node.walk();
            let inner = node
                .named_children(&mut cursor)
                .find(|c| c.kind() != "comment");
            match inner {
                Some(inner) => value_shape(inner, source),
                None => ValueShape::Other,
            }
        }
        _ => ValueShape::Other,
    }
}

fn collect_pattern_names(node: Node<'_>, source: &[u8], out: &mut Vec<String>) {
    match node.kind() {
        "identifier" | "shorthand_property_identifier_pattern" => {
            out.push(text_of(node, source).to_string())
        }
        // `{ key: target }` and `target = default` only bind their target side
        "pair_pattern" | "assignment_pattern" | "object_assignment_pattern" => {
            let target = node
                .child_by_field_name("value")
                .or_else(|| node.child_by_field_name("left"));
            if let Some(target) = target {
                collect_pattern_names(target, source, out);
            }
        }
        "member_expression" | "subscript_expression" => {}
        _ => {
            let mut cursor = node.walk();
            for child in node.named_children(&mut cursor) {
                collect_pattern_names(child, source, out);
            }
        }
    }
}

fn collect_tree_facts(root: Node<'_>, source: &[u8], module: &mut SourceModule) {
    walk(root, &mut |node| match node.kind() {
        "variable_declaration" => module.var_sites.push(span_of(node, source)),
        "lexical_declaration" if declaration_kind(node) == DeclKind::Let => {
            let mut cursor = node.walk();
            for declarator in node.named_children(&mut cursor) {
                if declarator.kind() != "variable_declarator" {
                    continue;
                }
                if let Some(name) = declarator
                    .child_by_field_name("name")
                    .filter(|n| n.kind() == "identifier")
                {
                    module.let_bindings.push(LetBinding {
                        name: text_of(name, source).to_string(),
                        span: span_of(declarator, source),
                        initialized: declarator.child_by_field_name("value").is_some(),
                    });
                }
            }
        }
        "assignment_expression" | "augmented_assignment_expression" => {
            if let Some(left) = node.child_by_field_name("left") {
                let mut names = Vec::new();
                collect_pattern_names(left, source, &mut names);
                module.reassigned.extend(names);
            }
        }
        "update_expression" => {
            if let Some(argument) = node.child_by_field_name("argument") {
                if argument.kind() == "identifier" {
                    module
                        .reassigned
                        .insert(text_of(argument, source).to_string());
                }
            }
        }
        "for_in_statement" => {
            // `for (x of xs)` without a declaration keyword assigns to `x`
            if node.child_by_field_name("kind").is_none() {
                if let Some(left) = node.child_by_field_name("left") {
                    let mut names = Vec::new();
                    collect_pattern_names(left, source, &mut names);
                    module.reassigned.extend(names);
                }
            }
        }
        kind if kind.starts_with("jsx_") && module.first_jsx.is_none() => {
            module.first_jsx = Some(span_of(node, source))
        }
        _ => {}
    });
}
