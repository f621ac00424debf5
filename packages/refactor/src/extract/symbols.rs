//! Symbol resolution
//!
//! The extraction engine asks a [`SymbolResolver`] what a top-level reference
//! denotes. Only typed members of the enclosing component become inputs of the
//! extracted component; everything declared inside the fragment itself stays
//! local to it.

use indexmap::{IndexMap, IndexSet};
use oxc_allocator::Allocator;
use oxc_ast::ast::{
    BindingPatternKind, Class, ClassElement, Declaration, ExportDefaultDeclarationKind, Expression,
    MethodDefinitionKind, PropertyKey, Statement,
};
use oxc_parser::Parser;
use oxc_span::{GetSpan, SourceType, Span};
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::template_ast::{NodeId, NodeKind, Template};

/// Wildcard type reported by type inference for "anything"
const WILDCARD_TYPE: &str = "*";
const ANY_TYPE: &str = "any";

/// What the resolver gets to see of a reference expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceInfo {
    pub name: String,
    /// Source text of the receiver (`user` in `user.name`)
    pub qualifier: Option<String>,
    pub text: String,
}

impl ReferenceInfo {
    pub fn from_node(template: &Template, reference: NodeId) -> Option<Self> {
        let name = template.reference_name(reference)?.to_string();
        let qualifier = template
            .qualifier(reference)
            .map(|qualifier| template.text(qualifier).to_string());
        Some(ReferenceInfo {
            name,
            qualifier,
            text: template.text(reference).to_string(),
        })
    }

    /// Unqualified, or qualified by `this`
    pub fn is_component_member(&self) -> bool {
        matches!(self.qualifier.as_deref(), None | Some("this"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Symbol {
    /// A field of the enclosing component class
    Field { name: String, ty: Option<String> },
    /// A template variable or local reference
    Local { name: String },
    /// Anything else: methods, globals, members of other objects
    Other { name: String },
}

pub trait SymbolResolver {
    fn resolve_identifier(&self, reference: &ReferenceInfo) -> Option<Symbol>;

    /// Best-effort type of an unresolved reference
    fn infer_expression_type(&self, reference: &ReferenceInfo) -> Option<String>;
}

/// Resolver that knows nothing: every reference is unresolved and untyped
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSymbols;

impl SymbolResolver for NoSymbols {
    fn resolve_identifier(&self, _reference: &ReferenceInfo) -> Option<Symbol> {
        None
    }

    fn infer_expression_type(&self, _reference: &ReferenceInfo) -> Option<String> {
        None
    }
}

/// `*` is how inference spells "unknown"; the generated code says `any`
pub fn normalize_type(ty: String) -> String {
    if ty == WILDCARD_TYPE {
        ANY_TYPE.to_string()
    } else {
        ty
    }
}

/// Symbols of the enclosing component
///
/// ```json
/// { "fields": { "user": "User", "count": "number" }, "locals": { "item": "*" } }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SymbolTable {
    /// Component fields, name to declared type
    pub fields: IndexMap<String, Option<String>>,
    /// Inferred types of names the component does not declare
    pub locals: IndexMap<String, String>,
    /// Component methods; they resolve but never become inputs
    pub methods: IndexSet<String>,
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable::default()
    }

    pub fn with_field(mut self, name: &str, ty: Option<&str>) -> Self {
        self.fields.insert(name.to_string(), ty.map(str::to_string));
        self
    }

    pub fn with_method(mut self, name: &str) -> Self {
        self.methods.insert(name.to_string());
        self
    }

    pub fn with_local(mut self, name: &str, ty: &str) -> Self {
        self.locals.insert(name.to_string(), ty.to_string());
        self
    }

    pub fn from_json(json: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Collect the instance members of the first class declared in a
    /// TypeScript component file.
    ///
    /// Properties, accessors and constructor parameter properties become
    /// fields; methods are recorded so that they resolve without becoming
    /// inputs. Static members are not visible to the template.
    pub fn from_component_source(source: &str) -> Self {
        let mut table = SymbolTable::new();
        let allocator = Allocator::default();
        let source_type = SourceType::default().with_typescript(true).with_module(true);
        let ret = Parser::new(&allocator, source, source_type).parse();
        if !ret.errors.is_empty() {
            warn!(errors = ret.errors.len(), "component source has syntax errors");
        }
        let Some(class) = ret.program.body.iter().find_map(class_of_statement) else {
            return table;
        };

        for element in &class.body.body {
            match element {
                ClassElement::PropertyDefinition(prop) if !prop.r#static => {
                    let Some(name) = member_name(&prop.key) else {
                        continue;
                    };
                    let ty = prop
                        .type_annotation
                        .as_ref()
                        .map(|annotation| span_text(source, annotation.type_annotation.span()))
                        .or_else(|| prop.value.as_ref().and_then(|value| initializer_type(source, value)));
                    table.add_field(name, ty);
                }
                ClassElement::MethodDefinition(method) if !method.r#static => match method.kind {
                    MethodDefinitionKind::Constructor => {
                        for param in &method.value.params.items {
                            if param.accessibility.is_none() && !param.readonly {
                                continue;
                            }
                            if let BindingPatternKind::BindingIdentifier(id) = &param.pattern.kind {
                                let ty = param
                                    .pattern
                                    .type_annotation
                                    .as_ref()
                                    .map(|annotation| span_text(source, annotation.type_annotation.span()));
                                table.add_field(id.name.as_str(), ty);
                            }
                        }
                    }
                    MethodDefinitionKind::Get => {
                        let Some(name) = member_name(&method.key) else {
                            continue;
                        };
                        let ty = method
                            .value
                            .return_type
                            .as_ref()
                            .map(|annotation| span_text(source, annotation.type_annotation.span()));
                        table.add_field(name, ty);
                    }
                    MethodDefinitionKind::Set => {
                        let Some(name) = member_name(&method.key) else {
                            continue;
                        };
                        let ty = method.value.params.items.first().and_then(|param| {
                            param
                                .pattern
                                .type_annotation
                                .as_ref()
                                .map(|annotation| span_text(source, annotation.type_annotation.span()))
                        });
                        table.add_field(name, ty);
                    }
                    MethodDefinitionKind::Method => {
                        if let Some(name) = member_name(&method.key) {
                            table.methods.insert(name.to_string());
                        }
                    }
                },
                _ => {}
            }
        }
        table
    }

    /// First declaration of a name wins; a later accessor may still fill in
    /// a missing type
    fn add_field(&mut self, name: &str, ty: Option<String>) {
        trace!(field = name, ty = ?ty, "component member");
        let entry = self.fields.entry(name.to_string()).or_insert(None);
        if entry.is_none() {
            *entry = ty;
        }
    }
}

fn class_of_statement<'s, 'a>(statement: &'s Statement<'a>) -> Option<&'s Class<'a>> {
    match statement {
        Statement::ClassDeclaration(class) => Some(&**class),
        Statement::ExportNamedDeclaration(export) => match &export.declaration {
            Some(Declaration::ClassDeclaration(class)) => Some(&**class),
            _ => None,
        },
        Statement::ExportDefaultDeclaration(export) => match &export.declaration {
            ExportDefaultDeclarationKind::ClassDeclaration(class) => Some(&**class),
            _ => None,
        },
        _ => None,
    }
}

/// Plain identifier keys only; `#private` and computed members are not
/// reachable from a template
fn member_name<'s>(key: &'s PropertyKey<'_>) -> Option<&'s str> {
    match key {
        PropertyKey::StaticIdentifier(id) => Some(id.name.as_str()),
        _ => None,
    }
}

fn span_text(source: &str, span: Span) -> String {
    source[span.start as usize..span.end as usize].trim().to_string()
}

/// Type of a simple initializer expression
fn initializer_type(source: &str, value: &Expression<'_>) -> Option<String> {
    let ty = match value {
        Expression::StringLiteral(_) | Expression::TemplateLiteral(_) => "string".to_string(),
        Expression::BooleanLiteral(_) => "boolean".to_string(),
        Expression::NumericLiteral(_) => "number".to_string(),
        Expression::UnaryExpression(unary) if matches!(unary.argument, Expression::NumericLiteral(_)) => {
            let text = span_text(source, unary.span);
            if !text.starts_with(['-', '+']) {
                return None;
            }
            "number".to_string()
        }
        Expression::ArrayExpression(_) => "any[]".to_string(),
        Expression::NewExpression(construct) => {
            // Callee plus any type arguments, up to the argument list
            let text = &source[construct.callee.span().start as usize..construct.span.end as usize];
            let end = text.find('(').unwrap_or(text.len());
            text[..end].trim().to_string()
        }
        _ => return None,
    };
    Some(ty)
}

impl SymbolResolver for SymbolTable {
    fn resolve_identifier(&self, reference: &ReferenceInfo) -> Option<Symbol> {
        if !reference.is_component_member() {
            return None;
        }
        if let Some(ty) = self.fields.get(&reference.name) {
            return Some(Symbol::Field {
                name: reference.name.clone(),
                ty: ty.clone(),
            });
        }
        self.methods.contains(&reference.name).then(|| Symbol::Other {
            name: reference.name.clone(),
        })
    }

    fn infer_expression_type(&self, reference: &ReferenceInfo) -> Option<String> {
        self.locals.get(&reference.name).cloned()
    }
}

/// Names declared inside the fragment, consulted before the host resolver
pub struct FragmentScope<'r> {
    locals: IndexSet<String>,
    host: &'r dyn SymbolResolver,
}

impl<'r> FragmentScope<'r> {
    pub fn new(template: &Template, roots: &[NodeId], host: &'r dyn SymbolResolver) -> Self {
        let mut locals = IndexSet::new();
        for &root in roots {
            for node in std::iter::once(root).chain(template.descendants(root)) {
                match template.kind(node) {
                    NodeKind::LocalDeclaration { name } | NodeKind::TemplateVariable { name } => {
                        locals.insert(name.clone());
                    }
                    _ => {}
                }
            }
        }
        FragmentScope { locals, host }
    }

    pub fn locals(&self) -> &IndexSet<String> {
        &self.locals
    }
}

impl SymbolResolver for FragmentScope<'_> {
    fn resolve_identifier(&self, reference: &ReferenceInfo) -> Option<Symbol> {
        if reference.qualifier.is_none() && self.locals.contains(&reference.name) {
            return Some(Symbol::Local {
                name: reference.name.clone(),
            });
        }
        self.host.resolve_identifier(reference)
    }

    fn infer_expression_type(&self, reference: &ReferenceInfo) -> Option<String> {
        self.host.infer_expression_type(reference)
    }
}
