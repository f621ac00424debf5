//! Bindings of a template fragment
//!
//! A [`Binding`] is one bound expression (property binding, interpolation,
//! template binding or banana-box binding) together with the input fields the
//! extracted component needs to evaluate it.

use std::hash::{Hash, Hasher};

use indexmap::IndexSet;
use serde::Serialize;
use tracing::debug;

use super::reference_classifier::{find_top_level_calls, find_top_level_references};
use super::symbols::{normalize_type, ReferenceInfo, Symbol, SymbolResolver};
use crate::error::{ExtractError, Result};
use crate::template_ast::{NodeId, NodeKind, Template};

/// An input of the extracted component.
///
/// Fields are identified by name alone: a set keeps the first field inserted
/// under a name, whatever its type or body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputField {
    pub field_name: String,
    pub field_type: Option<String>,
    /// Expression passed to the input at the invocation site
    pub original_body: String,
    pub is_two_way: bool,
}

impl InputField {
    pub fn new(
        field_name: impl Into<String>,
        field_type: Option<String>,
        original_body: impl Into<String>,
        is_two_way: bool,
    ) -> Self {
        InputField {
            field_name: field_name.into(),
            field_type,
            original_body: original_body.into(),
            is_two_way,
        }
    }
}

impl PartialEq for InputField {
    fn eq(&self, other: &Self) -> bool {
        self.field_name == other.field_name
    }
}

impl Eq for InputField {}

impl Hash for InputField {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.field_name.hash(state);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    OneWay,
    /// `[(property)]="field"`; `banana_box` is the attribute node
    TwoWay { banana_box: NodeId },
}

/// One bound expression of the fragment.
///
/// Identity is the expression node: the same source occurrence visited twice
/// is one binding, identical text at two places is two.
#[derive(Debug, Clone)]
pub struct Binding {
    owner: NodeId,
    kind: BindingKind,
    reference_expressions: Vec<NodeId>,
    call_expressions: Vec<NodeId>,
    input_fields: IndexSet<InputField>,
}

impl Binding {
    /// One-way binding of the expression rooted at `owner`
    pub fn new(template: &Template, owner: NodeId, resolver: &dyn SymbolResolver) -> Self {
        Binding::build(template, owner, BindingKind::OneWay, resolver)
    }

    /// Two-way binding of a `BananaBox` attribute; `None` when it has no value
    pub fn two_way(template: &Template, banana_box: NodeId, resolver: &dyn SymbolResolver) -> Option<Self> {
        let owner = template
            .children(banana_box)
            .iter()
            .copied()
            .find(|&child| matches!(template.kind(child), NodeKind::Binding))?;
        Some(Binding::build(
            template,
            owner,
            BindingKind::TwoWay { banana_box },
            resolver,
        ))
    }

    fn build(template: &Template, owner: NodeId, kind: BindingKind, resolver: &dyn SymbolResolver) -> Self {
        let is_two_way = matches!(kind, BindingKind::TwoWay { .. });
        let call_expressions = find_top_level_calls(template, owner);
        let reference_expressions = find_top_level_references(template, owner);

        let reference_fields = reference_expressions
            .iter()
            .filter_map(|&reference| reference_input_field(template, reference, is_two_way, resolver));
        let call_fields = call_expressions
            .iter()
            .filter_map(|&call| call_input_field(template, call));
        let input_fields: IndexSet<InputField> = reference_fields.chain(call_fields).collect();

        debug!(
            binding = template.text(owner),
            two_way = is_two_way,
            fields = ?input_fields.iter().map(|field| field.field_name.as_str()).collect::<Vec<_>>(),
            "binding"
        );

        Binding {
            owner,
            kind,
            reference_expressions,
            call_expressions,
            input_fields,
        }
    }

    pub fn owner(&self) -> NodeId {
        self.owner
    }

    pub fn kind(&self) -> BindingKind {
        self.kind
    }

    pub fn is_two_way_binding(&self) -> bool {
        matches!(self.kind, BindingKind::TwoWay { .. })
    }

    pub fn banana_box(&self) -> Option<NodeId> {
        match self.kind {
            BindingKind::TwoWay { banana_box } => Some(banana_box),
            BindingKind::OneWay => None,
        }
    }

    pub fn reference_expressions(&self) -> &[NodeId] {
        &self.reference_expressions
    }

    pub fn call_expressions(&self) -> &[NodeId] {
        &self.call_expressions
    }

    pub fn input_fields(&self) -> &IndexSet<InputField> {
        &self.input_fields
    }

    /// The field a two-way binding exposes
    pub fn input_field(&self, template: &Template) -> Result<&InputField> {
        self.input_fields
            .first()
            .ok_or_else(|| ExtractError::TwoWayBindingWithoutField {
                binding: template.text(self.owner).to_string(),
            })
    }
}

impl PartialEq for Binding {
    fn eq(&self, other: &Self) -> bool {
        self.owner == other.owner
    }
}

impl Eq for Binding {}

impl Hash for Binding {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.owner.hash(state);
    }
}

fn reference_input_field(
    template: &Template,
    reference: NodeId,
    is_two_way: bool,
    resolver: &dyn SymbolResolver,
) -> Option<InputField> {
    let info = ReferenceInfo::from_node(template, reference)?;
    match resolver.resolve_identifier(&info) {
        Some(Symbol::Field { name, ty }) => Some(InputField::new(name, ty, info.text, is_two_way)),
        Some(Symbol::Local { .. }) | Some(Symbol::Other { .. }) => None,
        // Unresolved but unqualified: a template variable of the host
        None if info.qualifier.is_none() => {
            let ty = resolver.infer_expression_type(&info).map(normalize_type);
            Some(InputField::new(info.name, ty, info.text, is_two_way))
        }
        None => None,
    }
}

/// Return types of calls are not inferred
fn call_input_field(template: &Template, call: NodeId) -> Option<InputField> {
    let name = template.callee_name(call)?;
    Some(InputField::new(name, None, template.text(call), false))
}
