//! Component Synthesizer
//!
//! Renders the three texts of an extraction from the scanned bindings and
//! events: the tag invoking the new component, its class and its template.
//! The tag and the class iterate [`rendering_order`] so both see the same
//! fields in the same order.

use indexmap::IndexSet;

use super::binding::{Binding, InputField};
use super::event::Event;
use super::plan::TextEdit;
use crate::config::ExtractConfig;
use crate::error::Result;
use crate::template_ast::{NodeId, NodeKind, Span, Template};

/// Input fields with two-way fields first, encounter order otherwise, each
/// name once
pub fn rendering_order(bindings: &IndexSet<Binding>) -> Vec<&InputField> {
    let mut sorted: Vec<&Binding> = bindings.iter().collect();
    // stable
    sorted.sort_by_key(|binding| !binding.is_two_way_binding());
    let fields: IndexSet<&InputField> = sorted
        .into_iter()
        .flat_map(|binding| binding.input_fields().iter())
        .collect();
    fields.into_iter().collect()
}

/// Events that have a name, each name once
pub fn named_events(events: &IndexSet<Event>) -> Vec<(&Event, &str)> {
    let mut seen = IndexSet::new();
    events
        .iter()
        .filter_map(|event| event.event_name().map(|name| (event, name)))
        .filter(|(_, name)| seen.insert(*name))
        .collect()
}

/// Named events left out by [`named_events`] whose handler differs from the
/// one forwarded under the same name
pub fn shadowed_events<'e>(template: &Template, events: &'e IndexSet<Event>) -> Vec<(&'e Event, &'e str)> {
    let forwarded = named_events(events);
    events
        .iter()
        .filter_map(|event| event.event_name().map(|name| (event, name)))
        .filter(|(event, name)| {
            forwarded.iter().any(|(kept, kept_name)| {
                kept_name == name
                    && kept.action() != event.action()
                    && template.text(kept.action()) != template.text(event.action())
            })
        })
        .collect()
}

pub struct ComponentSynthesizer<'a> {
    template: &'a Template,
    config: &'a ExtractConfig,
}

impl<'a> ComponentSynthesizer<'a> {
    pub fn new(template: &'a Template, config: &'a ExtractConfig) -> Self {
        ComponentSynthesizer { template, config }
    }

    /// `<app-foo [(a)]="a" [b]="b" (save)="save()"></app-foo>`
    pub fn render_invocation_tag(&self, kebab: &str, bindings: &IndexSet<Binding>, events: &IndexSet<Event>) -> String {
        let selector = self.config.selector(kebab);
        let mut html = format!("<{}", selector);
        for field in rendering_order(bindings) {
            let name = if field.is_two_way {
                format!("[({})]", field.field_name)
            } else {
                format!("[{}]", field.field_name)
            };
            html.push_str(&format!(" {}={}", name, quote_attribute_value(&field.original_body)));
        }
        for (event, name) in named_events(events) {
            let action = self.template.text(event.action());
            html.push_str(&format!(" ({})={}", name, quote_attribute_value(action)));
        }
        html.push_str(&format!("></{}>", selector));
        html
    }

    /// TypeScript source of the new component class
    pub fn render_class_body(
        &self,
        class_name: &str,
        kebab: &str,
        bindings: &IndexSet<Binding>,
        events: &IndexSet<Event>,
    ) -> String {
        let indent = &self.config.indent;
        let named = named_events(events);
        let has_two_way = bindings.iter().any(Binding::is_two_way_binding);

        let mut imports = vec!["Component"];
        if !bindings.is_empty() {
            imports.push("Input");
        }
        if !named.is_empty() || has_two_way {
            imports.push("Output");
            imports.push("EventEmitter");
        }

        let mut ts = String::new();
        ts.push_str(&format!("import {{ {} }} from '@angular/core';\n\n", imports.join(", ")));
        ts.push_str("@Component({\n");
        ts.push_str(&format!("{}selector: '{}',\n", indent, self.config.selector(kebab)));
        ts.push_str(&format!(
            "{}templateUrl: './{}',\n",
            indent,
            self.config.template_file_name(kebab)
        ));
        ts.push_str(&format!("{}styles: []\n", indent));
        ts.push_str("})\n");
        ts.push_str(&format!("export class {} {{\n", class_name));

        for field in rendering_order(bindings) {
            if field.is_two_way {
                let ty = field.field_type.as_deref().unwrap_or(self.config.unknown_type.as_str());
                ts.push_str(&format!(
                    "{}@Output() {}Change = new EventEmitter<{}>();\n",
                    indent, field.field_name, ty
                ));
            }
            ts.push_str(&format!("{}{}\n", indent, input_declaration(field)));
        }

        for (_, name) in named {
            ts.push_str(&format!(
                "{}@Output(\"{}\") {}Event = new EventEmitter<void>();\n",
                indent, name, name
            ));
            ts.push_str(&format!("{}{}() {{\n", indent, name));
            ts.push_str(&format!("{}{}this.{}Event.emit();\n", indent, indent, name));
            ts.push_str(&format!("{}}}\n", indent));
        }

        ts.push_str("}\n");
        ts
    }

    /// Template of the new component: the fragment with extracted calls
    /// replaced by the field holding their value, and a `(propertyChange)`
    /// handler after every banana box forwarding to `fieldChange`.
    pub fn render_replacement_template(&self, roots: &[NodeId], bindings: &IndexSet<Binding>) -> Result<String> {
        let mut edits = Vec::new();
        for binding in bindings {
            for &call in binding.call_expressions() {
                if let Some(name) = self.template.callee_name(call) {
                    edits.push(TextEdit::replace(self.template.span(call), name));
                }
            }
        }
        for binding in bindings {
            let Some(banana_box) = binding.banana_box() else {
                continue;
            };
            let field = binding.input_field(self.template)?;
            let property = match self.template.kind(banana_box) {
                NodeKind::BananaBox { property } => property.as_str(),
                _ => continue,
            };
            edits.push(TextEdit::insert(
                self.template.span(banana_box).end,
                format!(" ({}Change)=\"{}Change.emit($event)\"", property, field.field_name),
            ));
        }

        let source = self.template.source();
        Ok(roots
            .iter()
            .map(|&root| TextEdit::apply_all(source, self.template.span(root), &edits))
            .collect())
    }

    /// Span from the first root's start to the last root's end
    pub fn fragment_span(&self, roots: &[NodeId]) -> Option<Span> {
        let first = roots.first()?;
        let last = roots.last()?;
        Some(Span::new(
            self.template.span(*first).start,
            self.template.span(*last).end,
        ))
    }
}

fn input_declaration(field: &InputField) -> String {
    match &field.field_type {
        Some(ty) => format!("@Input() {}: {};", field.field_name, ty),
        None => format!("@Input() {};", field.field_name),
    }
}

/// Double quotes unless the value contains one
fn quote_attribute_value(value: &str) -> String {
    if value.contains('"') {
        format!("'{}'", value)
    } else {
        format!("\"{}\"", value)
    }
}
