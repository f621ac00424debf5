/**
 * Extract Component
 *
 * Moves a fragment of a component template into a new component: finds the
 * expressions the fragment reads from its host, exposes them as inputs and
 * outputs, and renders the invocation tag, class and template of the new
 * component.
 */
pub mod binding;
pub mod event;
pub mod fragment_scanner;
pub mod naming;
pub mod plan;
pub mod reference_classifier;
pub mod selection;
pub mod symbols;
pub mod synthesizer;

pub use binding::{Binding, BindingKind, InputField};
pub use event::Event;
pub use fragment_scanner::{FragmentScanner, ScanResult, TemplateVisitor};
pub use plan::{ExtractionPlan, TextEdit};
pub use selection::select_fragment;
pub use symbols::{FragmentScope, NoSymbols, ReferenceInfo, Symbol, SymbolResolver, SymbolTable};
pub use synthesizer::ComponentSynthesizer;

use tracing::{info, warn};

use crate::config::ExtractConfig;
use crate::error::{ExtractError, Result};
use crate::ml_parser::HtmlParser;
use crate::parse_util::ParseErrorLevel;
use crate::template_ast::{NodeId, Template};

/// Number of source characters quoted around a parse error
const ERROR_CONTEXT_CHARS: usize = 20;

/// Parse `source`, map the selection `start..end` to a fragment and extract it.
///
/// Parse errors elsewhere in the template are logged and tolerated; errors
/// inside the fragment abort the extraction.
pub fn extract_selection(
    source: &str,
    url: &str,
    start: usize,
    end: usize,
    component_name: &str,
    resolver: &dyn SymbolResolver,
    config: &ExtractConfig,
) -> Result<ExtractionPlan> {
    let parsed = HtmlParser::new().parse(source, url);
    let template = parsed.template;
    let roots = select_fragment(&template, start, end)?;

    let first = template.span(roots[0]).start;
    let last = template.span(roots[roots.len() - 1]).end;
    for error in &parsed.errors {
        let inside = first <= error.span.start && error.span.end <= last;
        if inside && error.level == ParseErrorLevel::Error {
            return Err(ExtractError::Parse {
                message: format!(
                    "{}:{}: {}",
                    url,
                    error.location(source),
                    error.contextual_message(source, ERROR_CONTEXT_CHARS)
                ),
            });
        }
        warn!(url, location = %error.location(source), "{}", error.msg);
    }

    extract_component(&template, &roots, component_name, resolver, config)
}

/// Extract the sibling nodes `roots` into a component named `component_name`.
///
/// Pure: the template is only read, the caller applies the returned plan.
pub fn extract_component(
    template: &Template,
    roots: &[NodeId],
    component_name: &str,
    resolver: &dyn SymbolResolver,
    config: &ExtractConfig,
) -> Result<ExtractionPlan> {
    let component_name = naming::normalize_component_name(component_name)?;
    let kebab_name = naming::to_kebab_case(&component_name);
    let class_name = format!("{}Component", component_name);

    let synthesizer = ComponentSynthesizer::new(template, config);
    let fragment = synthesizer
        .fragment_span(roots)
        .ok_or(ExtractError::EmptySelection)?;

    let ScanResult { bindings, events } = FragmentScanner::scan(template, roots, resolver);
    for (event, name) in synthesizer::shadowed_events(template, &events) {
        warn!(
            event = name,
            handler = template.text(event.action()),
            "handler not forwarded, an earlier handler has the same name"
        );
    }

    let invocation_text = synthesizer.render_invocation_tag(&kebab_name, &bindings, &events);
    let class_text = synthesizer.render_class_body(&class_name, &kebab_name, &bindings, &events);
    let template_text = synthesizer.render_replacement_template(roots, &bindings)?;

    let inputs: Vec<InputField> = synthesizer::rendering_order(&bindings)
        .into_iter()
        .cloned()
        .collect();
    let event_names: Vec<String> = synthesizer::named_events(&events)
        .into_iter()
        .map(|(_, name)| name.to_string())
        .collect();

    info!(
        component = %class_name,
        inputs = inputs.len(),
        events = event_names.len(),
        span = ?fragment,
        "extraction planned"
    );

    Ok(ExtractionPlan {
        selector: config.selector(&kebab_name),
        class_file_name: config.class_file_name(&kebab_name),
        template_file_name: config.template_file_name(&kebab_name),
        edit: TextEdit::replace(fragment, invocation_text.clone()),
        component_name,
        class_name,
        kebab_name,
        invocation_text,
        class_text,
        template_text,
        inputs,
        events: event_names,
    })
}
