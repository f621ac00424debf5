#![deny(clippy::all)]

/**
 * Angular Template Refactorings
 *
 * Extract Component for Angular templates: parses a component template,
 * maps a selection to a fragment and plans the new component.
 */

#[cfg(feature = "napi-bindings")]
use napi::bindgen_prelude::*;
#[cfg(feature = "napi-bindings")]
use napi_derive::napi;

pub mod chars;
mod config;
mod error;
pub mod parse_util;

// Parser modules
pub mod expression_parser;
pub mod ml_parser;
pub mod template_ast;

// Refactorings
pub mod extract;

// Re-exports
pub use config::ExtractConfig;
pub use error::{ExtractError, Result};
pub use extract::{extract_component, extract_selection, ExtractionPlan, SymbolResolver, SymbolTable};

/// Options of a Node.js extraction request
#[cfg(feature = "napi-bindings")]
#[napi(object)]
pub struct ExtractRequest {
    /// Template source
    pub template: String,
    pub start: u32,
    pub end: u32,
    /// Component name in upper camel case
    pub name: String,
    /// Symbol table as JSON (`{ "fields": { "user": "User" } }`)
    pub symbols: Option<String>,
    /// `ExtractConfig` as JSON
    pub config: Option<String>,
}

/// Plan an extraction and return it as JSON
#[cfg(feature = "napi-bindings")]
#[napi]
pub fn extract_component_plan(request: ExtractRequest) -> napi::Result<String> {
    let to_napi = |error: ExtractError| Error::new(Status::InvalidArg, error.to_string());

    let symbols = match request.symbols.as_deref() {
        Some(json) => SymbolTable::from_json(json).map_err(to_napi)?,
        None => SymbolTable::default(),
    };
    let config = match request.config.as_deref() {
        Some(json) => serde_json::from_str(json)
            .map_err(|error| Error::new(Status::InvalidArg, error.to_string()))?,
        None => ExtractConfig::default(),
    };

    let plan = extract_selection(
        &request.template,
        "template.html",
        request.start as usize,
        request.end as usize,
        &request.name,
        &symbols,
        &config,
    )
    .map_err(to_napi)?;

    serde_json::to_string(&plan).map_err(|error| Error::new(Status::GenericFailure, error.to_string()))
}
