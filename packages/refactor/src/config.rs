use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::Result;

/// Knobs for the generated component files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExtractConfig {
    /// Prefix of the generated selector (`app` gives `app-foo`)
    pub selector_prefix: String,
    /// Indentation unit of the generated class body
    pub indent: String,
    pub template_file_suffix: String,
    pub class_file_suffix: String,
    /// Emitter type for two-way fields whose type could not be resolved
    pub unknown_type: String,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        ExtractConfig {
            selector_prefix: "app".to_string(),
            indent: "  ".to_string(),
            template_file_suffix: ".component.html".to_string(),
            class_file_suffix: ".component.ts".to_string(),
            unknown_type: "any".to_string(),
        }
    }
}

impl ExtractConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: ExtractConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// `app-foo-bar` for kebab name `foo-bar`
    pub fn selector(&self, kebab: &str) -> String {
        if self.selector_prefix.is_empty() {
            kebab.to_string()
        } else {
            format!("{}-{}", self.selector_prefix, kebab)
        }
    }

    pub fn template_file_name(&self, kebab: &str) -> String {
        format!("{}{}", kebab, self.template_file_suffix)
    }

    pub fn class_file_name(&self, kebab: &str) -> String {
        format!("{}{}", kebab, self.class_file_suffix)
    }
}
