//! Prompt templates: plain text files with `{name}` placeholders, one per
//! stage, loaded once at startup. A missing file or a template missing one
//! of its required placeholders is a fatal configuration error.

use std::fs;
use std::path::Path;

use tracing::debug;

use tablerag_core::errors::{PipelineError, TableRagResult};

/// One loaded template with its required placeholders verified.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    name: String,
    text: String,
}

impl PromptTemplate {
    /// Substitute `{name}` placeholders. Values are spliced verbatim;
    /// callers serialize structured data before rendering.
    pub fn render(&self, vars: &[(&str, &str)]) -> String {
        let mut out = self.text.clone();
        for (name, value) in vars {
            out = out.replace(&format!("{{{name}}}"), value);
        }
        out
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// The five stage templates, loaded from a prompts directory.
#[derive(Debug, Clone)]
pub struct PromptLibrary {
    pub query_expansion: PromptTemplate,
    pub sql_generation: PromptTemplate,
    pub query_classification: PromptTemplate,
    pub query_healing: PromptTemplate,
    pub explain_result: PromptTemplate,
}

impl PromptLibrary {
    /// Load and verify every template. Startup-fatal on the first problem.
    pub fn load(dir: impl AsRef<Path>) -> TableRagResult<Self> {
        let dir = dir.as_ref();
        let library = Self {
            query_expansion: load_template(dir, "query_expansion", &["schema", "user_query"])?,
            sql_generation: load_template(
                dir,
                "sql_generation",
                &["schema", "user_query", "columns", "cell_values"],
            )?,
            query_classification: load_template(dir, "query_classification", &["input_text"])?,
            query_healing: load_template(
                dir,
                "query_healing",
                &["original_query", "error_message", "schema"],
            )?,
            explain_result: load_template(dir, "explain_result", &["query", "result"])?,
        };
        debug!(dir = %dir.display(), "prompt library loaded");
        Ok(library)
    }
}

fn load_template(
    dir: &Path,
    name: &str,
    required: &[&str],
) -> TableRagResult<PromptTemplate> {
    let path = dir.join(format!("{name}.prompt"));
    let text = fs::read_to_string(&path).map_err(|_| PipelineError::MissingTemplate {
        name: name.to_string(),
        path: path.display().to_string(),
    })?;

    for placeholder in required {
        if !text.contains(&format!("{{{placeholder}}}")) {
            return Err(PipelineError::MissingPlaceholder {
                name: name.to_string(),
                placeholder: placeholder.to_string(),
            }
            .into());
        }
    }

    Ok(PromptTemplate {
        name: name.to_string(),
        text,
    })
}
