/// Pipeline-stage errors. Parse failures are fatal to their stage: a model
/// response lacking the expected fenced block must fail the call rather
/// than degrade to best-effort text scraping.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("query expansion parse failed: {reason}")]
    ExpansionParse { reason: String },

    #[error("SQL generation parse failed: {reason}")]
    GenerationParse { reason: String },

    #[error("dig-deeper parse failed: {reason}")]
    DigDeeperParse { reason: String },

    #[error("result explanation failed: {reason}")]
    ExplainFailed { reason: String },

    #[error("missing prompt template '{name}' at {path}")]
    MissingTemplate { name: String, path: String },

    #[error("prompt template '{name}' is missing required placeholder {{{placeholder}}}")]
    MissingPlaceholder { name: String, placeholder: String },
}
