//! [`TableRag`]: one pipeline session over one store.
//!
//! Construction takes the schema snapshot and builds the cell index; both
//! are immutable for the session's lifetime (reopen a session to refresh
//! them). The engine exposes the stage operations individually and an
//! [`TableRag::answer`] orchestration running the full reference protocol.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, warn};

use tablerag_core::config::TableRagConfig;
use tablerag_core::errors::TableRagResult;
use tablerag_core::models::{
    ChatMessage, ConversationLog, ExecutionResult, ExpansionHint, RelevantCells, Schema,
};
use tablerag_core::traits::Completion;
use tablerag_store::{ddl, CellIndex, SchemaIntrospector};

use crate::classify::QueryClassifier;
use crate::deeper::DigDeeper;
use crate::executor::QueryExecutor;
use crate::expansion::QueryExpander;
use crate::explain::ResultExplainer;
use crate::generation::SqlGenerator;
use crate::healing::QueryHealer;
use crate::prompts::PromptLibrary;
use crate::report::render_table;

/// One drill-down round of the orchestrated flow.
#[derive(Debug, Clone)]
pub struct FollowupRound {
    pub sql: String,
    pub result: ExecutionResult,
    pub explanation: Option<String>,
}

/// The orchestrated flow's output: the primary answer plus any drill-down
/// rounds that completed.
#[derive(Debug, Clone)]
pub struct Answer {
    pub sql: String,
    pub result: ExecutionResult,
    pub explanation: Option<String>,
    pub followups: Vec<FollowupRound>,
}

/// The pipeline engine. Owns the session's immutable snapshots (schema,
/// rendered DDL, cell index), the prompt library, the completion client,
/// and the append-only conversation log.
pub struct TableRag {
    config: TableRagConfig,
    db_path: PathBuf,
    schema: Schema,
    schema_ddl: String,
    cells: CellIndex,
    prompts: PromptLibrary,
    completion: Arc<dyn Completion>,
    log: ConversationLog,
}

impl std::fmt::Debug for TableRag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableRag")
            .field("config", &self.config)
            .field("db_path", &self.db_path)
            .field("schema", &self.schema)
            .field("schema_ddl", &self.schema_ddl)
            .field("cells", &self.cells)
            .field("prompts", &self.prompts)
            .field("completion", &"<dyn Completion>")
            .field("log", &self.log)
            .finish()
    }
}

impl TableRag {
    /// Open a session: introspect the schema (store unreachable degrades
    /// to an empty schema), build the cell index, load the prompt library
    /// (missing templates are fatal).
    pub fn new(
        db_path: impl AsRef<Path>,
        config: TableRagConfig,
        completion: Arc<dyn Completion>,
    ) -> TableRagResult<Self> {
        let db_path = db_path.as_ref().to_path_buf();
        let prompts = PromptLibrary::load(&config.pipeline.prompts_dir)?;

        let introspector = SchemaIntrospector::new(&db_path, config.pipeline.max_sample_length);
        let schema = introspector.retrieve();
        let schema_ddl = ddl::render_as_ddl(&schema);
        let cells = CellIndex::build(&db_path, &schema, config.pipeline.cell_encoding_budget);

        info!(
            db = %db_path.display(),
            tables = schema.tables.len(),
            "pipeline session opened"
        );

        Ok(Self {
            config,
            db_path,
            schema,
            schema_ddl,
            cells,
            prompts,
            completion,
            log: ConversationLog::new(),
        })
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// The canonical schema text injected into every prompt.
    pub fn schema_ddl(&self) -> &str {
        &self.schema_ddl
    }

    pub fn conversation_log(&self) -> &ConversationLog {
        &self.log
    }

    /// Append an assistant-visible artifact to the conversation log.
    pub fn add_message(&mut self, message: ChatMessage) {
        self.log.push(message);
    }

    /// Expansion → cell lookup → generation. Parse failures at either
    /// completion stage are fatal to this query and surfaced to the
    /// caller; no generation call is made if expansion fails.
    pub async fn generate_sql_query(&self, nl_query: &str) -> TableRagResult<String> {
        let expander = QueryExpander::new(self.completion.as_ref(), &self.prompts.query_expansion);
        let hint = expander.expand(nl_query, &self.schema_ddl).await?;

        let relevant = self.relevant_cells(&hint);

        let generator = SqlGenerator::new(self.completion.as_ref(), &self.prompts.sql_generation);
        generator
            .generate(nl_query, &self.schema_ddl, &hint, &relevant)
            .await
    }

    /// Relevant cells for every indexed table (deliberate over-inclusion;
    /// ordered map so the serialized prompt payload is deterministic).
    fn relevant_cells(&self, hint: &ExpansionHint) -> BTreeMap<String, RelevantCells> {
        let mut relevant = BTreeMap::new();
        for table in self.cells.table_names() {
            relevant.insert(
                table.to_string(),
                self.cells.lookup(table, &hint.columns, &hint.cell_values),
            );
        }
        relevant
    }

    /// Run the self-healing execution loop. Exhaustion yields the sentinel
    /// (no rows, no columns) rather than an error.
    pub async fn execute_sql_query(
        &self,
        nl_query: &str,
        sql: &str,
    ) -> TableRagResult<ExecutionResult> {
        info!(question = %nl_query, "executing generated sql");
        let healer = QueryHealer::new(self.completion.as_ref(), &self.prompts.query_healing);
        let executor = QueryExecutor::new(
            &self.db_path,
            self.config.pipeline.retry_execute,
            &self.schema_ddl,
            healer,
        );
        Ok(executor.run(sql).await)
    }

    /// Explain a result (opaque text) against the original question.
    pub async fn explain_result(
        &self,
        result_text: &str,
        nl_query: &str,
    ) -> TableRagResult<String> {
        let explainer = ResultExplainer::new(self.completion.as_ref(), &self.prompts.explain_result);
        explainer.explain(result_text, nl_query).await
    }

    /// Propose a drill-down query from a prior answer.
    pub async fn dig_deeper(
        &self,
        sql: &str,
        result_text: &str,
        nl_query: &str,
        explanation: &str,
    ) -> TableRagResult<String> {
        let deeper = DigDeeper::new(self.completion.as_ref());
        deeper
            .propose_followup(sql, result_text, nl_query, explanation)
            .await
    }

    /// Classify free text as a natural-language query or not.
    pub async fn is_natural_language_query(&self, input_text: &str) -> TableRagResult<bool> {
        let classifier =
            QueryClassifier::new(self.completion.as_ref(), &self.prompts.query_classification);
        classifier.is_natural_language_query(input_text).await
    }

    /// The full reference protocol: generate → execute → render + log →
    /// explain → drill-down rounds (bounded by `dig_deeper_depth`, each
    /// re-entering the executor/healer loop).
    ///
    /// Expansion/generation failures abort the query and surface. Once the
    /// primary result exists, explanation and drill-down failures are
    /// contained: they end their optional step without unwinding what was
    /// already produced.
    pub async fn answer(&mut self, nl_query: &str) -> TableRagResult<Answer> {
        let sql = self.generate_sql_query(nl_query).await?;
        let result = self.execute_sql_query(nl_query, &sql).await?;

        if result.is_failure() {
            return Ok(Answer {
                sql,
                result,
                explanation: None,
                followups: Vec::new(),
            });
        }

        let table = render_table(&result);
        self.add_message(ChatMessage::assistant(table.clone()));

        let explanation = match self.explain_result(&table, nl_query).await {
            Ok(text) => {
                self.add_message(ChatMessage::assistant(text.clone()));
                Some(text)
            }
            Err(e) => {
                warn!(error = %e, "explanation failed; primary result stands");
                None
            }
        };

        let mut followups = Vec::new();
        let mut prior_sql = sql.clone();
        let mut prior_table = table;
        let mut prior_explanation = explanation.clone().unwrap_or_default();

        for round in 0..self.config.pipeline.dig_deeper_depth {
            let followup_sql = match self
                .dig_deeper(&prior_sql, &prior_table, nl_query, &prior_explanation)
                .await
            {
                Ok(sql) => sql,
                Err(e) => {
                    warn!(round, error = %e, "drill-down proposal failed; stopping rounds");
                    break;
                }
            };

            let followup_result = self.execute_sql_query(nl_query, &followup_sql).await?;
            if followup_result.is_failure() {
                followups.push(FollowupRound {
                    sql: followup_sql,
                    result: followup_result,
                    explanation: None,
                });
                break;
            }

            let followup_table = render_table(&followup_result);
            self.add_message(ChatMessage::assistant(followup_table.clone()));

            let followup_explanation =
                match self.explain_result(&followup_table, nl_query).await {
                    Ok(text) => {
                        self.add_message(ChatMessage::assistant(text.clone()));
                        Some(text)
                    }
                    Err(e) => {
                        warn!(round, error = %e, "drill-down explanation failed");
                        None
                    }
                };

            prior_sql = followup_sql.clone();
            prior_table = followup_table;
            prior_explanation = followup_explanation.clone().unwrap_or_default();
            followups.push(FollowupRound {
                sql: followup_sql,
                result: followup_result,
                explanation: followup_explanation,
            });
        }

        Ok(Answer {
            sql,
            result,
            explanation,
            followups,
        })
    }
}
