//! End-to-end flows through the [`TableRag`] engine with a scripted
//! completion service and a seeded temp-file store.

use std::collections::VecDeque;
use std::fs;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::Connection;
use tablerag_core::config::TableRagConfig;
use tablerag_core::errors::{CompletionError, PipelineError, TableRagError, TableRagResult};
use tablerag_core::models::ChatMessage;
use tablerag_core::traits::Completion;
use tablerag_pipeline::TableRag;
use tempfile::{NamedTempFile, TempDir};

struct ScriptedCompletion {
    responses: Mutex<VecDeque<Result<String, String>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedCompletion {
    fn new(responses: &[&str]) -> Arc<Self> {
        Self::scripted(responses.iter().map(|r| Ok(r.to_string())).collect())
    }

    fn scripted(responses: Vec<Result<String, String>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl Completion for ScriptedCompletion {
    async fn complete(&self, messages: &[ChatMessage]) -> TableRagResult<String> {
        let prompt = messages.last().expect("non-empty messages").content.clone();
        self.prompts.lock().unwrap().push(prompt);
        match self.responses.lock().unwrap().pop_front() {
            Some(Ok(text)) => Ok(text),
            Some(Err(reason)) => Err(CompletionError::RequestFailed { reason }.into()),
            None => panic!("unexpected completion call"),
        }
    }
}

fn seeded_db() -> NamedTempFile {
    let file = NamedTempFile::new().unwrap();
    let conn = Connection::open(file.path()).unwrap();
    conn.execute_batch(
        r#"
        CREATE TABLE departments (
            id INTEGER PRIMARY KEY,
            name TEXT
        );
        CREATE TABLE employees (
            id INTEGER PRIMARY KEY,
            name TEXT,
            department_id INTEGER REFERENCES departments(id)
        );
        INSERT INTO departments VALUES (1, 'Engineering'), (2, 'Sales');
        INSERT INTO employees VALUES
            (1, 'Alice', 1),
            (2, 'Bob', 2),
            (3, 'Carol', 1);
        "#,
    )
    .unwrap();
    file
}

fn prompt_fixture() -> TempDir {
    let dir = TempDir::new().unwrap();
    let files = [
        ("query_expansion", "Expand for schema {schema}: {user_query}"),
        (
            "sql_generation",
            "Schema {schema}, question {user_query}, columns {columns}, cells {cell_values}",
        ),
        ("query_classification", "Classify: {input_text}"),
        (
            "query_healing",
            "Fix {original_query}, error {error_message}, schema {schema}",
        ),
        ("explain_result", "Explain {result} for {query}"),
    ];
    for (name, body) in files {
        fs::write(dir.path().join(format!("{name}.prompt")), body).unwrap();
    }
    dir
}

fn config_for(prompts_dir: &TempDir, dig_deeper_depth: usize) -> TableRagConfig {
    let mut config = TableRagConfig::default();
    config.pipeline.prompts_dir = prompts_dir.path().display().to_string();
    config.pipeline.dig_deeper_depth = dig_deeper_depth;
    config
}

const EXPANSION_RESPONSE: &str = r#"Here you go:
```json
{"columns": ["name", "department_id"], "cell_values": ["Engineering"]}
```"#;

const GENERATION_RESPONSE: &str = r#"```sql
SELECT e.name FROM employees e
JOIN departments d ON e.department_id = d.id
WHERE d.name = 'Engineering'
ORDER BY e.id
```"#;

#[tokio::test]
async fn answer_runs_the_full_flow_and_logs_artifacts() {
    let db = seeded_db();
    let prompts_dir = prompt_fixture();
    let completion = ScriptedCompletion::new(&[
        EXPANSION_RESPONSE,
        GENERATION_RESPONSE,
        "Alice and Carol work in Engineering.",
    ]);

    let mut engine = TableRag::new(
        db.path(),
        config_for(&prompts_dir, 0),
        completion.clone() as Arc<dyn Completion>,
    )
    .unwrap();

    let answer = engine.answer("Who works in Engineering?").await.unwrap();

    assert!(answer.sql.contains("Engineering"));
    assert_eq!(answer.result.columns, vec!["name".to_string()]);
    assert_eq!(
        answer.result.rows,
        vec![vec!["Alice".to_string()], vec!["Carol".to_string()]]
    );
    assert_eq!(
        answer.explanation.as_deref(),
        Some("Alice and Carol work in Engineering.")
    );
    assert!(answer.followups.is_empty());

    // Rendered table plus explanation were logged, in that order.
    let log = engine.conversation_log();
    assert_eq!(log.len(), 2);
    assert!(log.entries()[0].message.content.contains("| Alice"));
    assert_eq!(
        log.entries()[1].message.content,
        "Alice and Carol work in Engineering."
    );
    assert_eq!(completion.calls(), 3);
}

#[tokio::test]
async fn answer_with_one_drilldown_round() {
    let db = seeded_db();
    let prompts_dir = prompt_fixture();
    let completion = ScriptedCompletion::new(&[
        EXPANSION_RESPONSE,
        GENERATION_RESPONSE,
        "Two engineers.",
        "```sql\nSELECT name FROM departments ORDER BY id\n```",
        "Both departments listed.",
    ]);

    let mut engine = TableRag::new(
        db.path(),
        config_for(&prompts_dir, 1),
        completion.clone() as Arc<dyn Completion>,
    )
    .unwrap();

    let answer = engine.answer("Who works in Engineering?").await.unwrap();

    assert_eq!(answer.followups.len(), 1);
    let round = &answer.followups[0];
    assert!(round.sql.contains("departments"));
    assert_eq!(
        round.result.rows,
        vec![vec!["Engineering".to_string()], vec!["Sales".to_string()]]
    );
    assert_eq!(round.explanation.as_deref(), Some("Both departments listed."));

    // Primary table + explanation, then drill-down table + explanation.
    assert_eq!(engine.conversation_log().len(), 4);
    assert_eq!(completion.calls(), 5);
}

#[tokio::test]
async fn execution_exhaustion_yields_answer_without_explanation() {
    let db = seeded_db();
    let prompts_dir = prompt_fixture();
    // Generation produces SQL against a table that does not exist; the
    // healer keeps proposing the same broken query until the budget of 3
    // attempts runs out. No explanation call is ever made.
    let completion = ScriptedCompletion::new(&[
        EXPANSION_RESPONSE,
        "```sql\nSELECT * FROM missing_table\n```",
        "```sql\nSELECT * FROM missing_table\n```",
        "```sql\nSELECT * FROM missing_table\n```",
    ]);

    let mut engine = TableRag::new(
        db.path(),
        config_for(&prompts_dir, 1),
        completion.clone() as Arc<dyn Completion>,
    )
    .unwrap();

    let answer = engine.answer("anything?").await.unwrap();

    assert!(answer.result.is_failure());
    assert!(answer.explanation.is_none());
    assert!(answer.followups.is_empty());
    assert!(engine.conversation_log().is_empty());
    // Expansion + generation + two healing calls.
    assert_eq!(completion.calls(), 4);
}

#[tokio::test]
async fn explanation_failure_leaves_the_primary_answer_intact() {
    let db = seeded_db();
    let prompts_dir = prompt_fixture();
    let completion = ScriptedCompletion::scripted(vec![
        Ok(EXPANSION_RESPONSE.to_string()),
        Ok(GENERATION_RESPONSE.to_string()),
        Err("model offline".to_string()),
    ]);

    let mut engine = TableRag::new(
        db.path(),
        config_for(&prompts_dir, 0),
        completion.clone() as Arc<dyn Completion>,
    )
    .unwrap();

    let answer = engine.answer("Who works in Engineering?").await.unwrap();

    assert!(!answer.result.is_failure());
    assert_eq!(
        answer.result.rows,
        vec![vec!["Alice".to_string()], vec!["Carol".to_string()]]
    );
    assert!(answer.explanation.is_none());
    assert!(answer.followups.is_empty());
    // The rendered table was logged before the explanation attempt.
    assert_eq!(engine.conversation_log().len(), 1);
}

#[tokio::test]
async fn drilldown_proposal_without_sql_block_stops_rounds_only() {
    let db = seeded_db();
    let prompts_dir = prompt_fixture();
    let completion = ScriptedCompletion::new(&[
        EXPANSION_RESPONSE,
        GENERATION_RESPONSE,
        "Alice and Carol work in Engineering.",
        "No further refinement seems useful.",
    ]);

    let mut engine = TableRag::new(
        db.path(),
        config_for(&prompts_dir, 1),
        completion.clone() as Arc<dyn Completion>,
    )
    .unwrap();

    let answer = engine.answer("Who works in Engineering?").await.unwrap();

    assert!(!answer.result.is_failure());
    assert_eq!(
        answer.explanation.as_deref(),
        Some("Alice and Carol work in Engineering.")
    );
    assert!(answer.followups.is_empty());
    assert_eq!(engine.conversation_log().len(), 2);
    assert_eq!(completion.calls(), 4);
}

#[tokio::test]
async fn expansion_without_fenced_json_is_fatal_before_generation() {
    let db = seeded_db();
    let prompts_dir = prompt_fixture();
    let completion =
        ScriptedCompletion::new(&["I think the relevant columns are name and department."]);

    let engine = TableRag::new(
        db.path(),
        config_for(&prompts_dir, 0),
        completion.clone() as Arc<dyn Completion>,
    )
    .unwrap();

    let err = engine.generate_sql_query("Who works here?").await.unwrap_err();
    assert!(matches!(
        err,
        TableRagError::Pipeline(PipelineError::ExpansionParse { .. })
    ));
    // Generation was never attempted.
    assert_eq!(completion.calls(), 1);
}

#[tokio::test]
async fn generation_without_fenced_sql_is_fatal() {
    let db = seeded_db();
    let prompts_dir = prompt_fixture();
    let completion = ScriptedCompletion::new(&[
        EXPANSION_RESPONSE,
        "SELECT name FROM employees -- forgot the fence",
    ]);

    let engine = TableRag::new(
        db.path(),
        config_for(&prompts_dir, 0),
        completion.clone() as Arc<dyn Completion>,
    )
    .unwrap();

    let err = engine.generate_sql_query("Who works here?").await.unwrap_err();
    assert!(matches!(
        err,
        TableRagError::Pipeline(PipelineError::GenerationParse { .. })
    ));
}

#[tokio::test]
async fn generation_prompt_carries_relevant_cells() {
    let db = seeded_db();
    let prompts_dir = prompt_fixture();
    let completion = ScriptedCompletion::new(&[EXPANSION_RESPONSE, GENERATION_RESPONSE]);

    let engine = TableRag::new(
        db.path(),
        config_for(&prompts_dir, 0),
        completion.clone() as Arc<dyn Completion>,
    )
    .unwrap();

    engine.generate_sql_query("Who works in Engineering?").await.unwrap();

    // The second prompt (generation) includes the intersected cell value
    // found under departments.name.
    let prompts = completion.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 2);
    assert!(prompts[1].contains("Engineering"));
    assert!(prompts[1].contains("name"));
}

#[tokio::test]
async fn classification_requires_exact_verdict() {
    let db = seeded_db();
    let prompts_dir = prompt_fixture();
    let completion = ScriptedCompletion::new(&[
        "Natural Language Query",
        "  Natural Language Query  ",
        "This is a Natural Language Query.",
        "Not a Query",
    ]);

    let engine = TableRag::new(
        db.path(),
        config_for(&prompts_dir, 0),
        completion.clone() as Arc<dyn Completion>,
    )
    .unwrap();

    assert!(engine.is_natural_language_query("who is on call?").await.unwrap());
    // Surrounding whitespace is tolerated.
    assert!(engine.is_natural_language_query("who is on call?").await.unwrap());
    // Embedded in a sentence is not an exact verdict.
    assert!(!engine.is_natural_language_query("hello").await.unwrap());
    assert!(!engine.is_natural_language_query("asdf").await.unwrap());
}

#[tokio::test]
async fn missing_prompts_directory_is_startup_fatal() {
    let db = seeded_db();
    let mut config = TableRagConfig::default();
    config.pipeline.prompts_dir = "/nonexistent/prompt/dir".to_string();
    let completion = ScriptedCompletion::new(&[]);

    let err = TableRag::new(db.path(), config, completion as Arc<dyn Completion>)
        .unwrap_err();
    assert!(matches!(
        err,
        TableRagError::Pipeline(PipelineError::MissingTemplate { .. })
    ));
}

#[tokio::test]
async fn unreachable_store_degrades_to_empty_schema() {
    let prompts_dir = prompt_fixture();
    let completion = ScriptedCompletion::new(&[]);

    // A directory path cannot be opened as a database file.
    let dir = TempDir::new().unwrap();
    let engine = TableRag::new(
        dir.path(),
        config_for(&prompts_dir, 0),
        completion as Arc<dyn Completion>,
    )
    .unwrap();

    assert!(engine.schema().is_empty());
    assert_eq!(engine.schema_ddl(), "");
}
