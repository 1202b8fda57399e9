//! Self-healing execution loop.
//!
//! States: `Attempt(n)` → `Success` | `Healing` | `TerminalFailure`.
//! A failing attempt moves to healing while attempts remain in the budget;
//! a healer that returns nothing forfeits the remaining budget and
//! terminates immediately. Each attempt opens a fresh store connection
//! scoped to that attempt (released on success and error paths alike).
//! No delay or backoff between attempts.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use tablerag_core::models::ExecutionResult;
use tablerag_store::exec;

use crate::healing::QueryHealer;

enum ExecState {
    Attempt { n: usize, sql: String },
    Healing { attempt: usize, sql: String, error: String },
}

pub struct QueryExecutor<'a> {
    db_path: PathBuf,
    retry_execute: usize,
    schema_text: &'a str,
    healer: QueryHealer<'a>,
}

impl<'a> QueryExecutor<'a> {
    pub fn new(
        db_path: impl AsRef<Path>,
        retry_execute: usize,
        schema_text: &'a str,
        healer: QueryHealer<'a>,
    ) -> Self {
        Self {
            db_path: db_path.as_ref().to_path_buf(),
            retry_execute,
            schema_text,
            healer,
        }
    }

    /// Run the loop to completion. Terminal failure yields the sentinel
    /// (no rows, no columns); the last store error is logged, not
    /// returned, so callers can render a graceful "no answer".
    pub async fn run(&self, sql: &str) -> ExecutionResult {
        if self.retry_execute == 0 {
            warn!("retry_execute is 0; refusing to attempt execution");
            return ExecutionResult::failed();
        }

        let mut state = ExecState::Attempt {
            n: 0,
            sql: sql.to_string(),
        };

        loop {
            state = match state {
                ExecState::Attempt { n, sql } => match exec::execute(&self.db_path, &sql) {
                    Ok(result) => {
                        info!(attempt = n + 1, rows = result.rows.len(), "execution succeeded");
                        return result;
                    }
                    Err(e) => {
                        let error = e.to_string();
                        if n + 1 < self.retry_execute {
                            warn!(attempt = n + 1, error = %error, "execution failed; healing");
                            ExecState::Healing { attempt: n, sql, error }
                        } else {
                            warn!(attempt = n + 1, error = %error, "retry budget exhausted");
                            return ExecutionResult::failed();
                        }
                    }
                },
                ExecState::Healing { attempt, sql, error } => {
                    match self.healer.heal(&sql, &error, self.schema_text).await {
                        Some(corrected) => ExecState::Attempt {
                            n: attempt + 1,
                            sql: corrected,
                        },
                        None => {
                            // Remaining budget is forfeited, not consumed.
                            warn!("healer returned no correction; terminal failure");
                            return ExecutionResult::failed();
                        }
                    }
                }
            };
        }
    }
}
