//! Database metrics.
//!
//! Query latency is recorded per named query with an `outcome` label so slow
//! and failing statements show up separately. Pool gauges are refreshed by the
//! readiness probe.

use metrics::{counter, gauge, histogram};
use sqlx::PgPool;
use std::time::Instant;

const OUTCOME_OK: &str = "ok";
const OUTCOME_ERROR: &str = "error";

/// Records one query execution.
pub fn record_query_duration(query: &'static str, outcome: &'static str, duration_secs: f64) {
    histogram!(
        "database_query_duration_seconds",
        "query" => query,
        "outcome" => outcome
    )
    .record(duration_secs);

    if outcome == OUTCOME_ERROR {
        counter!("database_query_errors_total", "query" => query).increment(1);
    }
}

/// Snapshot of pool usage.
pub fn record_pool_metrics(pool: &PgPool) {
    let size = pool.size() as usize;
    let idle = pool.num_idle();

    gauge!("database_connections_total").set(size as f64);
    gauge!("database_connections_idle").set(idle as f64);
    gauge!("database_connections_active").set(size.saturating_sub(idle) as f64);
}

/// Times a repository query.
///
/// ```ignore
/// let timer = QueryTimer::new("find_target_by_id");
/// let result = sqlx::query_as::<_, TargetEntity>(...).fetch_optional(&pool).await;
/// timer.finish(&result);
/// result
/// ```
pub struct QueryTimer {
    query: &'static str,
    start: Instant,
}

impl QueryTimer {
    pub fn new(query: &'static str) -> Self {
        Self {
            query,
            start: Instant::now(),
        }
    }

    /// Records the execution with its outcome. Call before `?` so failures count.
    pub fn finish<T>(self, result: &Result<T, sqlx::Error>) {
        let outcome = match result {
            Ok(_) => OUTCOME_OK,
            Err(_) => OUTCOME_ERROR,
        };
        record_query_duration(self.query, outcome, self.start.elapsed().as_secs_f64());
    }
}
