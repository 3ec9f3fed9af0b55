//! Runs a nested scope chain, synchronously or asynchronously.
//!
//! Every level logs on entry, records its depth in the root-owned `deepest`
//! key and then runs the next level inside a guarded child scope.

use exec_context_core::{AssertionError, Context, ContextSnapshot, ExecOptions};
use exec_context_log::{log_line, LoggedContext, LoggerConfig};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError};

/// Key the levels write their depth into
pub const DEEPEST_KEY: &str = "deepest";

/// Outcome of a trace run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceReport {
    /// Value of the root-owned `deepest` key after the run
    pub deepest: u64,
    /// Every scope of the run, root first
    pub scopes: Vec<ContextSnapshot>,
}

impl TraceReport {
    fn collect(root: &LoggedContext, scopes: &[Context]) -> Self {
        let deepest = root
            .context()
            .get_as::<u64>(DEEPEST_KEY)
            .ok()
            .flatten()
            .unwrap_or_default();
        Self {
            deepest,
            scopes: scopes.iter().map(Context::snapshot).collect(),
        }
    }
}

fn level_name(level: usize) -> String {
    format!("level{}", level)
}

/// Run `depth` nested levels below a root named `root` with `exec`.
pub fn run_sync(root: &str, depth: usize, config: LoggerConfig) -> Result<TraceReport, AssertionError> {
    let main = LoggedContext::with_config(root, config);
    main.set(DEEPEST_KEY, 0u64);

    let mut scopes = vec![main.context().clone()];
    descend(&main, 0, depth, &mut scopes)?;
    main.leave()?;

    Ok(TraceReport::collect(&main, &scopes))
}

fn descend(
    ctx: &LoggedContext,
    level: usize,
    depth: usize,
    scopes: &mut Vec<Context>,
) -> Result<(), AssertionError> {
    log_line!(ctx, "entered at depth {}", level);
    ctx.set(DEEPEST_KEY, level as u64);
    if level < depth {
        ctx.try_exec_with(ExecOptions::named(level_name(level + 1)), |child| {
            scopes.push(child.context().clone());
            descend(child, level + 1, depth, scopes)
        })?;
    }
    log_line!(ctx, "leaving depth {}", level);
    Ok(())
}

type LevelFuture = Pin<Box<dyn Future<Output = Result<(), AssertionError>> + Send>>;

/// Run `depth` nested levels below a root named `root` with `exec_async`.
pub async fn run_async(
    root: &str,
    depth: usize,
    config: LoggerConfig,
) -> Result<TraceReport, AssertionError> {
    let main = LoggedContext::with_config(root, config);
    main.set(DEEPEST_KEY, 0u64);

    let scopes = Arc::new(Mutex::new(vec![main.context().clone()]));
    descend_async(main.clone(), 0, depth, Arc::clone(&scopes)).await?;
    main.leave()?;

    let scopes = scopes.lock().unwrap_or_else(PoisonError::into_inner);
    Ok(TraceReport::collect(&main, &scopes))
}

fn descend_async(
    ctx: LoggedContext,
    level: usize,
    depth: usize,
    scopes: Arc<Mutex<Vec<Context>>>,
) -> LevelFuture {
    Box::pin(async move {
        log_line!(ctx, "entered at depth {}", level);
        ctx.set(DEEPEST_KEY, level as u64);
        tokio::task::yield_now().await;

        if level < depth {
            let next = ctx.exec_async_with(ExecOptions::named(level_name(level + 1)), {
                let scopes = Arc::clone(&scopes);
                move |child| descend_async(child, level + 1, depth, scopes)
            })?;
            scopes
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(next.context().clone());
            next.await?;
        }

        log_line!(ctx, "leaving depth {}", level);
        Ok(())
    })
}
