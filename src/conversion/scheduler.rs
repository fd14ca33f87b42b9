/*!
 * Concurrent execution of conversion tasks.
 *
 * Every path gets its own tokio task; all tasks are joined before results are
 * returned. Tasks never talk to each other and one failing (or panicking)
 * does not affect the rest. By default nothing limits how many run at once;
 * `with_max_concurrent` bounds them with a semaphore without changing outcomes.
 */

use futures::future::join_all;
use log::debug;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Semaphore;

use crate::conversion::pipeline::{ConversionOutcome, ConversionTask};
use crate::conversion::render::TemplateBlob;
use crate::errors::ConversionError;
use crate::file_utils::FileManager;

/// Runs batches of conversions against one shared template
#[derive(Debug, Clone)]
pub struct Scheduler {
    template: TemplateBlob,
    output_extension: String,
    max_concurrent: Option<usize>,
}

impl Scheduler {
    /// Create an unbounded scheduler
    pub fn new(template: TemplateBlob, output_extension: impl Into<String>) -> Self {
        Self {
            template,
            output_extension: output_extension.into(),
            max_concurrent: None,
        }
    }

    /// Limit the number of conversions in flight; `None` removes the limit
    pub fn with_max_concurrent(mut self, max_concurrent: Option<usize>) -> Self {
        self.max_concurrent = max_concurrent.map(|n| n.max(1));
        self
    }

    /// Convert one file and hand back its outcome directly
    pub async fn run_single(&self, path: PathBuf) -> ConversionOutcome {
        ConversionTask::new(path, &self.output_extension, self.template.clone())
            .run()
            .await
    }

    /// Convert every path concurrently and wait for all of them.
    ///
    /// `on_complete` is called once per finished task, in completion order.
    /// Outcomes are returned in input order.
    pub async fn run_batch<F>(&self, paths: Vec<PathBuf>, on_complete: F) -> Vec<ConversionOutcome>
    where
        F: Fn(&ConversionOutcome) + Clone + Send + Sync + 'static,
    {
        let semaphore = self.max_concurrent.map(|limit| Arc::new(Semaphore::new(limit)));
        debug!(
            "Scheduling {} conversion task(s), concurrency limit: {}",
            paths.len(),
            self.max_concurrent.map_or_else(|| "none".to_string(), |n| n.to_string())
        );

        let handles: Vec<_> = paths
            .into_iter()
            .map(|path| {
                let task = ConversionTask::new(path.clone(), &self.output_extension, self.template.clone());
                let semaphore = semaphore.clone();
                let on_complete = on_complete.clone();

                let handle = tokio::spawn(async move {
                    // The semaphore is never closed, so acquiring cannot fail.
                    let _permit = match semaphore {
                        Some(semaphore) => semaphore.acquire_owned().await.ok(),
                        None => None,
                    };
                    let outcome = task.run().await;
                    on_complete(&outcome);
                    outcome
                });
                (path, handle)
            })
            .collect();

        let output_extension = self.output_extension.clone();
        join_all(handles.into_iter().map(|(path, handle)| {
            let output_extension = output_extension.clone();
            async move {
                match handle.await {
                    Ok(outcome) => outcome,
                    Err(join_error) => ConversionOutcome {
                        output_path: FileManager::output_path(&path, &output_extension),
                        source_path: path,
                        error: Some(ConversionError::Aborted(join_error.to_string())),
                    },
                }
            }
        }))
        .await
    }
}
