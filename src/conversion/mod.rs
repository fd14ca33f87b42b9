/*!
 * Subtitle-to-document conversion.
 *
 * This module contains the conversion pipeline:
 * - `normalize`: Display normalization of subtitle entries
 * - `template`: Placeholder language for document templates
 * - `render`: Document rendering from a shared template blob
 * - `persist`: Writing rendered documents
 * - `pipeline`: Per-file conversion task
 * - `scheduler`: Concurrent execution of conversion tasks
 * - `summary`: Batch result aggregation
 */

pub mod normalize;
pub mod template;
pub mod render;
pub mod persist;
pub mod pipeline;
pub mod scheduler;
pub mod summary;

// Re-export main types for easier usage
pub use normalize::{normalize, normalize_entry, NormalizedEntry, Normalized};
pub use template::{ConversionContext, Template};
pub use render::{render_document, TemplateBlob};
pub use persist::persist;
pub use pipeline::{ConversionOutcome, ConversionTask, TaskStage};
pub use scheduler::Scheduler;
pub use summary::BatchSummary;
