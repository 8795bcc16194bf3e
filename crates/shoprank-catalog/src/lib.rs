pub mod error;
pub mod pipeline;
pub mod registry;
pub mod report;
pub mod synthetic;

pub use error::{PipelineError, ReportError};
pub use pipeline::{AggregationPipeline, DataSource, PipelineOutput, PipelineRequest, PipelineSettings};
pub use registry::{PlatformDescriptor, Registry, Upstream};
pub use report::{analyze, AnalysisReport, AnalysisRequest};
pub use synthetic::{generate, SyntheticProfile};
