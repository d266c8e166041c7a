mod index;
pub mod quality;
mod summary;
mod writer;

pub use index::{project, truncate, IndexRecord, Projection, TrainingTime};
pub use quality::DataQualityIssue;
pub use summary::PipelineSummary;
pub use writer::{write_json, OutputError};
