pub mod analysis;
pub mod error;
pub mod progress;
pub mod scanner;
pub mod transform;

pub use analysis::report::AnalysisReport;
pub use analysis::ArchiveAnalyzer;
pub use error::Error;
pub use progress::{ProgressReporter, SilentReporter};
pub use scanner::FileRecord;
pub use transform::report::TransformationReport;
pub use transform::rules::TransformRules;
pub use transform::ArchiveTransformer;
