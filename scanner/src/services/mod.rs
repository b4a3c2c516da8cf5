// Scan orchestration and delivery
pub mod analysis;
pub mod batch_runner;
pub mod notifier;
pub mod scan;

pub use analysis::{analyze_ticker, AnalysisResult};
pub use batch_runner::{BatchOutcome, BatchRunner};
pub use notifier::EmailNotifier;
pub use scan::{run_scan, ScanReport};
