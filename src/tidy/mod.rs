pub mod event_log;
pub mod executor;
pub mod naming;
pub mod natsort;
pub mod planner;
pub mod sanitize;
pub mod scanner;
pub mod stats;
pub mod tree;

pub use event_log::EventLog;
pub use executor::{execute_with_progress, ExecuteOptions, ExecutionResult};
pub use naming::{FileFormat, FolderFormat, NamingConfig, FILE_FORMATS, FOLDER_FORMATS};
pub use planner::ItemPlan;
pub use sanitize::sanitize;
pub use scanner::{scan_library_with_progress, ScanResult};
