pub mod job;
pub mod prompt;
pub mod window;

pub use job::{SummaryJob, NO_ENTRIES_MESSAGE};
pub use prompt::build_summary_prompt;
pub use window::weekly_entries;
