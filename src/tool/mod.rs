// ABOUTME: Finding and invoking the container command-line tool.
// ABOUTME: The locator picks a binary, the executor runs it with classified failures.

mod executor;
mod locator;

pub use executor::{CommandOutput, Executor, LineStream, default_search_dirs};
pub use locator::{DEFAULT_TOOL_NAME, ToolPath, default_candidates, is_executable, locate};
