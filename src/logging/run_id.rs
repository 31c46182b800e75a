//! Run id generation

use uuid::Uuid;

/// Generate a new run id using UUID v4
///
/// Every pipeline run carries one on its `pipeline` span so that the log
/// lines of a single question can be correlated across stages.
///
/// # Examples
///
/// ```
/// use oracle::logging::generate_run_id;
///
/// let run_id = generate_run_id();
/// assert!(!run_id.is_empty());
/// ```
pub fn generate_run_id() -> String {
    Uuid::new_v4().to_string()
}
