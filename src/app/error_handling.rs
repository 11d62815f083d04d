//! Error handling utilities

use tracing::error;

use crate::error::LoadgridError;

/// Exit code for errors that carry no [`LoadgridError`]
const GENERAL_ERROR: i32 = 1;

/// Handle fatal errors and exit with appropriate status code
///
/// - For `LoadgridError`: Shows user message always, developer message in verbose mode
/// - For other errors: Shows the error message and, in verbose mode, its chain
pub fn handle_fatal_error(error: anyhow::Error, verbose: u8) -> ! {
    error!("Fatal error: {}", error);
    eprintln!("{}", render_fatal_error(&error, verbose));
    std::process::exit(fatal_exit_code(&error))
}

/// Text printed for a fatal error
pub fn render_fatal_error(error: &anyhow::Error, verbose: u8) -> String {
    if let Some(err) = error.downcast_ref::<LoadgridError>() {
        let mut out = err.user_message();
        if verbose >= 1 {
            out.push_str(&format!("\n\nContext Chain:\n{}", err.developer_message()));
        }
        return out;
    }

    let mut out = format!("Error: {error}");
    if verbose >= 1 {
        out.push_str("\n\nError chain:");
        for (i, cause) in error.chain().enumerate() {
            out.push_str(&format!("\n  {i}: {cause}"));
        }
    }
    out
}

/// Process exit code for a fatal error
pub fn fatal_exit_code(error: &anyhow::Error) -> i32 {
    error
        .downcast_ref::<LoadgridError>()
        .map_or(GENERAL_ERROR, LoadgridError::exit_code)
}
