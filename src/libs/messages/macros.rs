//! Convenient macros for application messaging and logging.
//!
//! The macros route output by mode: when debug mode is on (`BABYLOG_DEBUG`
//! or `RUST_LOG` set) everything goes through `tracing`, otherwise messages
//! are printed plainly to stdout, errors and warnings to stderr.
//!
//! ```text
//! msg_info!(..) ──▶ is_debug_mode()? ──▶ tracing::info!  (debug)
//!                                   └──▶ println!        (normal)
//! ```
//!
//! ## Macro Categories
//!
//! - **`msg_print!`**: general message display
//! - **`msg_success!`**: success notifications with ✅ prefix
//! - **`msg_info!`**: informational messages with ℹ️ prefix
//! - **`msg_warning!`**: warnings with ⚠️ prefix
//! - **`msg_error!`**: errors with ❌ prefix
//! - **`msg_debug!`**: debug-only output, suppressed in normal mode
//! - **`msg_bail_anyhow!`**: return early with an `anyhow::Error`
//!
//! ## Usage
//!
//! ```rust
//! use babylog::{msg_info, msg_success};
//! use babylog::libs::messages::Message;
//!
//! msg_success!(Message::ProfileSaved);
//! msg_info!(Message::RecordsNotFound("sleep".to_string()));
//! ```

use std::sync::OnceLock;

/// Cached result of the debug mode check.
static DEBUG_MODE: OnceLock<bool> = OnceLock::new();

/// Checks if debug mode is enabled, with caching.
///
/// Debug mode is on when either `BABYLOG_DEBUG` or `RUST_LOG` is set. The
/// environment is read once per process.
#[doc(hidden)]
pub fn is_debug_mode() -> bool {
    *DEBUG_MODE.get_or_init(|| std::env::var("BABYLOG_DEBUG").is_ok() || std::env::var("RUST_LOG").is_ok())
}

/// Prints a general message with automatic debug mode routing.
///
/// Pass `true` as the second argument to surround the message with blank lines.
#[macro_export]
macro_rules! msg_print {
    ($msg:expr) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::info!("{}", $msg);
        } else {
            println!("{}", $msg);
        }
    };
    ($msg:expr, true) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::info!("\n{}\n", $msg);
        } else {
            println!("\n{}\n", $msg);
        }
    };
}

/// Prints a success message with ✅ prefix.
#[macro_export]
macro_rules! msg_success {
    ($msg:expr) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::info!("✅ {}", $msg);
        } else {
            println!("✅ {}", $msg);
        }
    };
    ($msg:expr, true) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::info!("\n✅ {}\n", $msg);
        } else {
            println!("\n✅ {}\n", $msg);
        }
    };
}

/// Prints an error message with ❌ prefix.
///
/// In normal mode the message goes to stderr so scripts can separate it from
/// regular output.
#[macro_export]
macro_rules! msg_error {
    ($msg:expr) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::error!("❌ {}", $msg);
        } else {
            eprintln!("❌ {}", $msg);
        }
    };
    ($msg:expr, true) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::error!("\n❌ {}\n", $msg);
        } else {
            eprintln!("\n❌ {}\n", $msg);
        }
    };
}

/// Prints a warning message with ⚠️ prefix to stderr.
#[macro_export]
macro_rules! msg_warning {
    ($msg:expr) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::warn!("⚠️ {}", $msg);
        } else {
            eprintln!("⚠️  {}", $msg);
        }
    };
    ($msg:expr, true) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::warn!("\n⚠️ {}\n", $msg);
        } else {
            eprintln!("\n⚠️  {}\n", $msg);
        }
    };
}

/// Prints an informational message with ℹ️ prefix.
#[macro_export]
macro_rules! msg_info {
    ($msg:expr) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::info!("ℹ️ {}", $msg);
        } else {
            println!("ℹ️  {}", $msg);
        }
    };
    ($msg:expr, true) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::info!("\nℹ️ {}\n", $msg);
        } else {
            println!("\nℹ️  {}\n", $msg);
        }
    };
}

/// Debug-only message with 🔍 prefix. Prints nothing in normal mode.
///
/// ```rust
/// use babylog::msg_debug;
///
/// let id = 42;
/// msg_debug!(format!("Loaded sleep record {}", id));
/// ```
#[macro_export]
macro_rules! msg_debug {
    ($msg:expr) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::debug!("🔍 {}", $msg);
        }
    };
}

/// Early return with an `anyhow::Error` created from a message.
#[macro_export]
macro_rules! msg_bail_anyhow {
    ($msg:expr) => {
        anyhow::bail!("❌ {}", $msg)
    };
}
