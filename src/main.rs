use babylog::commands::Cli;
use babylog::libs::error::StoreError;
use babylog::libs::messages::macros::is_debug_mode;
use babylog::libs::messages::Message;
use babylog::msg_error;
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> ExitCode {
    if is_debug_mode() {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("babylog=debug"));
        tracing_subscriber::registry().with(fmt::layer()).with(filter).init();
    }

    match Cli::menu().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            match error.downcast_ref::<StoreError>() {
                Some(StoreError::StorageUnavailable(reason)) => {
                    msg_error!(Message::StorageUnavailable(reason.clone()))
                }
                _ => msg_error!(format!("{:#}", error)),
            }
            ExitCode::FAILURE
        }
    }
}
