//! Taskdeck CLI Entry Point
//!
//! This binary provides the command-line interface and the interactive
//! task list.

use std::process;

#[tokio::main]
async fn main() {
    if let Err(e) = taskdeck_interface::run_cli().await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
