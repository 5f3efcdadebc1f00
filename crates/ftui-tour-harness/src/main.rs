#![forbid(unsafe_code)]

//! Tour dry-run harness.
//!
//! # Running
//!
//! ```sh
//! cargo run -p ftui-tour-harness -- run crates/ftui-tour-harness/tours/onboarding.toml
//! cargo run -p ftui-tour-harness -- check crates/ftui-tour-harness/tours/onboarding.toml
//! RUST_LOG=ftui_tour=debug cargo run -p ftui-tour-harness -- --log-json run tour.json --json
//! ```

fn main() {
    if let Err(error) = ftui_tour_harness::run_from_env() {
        eprintln!("{error}");
        std::process::exit(error.exit_code());
    }
}
