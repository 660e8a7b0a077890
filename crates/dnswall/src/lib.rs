mod logging;
pub use logging::setup_logging;
mod cli;
pub use cli::{Args, Command};
mod check;
pub use check::check_addresses;
mod exercise;
pub use exercise::{run_exercise, ExerciseConfig, ExerciseReport};
