//! One module per subcommand. Each exposes `execute`.

pub mod completions;
pub mod config;
pub mod new;
pub mod routes;
