//! Command handlers.
//!
//! One module per subcommand.  Handlers translate CLI arguments into core
//! calls and display results; no generation logic lives here.

pub mod completions;
pub mod generate;
