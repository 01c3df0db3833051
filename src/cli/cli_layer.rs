// CLI layer - the terminal conversation loop.

#[path = "repl.rs"]
pub mod repl;

pub use repl::run;
