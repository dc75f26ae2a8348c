pub mod metadata;
pub mod parser;
pub mod providers;
pub mod recommendations;
pub mod session;

pub use metadata::{MetadataResolver, Resolution};
pub use session::{Orchestrator, ResultsView};
