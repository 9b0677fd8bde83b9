pub mod loader;
pub mod matcher;
pub mod model;

pub use loader::JournalIndexLoader;
pub use matcher::{JournalMatch, MatchKind, match_journal, passes_impact_filter};
pub use model::{Category, JournalIndex, JournalInfo};
