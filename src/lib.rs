pub mod environment;
pub mod snapshot;
pub mod line_classifier;
pub mod reference_parser;
pub mod dataset_index;
pub mod validator;
pub mod matcher;
pub mod search;
pub mod comparison;
pub mod report_formatter;
pub mod config;

pub use environment::Environment;
pub use snapshot::{Collection, EnvironmentStore, FileSnapshotSource, Item, SnapshotSource};
pub use line_classifier::{LineClassifier, LineKind};
pub use reference_parser::{ParsedReference, ReferenceParser};
pub use dataset_index::{DatasetIndex, IndexSet};
pub use validator::{validate_references, ValidationReport};
pub use matcher::{match_across_environments, MatchResult};
pub use search::{search, SearchOutcome};
pub use config::Settings;
