// Service exports
pub mod collection;
pub mod corrections;
pub mod pipeline;
pub mod rankings;
pub mod store;

pub use collection::{read_collection, Collection};
pub use corrections::{read_corrections, IdCorrections};
pub use pipeline::{CorrectionSummary, ExclusionSummary, PipelineError};
pub use rankings::{parse_pool, read_rankings};
pub use store::StoreError;
