//! Result records and the statistics computed over them

mod filter;
pub mod merge;
mod record;
mod stats;

pub use filter::EventResultFilter;
pub use merge::{
    combine, MergeError, Mergeable, ObjectsPerSecond, ResultData, ResultObjectType,
};
pub use record::{EventDetails, ResultRecord};
pub use stats::DescriptiveStats;
