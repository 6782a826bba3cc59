pub mod experience;
pub mod job;

mod error;

pub use error::{Error, Result};
pub use experience::{EstimateSource, ExperienceEstimate};
pub use job::{JobDetail, JobRecord, JobSummary};
