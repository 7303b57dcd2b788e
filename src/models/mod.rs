//! P||Cmax domain models.
//!
//! Provides the input instance and the exported schedule view of a
//! solution. Search-side state (candidates, queues) lives in [`crate::search`].
//!
//! # Domain Mappings
//!
//! | u-pcmax | Manufacturing | Computing | Logistics |
//! |---------|--------------|-----------|-----------|
//! | Task | Job | Batch job | Parcel load |
//! | Processor | Identical machine | CPU core | Truck |
//! | Makespan | Completion time | Wall time | Last return |

mod instance;
mod schedule;

pub use instance::{InstanceError, ProblemInstance};
pub use schedule::{Schedule, ScheduledTask};
