//! Change mapping: structural diff of two snapshots with in-place edge patches

pub mod comparison;
pub mod mapper;
pub mod report;
pub mod work_item;

pub use comparison::ComparisonKey;
pub use mapper::{ChangeMapper, DiffOutcome};
pub use report::{ChangeReport, UnitChange};
pub use work_item::{AbortReason, AbortedSubtree, ChangePlan, PatchOp, UnitPlan, WorkItem};
