pub mod charts;
pub mod error;
pub mod index;
pub mod logs;
pub mod logs_by_day;
pub mod no_result;

/// Breadcrumb root shared by every view.
pub(crate) const HOME: &str = "Category labels";
