// SPDX-License-Identifier: MIT

//! Services module - business logic layer.

pub mod aggregation;
pub mod duration;

pub use aggregation::AggregationPipeline;
pub use duration::resolve_minutes;
