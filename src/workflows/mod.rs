//! Workflows（工作流）模块：工作流、步骤、数据与自定义元数据字段。
//!
//! Workflows chain models over uploaded data; steps, data and metadata are
//! sub-resources of a workflow.

mod client;
mod types;

pub use client::{WorkflowData, WorkflowMetadata, WorkflowSteps, Workflows};
pub use types::{DataListOptions, StepParams, WorkflowParams};
