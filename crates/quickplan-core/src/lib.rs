//! Core library for quickplan: the strategic plan data model, its
//! renderings, the generation service and provider adapter, the endpoint
//! client, and export actions.

pub mod client;
pub mod error;
pub mod export;
pub mod plan;
pub mod provider;

pub use client::PlanClient;
pub use error::GenerationError;
pub use plan::{StrategicPlan, Strategy, TitledItem};
