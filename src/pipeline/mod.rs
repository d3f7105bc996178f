// src/pipeline/mod.rs

//! Pipeline execution layer.
//!
//! - [`collaborator`] defines the `Collaborator` trait for external tools and
//!   the request/outcome types exchanged with them.
//! - [`command`] implements a collaborator on top of `tokio::process`.
//! - [`stages`] holds the stage sequences of the script and style pipelines.
//! - [`backend`] provides the `PipelineBackend` trait and the concrete
//!   `RealPipelineBackend` the runtime uses in production, and which tests
//!   can replace with a fake implementation.

pub mod backend;
pub mod collaborator;
pub mod command;
pub mod stages;

pub use backend::{PipelineBackend, RealPipelineBackend};
pub use collaborator::{Collaborator, Collaborators, Stage, StageOutcome, StageRequest};
pub use command::CommandCollaborator;
pub use stages::{run_pipeline, staging_path, PipelineContext, ScriptInputs};
