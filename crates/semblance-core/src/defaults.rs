//! Process-wide default options and pipeline
//!
//! The defaults are shared mutable configuration, not per-call working
//! state. Every top-level validation takes an immutable [`DefaultsSnapshot`]
//! at call start and never re-reads global state mid-traversal. Callers that
//! mutate the defaults while assertions run on other threads must serialize
//! those mutations themselves (e.g. one configuration scope per test
//! module); the engine adds no locking beyond the registry mutex.

use std::sync::{Arc, Mutex, OnceLock};

use tracing::debug;

use crate::model::NodeHandle;
use crate::options::EquivalencyOptions;
use crate::pipeline::{Step, StepPipeline};
use crate::report::Failure;
use crate::validator::Validator;

/// The process-wide default configuration: options plus pipeline.
#[derive(Debug)]
pub struct GlobalDefaults {
    pub options: EquivalencyOptions,
    pub pipeline: StepPipeline,
}

impl GlobalDefaults {
    fn canonical() -> Self {
        Self {
            options: EquivalencyOptions::default(),
            pipeline: StepPipeline::new(),
        }
    }
}

/// Immutable copy of the defaults taken at the start of one validation.
pub struct DefaultsSnapshot {
    pub options: EquivalencyOptions,
    pub steps: Vec<Arc<dyn Step>>,
}

static GLOBALS: OnceLock<Mutex<GlobalDefaults>> = OnceLock::new();

fn globals() -> &'static Mutex<GlobalDefaults> {
    GLOBALS.get_or_init(|| Mutex::new(GlobalDefaults::canonical()))
}

/// Snapshot the current defaults. The snapshot is unaffected by later
/// mutation of the globals.
pub fn snapshot() -> DefaultsSnapshot {
    let guard = globals().lock().unwrap_or_else(|poison| poison.into_inner());
    DefaultsSnapshot {
        options: guard.options.clone(),
        steps: guard.pipeline.steps(),
    }
}

/// Mutate the process-wide defaults under the registry lock.
pub fn configure(mutate: impl FnOnce(&mut GlobalDefaults)) {
    let mut guard = globals().lock().unwrap_or_else(|poison| poison.into_inner());
    mutate(&mut guard);
    debug!(pipeline = ?guard.pipeline, "process-wide defaults reconfigured");
}

/// Restore the canonical default options and pipeline. Intended for
/// configuration-scope boundaries, e.g. between test modules.
pub fn restore_defaults() {
    let mut guard = globals().lock().unwrap_or_else(|poison| poison.into_inner());
    *guard = GlobalDefaults::canonical();
    debug!("process-wide defaults restored");
}

/// Validate using a snapshot of the process-wide defaults taken now.
pub fn validate_with_defaults(subject: &NodeHandle, expectation: &NodeHandle) -> Vec<Failure> {
    let snapshot = snapshot();
    Validator::with_steps(snapshot.options, snapshot.steps).validate(subject, expectation)
}
