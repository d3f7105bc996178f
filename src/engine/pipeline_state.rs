// src/engine/pipeline_state.rs

use tracing::debug;

use crate::types::ResourceKind;

/// Run state of one pipeline kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
}

/// Per-kind slot: busy flag plus at most one remembered re-run.
#[derive(Debug, Default, Clone, Copy)]
struct KindSlot {
    busy: bool,
    rerun_pending: bool,
}

/// Mutable coordinator state.
///
/// Semantics:
/// - A kind is `Running` from dispatch until its completion is processed.
/// - A trigger for a running kind is remembered (one slot per kind; repeated
///   triggers collapse) and re-dispatched when the current run finishes.
/// - A settle window opens when startup decisions are pending or a pipeline
///   starts, and closes when every kind is idle again.
#[derive(Debug)]
pub struct PipelineState {
    script: KindSlot,
    style: KindSlot,
    startup_pending: bool,
    started_since_settle: bool,
}

impl Default for PipelineState {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineState {
    pub fn new() -> Self {
        Self {
            script: KindSlot::default(),
            style: KindSlot::default(),
            startup_pending: true,
            started_since_settle: false,
        }
    }

    fn slot(&self, kind: ResourceKind) -> &KindSlot {
        match kind {
            ResourceKind::Script => &self.script,
            ResourceKind::Style => &self.style,
        }
    }

    fn slot_mut(&mut self, kind: ResourceKind) -> &mut KindSlot {
        match kind {
            ResourceKind::Script => &mut self.script,
            ResourceKind::Style => &mut self.style,
        }
    }

    pub fn run_state_of(&self, kind: ResourceKind) -> RunState {
        if self.slot(kind).busy {
            RunState::Running
        } else {
            RunState::Idle
        }
    }

    pub fn is_busy(&self, kind: ResourceKind) -> bool {
        self.slot(kind).busy
    }

    /// True when no pipeline of any kind is in flight.
    pub fn all_idle(&self) -> bool {
        !self.script.busy && !self.style.busy
    }

    pub fn has_pending_rerun(&self, kind: ResourceKind) -> bool {
        self.slot(kind).rerun_pending
    }

    pub fn startup_pending(&self) -> bool {
        self.startup_pending
    }

    /// Mark `kind` running. Returns `false` (and remembers a re-run) if it
    /// already was.
    pub fn try_start(&mut self, kind: ResourceKind) -> bool {
        let slot = self.slot_mut(kind);
        if slot.busy {
            if slot.rerun_pending {
                debug!(%kind, "re-run already pending; collapsing trigger");
            }
            slot.rerun_pending = true;
            return false;
        }
        slot.busy = true;
        self.started_since_settle = true;
        true
    }

    /// Mark `kind` idle. Returns `false` if it was not running.
    pub fn finish(&mut self, kind: ResourceKind) -> bool {
        let slot = self.slot_mut(kind);
        let was_busy = slot.busy;
        slot.busy = false;
        was_busy
    }

    /// Consume the remembered re-run for `kind`, if any.
    pub fn take_rerun(&mut self, kind: ResourceKind) -> bool {
        std::mem::take(&mut self.slot_mut(kind).rerun_pending)
    }

    /// Record that both startup decisions were issued.
    pub fn complete_startup(&mut self) {
        self.startup_pending = false;
    }

    /// Close the current settle window if it can be closed.
    ///
    /// At startup completion the window settles whenever everything is idle,
    /// even if nothing was started. Afterwards it settles only once every
    /// kind is idle and at least one pipeline ran since the last settle.
    pub fn try_settle(&mut self, at_startup: bool) -> bool {
        if self.startup_pending || !self.all_idle() {
            return false;
        }
        if !at_startup && !self.started_since_settle {
            return false;
        }
        self.started_since_settle = false;
        true
    }
}
