//! Registry hooks for observing simulation lifecycle events.
//!
//! Hooks are **observers**: they receive owned records of what happened on a
//! tick and cannot reach back into subject state. Use interior mutability
//! (`AtomicU64`, `Mutex`, channels) for hook-owned state.
//!
//! # Example
//!
//! ```ignore
//! use simulation::{EmergencyEvent, RegistryHook};
//! use std::sync::atomic::{AtomicU64, Ordering};
//!
//! struct Pager {
//!     pages: AtomicU64,
//! }
//!
//! impl RegistryHook for Pager {
//!     fn name(&self) -> &str { "Pager" }
//!
//!     fn on_emergency(&self, _event: &EmergencyEvent) {
//!         self.pages.fetch_add(1, Ordering::Relaxed);
//!     }
//! }
//! ```

use std::sync::Arc;

use types::{Condition, SubjectId, Tick, VitalsSnapshot};

// ─────────────────────────────────────────────────────────────────────────────
// Event records
// ─────────────────────────────────────────────────────────────────────────────

/// Result of one `tick_all` pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickSummary {
    /// Registry tick number (1-based).
    pub tick: Tick,
    /// Subjects advanced.
    pub subjects: usize,
    /// Subjects whose emergency transition fired this tick, in roster order.
    pub emergencies: Vec<SubjectId>,
    /// Subjects in the Critical condition after the tick.
    pub critical: usize,
}

impl TickSummary {
    pub fn has_emergencies(&self) -> bool {
        !self.emergencies.is_empty()
    }
}

/// One emergency transition.
#[derive(Debug, Clone)]
pub struct EmergencyEvent {
    pub tick: Tick,
    /// Condition before the transition. `Critical` means a baseline redraw only.
    pub previous: Condition,
    /// State right after the transition.
    pub snapshot: VitalsSnapshot,
}

impl EmergencyEvent {
    /// Whether the subject just entered Critical.
    pub fn is_escalation(&self) -> bool {
        !self.previous.is_critical()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// RegistryHook Trait
// ─────────────────────────────────────────────────────────────────────────────

/// Trait for registry observers.
///
/// Hooks must be `Send + Sync`: `tick_all` runs on whichever thread drives the
/// registry, and the registry itself is shared through an `Arc`.
///
/// # Lifecycle
///
/// ```text
/// tick_all()
///   ├─ every subject ticks (maybe in parallel)
///   ├─ on_emergency()  ← once per fired transition, roster order
///   └─ on_tick_end()   ← with the TickSummary
///
/// finish()
///   └─ on_run_end()    ← total ticks
/// ```
pub trait RegistryHook: Send + Sync {
    /// Human-readable name for logging and debugging.
    fn name(&self) -> &str;

    #[allow(unused_variables)]
    fn on_emergency(&self, event: &EmergencyEvent) {}

    #[allow(unused_variables)]
    fn on_tick_end(&self, summary: &TickSummary) {}

    /// Called once when the driver stops ticking.
    #[allow(unused_variables)]
    fn on_run_end(&self, total_ticks: Tick) {}
}

// ─────────────────────────────────────────────────────────────────────────────
// HookRunner
// ─────────────────────────────────────────────────────────────────────────────

/// Manages hook registration and sequential invocation.
///
/// Hooks are called in registration order.
#[derive(Default)]
pub struct HookRunner {
    hooks: Vec<Arc<dyn RegistryHook>>,
}

impl HookRunner {
    pub fn new() -> Self {
        Self { hooks: Vec::new() }
    }

    /// Register a hook. Hooks are called in registration order.
    pub fn add(&mut self, hook: Arc<dyn RegistryHook>) {
        self.hooks.push(hook);
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Get hook names for debugging.
    pub fn hook_names(&self) -> Vec<&str> {
        self.hooks.iter().map(|h| h.name()).collect()
    }

    pub fn on_emergency(&self, event: &EmergencyEvent) {
        for hook in &self.hooks {
            hook.on_emergency(event);
        }
    }

    pub fn on_tick_end(&self, summary: &TickSummary) {
        for hook in &self.hooks {
            hook.on_tick_end(summary);
        }
    }

    pub fn on_run_end(&self, total_ticks: Tick) {
        for hook in &self.hooks {
            hook.on_run_end(total_ticks);
        }
    }
}

impl std::fmt::Debug for HookRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookRunner")
            .field("hooks", &self.hook_names())
            .finish()
    }
}

/// A no-op hook useful for testing.
#[derive(Debug, Default)]
pub struct NoOpHook;

impl RegistryHook for NoOpHook {
    fn name(&self) -> &str {
        "NoOp"
    }
}
