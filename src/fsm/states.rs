//! Concrete state handler functions and table builder.
//!
//! Each state is three plain `fn` pointers.  No closures, no dynamic
//! dispatch.
//!
//! ```text
//!  NORMAL ──[verdict triggered]──▶ ACTIVE
//!    ▲                               │
//!    └────[verdict not triggered]────┘
//! ```
//!
//! Side effects are edge-triggered: `Raise` is issued only from
//! `active_enter` and `Clear` only from `active_exit`, so a run of
//! triggered readings produces exactly one raise.

use super::context::{AlertCommand, AlertContext};
use super::{StateDescriptor, StateId};
use log::{info, warn};

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static state table.  Called once per session.
pub fn build_state_table() -> [StateDescriptor; StateId::COUNT] {
    [
        // Index 0: Normal
        StateDescriptor {
            name: "Normal",
            on_enter: None,
            on_exit: None,
            on_update: normal_update,
        },
        // Index 1: Active
        StateDescriptor {
            name: "Active",
            on_enter: Some(active_enter),
            on_exit: Some(active_exit),
            on_update: active_update,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  NORMAL state
// ═══════════════════════════════════════════════════════════════════════════

fn normal_update(ctx: &mut AlertContext) -> Option<StateId> {
    if ctx.is_triggered() {
        return Some(StateId::Active);
    }
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  ACTIVE state: indicator raised, contacts notified
// ═══════════════════════════════════════════════════════════════════════════

fn active_enter(ctx: &mut AlertContext) {
    ctx.incident += 1;
    ctx.reset_incident();
    ctx.note_incident_reading();
    warn!(
        "ACTIVE: incident #{} raised, exceeded={:?}",
        ctx.incident, ctx.verdict.exceeded
    );
    ctx.commands.push(AlertCommand::Raise {
        incident: ctx.incident,
        metrics: ctx.alert_observations.clone(),
    });
}

fn active_exit(ctx: &mut AlertContext) {
    info!(
        "ACTIVE: incident #{} cleared after {} triggered reading(s), metrics={:?}",
        ctx.incident, ctx.readings_in_incident, ctx.incident_metrics
    );
    ctx.commands.push(AlertCommand::Clear {
        incident: ctx.incident,
    });
    ctx.reset_incident();
}

fn active_update(ctx: &mut AlertContext) -> Option<StateId> {
    if !ctx.is_triggered() {
        return Some(StateId::Normal);
    }
    ctx.note_incident_reading();
    None
}
