//! Concrete state handler functions and table builder.
//!
//! Each state is defined by plain `fn` pointers — no closures, no dynamic
//! dispatch, no heap.  The machine is intentionally flat: the physical
//! process is strictly sequential, so only one capture/classify/actuate
//! cycle can ever be in flight.
//!
//! ```text
//!  IDLE ──[capture trigger]──▶ AWAITING_CAPTURE ──▶ CLASSIFYING
//!    ▲ ▲                                                 │
//!    │ │                                            [result]
//!    │ └────────[reply written]────── ACTUATING ◀────────┘
//!    │
//!    └──[cancel]── ALERT_ACTIVE ◀──[overflow / tilt]── IDLE
//! ```
//!
//! Alerts pre-empt the idle/video cycle but never an in-flight
//! classification: no alert transition is defined for the cycle states,
//! so alert frames queued mid-cycle take effect once the machine is back
//! in Idle.

use log::info;

use super::context::{AlertKind, DisplayHint, FsmContext, TimerCmd, VideoCmd};
use super::{StateDescriptor, StateId};
use crate::events::DeviceEvent;
use crate::pipeline::Classification;
use crate::pipeline::categories::Category;
use crate::protocol::frame::ActuationCode;

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static state table.  Called once at startup.
pub fn build_state_table() -> [StateDescriptor; StateId::COUNT] {
    [
        // Index 0 — Idle
        StateDescriptor {
            id: StateId::Idle,
            name: "Idle",
            on_enter: None,
            on_exit: None,
            on_event: idle_on_event,
        },
        // Index 1 — AlertActive
        StateDescriptor {
            id: StateId::AlertActive,
            name: "AlertActive",
            on_enter: Some(alert_enter),
            on_exit: Some(alert_exit),
            on_event: alert_on_event,
        },
        // Index 2 — AwaitingCapture
        StateDescriptor {
            id: StateId::AwaitingCapture,
            name: "AwaitingCapture",
            on_enter: Some(awaiting_enter),
            on_exit: None,
            on_event: awaiting_on_event,
        },
        // Index 3 — Classifying
        StateDescriptor {
            id: StateId::Classifying,
            name: "Classifying",
            on_enter: Some(classifying_enter),
            on_exit: None,
            on_event: classifying_on_event,
        },
        // Index 4 — Actuating
        StateDescriptor {
            id: StateId::Actuating,
            name: "Actuating",
            on_enter: None,
            on_exit: None,
            on_event: actuating_on_event,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  IDLE state
// ═══════════════════════════════════════════════════════════════════════════

fn idle_on_event(ctx: &mut FsmContext, event: DeviceEvent) -> Option<StateId> {
    match event {
        DeviceEvent::CancelAlert | DeviceEvent::DepositComplete => {
            // Back to the home screen; the quiet countdown starts over.
            ctx.commands.display = Some(DisplayHint::Idle);
            ctx.commands.idle_timer = Some(TimerCmd::Restart);
            ctx.commands.video = Some(VideoCmd::Stop);
            None
        }

        DeviceEvent::CaptureTrigger => Some(StateId::AwaitingCapture),

        DeviceEvent::OverflowAlert => {
            ctx.alert = Some(AlertKind::Overflow);
            Some(StateId::AlertActive)
        }
        DeviceEvent::TiltAlert => {
            ctx.alert = Some(AlertKind::Tilt);
            Some(StateId::AlertActive)
        }

        DeviceEvent::IdleTimeout => {
            info!("IDLE: quiet for the full countdown, starting promo video");
            ctx.commands.video = Some(VideoCmd::Play);
            ctx.commands.display = Some(DisplayHint::PlayingVideo);
            None
        }

        // Heartbeats are acknowledged by doing nothing; stray pipeline
        // results and ticks have no meaning here.
        DeviceEvent::Heartbeat
        | DeviceEvent::DisplayTick
        | DeviceEvent::ClassificationDone(_) => None,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  ALERT_ACTIVE state — overflow or tilt alarm showing
// ═══════════════════════════════════════════════════════════════════════════

fn alert_enter(ctx: &mut FsmContext) {
    let Some(kind) = ctx.alert else {
        debug_assert!(false, "alert kind must be set before entering AlertActive");
        return;
    };
    info!("ALERT: {}", kind.label());
    ctx.commands.display = Some(DisplayHint::Alert(kind));
    ctx.commands.idle_timer = Some(TimerCmd::Cancel);
    ctx.commands.video = Some(VideoCmd::Stop);
}

fn alert_exit(ctx: &mut FsmContext) {
    ctx.alert = None;
}

fn alert_on_event(ctx: &mut FsmContext, event: DeviceEvent) -> Option<StateId> {
    match event {
        DeviceEvent::CancelAlert => {
            info!("ALERT: cleared by operator");
            ctx.commands.display = Some(DisplayHint::Idle);
            ctx.commands.idle_timer = Some(TimerCmd::Restart);
            Some(StateId::Idle)
        }

        // A newer alarm replaces the one on screen.
        DeviceEvent::OverflowAlert => {
            ctx.alert = Some(AlertKind::Overflow);
            ctx.commands.display = Some(DisplayHint::Alert(AlertKind::Overflow));
            None
        }
        DeviceEvent::TiltAlert => {
            ctx.alert = Some(AlertKind::Tilt);
            ctx.commands.display = Some(DisplayHint::Alert(AlertKind::Tilt));
            None
        }

        // No capture while an alarm stands; everything else is noise.
        _ => None,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  AWAITING_CAPTURE state — deposit sensed, still being taken
// ═══════════════════════════════════════════════════════════════════════════

fn awaiting_enter(ctx: &mut FsmContext) {
    info!("CAPTURE: deposit sensed, requesting still");
    ctx.commands.idle_timer = Some(TimerCmd::Cancel);
    ctx.commands.video = Some(VideoCmd::Stop);
    ctx.commands.display = Some(DisplayHint::CaptureStarted);
    ctx.commands.request_capture = true;
}

fn awaiting_on_event(ctx: &mut FsmContext, event: DeviceEvent) -> Option<StateId> {
    match event {
        // Capture failures complete the cycle without ever reaching
        // Classifying.
        DeviceEvent::ClassificationDone(result) => finish_cycle(ctx, result),
        _ => None,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  CLASSIFYING state — inference in flight
// ═══════════════════════════════════════════════════════════════════════════

fn classifying_enter(ctx: &mut FsmContext) {
    ctx.commands.display = Some(DisplayHint::Classifying);
}

fn classifying_on_event(ctx: &mut FsmContext, event: DeviceEvent) -> Option<StateId> {
    match event {
        DeviceEvent::ClassificationDone(result) => finish_cycle(ctx, result),
        _ => None,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  ACTUATING state — transient while the reply frame is written
// ═══════════════════════════════════════════════════════════════════════════

fn actuating_on_event(_ctx: &mut FsmContext, _event: DeviceEvent) -> Option<StateId> {
    // The service writes the reply and forces the machine back to Idle
    // within the same dispatch turn; no event can arrive in between.
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  Shared cycle completion
// ═══════════════════════════════════════════════════════════════════════════

fn finish_cycle(ctx: &mut FsmContext, result: Classification) -> Option<StateId> {
    ctx.commands.actuation = Some(ActuationCode::for_category(result.category));
    ctx.commands.idle_timer = Some(TimerCmd::Restart);

    if result.category == Category::Unrecognized {
        info!("CYCLE: classification failed, holding item for retry");
        ctx.commands.display = Some(DisplayHint::ClassifyFailed);
    } else {
        ctx.classified_total += 1;
        info!(
            "CYCLE: #{} {} ({:.0}%)",
            ctx.classified_total,
            result.category.label(),
            result.confidence * 100.0
        );
        ctx.commands.display = Some(DisplayHint::Sorted(result.category));
    }

    ctx.last_result = Some(result);
    Some(StateId::Actuating)
}
