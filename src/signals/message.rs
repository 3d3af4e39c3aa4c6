//! Alert message rendering

use crate::indicators::volatility::stop_levels;
use crate::models::{Direction, IndicatorSnapshot, Notification, SignalKind, TransitionEvent};

pub const ALERT_SUBJECT: &str = "Trading Alert";

/// Human-readable line for a transition, e.g.
/// `EURUSD=X (1h) → 📈 LONG entry (trend continuation) | SL: 1.0712 | TP: 1.0850`.
pub fn render(event: &TransitionEvent, snapshot: &IndicatorSnapshot) -> String {
    let direction = event.signal.direction();
    let strategy = event.signal.strategy().label();

    let text = match event.signal.kind() {
        SignalKind::Entry => {
            let icon = match direction {
                Direction::Long => "📈",
                Direction::Short => "📉",
            };
            let mut text = format!("{} {} entry ({})", icon, direction.label(), strategy);
            if let Some(atr) = snapshot.atr.filter(|a| a.is_finite() && *a > 0.0) {
                let (sl, tp) = stop_levels(snapshot.close, atr, direction);
                text.push_str(&format!(" | SL: {:.4} | TP: {:.4}", sl, tp));
            }
            text
        }
        SignalKind::Exit => format!("⚠️ {} exit ({})", direction.label(), strategy),
    };

    format!("{} → {}", event.series, text)
}

pub fn compose(event: &TransitionEvent, snapshot: &IndicatorSnapshot) -> Notification {
    Notification::new(ALERT_SUBJECT, render(event, snapshot))
}
