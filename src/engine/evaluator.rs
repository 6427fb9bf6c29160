//! # engine::evaluator
//!
//! **Alert Evaluator** — pure matching of active alerts against a price
//! snapshot.  No state, no I/O, no clock: given the same inputs it always
//! returns the same matches, which is what makes the at-most-once guarantee
//! testable (the *registry's* active flag is what prevents re-firing, not
//! anything in here).
//!
//! ## Matching rule
//! ```text
//! Above: price >= target   (inclusive — hitting the target exactly fires)
//! Below: price <= target
//! ```
//! Alerts whose asset has no price in the snapshot are skipped this pass —
//! they are evaluated again next tick with fresh data, never with stale data.

use std::collections::HashMap;

use crate::models::{Alert, AlertDirection};

/// One alert that matched, paired with the price that triggered it.
#[derive(Debug, Clone, PartialEq)]
pub struct TriggeredAlert {
    pub alert: Alert,
    pub price: f64,
}

/// Evaluate `alerts` against `snapshot`, preserving the input order.
///
/// The caller passes the registry's active list; inactive alerts should never
/// reach this function, but an `active == false` entry is ignored anyway.
pub fn check_alerts(alerts: &[Alert], snapshot: &HashMap<String, f64>) -> Vec<TriggeredAlert> {
    let mut triggered = Vec::new();

    for alert in alerts {
        if !alert.active {
            continue;
        }
        let Some(&price) = snapshot.get(&alert.asset) else {
            continue; // no current price — skip, retry next tick
        };

        let fires = match alert.direction {
            AlertDirection::Above => price >= alert.target_price,
            AlertDirection::Below => price <= alert.target_price,
        };

        if fires {
            triggered.push(TriggeredAlert {
                alert: alert.clone(),
                price,
            });
        }
    }

    triggered
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn make_alert(asset: &str, target: f64, direction: AlertDirection) -> Alert {
        Alert::new("trader@example.com", asset, target, direction)
    }

    fn snapshot(pairs: &[(&str, f64)]) -> HashMap<String, f64> {
        pairs.iter().map(|(a, p)| (a.to_string(), *p)).collect()
    }

    #[test]
    fn test_above_fires_at_and_past_target() {
        let alerts = vec![make_alert("bitcoin", 100.0, AlertDirection::Above)];

        assert_eq!(check_alerts(&alerts, &snapshot(&[("bitcoin", 100.0)])).len(), 1);
        assert_eq!(check_alerts(&alerts, &snapshot(&[("bitcoin", 101.0)])).len(), 1);
        assert!(check_alerts(&alerts, &snapshot(&[("bitcoin", 99.0)])).is_empty());
    }

    #[test]
    fn test_below_fires_at_and_under_target() {
        let alerts = vec![make_alert("bitcoin", 100.0, AlertDirection::Below)];

        assert_eq!(check_alerts(&alerts, &snapshot(&[("bitcoin", 100.0)])).len(), 1);
        assert_eq!(check_alerts(&alerts, &snapshot(&[("bitcoin", 99.0)])).len(), 1);
        assert!(check_alerts(&alerts, &snapshot(&[("bitcoin", 101.0)])).is_empty());
    }

    #[test]
    fn test_missing_asset_is_skipped() {
        let alerts = vec![
            make_alert("bitcoin", 100.0, AlertDirection::Above),
            make_alert("ethereum", 3_000.0, AlertDirection::Below),
        ];
        let triggered = check_alerts(&alerts, &snapshot(&[("ethereum", 2_900.0)]));

        assert_eq!(triggered.len(), 1);
        assert_eq!(triggered[0].alert.asset, "ethereum");
        assert_eq!(triggered[0].price, 2_900.0);
    }

    #[test]
    fn test_matches_preserve_input_order() {
        let alerts = vec![
            make_alert("cardano", 1.0, AlertDirection::Below),
            make_alert("bitcoin", 50_000.0, AlertDirection::Above),
            make_alert("solana", 200.0, AlertDirection::Above),
        ];
        let triggered = check_alerts(
            &alerts,
            &snapshot(&[("cardano", 0.5), ("bitcoin", 60_000.0), ("solana", 150.0)]),
        );

        let assets: Vec<&str> = triggered.iter().map(|t| t.alert.asset.as_str()).collect();
        assert_eq!(assets, vec!["cardano", "bitcoin"]);
    }

    #[test]
    fn test_inactive_alert_never_matches() {
        let mut alert = make_alert("bitcoin", 100.0, AlertDirection::Above);
        alert.active = false;

        assert!(check_alerts(&[alert], &snapshot(&[("bitcoin", 500.0)])).is_empty());
    }
}
