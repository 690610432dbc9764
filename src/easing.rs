//! Easing curves for width, zoom and pan tweens. All take and return progress in [0, 1],
//! except `ease_out_back` which overshoots past 1 before settling.

/// Overshoot ease-out, used for the drawer opening.
pub fn ease_out_back(x: f64) -> f64 {
    let c1 = 1.70158;
    let c3 = c1 + 1.0;
    1.0 + c3 * (x - 1.0).powi(3) + c1 * (x - 1.0).powi(2)
}

/// Decelerating ease-out, used for the drawer closing.
pub fn ease_out_quart(x: f64) -> f64 {
    1.0 - (1.0 - x).powi(4)
}

pub fn ease_in_out_cubic(x: f64) -> f64 {
    if x < 0.5 {
        4.0 * x * x * x
    } else {
        1.0 - (-2.0 * x + 2.0).powi(3) / 2.0
    }
}

pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

/// Progress of a tween started at `start` lasting `duration` seconds, clamped to [0, 1].
/// Values within rounding distance of the end snap to exactly 1.
pub fn progress(start: f64, duration: f64, now: f64) -> f64 {
    if duration <= 0.0 {
        return 1.0;
    }
    let t = ((now - start) / duration).clamp(0.0, 1.0);
    if t > 1.0 - 1e-9 { 1.0 } else { t }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_curves_hit_endpoints() {
        for curve in [ease_out_back, ease_out_quart, ease_in_out_cubic] {
            assert!(curve(0.0).abs() < 1e-12);
            assert!((curve(1.0) - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_ease_out_back_overshoots() {
        let peak = (1..100)
            .map(|i| ease_out_back(f64::from(i) / 100.0))
            .fold(f64::MIN, f64::max);
        assert!(peak > 1.05);
    }

    #[test]
    fn test_progress_clamps() {
        assert_eq!(progress(1.0, 0.4, 0.5), 0.0);
        assert_eq!(progress(1.0, 0.5, 1.25), 0.5);
        assert_eq!(progress(1.0, 0.4, 9.0), 1.0);
        assert_eq!(progress(1.0, 0.0, 1.0), 1.0);
        assert_eq!(progress(1.0, 0.2, 1.2), 1.0);
    }
}
