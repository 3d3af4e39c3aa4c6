//! Strict crossover detection between two series

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cross {
    Above,
    Below,
}

/// Cross of A over B between two consecutive steps.
///
/// Requires a strict sign change of `A - B`; a zero difference on either step is
/// never a cross.
pub fn detect_cross(prev_a: f64, prev_b: f64, curr_a: f64, curr_b: f64) -> Option<Cross> {
    let prev = prev_a - prev_b;
    let curr = curr_a - curr_b;
    if prev < 0.0 && curr > 0.0 {
        Some(Cross::Above)
    } else if prev > 0.0 && curr < 0.0 {
        Some(Cross::Below)
    } else {
        None
    }
}

pub fn crosses_above(prev_a: f64, prev_b: f64, curr_a: f64, curr_b: f64) -> bool {
    detect_cross(prev_a, prev_b, curr_a, curr_b) == Some(Cross::Above)
}

pub fn crosses_below(prev_a: f64, prev_b: f64, curr_a: f64, curr_b: f64) -> bool {
    detect_cross(prev_a, prev_b, curr_a, curr_b) == Some(Cross::Below)
}
