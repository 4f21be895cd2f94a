//! Summary statistics used to blend provider values.
//!
//! Each function returns `None` for empty input so callers decide what an
//! empty series means.

/// Computes the arithmetic mean of a slice of values.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Computes the median. Even-length input averages the two middle values.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let sorted = sorted(values);
    let mid = sorted.len() / 2;

    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Returns the most frequent value.
///
/// When several values share the highest count the lowest of them wins.
pub fn mode(values: &[f64]) -> Option<f64> {
    let sorted = sorted(values);

    let mut best: Option<(f64, usize)> = None;
    let mut i = 0;
    while i < sorted.len() {
        let value = sorted[i];
        // `==` so that -0.0 and 0.0 count as one value; NaN is a run of one
        let run = sorted[i..].iter().take_while(|v| **v == value).count().max(1);

        // strictly greater keeps the earlier (lower) value on ties
        if best.is_none_or(|(_, count)| run > count) {
            best = Some((value, run));
        }
        i += run;
    }

    best.map(|(value, _)| value)
}

fn sorted(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}
