/// Exponential moving average seeded with the first input value.
///
/// `ema[0] = x[0]`, `ema[i] = α·x[i] + (1 − α)·ema[i−1]` with `α = 2 / (span + 1)`.
/// There is no SMA seed and no warm-up: every index carries a value.
pub fn ema(values: &[f64], span: usize) -> Vec<f64> {
    assert!(span >= 1, "EMA span must be >= 1");
    let alpha = smoothing(span);

    let mut result = Vec::with_capacity(values.len());
    let mut prev: Option<f64> = None;
    for &x in values {
        let next = match prev {
            None => x,
            Some(p) => alpha * x + (1.0 - alpha) * p,
        };
        result.push(next);
        prev = Some(next);
    }
    result
}

/// Smoothing factor for a given span.
pub fn smoothing(span: usize) -> f64 {
    2.0 / (span as f64 + 1.0)
}
