// File: crates/chart-core/src/grid.rs
// Summary: Simple grid/tick layout helpers.

pub fn linspace(start: f64, end: f64, steps: usize) -> Vec<f64> {
    if steps < 2 { return vec![start, end]; }
    let step = (end - start) / (steps as f64 - 1.0);
    (0..steps).map(|i| start + step * i as f64).collect()
}

/// Format a numeric tick with at most 4 significant decimals, trimming trailing zeros.
pub fn format_tick(v: f64) -> String {
    if v.abs() >= 1e6 || (v != 0.0 && v.abs() < 1e-3) {
        return format!("{v:.2e}");
    }
    let s = format!("{v:.4}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_string() } else { s.to_string() }
}

/// Pick at most `max` evenly spaced indices out of `0..n`, always keeping the first.
pub fn thin_indices(n: usize, max: usize) -> Vec<usize> {
    if n == 0 || max == 0 { return Vec::new(); }
    let step = n.div_ceil(max).max(1);
    (0..n).step_by(step).collect()
}
