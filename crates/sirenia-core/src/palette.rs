//! Categorical color schemes (d3-scale-chromatic values).

const CATEGORY10: &str = "1f77b4ff7f0e2ca02cd627289467bd8c564be377c27f7f7fbcbd2217becf";

const SPECTRAL: [&str; 9] = [
    "fc8d59ffffbf99d594",
    "d7191cfdae61abdda42b83ba",
    "d7191cfdae61ffffbfabdda42b83ba",
    "d53e4ffc8d59fee08be6f59899d5943288bd",
    "d53e4ffc8d59fee08bffffbfe6f59899d5943288bd",
    "d53e4ff46d43fdae61fee08be6f598abdda466c2a53288bd",
    "d53e4ff46d43fdae61fee08bffffbfe6f598abdda466c2a53288bd",
    "9e0142d53e4ff46d43fdae61fee08be6f598abdda466c2a53288bd5e4fa2",
    "9e0142d53e4ff46d43fdae61fee08bffffbfe6f598abdda466c2a53288bd5e4fa2",
];

fn colors(packed: &str) -> Vec<String> {
    packed
        .as_bytes()
        .chunks(6)
        .filter_map(|c| std::str::from_utf8(c).ok())
        .map(|c| format!("#{c}"))
        .collect()
}

pub fn category10() -> Vec<String> {
    colors(CATEGORY10)
}

/// The Spectral scheme with `k` colors; only defined for `3..=11`.
pub fn spectral(k: usize) -> Option<Vec<String>> {
    if !(3..=11).contains(&k) {
        return None;
    }
    Some(colors(SPECTRAL[k - 3]))
}

/// Continuous Spectral ramp: uniform B-spline through the 11-color scheme.
pub fn interpolate_spectral(t: f64) -> String {
    let stops: Vec<[f64; 3]> = colors(SPECTRAL[8])
        .iter()
        .filter_map(|c| crate::theme::parse_hex_rgb(c))
        .map(|(r, g, b)| [r as f64, g as f64, b as f64])
        .collect();
    let channel = |k: usize| basis_spline(&stops.iter().map(|c| c[k]).collect::<Vec<_>>(), t);
    rgb_string(channel(0), channel(1), channel(2))
}

fn basis_spline(values: &[f64], t: f64) -> f64 {
    let n = values.len().saturating_sub(1);
    if n == 0 {
        return values.first().copied().unwrap_or(0.0);
    }
    let (t, i) = if t <= 0.0 {
        (0.0, 0)
    } else if t >= 1.0 {
        (1.0, n - 1)
    } else {
        (t, ((t * n as f64).floor() as usize).min(n - 1))
    };
    let v1 = values[i];
    let v2 = values[i + 1];
    let v0 = if i > 0 { values[i - 1] } else { 2.0 * v1 - v2 };
    let v3 = if i < n - 1 { values[i + 2] } else { 2.0 * v2 - v1 };
    basis((t - i as f64 / n as f64) * n as f64, v0, v1, v2, v3)
}

fn basis(t1: f64, v0: f64, v1: f64, v2: f64, v3: f64) -> f64 {
    let t2 = t1 * t1;
    let t3 = t2 * t1;
    ((1.0 - 3.0 * t1 + 3.0 * t2 - t3) * v0
        + (4.0 - 6.0 * t2 + 3.0 * t3) * v1
        + (1.0 + 3.0 * t1 + 3.0 * t2 - 3.0 * t3) * v2
        + t3 * v3)
        / 6.0
}

fn rgb_string(r: f64, g: f64, b: f64) -> String {
    let c = |v: f64| v.round().clamp(0.0, 255.0) as u8;
    format!("rgb({}, {}, {})", c(r), c(g), c(b))
}

/// `n` evenly spaced samples of `interpolator` over `[0, 1]`; a single sample sits at 0.5.
pub fn quantize(interpolator: impl Fn(f64) -> String, n: usize) -> Vec<String> {
    match n {
        0 => Vec::new(),
        1 => vec![interpolator(0.5)],
        _ => (0..n)
            .map(|i| interpolator(i as f64 / (n - 1) as f64))
            .collect(),
    }
}

/// Spectral colors sized to the domain cardinality, falling back to the trimmed continuous ramp
/// where no discrete scheme exists.
pub fn spectral_for_cardinality(n: usize) -> Vec<String> {
    spectral(n).unwrap_or_else(|| quantize(|t| interpolate_spectral(t * 0.8 + 0.1), n))
}
