/// Summary statistics over node confidences, used by filter panels
/// to suggest thresholds and flag unusual nodes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceStats {
    pub mean: f64,
    pub median: f64,
    pub mode: f64,
    pub variance: f64,
    pub std_dev: f64,
    pub quartiles: Quartiles,
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quartiles {
    pub q1: f64,
    pub q2: f64,
    pub q3: f64,
}

impl Quartiles {
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }

    /// Tukey fences: values outside are outliers.
    pub fn fences(&self) -> (f64, f64) {
        let iqr = self.iqr();
        (self.q1 - 1.5 * iqr, self.q3 + 1.5 * iqr)
    }
}

impl ConfidenceStats {
    /// Returns `None` for an empty slice.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let sorted = sorted(values);
        let mean = mean(values);
        let variance = variance(values, mean);

        Some(Self {
            mean,
            median: median_of_sorted(&sorted),
            mode: mode(values),
            variance,
            std_dev: variance.sqrt(),
            quartiles: quartiles_of_sorted(&sorted),
            min: sorted[0],
            max: sorted[sorted.len() - 1],
        })
    }

    pub fn iqr(&self) -> f64 {
        self.quartiles.iqr()
    }
}

/// Per-value flag produced by the outlier and significance detectors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Flagged {
    pub value: f64,
    pub flagged: bool,
}

fn sorted(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

// Population variance
fn variance(values: &[f64], mean: f64) -> f64 {
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>()
        / values.len() as f64
}

fn median_of_sorted(sorted: &[f64]) -> f64 {
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        sorted[mid]
    } else {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    }
}

// First value wins ties
fn mode(values: &[f64]) -> f64 {
    let mut counts: Vec<(f64, usize)> = Vec::new();
    for &v in values {
        match counts.iter_mut().find(|(x, _)| *x == v) {
            Some((_, count)) => *count += 1,
            None => counts.push((v, 1)),
        }
    }
    let mut best = (values[0], 0);
    for (value, count) in counts {
        if count > best.1 {
            best = (value, count);
        }
    }
    best.0
}

fn quartiles_of_sorted(sorted: &[f64]) -> Quartiles {
    let n = sorted.len();
    let at = |p: f64| sorted[((n as f64 * p).floor() as usize).min(n - 1)];
    Quartiles {
        q1: at(0.25),
        q2: median_of_sorted(sorted),
        q3: at(0.75),
    }
}

/// Percentile rank of `value` within `values`, in [0, 100].
///
/// Position of the first sorted value >= `value`, over `n - 1`. A value
/// above every sample ranks 100; a single sample ranks 0.
pub fn percentile(value: f64, values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let sorted = sorted(values);
    let index = sorted
        .iter()
        .position(|&v| v >= value)
        .unwrap_or(sorted.len() - 1);
    index as f64 / (sorted.len() - 1) as f64 * 100.0
}

/// Flags values outside the 1.5·IQR fences.
pub fn detect_outliers(values: &[f64]) -> Vec<Flagged> {
    let Some(stats) = ConfidenceStats::from_values(values) else {
        return Vec::new();
    };
    let (lower, upper) = stats.quartiles.fences();
    values
        .iter()
        .map(|&value| Flagged {
            value,
            flagged: value < lower || value > upper,
        })
        .collect()
}

/// Flags values more than `threshold` standard deviations from the mean.
pub fn significant_changes(values: &[f64], threshold: f64) -> Vec<Flagged> {
    let Some(stats) = ConfidenceStats::from_values(values) else {
        return Vec::new();
    };
    values
        .iter()
        .map(|&value| Flagged {
            value,
            flagged: (value - stats.mean).abs() > threshold * stats.std_dev,
        })
        .collect()
}
