//! Running Statistics

/// Summary of one channel over the window
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AxisStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Population standard deviation
    pub std_dev: f64,
}

/// Single-pass accumulator for min, max, mean and population std.
///
/// Variance is `E[x²] - E[x]²`, clamped at zero before the square root so
/// cancellation on near-constant input never yields NaN.
#[derive(Debug, Clone, Copy)]
pub struct RunningStats {
    count: usize,
    min: f64,
    max: f64,
    sum: f64,
    sum_sq: f64,
}

impl RunningStats {
    pub fn new() -> Self {
        Self {
            count: 0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            sum: 0.0,
            sum_sq: 0.0,
        }
    }

    /// Accumulate a value
    pub fn push(&mut self, value: f32) {
        let v = value as f64;
        self.count += 1;
        self.min = self.min.min(v);
        self.max = self.max.max(v);
        self.sum += v;
        self.sum_sq += v * v;
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn min(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.min
        }
    }

    pub fn max(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.max
        }
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.sum / self.count as f64
    }

    /// Population variance, never negative
    pub fn variance(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        let mean = self.mean();
        (self.sum_sq / self.count as f64 - mean * mean).max(0.0)
    }

    /// Population standard deviation, never negative
    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn finish(&self) -> AxisStats {
        AxisStats {
            min: self.min(),
            max: self.max(),
            mean: self.mean(),
            std_dev: self.std_dev(),
        }
    }
}

impl Default for RunningStats {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<f32> for RunningStats {
    fn from_iter<I: IntoIterator<Item = f32>>(iter: I) -> Self {
        let mut stats = Self::new();
        for v in iter {
            stats.push(v);
        }
        stats
    }
}
