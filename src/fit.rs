use thiserror::Error;

// ---------------------------------------------------------------------------
// Ordinary least-squares line fit
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum FitError {
    #[error("no qualifying points to fit")]
    InsufficientData,
    #[error("all x values are identical; slope is undefined")]
    DegenerateFit,
    #[error("series lengths differ: {x} x values, {y} y values")]
    LengthMismatch { x: usize, y: usize },
}

/// `y = slope * x + intercept`, fitted over `n` points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    pub n: usize,
}

impl LinearFit {
    /// Closed-form least squares from the sample moments
    /// E[x], E[y], E[x²], E[xy].
    pub fn fit(x: &[f64], y: &[f64]) -> Result<Self, FitError> {
        if x.len() != y.len() {
            return Err(FitError::LengthMismatch {
                x: x.len(),
                y: y.len(),
            });
        }
        let n = x.len();
        if n == 0 {
            return Err(FitError::InsufficientData);
        }
        let nf = n as f64;

        let mean_x = x.iter().sum::<f64>() / nf;
        let mean_y = y.iter().sum::<f64>() / nf;
        let mean_xx = x.iter().map(|v| v * v).sum::<f64>() / nf;
        let mean_xy = x.iter().zip(y).map(|(a, b)| a * b).sum::<f64>() / nf;

        // Identical x values can leave a rounding residue instead of zero.
        let variance = mean_xx - mean_x * mean_x;
        if x.iter().all(|&v| v == x[0]) || variance <= 0.0 {
            return Err(FitError::DegenerateFit);
        }

        let slope = (mean_xy - mean_x * mean_y) / variance;
        let intercept = (mean_xx * mean_y - mean_x * mean_xy) / variance;
        if !slope.is_finite() || !intercept.is_finite() {
            return Err(FitError::DegenerateFit);
        }

        log::debug!("fitted {n} points: slope={slope:.4} intercept={intercept:.4}");
        Ok(Self {
            slope,
            intercept,
            n,
        })
    }

    pub fn evaluate(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    /// The fitted line at each input x, same length and order.
    pub fn fitted(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.evaluate(x)).collect()
    }
}
