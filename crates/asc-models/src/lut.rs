//! Interpolating lookup tables.

use crate::error::{ModelError, ModelResult};

/// 1-D table with linear interpolation.
///
/// Queries beyond the tabulated span extrapolate linearly from the edge
/// segment; a 1-D lookup never fails on range.
#[derive(Clone, Debug)]
pub struct Lut1d {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl Lut1d {
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> ModelResult<Self> {
        if xs.len() < 2 {
            return Err(ModelError::InvalidTable {
                what: "1-D table needs at least two points",
            });
        }
        if xs.len() != ys.len() {
            return Err(ModelError::InvalidTable {
                what: "1-D table axis and value lengths differ",
            });
        }
        if xs.windows(2).any(|w| w[1] <= w[0]) {
            return Err(ModelError::InvalidTable {
                what: "1-D table axis must be strictly increasing",
            });
        }
        Ok(Self { xs, ys })
    }

    pub fn eval(&self, x: f64) -> f64 {
        // Clamp to the edge segments so out-of-range queries extrapolate.
        let seg = self
            .xs
            .partition_point(|&xi| xi <= x)
            .clamp(1, self.xs.len() - 1);
        let (x0, x1) = (self.xs[seg - 1], self.xs[seg]);
        let (y0, y1) = (self.ys[seg - 1], self.ys[seg]);
        y0 + (x - x0) / (x1 - x0) * (y1 - y0)
    }
}

/// Range discipline for 2-D lookups.
///
/// `Error` is the default: an out-of-domain query fails loud. `Fill` is the
/// explicit opt-in that returns a fixed value instead.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum OutOfDomainPolicy {
    #[default]
    Error,
    Fill(f64),
}

/// 2-D table with bilinear interpolation over a regular grid.
#[derive(Clone, Debug)]
pub struct Lut2d {
    xs: Vec<f64>,
    ys: Vec<f64>,
    /// Row-major: `values[i * ys.len() + j]` is the value at `(xs[i], ys[j])`.
    values: Vec<f64>,
    policy: OutOfDomainPolicy,
}

impl Lut2d {
    pub fn new(
        xs: Vec<f64>,
        ys: Vec<f64>,
        values: Vec<f64>,
        policy: OutOfDomainPolicy,
    ) -> ModelResult<Self> {
        if xs.len() < 2 || ys.len() < 2 {
            return Err(ModelError::InvalidTable {
                what: "2-D table needs at least two points per axis",
            });
        }
        if values.len() != xs.len() * ys.len() {
            return Err(ModelError::InvalidTable {
                what: "2-D table value count does not match grid",
            });
        }
        if xs.windows(2).any(|w| w[1] <= w[0]) || ys.windows(2).any(|w| w[1] <= w[0]) {
            return Err(ModelError::InvalidTable {
                what: "2-D table axes must be strictly increasing",
            });
        }
        Ok(Self {
            xs,
            ys,
            values,
            policy,
        })
    }

    fn check_domain(&self, axis: &'static str, grid: &[f64], v: f64) -> ModelResult<Option<f64>> {
        if v.is_finite() && v >= grid[0] && v <= grid[grid.len() - 1] {
            return Ok(None);
        }
        match self.policy {
            OutOfDomainPolicy::Error => Err(ModelError::OutOfDomain {
                axis,
                value: v,
                min: grid[0],
                max: grid[grid.len() - 1],
            }),
            OutOfDomainPolicy::Fill(fill) => Ok(Some(fill)),
        }
    }

    pub fn eval(&self, x: f64, y: f64) -> ModelResult<f64> {
        if let Some(fill) = self.check_domain("x", &self.xs, x)? {
            return Ok(fill);
        }
        if let Some(fill) = self.check_domain("y", &self.ys, y)? {
            return Ok(fill);
        }

        let i = self
            .xs
            .partition_point(|&xi| xi <= x)
            .clamp(1, self.xs.len() - 1);
        let j = self
            .ys
            .partition_point(|&yi| yi <= y)
            .clamp(1, self.ys.len() - 1);

        let tx = (x - self.xs[i - 1]) / (self.xs[i] - self.xs[i - 1]);
        let ty = (y - self.ys[j - 1]) / (self.ys[j] - self.ys[j - 1]);

        let at = |i: usize, j: usize| self.values[i * self.ys.len() + j];
        let lo = at(i - 1, j - 1) + tx * (at(i, j - 1) - at(i - 1, j - 1));
        let hi = at(i - 1, j) + tx * (at(i, j) - at(i - 1, j));
        Ok(lo + ty * (hi - lo))
    }
}
