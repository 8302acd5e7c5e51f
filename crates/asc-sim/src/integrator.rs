//! Adaptive Dormand-Prince 5(4) integrator.

use crate::error::{SimError, SimResult};
use crate::model::{add, scale, State, TransientModel};

// Dormand-Prince tableau. The last stage is evaluated at t+h on the 5th-order
// solution (FSAL), and the 4th-order weights feed the embedded error estimate.
const C: [f64; 7] = [0.0, 1.0 / 5.0, 3.0 / 10.0, 4.0 / 5.0, 8.0 / 9.0, 1.0, 1.0];

const A2: [f64; 1] = [1.0 / 5.0];
const A3: [f64; 2] = [3.0 / 40.0, 9.0 / 40.0];
const A4: [f64; 3] = [44.0 / 45.0, -56.0 / 15.0, 32.0 / 9.0];
const A5: [f64; 4] = [
    19372.0 / 6561.0,
    -25360.0 / 2187.0,
    64448.0 / 6561.0,
    -212.0 / 729.0,
];
const A6: [f64; 5] = [
    9017.0 / 3168.0,
    -355.0 / 33.0,
    46732.0 / 5247.0,
    49.0 / 176.0,
    -5103.0 / 18656.0,
];
const B5: [f64; 7] = [
    35.0 / 384.0,
    0.0,
    500.0 / 1113.0,
    125.0 / 192.0,
    -2187.0 / 6784.0,
    11.0 / 84.0,
    0.0,
];
const B4: [f64; 7] = [
    5179.0 / 57600.0,
    0.0,
    7571.0 / 16695.0,
    393.0 / 640.0,
    -92097.0 / 339200.0,
    187.0 / 2100.0,
    1.0 / 40.0,
];

const SAFETY: f64 = 0.9;
const MIN_FACTOR: f64 = 0.2;
const MAX_FACTOR: f64 = 10.0;
const MIN_STEP_S: f64 = 1e-10;

/// Result of one accepted step.
#[derive(Clone, Copy, Debug)]
pub struct Step {
    pub y: State,
    /// Step actually taken.
    pub h_used: f64,
    /// Suggested size for the next step (already capped at `max_step`).
    pub h_next: f64,
}

#[derive(Clone, Copy, Debug)]
pub struct Rk45 {
    pub max_step: f64,
    pub rtol: f64,
    pub atol: f64,
}

impl Default for Rk45 {
    fn default() -> Self {
        Self {
            max_step: 0.1,
            rtol: 1e-3,
            atol: 1e-6,
        }
    }
}

impl Rk45 {
    /// Single fixed-size trial step. Returns the 5th-order solution and the
    /// embedded error estimate.
    pub fn try_step<M: TransientModel>(
        &self,
        model: &mut M,
        t: f64,
        y: &State,
        h: f64,
    ) -> SimResult<(State, State)> {
        let k1 = model.rhs(t, y)?;

        let y2 = add(y, &scale(&k1, h * A2[0]));
        let k2 = model.rhs(t + C[1] * h, &y2)?;

        let y3 = add(y, &add(&scale(&k1, h * A3[0]), &scale(&k2, h * A3[1])));
        let k3 = model.rhs(t + C[2] * h, &y3)?;

        let y4 = add(
            y,
            &add(
                &scale(&k1, h * A4[0]),
                &add(&scale(&k2, h * A4[1]), &scale(&k3, h * A4[2])),
            ),
        );
        let k4 = model.rhs(t + C[3] * h, &y4)?;

        let y5 = add(
            y,
            &add(
                &add(&scale(&k1, h * A5[0]), &scale(&k2, h * A5[1])),
                &add(&scale(&k3, h * A5[2]), &scale(&k4, h * A5[3])),
            ),
        );
        let k5 = model.rhs(t + C[4] * h, &y5)?;

        let y6 = add(
            y,
            &add(
                &add(&scale(&k1, h * A6[0]), &scale(&k2, h * A6[1])),
                &add(
                    &scale(&k3, h * A6[2]),
                    &add(&scale(&k4, h * A6[3]), &scale(&k5, h * A6[4])),
                ),
            ),
        );
        let k6 = model.rhs(t + C[5] * h, &y6)?;

        let ks = [k1, k2, k3, k4, k5, k6];

        let mut y_new = *y;
        for (k, b) in ks.iter().zip(B5.iter()) {
            y_new = add(&y_new, &scale(k, h * b));
        }
        let k7 = model.rhs(t + C[6] * h, &y_new)?;

        let mut err = [0.0; 4];
        for i in 0..4 {
            let mut acc = 0.0;
            for (k, (b5, b4)) in ks.iter().zip(B5.iter().zip(B4.iter())) {
                acc += (b5 - b4) * k[i];
            }
            acc += (B5[6] - B4[6]) * k7[i];
            err[i] = h * acc;
        }

        Ok((y_new, err))
    }

    fn error_norm(err: &State, y_old: &State, y_new: &State, atol: f64, rtol: f64) -> f64 {
        let mut sum = 0.0;
        for i in 0..4 {
            let tol = atol + rtol * y_old[i].abs().max(y_new[i].abs());
            let ratio = err[i] / tol;
            sum += ratio * ratio;
        }
        (sum / 4.0).sqrt()
    }

    /// Advance one accepted step, shrinking `h` until the embedded error
    /// estimate passes.
    pub fn advance<M: TransientModel>(
        &self,
        model: &mut M,
        t: f64,
        y: &State,
        h: f64,
    ) -> SimResult<Step> {
        let mut h = h.min(self.max_step);
        loop {
            if h < MIN_STEP_S {
                return Err(SimError::StepUnderflow { t_s: t });
            }

            let (y_new, err) = self.try_step(model, t, y, h)?;
            let norm = Self::error_norm(&err, y, &y_new, self.atol, self.rtol);

            if norm <= 1.0 {
                let factor = if norm == 0.0 {
                    MAX_FACTOR
                } else {
                    (SAFETY * norm.powf(-0.2)).clamp(MIN_FACTOR, MAX_FACTOR)
                };
                return Ok(Step {
                    y: y_new,
                    h_used: h,
                    h_next: (h * factor).min(self.max_step),
                });
            }

            h *= (SAFETY * norm.powf(-0.2)).clamp(MIN_FACTOR, 1.0);
        }
    }
}
