//! TransientModel trait for pluggable dynamic systems.

use crate::error::SimResult;

/// Planar point-mass state: `[x, y, vx, vy]`.
pub type State = [f64; 4];

pub const X: usize = 0;
pub const Y: usize = 1;
pub const VX: usize = 2;
pub const VY: usize = 3;

/// Trait for transient (dynamic) system models.
///
/// `rhs` takes `&mut self`: models may hold stateful subsystems (depleting
/// tanks, cached solvers) that advance as the integrator samples them.
pub trait TransientModel {
    /// Return the initial state at t=0.
    fn initial_state(&self) -> State;

    /// Compute the state derivative dxdt = f(t, x).
    fn rhs(&mut self, t: f64, x: &State) -> SimResult<State>;
}

pub(crate) fn add(a: &State, b: &State) -> State {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2], a[3] + b[3]]
}

pub(crate) fn scale(a: &State, s: f64) -> State {
    [a[0] * s, a[1] * s, a[2] * s, a[3] * s]
}
