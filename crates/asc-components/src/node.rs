//! The pull-based fluid node protocol.

use std::cell::RefCell;
use std::rc::Rc;

use asc_models::FluidState;

use crate::error::ComponentResult;

/// Shared handle to a fluid node.
///
/// The feed graph is not a tree: one pressurant tank may feed several
/// propellant branches, so upstream references are shared, not owned. A run
/// is strictly single threaded and owns its whole graph, so `Rc<RefCell<_>>`
/// is the right ownership shape here.
pub type SharedNode = Rc<RefCell<dyn FluidNode>>;

/// Wrap a concrete node for use as an upstream reference.
pub fn share<N: FluidNode + 'static>(node: N) -> Rc<RefCell<N>> {
    Rc::new(RefCell::new(node))
}

/// A node in the propellant feed graph.
///
/// `pull` runs top-down from the engine toward storage and returns
/// bottom-up: each node asks its upstream for fluid state, transforms it,
/// and caches `(caller_time, output)`. A repeated pull at the identical
/// caller time returns the cached output verbatim, which is what makes a
/// shared node safe to reach through more than one branch within one step.
pub trait FluidNode {
    fn name(&self) -> &str;

    /// Identity of the working fluid; pass-through nodes forward their
    /// upstream's answer.
    fn fluid(&self) -> String;

    fn pull(&mut self, time_s: f64) -> ComponentResult<FluidState>;

    fn dry_mass_kg(&self) -> f64;

    /// Live stored inventory; zero for nodes without storage.
    fn fluid_mass_kg(&self) -> f64 {
        0.0
    }

    fn length_m(&self) -> f64;

    /// Flat, stably ordered scalar fields for row-wise recording.
    fn sample(&self) -> Vec<(&'static str, f64)>;
}
