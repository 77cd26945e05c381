//! The combined boundary the interpreter drives.

use crate::apply::ActionApplication;
use crate::query::WorldQuery;

/// A world the interpreter can both query and command, stepped by simulated time.
pub trait Simulation: WorldQuery + ActionApplication {
    /// Integrate the world forward by `dt` seconds using the instructions applied so far.
    fn advance(&mut self, dt: f64);

    /// Query-only view of the world.
    fn as_query(&self) -> &dyn WorldQuery;
}
