//! Dataset managers.
//!
//! A manager owns a list of dataset files and turns them into keyed
//! collections of records: by measurement time for observed and retrieved
//! data, by name for simulations.

mod real;
mod simulation;

pub use real::RealDataManager;
pub use simulation::SimulationManager;
