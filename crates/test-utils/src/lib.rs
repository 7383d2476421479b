//! Shared test fixtures for the crs-toolkit workspace.
//!
//! Two flavors:
//! - `fixtures`: in-memory `RadarFile` values with deterministic cell
//!   contents, for exercising the subsetter without touching disk.
//! - `archives`: writers that emit small synthetic IMPACTS HDF5 and
//!   netCDF campaign archives, for reader integration tests.

pub mod archives;
pub mod fixtures;

pub use archives::*;
pub use fixtures::*;
