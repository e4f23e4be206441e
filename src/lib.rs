//! Neutron-capture abundance analysis for red giant field stars.
//!
//! Loads a star table, converts log ε abundances to [X/Fe], drops stars
//! without a metallicity, fits the six Ba/Eu/La/[Fe/H] relationships and
//! charts them.

pub mod analysis;
pub mod batch;
pub mod chart;
pub mod color;
pub mod config;
pub mod data;
pub mod fit;
