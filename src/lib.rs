//! Agrimind - Consumat-style farm decision engine
//!
//! Farms evaluate satisfaction with past income and uncertainty about future
//! conditions, pick one of four cognitive strategies, and offer a candidate
//! activity set to an external optimization solver each simulated year.

pub mod activities;
pub mod agent;
pub mod core;
pub mod decision;
pub mod network;
pub mod population;
pub mod simulation;
