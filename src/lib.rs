//! Allocation engine for routing per-region request workloads onto rented
//! VM instances across a planning horizon of time slots.
//!
//! [`model`] holds the immutable domain entities; [`milp`] builds and solves
//! the MILP a [`Problem`](model::Problem) compiles down to; [`allocators`]
//! exposes the five solving strategies (cost, response, the two
//! lexicographic compositions, and the greedy heuristic) behind one
//! [`Allocator`](allocators::Allocator) trait; [`analysis`] derives metrics
//! from a solved [`Solution`](model::Solution); [`serialization`] and [`cli`]
//! are the ambient persistence and CLI surface described in the external
//! interfaces.

pub mod allocators;
pub mod analysis;
pub mod cli;
pub mod error;
pub mod milp;
pub mod model;
pub mod serialization;
pub mod units;
