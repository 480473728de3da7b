//! Delivery Network Simulation Library
//!
//! A pizza-delivery simulation where autonomous bikes route shop-to-house
//! deliveries over a player-drawn road network. Runs headless; rendering is
//! left to the host.

pub mod simulation;
