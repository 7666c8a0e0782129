//! Module for the optimization facing parts of a model

pub mod objective;
