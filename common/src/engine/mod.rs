//! The schema interpretation engine: validation, state, rendering plan,
//! upload protocol and submission control.

pub mod controller;
pub mod diagnostics;
pub mod render;
pub mod state;
pub mod upload;
pub mod validation;
