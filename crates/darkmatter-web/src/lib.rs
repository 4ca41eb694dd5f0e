//! darkmatter-web — Web front-end for Dark Matter.
//! Serves:
//!   - Login, sign-up and password-reset screens
//!   - Home page
//!   - Fold Sequence page with the 3-D viewer, plDDT and PDB download

pub mod error;
pub mod handlers;
pub mod render;
pub mod router;
pub mod session;
pub mod state;
pub mod templates;
pub mod views;
