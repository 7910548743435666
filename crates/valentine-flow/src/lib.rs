//! The "will you be my valentine?" prompt as a state machine.
//!
//! The flow has three stages. Affirming advances to the next stage;
//! affirming on the last stage *leaves* the flow, handing the username on
//! to the celebration view. Declining never changes the stage; it only
//! moves the decline control somewhere else on screen.
//!
//! ```text
//!            affirm            affirm            affirm
//! [stage 1] ───────→ [stage 2] ───────→ [stage 3] ───────→ Complete { username }
//!   ↺ decline          ↺ decline          ↺ decline
//!   (moves the decline control to a random spot)
//! ```
//!
//! There is no "done" state inside the machine. [`InteractiveFlow::on_affirm`]
//! takes the flow by value and only hands it back while there is a next
//! stage, so a completed flow can't be driven any further.
//!
//! # Randomness
//!
//! The random source is a type parameter. Production code uses
//! [`InteractiveFlow::new`] (thread-local RNG); tests pass a seeded
//! `StdRng` to [`InteractiveFlow::with_rng`] for reproducible positions.

mod flow;
mod position;

pub use flow::{DECLINE_TAUNT, InteractiveFlow, Step};
pub use position::EvadePosition;

/// The stage every flow starts at.
pub const FIRST_STAGE: u8 = 1;

/// The last stage; affirming here completes the flow.
pub const FINAL_STAGE: u8 = 3;
