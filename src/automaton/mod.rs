//! Cellular automata that evolve a grid in discrete generations

pub mod caves;
pub mod rule;
pub mod stepper;

pub use caves::CaveSmoother;
pub use rule::{preset, AutomatonRule, EdgePolicy, RULE_PRESETS};
pub use stepper::{seed_random, AutomatonStepper, StepReport};
