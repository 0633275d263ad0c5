//! Behavior that exercises the greeter at both ends of its own lifecycle.

use solo_engine::{Behavior, ObjectId, Stage};

use crate::greeter::Greeter;

/// Asks for the greeter when it starts and again while it is destroyed.
///
/// The teardown-side call is the interesting one: by the time the probe
/// dies the greeter may already be retired, and the request must come back
/// empty without complaint.
pub struct Probe;

impl Behavior for Probe {
    fn on_start(&mut self, stage: &mut Stage, _object: ObjectId) {
        Greeter::try_speak(stage);
    }

    fn on_destroy(&mut self, stage: &mut Stage, _object: ObjectId) {
        Greeter::try_speak(stage);
    }
}
