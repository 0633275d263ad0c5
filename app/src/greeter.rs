//! The demo singleton: a greeter that announces a configured message.

use solo_engine::{CreationConfig, Singleton, Stage};

/// One-per-stage greeter holding the message it announces.
///
/// The declaration allows both creation strategies, resource first: a stage
/// whose catalog carries `singletons/greeter` produces the authored prefab,
/// any other stage falls back to the built-in default message. Persistent,
/// so scene changes never retire it.
pub struct Greeter {
    message: String,
}

impl Greeter {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Announce the held message.
    pub fn speak(&self) {
        log::info!("{}", self.message);
    }

    /// Resolve the current instance through the stage and speak if one was
    /// obtainable. Absence is a silent no-op, which is exactly what callers
    /// running during teardown want.
    pub fn try_speak(stage: &mut Stage) {
        if let Some(greeter) = stage.singleton::<Greeter>() {
            greeter.speak();
        }
    }
}

impl Default for Greeter {
    fn default() -> Self {
        Self::new("Hello")
    }
}

impl Singleton for Greeter {
    fn creation() -> CreationConfig {
        CreationConfig::new("greeter")
            .from_resource("singletons/greeter")
            .persist()
    }

    fn on_initialize(&mut self) {
        log::info!("greeter initialized");
    }

    fn on_deinitialize(&mut self) {
        log::info!("greeter deinitialized");
    }
}
