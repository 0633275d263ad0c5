//! Walkthrough of the singleton component lifecycle.
//!
//! The probe behavior asks for the greeter at both ends of its own life. At
//! startup the request creates the instance from the catalog prefab; at
//! teardown the greeter has already been retired through the command queue
//! and the request quietly finds nothing.

mod greeter;
mod probe;

use std::sync::Arc;

use log::{Level, LevelFilter, Metadata, Record};
use solo_engine::{Catalog, Stage};

use crate::greeter::Greeter;
use crate::probe::Probe;

/// Minimal stdout sink for the `log` facade.
struct StdoutLogger;

impl log::Log for StdoutLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= Level::Debug
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            println!("{} - {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

fn main() {
    let _ = log::set_boxed_logger(Box::new(StdoutLogger));
    log::set_max_level(LevelFilter::Debug);

    // The authored prefab behind the greeter's resource path.
    let catalog = Arc::new(Catalog::new());
    catalog.register("singletons/greeter", || {
        Greeter::new("Hello from the catalog prefab")
    });

    let mut stage = Stage::with_catalog(catalog);

    // Startup: the probe's on_start resolves the greeter, creating it on
    // the spot from the prefab.
    let probe = stage.spawn_behavior("probe", Probe);
    stage.set_persistent(probe, true);

    // Both objects are persistent, so the scene change sweeps nothing.
    stage.load_scene("second-act");
    Greeter::try_speak(&mut stage);

    // Retire the greeter through the deferred queue: destroying its anchor
    // runs on_deinitialize and clears the cache.
    if let Some(anchor) = stage.singleton_object::<Greeter>() {
        stage.commands().destroy(anchor);
    }
    stage.update();

    // Teardown: shutdown destroys the probe, whose on_destroy asks for the
    // greeter one last time and finds nothing.
    stage.shutdown();
}
