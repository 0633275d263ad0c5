use log::{LevelFilter, Metadata, Record};
use solo_engine::{Singleton, Stage};

// Match score that rides out scene changes and dies with the stage.
#[derive(Default, Singleton)]
#[singleton(name = "scoreboard", persist)]
struct Scoreboard {
    points: u32,
}

// Bare stdout sink so the stage's lifecycle logging shows up.
struct Printer;

impl log::Log for Printer {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        println!("{} - {}", record.level(), record.args());
    }

    fn flush(&self) {}
}

static PRINTER: Printer = Printer;

fn award(stage: &mut Stage, points: u32) {
    if let Some(score) = stage.singleton_mut::<Scoreboard>() {
        score.points += points;
    }
}

fn main() {
    let _ = log::set_logger(&PRINTER);
    log::set_max_level(LevelFilter::Debug);

    println!("==================== scoreboard ====================");

    let mut stage = Stage::new();

    // The first award creates the scoreboard lazily.
    award(&mut stage, 10);
    award(&mut stage, 3);

    // Declared persistent, so the sweep leaves it standing.
    stage.load_scene("second-half");
    award(&mut stage, 5);

    let total = stage.peek_singleton::<Scoreboard>().map_or(0, |s| s.points);
    println!("final score: {total}");

    stage.shutdown();
}
