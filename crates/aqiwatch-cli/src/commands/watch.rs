use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use aqiwatch_core::{Sample, classify};

use super::SessionArgs;

pub fn run(config_path: Option<&str>, args: &SessionArgs, ticks: u64) {
    let mut session = super::start_session(config_path, args);
    let interval = session.config().refresh_interval();
    let location = session.config().location.clone();

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    }) {
        log::warn!("could not install Ctrl-C handler: {e}");
    }

    if let Some(latest) = session.window().latest() {
        println!("{}", format_line(&location, latest));
    }
    if !session.is_live() {
        eprintln!("Live updates are paused; no new readings will be printed. Ctrl-C to exit.");
    }

    let mut printed = 0u64;
    while running.load(Ordering::SeqCst) && (ticks == 0 || printed < ticks) {
        // Sleep in short slices so Ctrl-C is noticed promptly.
        let deadline = Instant::now() + interval;
        while running.load(Ordering::SeqCst) && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(50).min(interval));
        }
        if !running.load(Ordering::SeqCst) {
            break;
        }

        match session.tick() {
            Ok(true) => {}
            Ok(false) => continue,
            Err(e) => super::fail(e),
        }
        if let Some(latest) = session.window().latest() {
            println!("{}", format_line(&location, latest));
        }
        printed += 1;
    }
}

/// One output line, e.g. `t=21  Delhi  AQI 123  😐 Unhealthy for Sensitive Groups`.
pub fn format_line(location: &str, sample: Sample) -> String {
    let class = classify(sample.aqi);
    format!(
        "t={:<5} {}  AQI {:>3}  {} {}",
        sample.time, location, sample.aqi, class.emoji, class.label
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_contains_reading_and_band() {
        let line = format_line("Delhi", Sample { time: 21, aqi: 123 });
        assert!(line.starts_with("t=21 "));
        assert!(line.contains("Delhi"));
        assert!(line.contains("AQI 123"));
        assert!(line.ends_with("😐 Unhealthy for Sensitive Groups"));
    }

    #[test]
    fn line_pads_short_values() {
        let line = format_line("X", Sample { time: 1, aqi: 7 });
        assert!(line.contains("AQI   7"), "got: {line}");
    }
}
