use std::process;

use textbook_rsa::demo::{self, DemoConfig};
use textbook_rsa::logging;

fn main() {
    logging::init();

    let config = match std::env::args_os().nth(1) {
        Some(dir) => DemoConfig::in_dir(dir),
        None => DemoConfig::default(),
    };

    match demo::run(&config) {
        Ok(report) if report.all_passed() => {}
        Ok(report) => {
            eprintln!("{} of {} self-checks failed", report.failures.len(), report.checked);
            process::exit(1);
        }
        Err(e) => {
            eprintln!("Error running demo: {:#}", e);
            process::exit(1);
        }
    }
}
