use file_shell::{logging, CommandEngine, CommandReport, ShellConfig};
use log::info;
use std::io::{self, Write};
use std::process::ExitCode;

fn main() -> ExitCode {
    logging::init();

    let mut engine = CommandEngine::new(ShellConfig::default());
    let stdin = io::stdin();
    let mut line_buffer = String::new();
    info!("shell started, capacity {}", engine.registry().capacity());

    loop {
        // Prompt
        print!("{}", engine.config().prompt);
        let _ = io::stdout().flush();

        // Read line
        line_buffer.clear();
        match stdin.read_line(&mut line_buffer) {
            Ok(0) => {
                eprintln!("read_line: end of input");
                engine.shutdown();
                return ExitCode::FAILURE;
            }
            Ok(_) => {}
            Err(e) => {
                eprintln!("read_line: {}", e);
                engine.shutdown();
                return ExitCode::FAILURE;
            }
        }

        match engine.run_line(&line_buffer) {
            Ok(report) => {
                print_report(&report);
                if report.exit {
                    return ExitCode::SUCCESS;
                }
            }
            Err(e) => eprintln!("{}", e),
        }
    }
}

/// Messages go to stdout, per-item failures to stderr
fn print_report(report: &CommandReport) {
    for message in &report.messages {
        println!("{}", message);
    }
    for failure in &report.failures {
        eprintln!("{}", failure);
    }
}
