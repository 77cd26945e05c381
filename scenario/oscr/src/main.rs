//! OSC Runner CLI

use oscr::commands::{check_file, dump_file, run_file, EXIT_ERROR};
use oscr::{init_tracing, parse_run_options};

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = &args[1];

    let code = match command.as_str() {
        "run" => {
            let (config, files) = match parse_run_options(&args[2..]) {
                Ok(parsed) => parsed,
                Err(error) => {
                    eprintln!("error: {error}");
                    print_run_usage();
                    std::process::exit(EXIT_ERROR);
                }
            };
            let [path] = files.as_slice() else {
                eprintln!("error: expected exactly one scenario file");
                print_run_usage();
                std::process::exit(EXIT_ERROR);
            };
            init_tracing(config.verbose);
            run_file(path, &config)
        }
        "check" => {
            if args.len() < 3 {
                eprintln!("Usage: osc check <scenario.json>");
                std::process::exit(EXIT_ERROR);
            }
            init_tracing(false);
            check_file(&args[2])
        }
        "dump" => {
            if args.len() < 3 {
                eprintln!("Usage: osc dump <scenario.json>");
                std::process::exit(EXIT_ERROR);
            }
            init_tracing(false);
            dump_file(&args[2])
        }
        "help" | "--help" | "-h" => {
            print_usage();
            0
        }
        "version" | "--version" | "-V" => {
            println!("osc {}", env!("CARGO_PKG_VERSION"));
            0
        }
        _ => {
            eprintln!("Unknown command: {command}");
            eprintln!();
            print_usage();
            EXIT_ERROR
        }
    };

    std::process::exit(code);
}

fn print_run_usage() {
    eprintln!("Usage: osc run <scenario.json> [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --step=<seconds>     Simulated seconds per tick (default: 0.05)");
    eprintln!("  --timeout=<seconds>  Fail a run still going after this long (default: 60)");
    eprintln!("  --dump               Print the storyboard state tree at the end");
    eprintln!("  -v, --verbose        Log storyboard transitions");
}

fn print_usage() {
    println!("OSC storyboard runner");
    println!();
    println!("Usage: osc <command> [options]");
    println!();
    println!("Commands:");
    println!("  run <scenario.json>    Run a scenario to its verdict");
    println!("  check <scenario.json>  Load and validate a scenario without running it");
    println!("  dump <scenario.json>   Print the loaded storyboard tree");
    println!("  help                   Show this help message");
    println!("  version                Show version information");
    println!();
    println!("Run options:");
    println!("  --step=<seconds>       Simulated seconds per tick (default: 0.05)");
    println!("  --timeout=<seconds>    Fail a run still going after this long (default: 60)");
    println!("  --dump                 Print the storyboard state tree at the end");
    println!("  -v, --verbose          Log storyboard transitions");
    println!();
    println!("Exit codes: 0 success, 1 failure or timeout, 2 invalid scenario or error");
    println!();
    println!("Set RUST_LOG (e.g. RUST_LOG=osc_eval=trace) for detailed logging.");
}
