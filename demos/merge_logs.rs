//! Merge Logs Example
//!
//! This example demonstrates a command-line tool that merges PCS measurement
//! logs with pcszero and writes the highlighted `Result` workbook.
//!
//! Set `RUST_LOG=pcszero=debug` to see per-file progress.

use std::process;
use tracing_subscriber::EnvFilter;

use pcszero::{
    InputFile, LayoutPolicy, MasterTable, MergeError, MergerBuilder, ProgressEvent, ProgressPhase,
};

struct Options {
    master_path: String,
    output_path: String,
    inputs: Vec<String>,
    start: String,
    end: String,
    lenient: bool,
    debug_circuits: bool,
}

fn usage(program: &str) -> ! {
    eprintln!(
        "Usage: {} <master.json> <output.xlsx> <input.xlsx>... [options]",
        program
    );
    eprintln!("\nOptions:");
    eprintln!("  --start <HH:MM>      Start of the time window (default 09:00)");
    eprintln!("  --end <HH:MM>        End of the time window (default 18:00)");
    eprintln!("  --lenient            Keep files with fewer than 5 rows");
    eprintln!("  --debug-circuits     Write the circuit count to column 13");
    eprintln!("\nExamples:");
    eprintln!("  {} master.json result.xlsx 0901.xlsx 0902.xlsx", program);
    eprintln!(
        "  {} master.json night.xlsx 0901.xlsx --start 23:00 --end 05:00",
        program
    );
    process::exit(1);
}

fn parse_args() -> Options {
    let args: Vec<String> = std::env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("merge_logs");

    let mut positional = Vec::new();
    let mut options = Options {
        master_path: String::new(),
        output_path: String::new(),
        inputs: Vec::new(),
        start: "09:00".to_string(),
        end: "18:00".to_string(),
        lenient: false,
        debug_circuits: false,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--start" | "--end" => {
                let Some(value) = args.get(i + 1) else {
                    eprintln!("Error: {} requires a value", args[i]);
                    process::exit(1);
                };
                if args[i] == "--start" {
                    options.start = value.clone();
                } else {
                    options.end = value.clone();
                }
                i += 2;
            }
            "--lenient" => {
                options.lenient = true;
                i += 1;
            }
            "--debug-circuits" => {
                options.debug_circuits = true;
                i += 1;
            }
            arg if arg.starts_with("--") => {
                eprintln!("Error: Unknown option: {}", arg);
                process::exit(1);
            }
            arg => {
                positional.push(arg.to_string());
                i += 1;
            }
        }
    }

    if positional.len() < 3 {
        usage(program);
    }
    options.master_path = positional.remove(0);
    options.output_path = positional.remove(0);
    options.inputs = positional;
    options
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pcszero=info")),
        )
        .init();

    let options = parse_args();
    match merge_logs(&options) {
        Ok(()) => {}
        Err(e) => {
            handle_error(e);
            process::exit(1);
        }
    }
}

fn merge_logs(options: &Options) -> Result<(), MergeError> {
    let policy = if options.lenient {
        LayoutPolicy::Lenient
    } else {
        LayoutPolicy::Strict
    };
    let merger = MergerBuilder::new()
        .with_time_range(&options.start, &options.end)
        .with_layout_policy(policy)
        .with_circuit_count_column(options.debug_circuits)
        .build()?;

    let master = MasterTable::from_json_reader(std::fs::File::open(&options.master_path)?)?;
    let files = options
        .inputs
        .iter()
        .map(InputFile::open)
        .collect::<Result<Vec<_>, _>>()?;

    let mut on_progress = |event: &ProgressEvent| match event.phase {
        ProgressPhase::Reading => {
            println!("[{}/{}] {}", event.current, event.total, event.filename)
        }
        ProgressPhase::Processing => {
            println!("    row {}/{}", event.current, event.total)
        }
    };
    let outcome = merger.run(&files, Some(&master), &mut on_progress)?;
    std::fs::write(&options.output_path, &outcome.buffer)?;

    println!(
        "Merge completed: {} file(s) -> {}",
        outcome.stats.files_processed, options.output_path
    );
    println!("{}", serde_json::to_string_pretty(&outcome.summary())?);
    Ok(())
}

fn handle_error(error: MergeError) {
    match error {
        MergeError::Io(io_err) => {
            eprintln!("I/O Error: {}", io_err);
            eprintln!("Please check that the files exist and you have permission to access them.");
        }
        MergeError::Json(json_err) => {
            eprintln!("Master Table Error: {}", json_err);
            eprintln!("Expected {{\"pcsMaster\": [{{\"pcsKey\": ..., \"circuitCount\": ...}}]}}.");
        }
        MergeError::InvalidTimeFormat(msg) => {
            eprintln!("Time Format Error: {}", msg);
            eprintln!("Use H:MM or HH:MM, for example 9:00 or 23:30.");
        }
        MergeError::Config(msg) | MergeError::InvalidInput(msg) => {
            eprintln!("Configuration Error: {}", msg);
        }
        MergeError::Write(xlsx_err) => {
            eprintln!("Output Error: {}", xlsx_err);
        }
        MergeError::Cancelled => {
            eprintln!("Merge was cancelled.");
        }
        other => {
            eprintln!("Error: {}", other);
        }
    }
}
