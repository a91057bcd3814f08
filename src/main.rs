/*!
 * Partition Simulator - Main Entry Point
 *
 * Reads shell commands from a script file (first argument) or stdin and
 * prints the result of each as one JSON line on stdout. Failed commands are
 * reported on stderr and the session continues.
 */

use anyhow::Context;
use partition_sim::shell::is_command_line;
use partition_sim::{init_tracing, Collector, Command, MemoryConfig, MemoryManager};
use std::io::{self, BufRead, BufReader, Write};
use tracing::{error, info};

fn main() -> anyhow::Result<()> {
    // Initialize structured tracing
    init_tracing();

    let config = MemoryConfig::from_env()
        .map_err(|e| anyhow::anyhow!("{:?}", miette::Report::new(e)))?;

    let mut manager = MemoryManager::new(config)
        .map_err(|e| anyhow::anyhow!("{:?}", miette::Report::new(e)))?
        .with_collector(Collector::new());

    let input: Box<dyn BufRead> = match std::env::args().nth(1) {
        Some(path) => {
            info!(script = %path, "Running command script");
            let file = std::fs::File::open(&path)
                .with_context(|| format!("cannot open script {}", path))?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(io::stdin().lock()),
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut failures = 0usize;

    for (number, line) in input.lines().enumerate() {
        let line = line.context("failed to read command")?;
        if !is_command_line(&line) {
            continue;
        }

        let result = line
            .parse::<Command>()
            .and_then(|command| command.execute(&mut manager));

        match result {
            Ok(output) => {
                serde_json::to_writer(&mut out, &output).context("failed to write output")?;
                writeln!(out)?;
                out.flush()?;
            }
            Err(e) => {
                failures += 1;
                error!(line = number + 1, error = %e, "Command failed");
                eprintln!("{:?}", miette::Report::new(e));
            }
        }
    }

    info!(failures, "Session finished");
    Ok(())
}
