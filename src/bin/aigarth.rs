//! aigarth - Run the ternary ring network from the command line
//!
//! # Usage
//!
//! ```bash
//! # Process one input (type auto-detected)
//! aigarth --matrix data/anna-matrix.json process "hello world"
//!
//! # Force an input type, print JSON with tick history
//! aigarth --matrix data/anna-matrix.json --json process --type hex 0x1f --history
//!
//! # Look up Anna coordinates
//! aigarth --matrix data/anna-matrix.json query -13 27
//!
//! # Interactive loop
//! aigarth --matrix data/anna-matrix.json interactive
//! ```
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Runtime error (bad config file, matrix required but missing, IO)
//! - 2: Invalid arguments

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use aigarth::{
    AigarthEngine, AnnaMatrix, AnomalyReport, CellQuery, Comparison, EngineConfig, EngineStats,
    InputKind, OracleAnswer, ProcessingResult,
};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "aigarth")]
#[command(version)]
#[command(about = "Ternary ring network over the Anna Matrix", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Anna Matrix JSON file (overrides the config file)
    #[arg(short, long, global = true)]
    matrix: Option<PathBuf>,

    /// Engine config JSON file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Tick cap per inference (overrides the config file)
    #[arg(long, global = true)]
    max_ticks: Option<usize>,

    /// Reduce matrix weights to their sign
    #[arg(long, global = true)]
    ternary_weights: bool,

    /// Print results as pretty JSON
    #[arg(long, global = true)]
    json: bool,

    /// Log filter (error, warn, info, debug, trace); RUST_LOG also works
    #[arg(short, long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one input through the network
    Process {
        input: String,
        /// Input type (text, hex, coords, seed, address, array)
        #[arg(short = 't', long = "type")]
        kind: Option<InputKind>,
        /// Record the full state vector after every tick
        #[arg(long)]
        history: bool,
    },
    /// Look up a matrix cell by Anna coordinates
    Query {
        #[arg(allow_negative_numbers = true)]
        x: i64,
        #[arg(allow_negative_numbers = true)]
        y: i64,
    },
    /// Compare the outputs of two inputs
    Compare { first: String, second: String },
    /// Ask a yes/no question
    Oracle { question: String },
    /// Engine and matrix statistics
    Stats,
    /// List point-symmetry anomalies of the matrix
    Anomalies {
        /// Write the anomaly report to this file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Read commands from stdin
    Interactive,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref());

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(level: Option<&str>) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if let Some(level) = level {
        builder.parse_filters(level);
    }
    builder.init();
}

fn resolve_config(cli: &Cli) -> Result<EngineConfig> {
    let mut config = match &cli.config {
        Some(path) => EngineConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(path) = &cli.matrix {
        config.matrix_path = Some(path.clone());
    }
    if let Some(max_ticks) = cli.max_ticks {
        config.max_ticks = max_ticks;
    }
    if cli.ternary_weights {
        config.ternary_weights = true;
    }
    Ok(config)
}

fn run(cli: Cli) -> Result<()> {
    let config = resolve_config(&cli)?;
    let json = cli.json;

    if let Commands::Anomalies { out } = &cli.command {
        let path = config
            .matrix_path
            .as_ref()
            .context("anomalies needs --matrix or a config with matrix_path")?;
        let matrix = AnnaMatrix::load(path)
            .with_context(|| format!("Failed to load matrix {}", path.display()))?;
        let report = AnomalyReport::from_matrix(&matrix);
        return match out {
            Some(out) => {
                report
                    .save(out)
                    .with_context(|| format!("Failed to write {}", out.display()))?;
                println!("{} anomalies written to {}", report.anomalies.len(), out.display());
                Ok(())
            }
            None => print_json(&report),
        };
    }

    let mut engine = AigarthEngine::new(config).context("Failed to build engine")?;

    match cli.command {
        Commands::Process { input, kind, history } => {
            let result = engine.process(&input, kind, history);
            emit(json, &result, print_processing)
        }
        Commands::Query { x, y } => {
            let cell = engine.query(x, y)?;
            emit(json, &cell, print_query)
        }
        Commands::Compare { first, second } => {
            let cmp = engine.compare(&first, &second);
            emit(json, &cmp, print_comparison)
        }
        Commands::Oracle { question } => {
            let answer = engine.oracle(&question);
            emit(json, &answer, print_oracle)
        }
        Commands::Stats => emit(json, &engine.stats(), print_stats),
        Commands::Interactive => interactive(&mut engine, json),
        Commands::Anomalies { .. } => Ok(()),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn emit<T: Serialize>(json: bool, value: &T, human: fn(&T)) -> Result<()> {
    if json {
        print_json(value)
    } else {
        human(value);
        Ok(())
    }
}

fn ternary_string(states: &[i8]) -> String {
    states
        .iter()
        .map(|&s| match s {
            1 => '+',
            -1 => '-',
            _ => '0',
        })
        .collect()
}

fn print_processing(r: &ProcessingResult) {
    println!("input:    {} ({})", r.input, r.input_type);
    println!("outputs:  {}", ternary_string(&r.result.outputs));
    println!(
        "energy:   {} [{}]  +{} 0{} -{}",
        r.result.energy,
        r.energy_label,
        r.result.distribution.positive,
        r.result.distribution.neutral,
        r.result.distribution.negative
    );
    println!("decoded:  {} ({})", r.decoded_value, r.decoded_hex);
    println!(
        "ticks:    {} ({}) in {:.3}ms",
        r.result.ticks, r.result.reason, r.elapsed_ms
    );
    if let Some(history) = &r.result.history {
        for (i, states) in history.iter().enumerate() {
            println!("  t{:<4} {}", i, ternary_string(states));
        }
    }
}

fn print_query(q: &CellQuery) {
    println!("anna ({}, {}) -> matrix [{}][{}]", q.x, q.y, q.row, q.col);
    println!("value:    {}", q.value);
    println!(
        "mirror:   {} (sum {}{})",
        q.mirror_value,
        q.value as i16 + q.mirror_value as i16,
        if q.anomalous { ", ANOMALY" } else { "" }
    );
    print_processing(&q.processing);
}

fn print_comparison(c: &Comparison) {
    println!("A: {} -> {}", c.first.input, ternary_string(&c.first.result.outputs));
    println!("B: {} -> {}", c.second.input, ternary_string(&c.second.result.outputs));
    println!("similarity: {:.4}", c.similarity);
    println!("match:      {:.1}%", c.match_percentage);
}

fn print_oracle(o: &OracleAnswer) {
    println!("{}", o.question);
    println!(
        "  {} (confidence {:.1}%, energy {})",
        o.answer,
        o.confidence * 100.0,
        o.energy
    );
}

fn print_stats(s: &EngineStats) {
    println!("matrix loaded:   {}", s.matrix_loaded);
    println!(
        "topology:        {} neurons ({} in / {} out), {} neighbors, max {} ticks",
        s.population, s.num_inputs, s.num_outputs, s.num_neighbors, s.max_ticks
    );
    println!("ternary weights: {}", s.ternary_weights);
    println!("weight energy:   {}", s.weight_energy);
    if let Some(m) = &s.matrix {
        println!(
            "matrix:          {}x{}, min {}, max {}, mean {:.4}",
            m.rows, m.cols, m.min, m.max, m.mean
        );
        println!(
            "cells:           +{} 0{} -{} ({} placeholders)",
            m.positive_count, m.zero_count, m.negative_count, m.placeholder_count
        );
        println!(
            "symmetry:        {} symmetric pairs, {} anomalies",
            m.symmetric_pairs, m.anomaly_count
        );
    }
}

fn print_interactive_help() {
    println!("commands:");
    println!("  process <input>        run an input (type auto-detected)");
    println!("  compare <a> | <b>      compare two inputs");
    println!("  oracle <question>      yes/no answer");
    println!("  query <x> <y>          matrix cell at Anna coordinates");
    println!("  stats                  engine statistics");
    println!("  help                   this list");
    println!("  quit                   exit");
    println!("anything else is processed as input");
}

fn interactive(engine: &mut AigarthEngine, json: bool) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    print_interactive_help();

    loop {
        print!("aigarth> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (cmd, rest) = line.split_once(' ').unwrap_or((line, ""));
        let rest = rest.trim();

        match cmd {
            "quit" | "exit" | "q" => break,
            "help" | "?" => print_interactive_help(),
            "stats" => emit(json, &engine.stats(), print_stats)?,
            "process" => emit(json, &engine.process(rest, None, false), print_processing)?,
            "oracle" => emit(json, &engine.oracle(rest), print_oracle)?,
            "compare" => match rest.split_once('|') {
                Some((a, b)) => emit(json, &engine.compare(a.trim(), b.trim()), print_comparison)?,
                None => println!("usage: compare <a> | <b>"),
            },
            "query" => {
                let coords: Vec<i64> = rest
                    .split(|c: char| c == ',' || c.is_whitespace())
                    .filter(|s| !s.is_empty())
                    .filter_map(|s| s.parse().ok())
                    .collect();
                match coords.as_slice() {
                    [x, y] => match engine.query(*x, *y) {
                        Ok(cell) => emit(json, &cell, print_query)?,
                        Err(e) => println!("error: {}", e),
                    },
                    _ => println!("usage: query <x> <y>"),
                }
            }
            _ => emit(json, &engine.process(line, None, false), print_processing)?,
        }
    }
    Ok(())
}
