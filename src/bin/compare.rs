
use std::error::Error;
use std::path::PathBuf;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use bpred::*;
use bpred::sim::simulate;

/// Run every prediction scheme over the same branch trace.
#[derive(Parser, Debug)]
struct Args {
    /// Trace file ('<hex pc> <0|1>' per line)
    trace: PathBuf,

    /// Number of bits of global history for gshare
    #[arg(long, default_value_t = 13)]
    gshare_bits: usize,

    /// Tournament widths: global history, local history, pc index
    #[arg(long, num_args = 3, value_names = ["G", "L", "P"], default_values_t = [9, 10, 10])]
    tournament: Vec<usize>,
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let trace = TextTrace::from_file(&args.trace)?;
    println!("[*] Loaded {} records from {}", trace.num_entries(), trace.name());

    let (g, l, p) = match args.tournament.as_slice() {
        &[g, l, p] => (g, l, p),
        _ => return Err("expected three tournament widths".into()),
    };
    let configs = [
        EngineConfig::static_taken(),
        EngineConfig::gshare(args.gshare_bits),
        EngineConfig::tournament(g, l, p),
        EngineConfig::custom(),
    ];

    // Each engine owns its own tables
    for cfg in configs.iter() {
        let mut engine = Engine::new(cfg)?;
        let stats = simulate(&mut engine, trace.as_slice());
        println!("[*] {:12} {:8} storage bits, {:8}/{:8} incorrect ({:.3}%)",
            cfg.scheme.to_string(),
            engine.storage_bits(),
            stats.global_miss(),
            stats.global_brns(),
            stats.misprediction_rate(),
        );
    }
    Ok(())
}
