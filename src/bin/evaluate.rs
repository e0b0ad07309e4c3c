
use std::error::Error;
use std::path::PathBuf;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use bpred::*;
use bpred::sim::simulate;

/// Evaluate one prediction scheme over a branch trace.
#[derive(Parser, Debug)]
struct Args {
    /// Trace file ('<hex pc> <0|1>' per line). Reads stdin when omitted.
    trace: Option<PathBuf>,

    /// Prediction scheme
    #[arg(short, long, value_enum, default_value_t = Scheme::Static)]
    scheme: Scheme,

    /// Number of bits of global history (gshare and tournament only)
    #[arg(long, default_value_t = 13)]
    ghistory_bits: usize,

    /// Number of bits of local history (tournament only)
    #[arg(long, default_value_t = 10)]
    lhistory_bits: usize,

    /// Number of program counter bits used to select a local history
    /// (tournament only). The custom scheme is sized by a JSON --config.
    #[arg(long, default_value_t = 10)]
    pc_index_bits: usize,

    /// JSON engine configuration (replaces all of the options above)
    #[arg(long)]
    config: Option<PathBuf>,

    /// List the branches with the most mispredictions
    #[arg(long, default_value_t = 0)]
    worst: usize,
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let cfg = match &args.config {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig {
            scheme: args.scheme,
            ghistory_bits: args.ghistory_bits,
            lhistory_bits: args.lhistory_bits,
            pc_index_bits: args.pc_index_bits,
            ..Default::default()
        },
    };

    let trace = match &args.trace {
        Some(path) => TextTrace::from_file(path)?,
        None => TextTrace::from_reader(std::io::stdin().lock(), "stdin")?,
    };
    println!("[*] Loaded {} records from {}", trace.num_entries(), trace.name());

    let mut engine = Engine::new(&cfg)?;
    println!("[*] {} predictor, {} storage bits", cfg.scheme, engine.storage_bits());

    let stats = simulate(&mut engine, trace.as_slice());
    println!("Branches:           {:10}", stats.global_brns());
    println!("Incorrect:          {:10}", stats.global_miss());
    println!("Misprediction Rate: {:10.3}", stats.misprediction_rate());

    if let Engine::Custom(tage) = &engine {
        println!();
        println!("[*] Per-component statistics:");
        println!("      Base component: {} misses, {} hits",
            tage.stat.base_miss, tage.stat.base_hits
        );
        for (idx, comp) in tage.comp.iter().enumerate() {
            println!("      Component[{}] ({:3} bits of history): {} misses, {} hits, {:.2}% utilization",
                idx, comp.cfg.history_len,
                tage.stat.comp_miss[idx], tage.stat.comp_hits[idx],
                comp.utilization(),
            );
        }
        println!("      {} allocations, {} forced, {} resets",
            tage.stat.alcs, tage.stat.forced_alcs, tage.stat.resets
        );
    }

    if args.worst > 0 {
        println!();
        println!("[*] Branches with the most mispredictions:");
        for (pc, data) in stats.get_low_rate_branches(args.worst) {
            println!("  {:016x} {:8}/{:8} {:.4}",
                pc, data.hits, data.occ, data.hit_rate()
            );
        }
    }
    Ok(())
}
