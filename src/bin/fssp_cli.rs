use clap::{Parser, ValueEnum};
use fssp_engines::{
    default_generation_limit, FsspEngine, ParallelEngine, Row, Ruleset, SequentialEngine,
};
use num_format::{CustomFormat, Grouping, ToFormattedString};

#[derive(Parser, Debug)]
#[command(version, about)]
struct CLIParser {
    /// Path to the rule file (state list + transition rules)
    rules: String,

    /// Number of interior cells in the row
    #[arg(default_value_t = 10)]
    size: usize,

    /// The engine to use for the simulation
    #[arg(short, long, value_enum, default_value_t = Engine::Parallel)]
    engine: Engine,

    /// Upper bound on the number of partitions; defaults to the available
    /// hardware parallelism
    #[arg(short, long)]
    partitions: Option<usize>,

    /// Stop after this many generations even if the row never fires
    #[arg(short, long)]
    max_generations: Option<u64>,

    /// Print the row after every generation (forces the sequential engine)
    #[arg(short, long)]
    dump: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Engine {
    /// Whole-row reference loop
    Sequential,
    /// Partitioned engine with per-generation handshakes
    Parallel,
}

fn main() {
    let args = CLIParser::parse();
    let fmt = CustomFormat::builder()
        .grouping(Grouping::Standard)
        .separator("_")
        .build()
        .unwrap();

    let rules = Ruleset::from_file(&args.rules).unwrap();
    let row = Row::first(args.size, &rules);
    let limit = args
        .max_generations
        .unwrap_or_else(|| default_generation_limit(args.size));

    let timer = std::time::Instant::now();
    let outcome = if args.dump {
        SequentialEngine::new()
            .run_with(&rules, row, limit, |t, row| {
                println!("{t:>6} {}", row.render(&rules));
            })
            .unwrap()
    } else {
        let engine: Box<dyn FsspEngine> = match args.engine {
            Engine::Sequential => Box::new(SequentialEngine::new()),
            Engine::Parallel => Box::new(match args.partitions {
                Some(p) => ParallelEngine::new(p),
                None => ParallelEngine::with_available_parallelism(),
            }),
        };
        engine.run(&rules, row, limit).unwrap()
    };
    let elapsed = timer.elapsed().as_secs_f64();

    if !args.dump {
        println!("{}", outcome.row.render(&rules));
    }
    if outcome.fired {
        println!(
            "Fired {} cells after {} generations in {:.3} secs",
            args.size.to_formatted_string(&fmt),
            outcome.generations.to_formatted_string(&fmt),
            elapsed
        );
    } else {
        println!(
            "Did not fire within {} generations ({:.3} secs)",
            outcome.generations.to_formatted_string(&fmt),
            elapsed
        );
    }
}
