use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use env_logger::Env;
use log::{LevelFilter, info};
use pw_gen_core::{
    DEFAULT_ATTEMPTS, DEFAULT_CHARSET, DEFAULT_MAX_LENGTH, DEFAULT_ORDER, EndBehavior, Generator,
    GeneratorConfig, SampleOptions, Seed,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

mod source;

#[derive(Parser, Debug)]
#[command(author, version, about = "Markov chain pseudo-word generator", long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short = 'v', long, action = ArgAction::Count)]
    verbose: u8,

    /// Decrease verbosity (-q, -qq)
    #[arg(short = 'q', long, action = ArgAction::Count)]
    quiet: u8,

    /// Remote JSON array of seed words
    #[arg(long, value_name = "URL", default_value = source::DEFAULT_SEED_URL)]
    url: String,

    /// Local seed file (JSON, or one seed per line); replaces --url
    #[arg(long, value_name = "PATH", conflicts_with = "url")]
    seed_file: Option<PathBuf>,

    /// HTTP timeout in seconds
    #[arg(long, value_name = "SECS", default_value_t = 10)]
    timeout: u64,

    /// Maximum context length
    #[arg(long, default_value_t = DEFAULT_ORDER)]
    order: usize,

    /// Allowed characters, taken literally
    #[arg(long, default_value = DEFAULT_CHARSET)]
    charset: String,

    /// Retry until a word has at least this many characters
    #[arg(long, value_name = "LEN")]
    min_length: Option<usize>,

    /// Maximum number of characters (walk steps)
    #[arg(long, value_name = "LEN", default_value_t = DEFAULT_MAX_LENGTH)]
    max_length: usize,

    /// Walks tried before giving up on --min-length
    #[arg(long, value_name = "COUNT", default_value_t = DEFAULT_ATTEMPTS)]
    attempts: usize,

    /// Number of words to print
    #[arg(short = 'n', long, value_name = "COUNT", default_value_t = 1)]
    count: usize,

    /// Seed of the random generator, for reproducible output
    #[arg(long, value_name = "SEED")]
    rng_seed: Option<u64>,

    /// End a walk on the end marker instead of skipping the step
    #[arg(long)]
    stop_at_end: bool,

    /// Reject words already present in the seed list
    #[arg(long)]
    avoid_seed_words: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let value = match &cli.seed_file {
        Some(path) => source::read_seed_file(path)?,
        None => source::fetch_seeds(&cli.url, Duration::from_secs(cli.timeout))?,
    };
    let seed = Seed::try_from(value)?;
    println!("{} seeds loaded!", seed.len());

    let config = GeneratorConfig::builder()
        .order(cli.order)
        .charset(cli.charset.as_str())
        .build()?;
    let generator = Generator::from_config(seed, &config)?;
    info!(
        "Generator ready: {} tokens, {} contexts",
        generator.dictionary().len(),
        generator.model().len()
    );

    let mut options = SampleOptions::new(cli.min_length, cli.max_length);
    options.set_attempts(cli.attempts)?;
    options.avoid_seed_words = cli.avoid_seed_words;
    if cli.stop_at_end {
        options.end_behavior = EndBehavior::Stop;
    }

    let mut rng = match cli.rng_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    for _ in 0..cli.count {
        let word = generator
            .sample_with_rng(&options, &mut rng)
            .context("unable to generate a word")?;
        println!("Markov Chain Result: {word}");
    }

    Ok(())
}

fn init_logging(verbose: u8, quiet: u8) {
    let level = if quiet > 0 {
        match quiet {
            1 => LevelFilter::Warn,
            _ => LevelFilter::Error,
        }
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("info"));
    builder.format_timestamp_millis();
    builder.filter_level(level);
    let _ = builder.try_init();
}
