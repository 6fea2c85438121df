use clap::Parser;

/// This is a tallying program for the weekly merit recognition votes.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path) The file describing the session: roster, nominations, ballots, rules and
    /// schedules. See the manual of merit_core for the format.
    #[clap(short, long, value_parser)]
    pub config: String,
    /// (file path) A reference file containing the summary of a session in JSON format. If provided,
    /// meritdays will check that the computed summary matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the summary of the session will be written in JSON
    /// format to the given location. Setting this option overrides the outputPath of the session file.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (integer) Seed for the random draws (discarded ballot, executive bonus). Overrides the
    /// randomSeed of the session file. Without a seed, the draws use the system entropy.
    #[clap(long, value_parser)]
    pub seed: Option<u64>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
