use clap::Parser;

/// Computes how legislators' votes align with the positions of advocacy organizations.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON file with the paths of the inputs and the options of the run.
    /// Relative paths in this file are resolved against its directory.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path) The legislators, with their yea and nay votes. Overrides the path that may be
    /// specified with the --config option.
    #[clap(short, long, value_parser)]
    pub legislators: Option<String>,

    /// (file path) The bills, with their vote counts and the positions of the organizations.
    /// Overrides the path that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub bills: Option<String>,

    /// (file path, 'stdout' or empty) Where to write the comparison data in JSON format.
    /// Overrides the path that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (default 6) Minimum number of combined house and senate votes against a bill for it to
    /// be considered contested.
    #[clap(short, long, value_parser)]
    pub threshold: Option<u64>,

    /// (file path) A previously generated output. If provided, votealign will check that the
    /// computed output matches it, ignoring the generation timestamp.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
