use clap::Parser;
use std::path::PathBuf;

/// Per-country MBTI survey dashboard.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) Survey CSV with a `Country` column and one column per type variant.
    /// Overrides the path from --config. Defaults to countries.csv.
    #[clap(short, long, value_parser)]
    pub data: Option<PathBuf>,

    /// (file path, optional) JSON settings file (dataPath, preferredCountry, rankedPair, topN).
    #[clap(short, long, value_parser)]
    pub config: Option<PathBuf>,

    /// (optional) Country selected at startup. Defaults to the configured preferred country,
    /// or the first row when that country is absent.
    #[clap(long, value_parser)]
    pub country: Option<String>,

    /// Print the three views as text to the standard output instead of opening a window.
    #[clap(long, takes_value = false)]
    pub report: bool,

    /// (directory, optional) Render the three charts as PNG files into the given
    /// directory and exit.
    #[clap(long, value_parser)]
    pub export: Option<PathBuf>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard error.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
