//! Application related stuff

use crate::pbrt::Float;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};

lazy_static! {
    /// The global application options.
    pub static ref OPTIONS: Options = Options::parse();
}

/// System wide options.
#[derive(Parser, Clone, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Options {
    /// Number of threads to use for fitting.
    #[arg(
        long = "nthreads",
        short = 't',
        value_name = "NUM",
        default_value_t = 1,
        help = "Use specified number of threads for fitting table rows."
    )]
    n_threads: usize,

    /// Suppress all text output other than error messages.
    #[arg(long, help = "Suppress all text output other than error messages.")]
    pub quiet: bool,

    /// Table resolution along the incident angle cosine.
    #[arg(
        long = "mu-res",
        value_name = "NUM",
        default_value_t = 32,
        help = "Number of incident angle cosine values in the table."
    )]
    pub mu_res: usize,

    /// Table resolution along the roughness.
    #[arg(
        long = "alpha-res",
        value_name = "NUM",
        default_value_t = 32,
        help = "Number of roughness values in the table."
    )]
    pub alpha_res: usize,

    /// Polar resolution of the outgoing directions.
    #[arg(
        long = "theta-res",
        value_name = "NUM",
        default_value_t = 32,
        help = "Number of outgoing polar angles compared during the fit."
    )]
    pub theta_res: usize,

    /// Azimuthal resolution of the outgoing directions.
    #[arg(
        long = "phi-res",
        value_name = "NUM",
        default_value_t = 32,
        help = "Number of outgoing azimuthal angles compared during the fit."
    )]
    pub phi_res: usize,

    /// Convergence tolerance of the simplex search.
    #[arg(
        long,
        value_name = "FLOAT",
        default_value_t = 1e-5,
        help = "Convergence tolerance of the simplex search."
    )]
    pub tolerance: Float,

    /// Iteration cap of the simplex search.
    #[arg(
        long = "max-iters",
        value_name = "NUM",
        default_value_t = 10000,
        help = "Maximum number of simplex iterations per table entry."
    )]
    pub max_iters: usize,

    /// Offset of the initial simplex vertices.
    #[arg(
        long,
        value_name = "FLOAT",
        default_value_t = 0.05,
        help = "Offset of the initial simplex vertices from the initial guess."
    )]
    pub delta: Float,

    /// Output path prefix.
    #[arg(
        long = "outfile",
        short = 'o',
        value_name = "PREFIX",
        default_value = "data/ltc_table_single_sggx",
        help = "Write the table files using the given path prefix."
    )]
    pub out_prefix: String,

    /// Skip the `.npy` output.
    #[arg(long = "no-npy", help = "Do not write the table as a .npy file.")]
    pub no_npy: bool,

    /// Skip the C++ table literal output.
    #[arg(long = "no-cpp", help = "Do not write the table as a C++ literal.")]
    pub no_cpp: bool,

    /// Write an OpenEXR image of the table.
    #[arg(long, help = "Also write the table as an OpenEXR image.")]
    pub exr: bool,

    /// Write PNG heat maps of the table.
    #[arg(long, help = "Also write heat maps of the three coefficients as PNG.")]
    pub png: bool,

    /// Qualified name of the C++ table.
    #[arg(
        long = "table-name",
        value_name = "NAME",
        default_value = "SheenLTC::_ltcParamTableSingleSGGX",
        help = "Qualified name of the C++ table variable."
    )]
    pub table_name: String,

    /// Load an existing table instead of fitting a new one.
    #[arg(
        long = "from-npy",
        value_name = "FILE",
        help = "Export an existing .npy table instead of fitting."
    )]
    pub from_npy: Option<String>,
}

impl Options {
    /// Returns the number of threads to use.
    pub fn threads(&self) -> usize {
        validate_threads(self.n_threads)
    }
}

/// Returns a usable number of worker threads for the requested count.
///
/// * `n` - Requested number of threads.
pub fn validate_threads(n: usize) -> usize {
    let max_threads = num_cpus::get();
    match n {
        0 => {
            warn!("Invalid nthreads");
            1
        }
        n if n > max_threads => {
            warn!("Num threads > max logical CPUs {}", max_threads);
            max_threads
        }
        n => n,
    }
}

/// Creates a progress bar with `len` steps; hidden when `quiet` is set.
///
/// * `len`   - Total number of steps.
/// * `quiet` - Suppress the output.
pub fn create_progress_reporter(len: u64, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }

    let style = ProgressStyle::with_template(
        "{msg} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({eta})",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("=> ");

    let progress = ProgressBar::new(len);
    progress.set_style(style);
    progress
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_published_tables() {
        let options = Options::parse_from(["sheen-ltc"]);
        assert_eq!(options.mu_res, 32);
        assert_eq!(options.alpha_res, 32);
        assert_eq!(options.theta_res, 32);
        assert_eq!(options.phi_res, 32);
        assert_eq!(options.tolerance, 1e-5);
        assert_eq!(options.max_iters, 10000);
        assert_eq!(options.delta, 0.05);
        assert_eq!(options.out_prefix, "data/ltc_table_single_sggx");
        assert!(!options.exr && !options.png && !options.no_npy && !options.no_cpp);
        assert!(options.from_npy.is_none());
    }

    #[test]
    fn parses_overrides() {
        let options = Options::parse_from([
            "sheen-ltc",
            "--mu-res",
            "8",
            "--alpha-res",
            "4",
            "-t",
            "2",
            "--exr",
            "-o",
            "out/table",
        ]);
        assert_eq!(options.mu_res, 8);
        assert_eq!(options.alpha_res, 4);
        assert_eq!(options.n_threads, 2);
        assert!(options.exr);
        assert_eq!(options.out_prefix, "out/table");
    }

    #[test]
    fn zero_threads_falls_back_to_one() {
        assert_eq!(validate_threads(0), 1);
        assert_eq!(validate_threads(1), 1);
        assert!(validate_threads(usize::MAX) <= num_cpus::get());
    }
}
