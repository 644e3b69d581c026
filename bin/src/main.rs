#[macro_use]
extern crate log;

use sheen_core::app::*;
use sheen_core::fileutil::*;
use sheen_fitting::export::*;
use sheen_fitting::*;

/// Pixels per table entry in the heat maps.
const HEATMAP_SCALE: usize = 8;

fn main() {
    // Initialize `env_logger`.
    env_logger::init();

    if let Err(e) = run(&OPTIONS) {
        error!("{e}");
        std::process::exit(1);
    }
}

/// Fit or load the table and write the requested outputs.
///
/// * `options` - Command line options.
fn run(options: &Options) -> Result<(), String> {
    let table = match &options.from_npy {
        Some(path) => read_npy(&absolute_path(path)?)?,
        None => fit(options)?,
    };

    write_outputs(options, &table)
}

/// Fit a new table.
///
/// * `options` - Command line options.
fn fit(options: &Options) -> Result<LtcTable, String> {
    let mus = GridAxis::clamped_linspace(options.mu_res)?;
    let alphas = GridAxis::clamped_linspace(options.alpha_res)?;
    let directions = DirectionSamples::new(options.theta_res, options.phi_res)?;
    let settings = FitSettings {
        tolerance: options.tolerance,
        max_iters: options.max_iters,
        delta: options.delta,
        n_threads: options.threads(),
        show_progress: !options.quiet,
    };

    let (table, report) = fit_table(&mus, &alphas, &directions, &SheenReference, &settings)?;

    if !report.all_converged() {
        warn!(
            "{} of {} entries hit the iteration cap; their coefficients are best effort",
            report.unconverged.len(),
            report.entries
        );
        for entry in report.unconverged.iter() {
            warn!(
                "  mu = {:.4}, alpha = {:.4}: error {:e}",
                mus[entry.mu_idx], alphas[entry.alpha_idx], entry.fval
            );
        }
    }

    Ok(table)
}

/// Write the table in every requested format using the output prefix.
///
/// * `options` - Command line options.
/// * `table`   - The table.
fn write_outputs(options: &Options, table: &LtcTable) -> Result<(), String> {
    let prefix = &options.out_prefix;
    ensure_parent_dir(prefix)?;

    // A loaded table already exists as `.npy`.
    if !options.no_npy && options.from_npy.is_none() {
        let path = format!("{prefix}.npy");
        write_npy(&path, table)?;
        info!("Saved as {path}");
    }

    if !options.no_cpp {
        let path = format!("{prefix}.cpp");
        write_cpp(&path, table, &options.table_name)?;
        info!("Saved as {path}");
    }

    if options.exr {
        let path = format!("{prefix}.exr");
        write_exr_table(&path, table)?;
        info!("Saved as {path}");
    }

    if options.png {
        let path = format!("{prefix}_heatmap.png");
        write_heatmaps(&path, table, HEATMAP_SCALE)?;
        info!("Saved as {path}");
    }

    Ok(())
}
