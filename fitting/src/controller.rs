//! Table fitting

use crate::directions::DirectionSamples;
use crate::grid::GridAxis;
use crate::nelder_mead::*;
use crate::objective::objective;
use crate::params::LtcParams;
use crate::reference::ReferenceProvider;
use crate::settings::FitSettings;
use crate::table::*;
use sheen_core::app::{create_progress_reporter, validate_threads};
use sheen_core::pbrt::*;
use std::sync::atomic::{AtomicBool, Ordering};

/// A table entry whose simplex search hit the iteration cap.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct UnconvergedEntry {
    /// Incident angle cosine index.
    pub mu_idx: usize,

    /// Roughness index.
    pub alpha_idx: usize,

    /// Objective value of the stored coefficients.
    pub fval: Float,
}

/// Diagnostics collected while fitting.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FitReport {
    /// Number of fitted entries.
    pub entries: usize,

    /// Total number of objective evaluations.
    pub evaluations: usize,

    /// Entries that did not meet the tolerance, ordered by index.
    pub unconverged: Vec<UnconvergedEntry>,
}

impl FitReport {
    /// Returns true if every entry met the tolerance.
    pub fn all_converged(&self) -> bool {
        self.unconverged.is_empty()
    }

    /// Adds the diagnostics of another report.
    ///
    /// * `other` - The other report.
    pub fn merge(&mut self, other: FitReport) {
        self.entries += other.entries;
        self.evaluations += other.evaluations;
        self.unconverged.extend(other.unconverged);
        self.unconverged.sort_by_key(|e| (e.mu_idx, e.alpha_idx));
    }
}

/// Fit the LTC coefficients of a single table entry.
///
/// * `initial`    - Initial guess.
/// * `reference`  - Reference BRDF values in the order of `directions`.
/// * `directions` - Outgoing directions.
/// * `settings`   - Fit settings.
pub fn fit_cell(
    initial: &LtcParams,
    reference: &[Float],
    directions: &DirectionSamples,
    settings: &FitSettings,
) -> NelderMeadResult<3> {
    minimize(
        |x: &[Float; 3]| objective(&LtcParams::from(*x), directions, reference),
        axis_aligned_simplex(initial.to_array(), settings.delta),
        settings.tolerance,
        settings.max_iters,
    )
}

/// Fit one table row. Roughness values are visited from the largest to the
/// smallest; the first entry starts from `LtcParams::INITIAL` and every later
/// entry starts from the result of the previous one.
///
/// * `mu_idx`     - Incident angle cosine index.
/// * `row`        - Table row receiving the coefficients.
/// * `mus`        - Incident angle cosines.
/// * `alphas`     - Roughness values.
/// * `directions` - Outgoing directions.
/// * `provider`   - Reference BRDF provider.
/// * `settings`   - Fit settings.
pub fn fit_row<P: ReferenceProvider + ?Sized>(
    mu_idx: usize,
    row: &mut [Float],
    mus: &GridAxis,
    alphas: &GridAxis,
    directions: &DirectionSamples,
    provider: &P,
    settings: &FitSettings,
) -> Result<FitReport, String> {
    if mu_idx >= mus.len() {
        return Err(format!("Invalid row index {mu_idx} for {} rows", mus.len()));
    }
    if row.len() != alphas.len() * PARAMS_PER_ENTRY {
        return Err(format!(
            "Row {mu_idx} holds {} values but {} roughness entries need {}",
            row.len(),
            alphas.len(),
            alphas.len() * PARAMS_PER_ENTRY
        ));
    }

    let mu = mus[mu_idx];
    let theta_i = mu.acos();
    debug!("Fitting row {mu_idx} (mu = {mu:.4}, theta_i = {theta_i:.4})");

    let mut report = FitReport::default();
    let mut guess = LtcParams::INITIAL;
    for alpha_idx in (0..alphas.len()).rev() {
        let alpha = alphas[alpha_idx];

        let reference = provider.eval_reference(alpha, theta_i, 0.0, directions)?;
        if reference.len() != directions.len() {
            return Err(format!(
                "Reference for mu = {mu}, alpha = {alpha} has {} values, expected {}",
                reference.len(),
                directions.len()
            ));
        }

        let result = fit_cell(&guess, &reference, directions, settings);
        let params = LtcParams::from(result.x);
        store_in_row(row, alpha_idx, &params);

        report.entries += 1;
        report.evaluations += result.evaluations;
        if !result.converged {
            warn!(
                "Entry (mu = {mu:.4}, alpha = {alpha:.4}) did not converge in {} iterations; error {:e}",
                result.iterations, result.fval
            );
            report.unconverged.push(UnconvergedEntry {
                mu_idx,
                alpha_idx,
                fval: result.fval,
            });
        }

        guess = params;
    }

    report.unconverged.reverse();
    debug!("Row {mu_idx} done ({} evaluations)", report.evaluations);
    Ok(report)
}

/// Fit the whole table. Rows are independent and are fitted by
/// `settings.n_threads` workers; the result does not depend on the number of
/// workers. The first reference failure aborts the run.
///
/// * `mus`        - Incident angle cosines.
/// * `alphas`     - Roughness values.
/// * `directions` - Outgoing directions.
/// * `provider`   - Reference BRDF provider.
/// * `settings`   - Fit settings.
pub fn fit_table<P: ReferenceProvider + ?Sized>(
    mus: &GridAxis,
    alphas: &GridAxis,
    directions: &DirectionSamples,
    provider: &P,
    settings: &FitSettings,
) -> Result<(LtcTable, FitReport), String> {
    settings.validate()?;

    let mut table = LtcTable::new(mus.len(), alphas.len());
    let n_threads = validate_threads(settings.n_threads);
    let failed = AtomicBool::new(false);

    info!(
        "Fitting {}x{} table entries on {} directions with {} threads",
        mus.len(),
        alphas.len(),
        directions.len(),
        n_threads
    );

    let progress = create_progress_reporter(mus.len() as u64, !settings.show_progress);
    progress.set_message("Fitting LTC table");

    let results = crossbeam::scope(|scope| {
        let (tx_worker, rx_worker) = crossbeam_channel::bounded::<(usize, &mut [Float])>(n_threads);
        let (tx_result, rx_result) = crossbeam_channel::unbounded::<Result<FitReport, String>>();

        // Spawn worker threads.
        for _ in 0..n_threads {
            let rx_worker = rx_worker.clone();
            let tx_result = tx_result.clone();
            let progress = &progress;
            let failed = &failed;
            scope.spawn(move |_| {
                for (mu_idx, row) in rx_worker.iter() {
                    // Drain the remaining rows once a row has failed.
                    if failed.load(Ordering::Acquire) {
                        continue;
                    }

                    let result = fit_row(mu_idx, row, mus, alphas, directions, provider, settings);
                    if result.is_err() {
                        failed.store(true, Ordering::Release);
                    }
                    progress.inc(1);

                    if tx_result.send(result).is_err() {
                        break;
                    }
                }
            });
        }
        drop(rx_worker); // Drop extra rx since we've cloned one for each worker.
        drop(tx_result);

        // Send work.
        for (mu_idx, row) in table.rows_mut().enumerate() {
            if tx_worker.send((mu_idx, row)).is_err() {
                break;
            }
        }
        drop(tx_worker);

        rx_result.iter().collect::<Vec<_>>()
    })
    .map_err(|_| "A fitting worker panicked".to_string())?;

    let mut report = FitReport::default();
    for result in results {
        match result {
            Ok(row_report) => report.merge(row_report),
            Err(err) => {
                progress.abandon_with_message("Fitting failed");
                return Err(err);
            }
        }
    }

    progress.finish_with_message("Fitting complete");
    info!(
        "Fitted {} entries with {} objective evaluations; {} entries did not converge",
        report.entries,
        report.evaluations,
        report.unconverged.len()
    );

    Ok((table, report))
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
