//! Downhill simplex search

use sheen_core::pbrt::*;

/// Reflection coefficient.
const RHO: Float = 1.0;

/// Expansion coefficient.
const CHI: Float = 2.0;

/// Contraction coefficient.
const PSI: Float = 0.5;

/// Shrink coefficient.
const SIGMA: Float = 0.5;

/// Result of a simplex search.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct NelderMeadResult<const N: usize> {
    /// Best vertex found.
    pub x: [Float; N],

    /// Objective value at `x`.
    pub fval: Float,

    /// Number of iterations performed.
    pub iterations: usize,

    /// Number of objective evaluations.
    pub evaluations: usize,

    /// True if the tolerance was met before the iteration cap.
    pub converged: bool,
}

/// Minimize `f` with the Nelder-Mead downhill simplex method starting from an
/// explicit simplex of `N + 1` vertices.
///
/// The search stops when both the largest coordinate distance of any vertex
/// from the best vertex and the largest objective difference from the best
/// value are within `tolerance`, or after `max_iters` iterations. Hitting the
/// iteration cap is not an error; the best vertex is returned with
/// `converged` cleared.
///
/// * `f`         - Objective function.
/// * `simplex`   - Initial simplex (`N + 1` vertices).
/// * `tolerance` - Absolute tolerance on vertices and objective values.
/// * `max_iters` - Iteration cap.
pub fn minimize<F, const N: usize>(
    mut f: F,
    simplex: Vec<[Float; N]>,
    tolerance: Float,
    max_iters: usize,
) -> NelderMeadResult<N>
where
    F: FnMut(&[Float; N]) -> Float,
{
    assert_eq!(simplex.len(), N + 1, "simplex needs N + 1 vertices");

    let mut evaluations = 0;
    let mut eval = |x: &[Float; N]| {
        evaluations += 1;
        f(x)
    };

    let mut vertices: Vec<([Float; N], Float)> = simplex.into_iter().map(|x| (x, eval(&x))).collect();
    sort_vertices(&mut vertices);

    let mut iterations = 1;
    let mut converged = false;

    while iterations < max_iters {
        if has_converged(&vertices, tolerance) {
            converged = true;
            break;
        }

        // Centroid of every vertex but the worst.
        let mut xbar = [0.0; N];
        for (x, _) in &vertices[..N] {
            for k in 0..N {
                xbar[k] += x[k];
            }
        }
        for v in xbar.iter_mut() {
            *v /= N as Float;
        }

        let (worst, f_worst) = vertices[N];
        let f_best = vertices[0].1;
        let f_second_worst = vertices[N - 1].1;

        let xr = affine(&xbar, &worst, 1.0 + RHO, -RHO);
        let fxr = eval(&xr);

        let mut shrink = false;
        if fxr < f_best {
            let xe = affine(&xbar, &worst, 1.0 + RHO * CHI, -RHO * CHI);
            let fxe = eval(&xe);
            vertices[N] = if fxe < fxr { (xe, fxe) } else { (xr, fxr) };
        } else if fxr < f_second_worst {
            vertices[N] = (xr, fxr);
        } else if fxr < f_worst {
            // Contract outside.
            let xc = affine(&xbar, &worst, 1.0 + PSI * RHO, -PSI * RHO);
            let fxc = eval(&xc);
            if fxc <= fxr {
                vertices[N] = (xc, fxc);
            } else {
                shrink = true;
            }
        } else {
            // Contract inside.
            let xcc = affine(&xbar, &worst, 1.0 - PSI, PSI);
            let fxcc = eval(&xcc);
            if fxcc < f_worst {
                vertices[N] = (xcc, fxcc);
            } else {
                shrink = true;
            }
        }

        if shrink {
            let best = vertices[0].0;
            for vertex in vertices.iter_mut().skip(1) {
                let x = affine(&best, &vertex.0, 1.0 - SIGMA, SIGMA);
                *vertex = (x, eval(&x));
            }
        }

        iterations += 1;
        sort_vertices(&mut vertices);
    }

    let (x, fval) = vertices[0];
    NelderMeadResult {
        x,
        fval,
        iterations,
        evaluations,
        converged,
    }
}

/// Returns the simplex `[x0, x0 + δe₀, ..., x0 + δeₙ₋₁]`.
///
/// * `x0`    - First vertex.
/// * `delta` - Offset along each coordinate axis.
pub fn axis_aligned_simplex<const N: usize>(x0: [Float; N], delta: Float) -> Vec<[Float; N]> {
    let mut simplex = Vec::with_capacity(N + 1);
    simplex.push(x0);
    for k in 0..N {
        let mut x = x0;
        x[k] += delta;
        simplex.push(x);
    }
    simplex
}

/// Returns `s * p + t * q` per coordinate.
#[inline]
fn affine<const N: usize>(p: &[Float; N], q: &[Float; N], s: Float, t: Float) -> [Float; N] {
    let mut r = [0.0; N];
    for k in 0..N {
        r[k] = s * p[k] + t * q[k];
    }
    r
}

/// Orders the vertices by objective value, best first. Ties keep their order
/// and NaN values sort last.
fn sort_vertices<const N: usize>(vertices: &mut [([Float; N], Float)]) {
    vertices.sort_by(|a, b| a.1.total_cmp(&b.1));
}

/// Checks the vertex and objective spread against the tolerance.
fn has_converged<const N: usize>(vertices: &[([Float; N], Float)], tolerance: Float) -> bool {
    let (best, f_best) = &vertices[0];
    vertices[1..].iter().all(|(x, fx)| {
        abs(fx - f_best) <= tolerance && x.iter().zip(best.iter()).all(|(a, b)| abs(a - b) <= tolerance)
    })
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
