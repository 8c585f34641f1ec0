//! Slow feature extraction
//!
//! A [`Flow`] is a chain of trainable [`Node`]s. Training feeds each node
//! the output of the nodes before it, so a node always sees data in the
//! shape it will see at execution time. Every node works on matrices with
//! one row per sample and one column per signal.

use crate::config::FeatureConfig;
use crate::error::{Error, Result};
use nalgebra::{DMatrix, DVector, SymmetricEigen};
use std::cmp::Ordering;

/// Directions with variance below this fraction of the largest variance
/// are dropped when whitening
const VARIANCE_CUTOFF: f64 = 1e-12;

/// Covariance of time differences needs at least two differences
const MIN_TRAINING_SAMPLES: usize = 3;

const ICA_MAX_ITERATIONS: usize = 500;
const ICA_TOLERANCE: f64 = 1e-7;

/// One stage of a [`Flow`]
pub trait Node {
    fn name(&self) -> &'static str;

    /// Fit the node to `x` (rows = samples)
    fn train(&mut self, x: &DMatrix<f64>) -> Result<()>;

    /// Transform `x` with the trained parameters
    fn execute(&self, x: &DMatrix<f64>) -> Result<DMatrix<f64>>;

    /// Output width, known once trained
    fn output_dim(&self) -> Option<usize>;
}

/// Centre-then-project transform shared by the linear nodes
#[derive(Debug, Clone)]
struct Affine {
    mean: DVector<f64>,
    projection: DMatrix<f64>,
}

impl Affine {
    fn apply(&self, x: &DMatrix<f64>) -> Result<DMatrix<f64>> {
        check_width(x, self.mean.len())?;
        Ok(centered(x, &self.mean) * &self.projection)
    }
}

fn check_width(x: &DMatrix<f64>, expected: usize) -> Result<()> {
    if x.ncols() != expected {
        return Err(Error::DimensionMismatch {
            expected,
            actual: x.ncols(),
        });
    }
    Ok(())
}

fn check_samples(x: &DMatrix<f64>) -> Result<()> {
    if x.nrows() < MIN_TRAINING_SAMPLES {
        return Err(Error::InsufficientSamples {
            required: MIN_TRAINING_SAMPLES,
            actual: x.nrows(),
        });
    }
    Ok(())
}

fn column_means(x: &DMatrix<f64>) -> DVector<f64> {
    DVector::from_iterator(x.ncols(), x.column_iter().map(|c| c.mean()))
}

fn centered(x: &DMatrix<f64>, mean: &DVector<f64>) -> DMatrix<f64> {
    let mut out = x.clone();
    for (j, mut column) in out.column_iter_mut().enumerate() {
        column.add_scalar_mut(-mean[j]);
    }
    out
}

/// Sample covariance of already centred data
fn covariance(centred: &DMatrix<f64>) -> DMatrix<f64> {
    let n = centred.nrows().saturating_sub(1).max(1) as f64;
    (centred.transpose() * centred) / n
}

/// Eigen-pairs of a symmetric matrix, indices sorted by eigenvalue
fn sorted_eigen(m: DMatrix<f64>, descending: bool) -> (SymmetricEigen<f64, nalgebra::Dyn>, Vec<usize>) {
    let eigen = SymmetricEigen::new(m);
    let mut order: Vec<usize> = (0..eigen.eigenvalues.len()).collect();
    order.sort_by(|&a, &b| {
        let ord = eigen.eigenvalues[a]
            .partial_cmp(&eigen.eigenvalues[b])
            .unwrap_or(Ordering::Equal);
        if descending {
            ord.reverse()
        } else {
            ord
        }
    });
    (eigen, order)
}

/// Projection mapping centred data with covariance `cov` to unit
/// covariance. Columns follow descending variance; degenerate directions
/// are dropped, so the result may have fewer columns than `cov`.
fn whitening_projection(cov: DMatrix<f64>) -> DMatrix<f64> {
    let dim = cov.nrows();
    let (eigen, order) = sorted_eigen(cov, true);
    let largest = order.first().map_or(0.0, |&i| eigen.eigenvalues[i]);

    let kept: Vec<usize> = order
        .into_iter()
        .filter(|&i| largest > 0.0 && eigen.eigenvalues[i] > VARIANCE_CUTOFF * largest)
        .collect();

    DMatrix::from_fn(dim, kept.len(), |r, k| {
        let i = kept[k];
        eigen.eigenvectors[(r, i)] / eigen.eigenvalues[i].sqrt()
    })
}

/// All monomials of total degree `1..=degree` over `vars` variables, as
/// lists of variable indices, graded and in lexicographic order within a
/// degree
fn monomials(vars: usize, degree: usize) -> Vec<Vec<usize>> {
    let mut terms = Vec::new();
    let mut current: Vec<Vec<usize>> = vec![Vec::new()];

    for _ in 0..degree {
        let next: Vec<Vec<usize>> = current
            .iter()
            .flat_map(|term| {
                let first = term.last().copied().unwrap_or(0);
                (first..vars).map(move |i| {
                    let mut extended = term.clone();
                    extended.push(i);
                    extended
                })
            })
            .collect();
        terms.extend(next.iter().cloned());
        current = next;
    }

    terms
}

/// Expands the input into every monomial up to a degree, without the
/// constant term
#[derive(Debug, Clone)]
pub struct PolynomialExpansion {
    degree: usize,
    input_dim: Option<usize>,
    terms: Vec<Vec<usize>>,
}

impl PolynomialExpansion {
    pub fn new(degree: usize) -> Self {
        PolynomialExpansion {
            degree,
            input_dim: None,
            terms: Vec::new(),
        }
    }

    /// Number of output columns for `vars` inputs
    pub fn expanded_dim(vars: usize, degree: usize) -> usize {
        monomials(vars, degree).len()
    }
}

impl Node for PolynomialExpansion {
    fn name(&self) -> &'static str {
        "PolynomialExpansion"
    }

    fn train(&mut self, x: &DMatrix<f64>) -> Result<()> {
        self.input_dim = Some(x.ncols());
        self.terms = monomials(x.ncols(), self.degree);
        Ok(())
    }

    fn execute(&self, x: &DMatrix<f64>) -> Result<DMatrix<f64>> {
        let input_dim = self.input_dim.ok_or(Error::NotTrained("PolynomialExpansion"))?;
        check_width(x, input_dim)?;

        Ok(DMatrix::from_fn(x.nrows(), self.terms.len(), |r, k| {
            self.terms[k].iter().map(|&i| x[(r, i)]).product()
        }))
    }

    fn output_dim(&self) -> Option<usize> {
        self.input_dim.map(|_| self.terms.len())
    }
}

/// PCA whitening: zero mean, identity covariance, degenerate directions
/// removed
#[derive(Debug, Clone, Default)]
pub struct Whitening {
    state: Option<Affine>,
}

impl Whitening {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Node for Whitening {
    fn name(&self) -> &'static str {
        "Whitening"
    }

    fn train(&mut self, x: &DMatrix<f64>) -> Result<()> {
        check_samples(x)?;
        let mean = column_means(x);
        let projection = whitening_projection(covariance(&centered(x, &mean)));
        log::debug!(
            "Whitening kept {} of {} directions",
            projection.ncols(),
            x.ncols()
        );
        self.state = Some(Affine { mean, projection });
        Ok(())
    }

    fn execute(&self, x: &DMatrix<f64>) -> Result<DMatrix<f64>> {
        self.state
            .as_ref()
            .ok_or(Error::NotTrained("Whitening"))?
            .apply(x)
    }

    fn output_dim(&self) -> Option<usize> {
        self.state.as_ref().map(|s| s.projection.ncols())
    }
}

/// Linear slow feature analysis.
///
/// Finds the projections of the input with unit variance whose time
/// derivative has the smallest variance. Rows of the training matrix must
/// be consecutive in time. Outputs are ordered slowest first.
#[derive(Debug, Clone)]
pub struct SlowFeatureAnalysis {
    requested: Option<usize>,
    state: Option<Affine>,
    slowness: Vec<f64>,
}

impl SlowFeatureAnalysis {
    /// Keep `output_dim` features, or every non-degenerate one when `None`
    pub fn new(output_dim: Option<usize>) -> Self {
        SlowFeatureAnalysis {
            requested: output_dim,
            state: None,
            slowness: Vec::new(),
        }
    }

    /// Derivative variance of each output on the training data, ascending
    pub fn slowness(&self) -> &[f64] {
        &self.slowness
    }
}

impl Node for SlowFeatureAnalysis {
    fn name(&self) -> &'static str {
        "SlowFeatureAnalysis"
    }

    fn train(&mut self, x: &DMatrix<f64>) -> Result<()> {
        check_samples(x)?;
        let n = x.nrows();
        let mean = column_means(x);
        let centred = centered(x, &mean);
        let sphere = whitening_projection(covariance(&centred));

        let available = sphere.ncols();
        let wanted = self.requested.unwrap_or(available);
        if available == 0 || wanted > available {
            return Err(Error::OutputDim {
                requested: wanted.max(1),
                available,
            });
        }

        let z = centred * &sphere;
        let dz = z.rows(1, n - 1).into_owned() - z.rows(0, n - 1);
        let derivative_cov = (dz.transpose() * &dz) / (n - 2).max(1) as f64;

        let (eigen, order) = sorted_eigen(derivative_cov, false);
        let rotation = DMatrix::from_fn(available, wanted, |r, k| eigen.eigenvectors[(r, order[k])]);

        self.slowness = order.iter().take(wanted).map(|&i| eigen.eigenvalues[i]).collect();
        self.state = Some(Affine {
            mean,
            projection: sphere * rotation,
        });
        Ok(())
    }

    fn execute(&self, x: &DMatrix<f64>) -> Result<DMatrix<f64>> {
        self.state
            .as_ref()
            .ok_or(Error::NotTrained("SlowFeatureAnalysis"))?
            .apply(x)
    }

    fn output_dim(&self) -> Option<usize> {
        self.state.as_ref().map(|s| s.projection.ncols())
    }
}

/// Independent component analysis (symmetric FastICA, log-cosh contrast).
///
/// Whitens internally, then rotates the whitened signals to maximise
/// non-Gaussianity. Output order and sign are arbitrary.
#[derive(Debug, Clone, Default)]
pub struct IndependentComponents {
    state: Option<Affine>,
    converged: bool,
}

impl IndependentComponents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the last training run reached the tolerance
    pub fn converged(&self) -> bool {
        self.converged
    }
}

/// W <- (W W^T)^(-1/2) W
fn symmetric_decorrelation(w: &DMatrix<f64>) -> DMatrix<f64> {
    let eigen = SymmetricEigen::new(w * w.transpose());
    let inv_sqrt = DVector::from_iterator(
        eigen.eigenvalues.len(),
        eigen
            .eigenvalues
            .iter()
            .map(|&d| if d > 0.0 { 1.0 / d.sqrt() } else { 0.0 }),
    );
    &eigen.eigenvectors * DMatrix::from_diagonal(&inv_sqrt) * eigen.eigenvectors.transpose() * w
}

impl Node for IndependentComponents {
    fn name(&self) -> &'static str {
        "IndependentComponents"
    }

    fn train(&mut self, x: &DMatrix<f64>) -> Result<()> {
        check_samples(x)?;
        let mean = column_means(x);
        let centred = centered(x, &mean);
        let sphere = whitening_projection(covariance(&centred));
        let z = centred * &sphere;
        let k = z.ncols();
        let n = z.nrows() as f64;

        let mut w = DMatrix::<f64>::identity(k, k);
        self.converged = false;

        for iteration in 0..ICA_MAX_ITERATIONS {
            let g = (&z * w.transpose()).map(f64::tanh);
            let g_prime_mean = DVector::from_iterator(
                k,
                g.column_iter().map(|c| c.iter().map(|v| 1.0 - v * v).sum::<f64>() / n),
            );

            let update = (g.transpose() * &z) / n - DMatrix::from_diagonal(&g_prime_mean) * &w;
            let next = symmetric_decorrelation(&update);

            let change = (&next * w.transpose())
                .diagonal()
                .iter()
                .map(|d| (d.abs() - 1.0).abs())
                .fold(0.0, f64::max);
            w = next;

            if change < ICA_TOLERANCE {
                log::debug!("ICA converged after {} iterations", iteration + 1);
                self.converged = true;
                break;
            }
        }

        if !self.converged {
            log::warn!(
                "ICA did not converge within {} iterations",
                ICA_MAX_ITERATIONS
            );
        }

        self.state = Some(Affine {
            mean,
            projection: sphere * w.transpose(),
        });
        Ok(())
    }

    fn execute(&self, x: &DMatrix<f64>) -> Result<DMatrix<f64>> {
        self.state
            .as_ref()
            .ok_or(Error::NotTrained("IndependentComponents"))?
            .apply(x)
    }

    fn output_dim(&self) -> Option<usize> {
        self.state.as_ref().map(|s| s.projection.ncols())
    }
}

/// Ordered chain of nodes trained front to back
#[derive(Default)]
pub struct Flow {
    nodes: Vec<Box<dyn Node>>,
}

impl Flow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expansion, optional whitening, SFA, optional ICA
    pub fn from_config(features: &FeatureConfig) -> Self {
        let mut flow = Flow::new();
        flow.push(PolynomialExpansion::new(features.degree));
        if features.whitening {
            flow.push(Whitening::new());
        }
        flow.push(SlowFeatureAnalysis::new(features.output_dim));
        if features.ica {
            flow.push(IndependentComponents::new());
        }
        flow
    }

    pub fn push(&mut self, node: impl Node + 'static) {
        self.nodes.push(Box::new(node));
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node_names(&self) -> Vec<&'static str> {
        self.nodes.iter().map(|n| n.name()).collect()
    }

    /// Train every node on the output of the nodes before it
    pub fn train(&mut self, x: &DMatrix<f64>) -> Result<()> {
        let last = self.nodes.len().saturating_sub(1);
        let mut data = x.clone();

        for (i, node) in self.nodes.iter_mut().enumerate() {
            node.train(&data)?;
            log::debug!("Trained {} on {} x {}", node.name(), data.nrows(), data.ncols());
            if i < last {
                data = node.execute(&data)?;
            }
        }
        Ok(())
    }

    pub fn execute(&self, x: &DMatrix<f64>) -> Result<DMatrix<f64>> {
        self.nodes
            .iter()
            .try_fold(x.clone(), |data, node| node.execute(&data))
    }

    pub fn output_dim(&self) -> Option<usize> {
        self.nodes.last().and_then(|n| n.output_dim())
    }
}
