use entrack::traits::ParamGuard;

use crate::error::{ElasticNetError, Result};

/// A verified hyperparameter set ready for the estimation of an elastic net
/// regression model
///
/// See [`ElasticNetParams`](crate::ElasticNetParams) for more information.
#[derive(Clone, Debug, PartialEq)]
pub struct ElasticNetValidParams {
    penalty: f64,
    l1_ratio: f64,
    with_intercept: bool,
    max_iterations: u32,
    tolerance: f64,
    random_seed: Option<u64>,
}

impl ElasticNetValidParams {
    pub fn penalty(&self) -> f64 {
        self.penalty
    }

    pub fn l1_ratio(&self) -> f64 {
        self.l1_ratio
    }

    pub fn with_intercept(&self) -> bool {
        self.with_intercept
    }

    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn random_seed(&self) -> Option<u64> {
        self.random_seed
    }
}

/// A hyperparameter set for elastic net regression
///
/// Configures and minimizes the following objective function:
/// ```ignore
/// 1 / (2 * n_samples) * ||y - Xw||^2_2
///     + penalty * l1_ratio * ||w||_1
///     + 0.5 * penalty * (1 - l1_ratio) * ||w||^2_2
/// ```
///
/// The parameter set can be verified into an
/// [`ElasticNetValidParams`](crate::ElasticNetValidParams) by calling
/// [`ParamGuard::check`]. It is also possible to directly fit a model with
/// [`Fit::fit`](entrack::traits::Fit::fit), which verifies the parameter set
/// before the model estimation and forwards any error.
///
/// # Parameters
/// | Name | Default | Purpose | Range |
/// | :--- | :--- | :--- | :--- |
/// | [penalty](Self::penalty) | `1.0` | Overall penalty strength (`alpha`) | `[0, inf)` |
/// | [l1_ratio](Self::l1_ratio) | `0.5` | Distribution of the penalty between L1 and L2 | `[0.0, 1.0]` |
/// | [with_intercept](Self::with_intercept) | `true` | Fit an intercept | `false`, `true` |
/// | [tolerance](Self::tolerance) | `1e-4` | Relative change of the coefficients below which convergence is checked | `(0, inf)` |
/// | [max_iterations](Self::max_iterations) | `1000` | Maximum number of sweeps | `[1, inf)` |
/// | [random_seed](Self::random_seed) | unset | Shuffled coordinate order, seeded | any `u64` |
#[derive(Clone, Debug, PartialEq)]
pub struct ElasticNetParams(ElasticNetValidParams);

impl Default for ElasticNetParams {
    fn default() -> Self {
        Self::new()
    }
}

/// Configure and fit an elastic net model
impl ElasticNetParams {
    /// Create default elastic net hyperparameters
    pub fn new() -> ElasticNetParams {
        Self(ElasticNetValidParams {
            penalty: 1.0,
            l1_ratio: 0.5,
            with_intercept: true,
            max_iterations: 1000,
            tolerance: 1e-4,
            random_seed: None,
        })
    }

    /// Set the overall penalty parameter of the elastic net, otherwise known
    /// as `alpha`. Use `l1_ratio` to configure how the penalty is distributed
    /// between L1 and L2 regularization.
    pub fn penalty(mut self, penalty: f64) -> Self {
        self.0.penalty = penalty;
        self
    }

    /// Set the l1_ratio parameter. Setting `l1_ratio` to 1.0 is equivalent to
    /// a "Lasso" penalization, setting it to 0.0 to a "Ridge" penalization.
    ///
    /// Defaults to `0.5` if not set; must be between `0.0` and `1.0`.
    pub fn l1_ratio(mut self, l1_ratio: f64) -> Self {
        self.0.l1_ratio = l1_ratio;
        self
    }

    /// Configure whether the model fits an intercept.
    /// Defaults to `true` if not set.
    pub fn with_intercept(mut self, with_intercept: bool) -> Self {
        self.0.with_intercept = with_intercept;
        self
    }

    /// Set the tolerance, the minimum relative change in any of the model
    /// parameters needed for the optimization to continue.
    ///
    /// Defaults to `1e-4` if not set
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.0.tolerance = tolerance;
        self
    }

    /// Set the maximum number of coordinate sweeps for the optimization
    /// routine.
    ///
    /// Defaults to `1000` if not set
    pub fn max_iterations(mut self, max_iterations: u32) -> Self {
        self.0.max_iterations = max_iterations;
        self
    }

    /// Visit coordinates in shuffled order, reproducible through the given
    /// seed. When unset, coordinates are visited cyclically in column order.
    pub fn random_seed(mut self, seed: u64) -> Self {
        self.0.random_seed = Some(seed);
        self
    }
}

impl ParamGuard for ElasticNetParams {
    type Checked = ElasticNetValidParams;
    type Error = ElasticNetError;

    /// Validate the hyperparameters
    fn check_ref(&self) -> Result<&Self::Checked> {
        if self.0.penalty < 0.0 {
            Err(ElasticNetError::InvalidPenalty(self.0.penalty))
        } else if !(0.0..=1.0).contains(&self.0.l1_ratio) {
            Err(ElasticNetError::InvalidL1Ratio(self.0.l1_ratio))
        } else if self.0.tolerance <= 0.0 {
            Err(ElasticNetError::InvalidTolerance(self.0.tolerance))
        } else if self.0.max_iterations == 0 {
            Err(ElasticNetError::NoIterations)
        } else {
            Ok(&self.0)
        }
    }

    fn check(self) -> Result<Self::Checked> {
        self.check_ref()?;
        Ok(self.0)
    }
}
