//! # Elastic Net
//!
//! Linear regression with combined L1/L2 penalization. The penalty blends the
//! lasso and ridge terms through a mixing ratio, so a single estimator covers
//! the whole range from pure feature selection to pure shrinkage.
//!
//! ## Example
//!
//! ```ignore
//! use entrack::prelude::*;
//! use entrack_elasticnet::ElasticNet;
//!
//! let train = Dataset::from_csv("train.csv", "quality")?;
//!
//! let model = ElasticNet::params()
//!     .penalty(0.3)
//!     .l1_ratio(0.8)
//!     .fit(&train)?;
//! ```
//!
//! ## Implementation
//!
//! The solver is coordinate descent: each coefficient is optimized in turn
//! while all the others are held fixed, cycling until the coefficients
//! stabilize or the iteration budget runs out. Convergence is confirmed
//! through the duality gap. With a random seed set, the coordinate visiting
//! order is shuffled each sweep instead of cycling in column order.

use ndarray::Array1;
use serde::{Deserialize, Serialize};

mod algorithm;
mod error;
mod hyperparams;

pub use error::{ElasticNetError, Result};
pub use hyperparams::{ElasticNetParams, ElasticNetValidParams};

/// A fitted elastic net model.
///
/// Contains the separating hyperplane, the (optional) intercept, and solver
/// diagnostics: the duality gap at termination and the number of sweeps that
/// were needed. Serializes to JSON for local persistence and artifact upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElasticNet {
    hyperplane: Array1<f64>,
    intercept: f64,
    duality_gap: f64,
    n_steps: u32,
}

impl ElasticNet {
    /// Create a default parameter set for the construction of an elastic net
    /// model.
    ///
    /// By default an intercept is fitted; call `.with_intercept(false)` on
    /// the parameter set to disable it.
    pub fn params() -> ElasticNetParams {
        ElasticNetParams::new()
    }

    /// Create a ridge-only model
    pub fn ridge() -> ElasticNetParams {
        ElasticNetParams::new().l1_ratio(0.0)
    }

    /// Create a lasso-only model
    pub fn lasso() -> ElasticNetParams {
        ElasticNetParams::new().l1_ratio(1.0)
    }
}
