use approx::{abs_diff_eq, abs_diff_ne};
use ndarray::{Array1, ArrayBase, ArrayView1, ArrayView2, Axis, CowArray, Data, Ix1, Ix2};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use entrack::traits::{Fit, ParamGuard, Predict};
use entrack::Dataset;

use crate::error::{ElasticNetError, Result};
use crate::hyperparams::{ElasticNetParams, ElasticNetValidParams};
use crate::ElasticNet;

impl Fit<Dataset> for ElasticNetValidParams {
    type Object = ElasticNet;
    type Error = ElasticNetError;

    /// Fit an elastic net model on the dataset's feature matrix and target
    /// vector.
    ///
    /// Returns a fitted [`ElasticNet`] which can `predict` values of the
    /// target variable for new feature records.
    fn fit(&self, dataset: &Dataset) -> Result<ElasticNet> {
        if dataset.nsamples() == 0 {
            return Err(ElasticNetError::NotEnoughSamples);
        }

        let (intercept, y) = compute_intercept(self.with_intercept(), dataset.targets().view());
        let (hyperplane, duality_gap, n_steps) =
            coordinate_descent(dataset.records().view(), y.view(), self);

        Ok(ElasticNet {
            hyperplane,
            intercept,
            duality_gap,
            n_steps,
        })
    }
}

impl Fit<Dataset> for ElasticNetParams {
    type Object = ElasticNet;
    type Error = ElasticNetError;

    /// Validate the hyperparameters, then fit; see
    /// [`ElasticNetValidParams::fit`](ElasticNetValidParams).
    fn fit(&self, dataset: &Dataset) -> Result<ElasticNet> {
        self.check_ref()?.fit(dataset)
    }
}

impl<D: Data<Elem = f64>> Predict<&ArrayBase<D, Ix2>, Array1<f64>> for ElasticNet {
    /// Given an input matrix `X` with shape `(n_samples, n_features)`,
    /// `predict` returns the target variable according to the elastic net
    /// learned from the training data distribution.
    fn predict(&self, x: &ArrayBase<D, Ix2>) -> Array1<f64> {
        x.dot(&self.hyperplane) + self.intercept
    }
}

impl Predict<&Dataset, Array1<f64>> for ElasticNet {
    fn predict(&self, dataset: &Dataset) -> Array1<f64> {
        self.predict(dataset.records())
    }
}

/// View the fitted coefficients of an elastic net model
impl ElasticNet {
    /// Get the fitted hyperplane
    pub fn hyperplane(&self) -> &Array1<f64> {
        &self.hyperplane
    }

    /// Get the fitted intercept, 0. if no intercept was fitted
    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Get the number of coordinate sweeps taken by the optimization routine
    pub fn n_steps(&self) -> u32 {
        self.n_steps
    }

    /// Get the duality gap at the end of the optimization routine
    pub fn duality_gap(&self) -> f64 {
        self.duality_gap
    }
}

/// Compute the intercept as the mean of `y` and center `y` around it when an
/// intercept should be fitted, use `0.0` and leave `y` unchanged otherwise.
fn compute_intercept(with_intercept: bool, y: ArrayView1<f64>) -> (f64, CowArray<f64, Ix1>) {
    if with_intercept {
        let y_mean = y.mean().unwrap();
        let y_centered = &y - y_mean;
        (y_mean, y_centered.into())
    } else {
        (0.0, y.into())
    }
}

fn coordinate_descent(
    x: ArrayView2<f64>,
    y: ArrayView1<f64>,
    params: &ElasticNetValidParams,
) -> (Array1<f64>, f64, u32) {
    let n_samples = x.nrows() as f64;
    let n_features = x.ncols();
    let l1_ratio = params.l1_ratio();
    let penalty = params.penalty();

    // coordinate visiting order, reshuffled each sweep when a seed is set
    let mut rng = params.random_seed().map(SmallRng::seed_from_u64);
    let mut order: Vec<usize> = (0..n_features).collect();

    // the parameters of the model
    let mut w = Array1::<f64>::zeros(n_features);
    // the residuals `y - X*w` (since w=0, this is just `y` for now); they are
    // updated during the algorithm as the parameters change
    let mut r = y.to_owned();
    let mut n_steps = 0u32;
    let norm_cols_x = x.map_axis(Axis(0), |col| col.dot(&col));
    let mut gap = 1.0 + params.tolerance();
    let d_w_tol = params.tolerance();
    let tol = params.tolerance() * y.dot(&y);

    while n_steps < params.max_iterations() {
        if let Some(rng) = rng.as_mut() {
            order.shuffle(rng);
        }

        let mut w_max = 0.0f64;
        let mut d_w_max = 0.0f64;
        for &ii in &order {
            if abs_diff_eq!(norm_cols_x[ii], 0.0) {
                continue;
            }

            let w_ii = w[ii];
            let x_slc = x.column(ii);
            if abs_diff_ne!(w_ii, 0.0) {
                r += &(&x_slc * w_ii);
            }

            let tmp = x_slc.dot(&r);
            w[ii] = tmp.signum() * f64::max(tmp.abs() - n_samples * l1_ratio * penalty, 0.0)
                / (norm_cols_x[ii] + n_samples * (1.0 - l1_ratio) * penalty);
            if abs_diff_ne!(w[ii], 0.0) {
                r -= &(&x_slc * w[ii]);
            }

            let d_w_ii = (w[ii] - w_ii).abs();
            d_w_max = f64::max(d_w_max, d_w_ii);
            w_max = f64::max(w_max, w[ii].abs());
        }
        n_steps += 1;

        if n_steps == params.max_iterations() - 1
            || abs_diff_eq!(w_max, 0.0)
            || d_w_max / w_max < d_w_tol
        {
            // We've hit one potential stopping criterion; check the duality
            // gap for the ultimate stopping decision
            gap = duality_gap(x, y, w.view(), r.view(), l1_ratio, penalty);
            if gap < tol {
                break;
            }
        }
    }

    (w, gap, n_steps)
}

fn duality_gap(
    x: ArrayView2<f64>,
    y: ArrayView1<f64>,
    w: ArrayView1<f64>,
    r: ArrayView1<f64>,
    l1_ratio: f64,
    penalty: f64,
) -> f64 {
    let n_samples = x.nrows() as f64;
    let l1_reg = l1_ratio * penalty * n_samples;
    let l2_reg = (1.0 - l1_ratio) * penalty * n_samples;
    let xta = x.t().dot(&r) - &w * l2_reg;

    let dual_norm_xta = xta.fold(0.0f64, |abs_max, &x| abs_max.max(x.abs()));
    let r_norm2 = r.dot(&r);
    let w_norm2 = w.dot(&w);
    let (const_, mut gap) = if dual_norm_xta > l1_reg {
        let const_ = l1_reg / dual_norm_xta;
        let a_norm2 = r_norm2 * const_ * const_;
        (const_, 0.5 * (r_norm2 + a_norm2))
    } else {
        (1.0, r_norm2)
    };
    let l1_norm = w.fold(0.0f64, |sum, w_i| sum + w_i.abs());

    gap += l1_reg * l1_norm - const_ * r.dot(&y)
        + 0.5 * l2_reg * (1.0 + const_ * const_) * w_norm2;

    gap
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use ndarray::{array, s, Array, Array1, Array2};
    use ndarray_rand::rand_distr::Uniform;
    use ndarray_rand::RandomExt;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    use entrack::metrics::Regression;
    use entrack::traits::{Fit, ParamGuard, Predict};
    use entrack::Dataset;

    use super::coordinate_descent;
    use crate::{ElasticNet, ElasticNetError};

    fn elastic_net_objective(
        x: &Array2<f64>,
        y: &Array1<f64>,
        intercept: f64,
        beta: &Array1<f64>,
        alpha: f64,
        lambda: f64,
    ) -> f64 {
        squared_error(x, y, intercept, beta) + lambda * elastic_net_penalty(beta, alpha)
    }

    fn squared_error(x: &Array2<f64>, y: &Array1<f64>, intercept: f64, beta: &Array1<f64>) -> f64 {
        let mut resid = -x.dot(beta);
        resid -= intercept;
        resid += y;
        let mut result = 0.0;
        for r in &resid {
            result += r * r;
        }
        result /= 2.0 * y.len() as f64;
        result
    }

    fn elastic_net_penalty(beta: &Array1<f64>, alpha: f64) -> f64 {
        let mut penalty = 0.0;
        for beta_j in beta {
            penalty += (1.0 - alpha) / 2.0 * beta_j * beta_j + alpha * beta_j.abs();
        }
        penalty
    }

    #[test]
    fn coordinate_descent_lowers_objective() {
        let x = array![[1.0, 0.0], [0.0, 1.0]];
        let y = array![1.0, -1.0];
        let beta = array![0.0, 0.0];
        let intercept = 0.0;
        let alpha = 0.8;
        let lambda = 0.001;

        let params = ElasticNet::params()
            .l1_ratio(alpha)
            .penalty(lambda)
            .max_iterations(3)
            .check_unwrap();

        let objective_start = elastic_net_objective(&x, &y, intercept, &beta, alpha, lambda);
        let opt_result = coordinate_descent(x.view(), y.view(), &params);
        let objective_end = elastic_net_objective(&x, &y, intercept, &opt_result.0, alpha, lambda);

        assert!(objective_start > objective_end);
    }

    #[test]
    fn lasso_zero_works() {
        let dataset = Dataset::new(array![[0.], [0.], [0.]], array![0., 0., 0.]);

        let model = ElasticNet::lasso()
            .penalty(0.1)
            .fit(&dataset)
            .unwrap();

        assert_abs_diff_eq!(model.intercept(), 0.);
        assert_abs_diff_eq!(model.hyperplane(), &array![0.]);
    }

    #[test]
    fn empty_dataset_does_not_fit() {
        let dataset = Dataset::new(Array2::zeros((0, 2)), Array1::zeros(0));

        let err = ElasticNet::params().fit(&dataset).unwrap_err();

        assert!(matches!(err, ElasticNetError::NotEnoughSamples));
    }

    #[test]
    fn lasso_toy_example_works() {
        // Test the lasso path on a toy example for various penalties. When
        // validating against glmnet notice that glmnet divides by n_samples.
        let dataset = Dataset::new(array![[-1.0], [0.0], [1.0]], array![-1.0, 0.0, 1.0]);

        // input for prediction
        let t = array![[2.0], [3.0], [4.0]];

        let model = ElasticNet::lasso().penalty(1e-8).fit(&dataset).unwrap();
        assert_abs_diff_eq!(model.intercept(), 0.0);
        assert_abs_diff_eq!(model.hyperplane(), &array![1.0], epsilon = 1e-6);
        assert_abs_diff_eq!(model.predict(&t), array![2.0, 3.0, 4.0], epsilon = 1e-6);
        assert_abs_diff_eq!(model.duality_gap(), 0.0);

        let model = ElasticNet::lasso().penalty(0.1).fit(&dataset).unwrap();
        assert_abs_diff_eq!(model.intercept(), 0.0);
        assert_abs_diff_eq!(model.hyperplane(), &array![0.85], epsilon = 1e-6);
        assert_abs_diff_eq!(model.predict(&t), array![1.7, 2.55, 3.4], epsilon = 1e-6);
        assert_abs_diff_eq!(model.duality_gap(), 0.0);

        let model = ElasticNet::lasso().penalty(0.5).fit(&dataset).unwrap();
        assert_abs_diff_eq!(model.intercept(), 0.0);
        assert_abs_diff_eq!(model.hyperplane(), &array![0.25], epsilon = 1e-6);
        assert_abs_diff_eq!(model.predict(&t), array![0.5, 0.75, 1.0], epsilon = 1e-6);
        assert_abs_diff_eq!(model.duality_gap(), 0.0);

        let model = ElasticNet::lasso().penalty(1.0).fit(&dataset).unwrap();
        assert_abs_diff_eq!(model.intercept(), 0.0);
        assert_abs_diff_eq!(model.hyperplane(), &array![0.0], epsilon = 1e-6);
        assert_abs_diff_eq!(model.predict(&t), array![0.0, 0.0, 0.0], epsilon = 1e-6);
        assert_abs_diff_eq!(model.duality_gap(), 0.0);
    }

    #[test]
    fn elastic_net_toy_example_works() {
        let dataset = Dataset::new(array![[-1.0], [0.0], [1.0]], array![-1.0, 0.0, 1.0]);

        // for predictions
        let t = array![[2.0], [3.0], [4.0]];

        let model = ElasticNet::params()
            .l1_ratio(0.3)
            .penalty(0.5)
            .fit(&dataset)
            .unwrap();

        assert_abs_diff_eq!(model.intercept(), 0.0);
        assert_abs_diff_eq!(model.hyperplane(), &array![0.50819], epsilon = 1e-3);
        assert_abs_diff_eq!(
            model.predict(&t),
            array![1.0163, 1.5245, 2.0327],
            epsilon = 1e-3
        );
        assert_abs_diff_eq!(model.duality_gap(), 0.0);

        let model = ElasticNet::params()
            .l1_ratio(0.5)
            .penalty(0.5)
            .fit(&dataset)
            .unwrap();

        assert_abs_diff_eq!(model.intercept(), 0.0);
        assert_abs_diff_eq!(model.hyperplane(), &array![0.45454], epsilon = 1e-3);
        assert_abs_diff_eq!(
            model.predict(&t),
            array![0.9090, 1.3636, 1.8181],
            epsilon = 1e-3
        );
        assert_abs_diff_eq!(model.duality_gap(), 0.0);
    }

    #[test]
    fn unpenalized_model_matches_least_squares() {
        // with penalty 0 and l1_ratio 0 the objective reduces to ordinary
        // least squares
        let dataset = Dataset::new(array![[1.0, 0.0], [0.0, 1.0]], array![3.0, 2.0]);

        let model = ElasticNet::params()
            .penalty(0.0)
            .l1_ratio(0.0)
            .fit(&dataset)
            .unwrap();

        assert_abs_diff_eq!(model.intercept(), 2.5);
        assert_abs_diff_eq!(model.hyperplane(), &array![0.5, -0.5], epsilon = 0.001);

        // exactly linear data is reproduced without residual
        let dataset = Dataset::new(
            array![[0.0], [1.0], [2.0], [3.0]],
            array![1.0, 3.0, 5.0, 7.0],
        );

        let model = ElasticNet::params()
            .penalty(0.0)
            .l1_ratio(0.0)
            .fit(&dataset)
            .unwrap();

        assert_abs_diff_eq!(model.intercept(), 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(model.hyperplane(), &array![2.0], epsilon = 1e-6);
    }

    #[test]
    fn fitting_is_deterministic() {
        let mut rng = SmallRng::seed_from_u64(42);
        let x = Array::random_using((50, 10), Uniform::new(-1., 1.), &mut rng);
        let w = Array::random_using(10, Uniform::new(1., 2.), &mut rng);
        let y = x.dot(&w);
        let dataset = Dataset::new(x.clone(), y);

        let params = ElasticNet::params().penalty(0.3).l1_ratio(0.4);
        let first = params.fit(&dataset).unwrap();
        let second = params.fit(&dataset).unwrap();

        assert_eq!(first.hyperplane(), second.hyperplane());
        assert_eq!(first.intercept(), second.intercept());
        assert_eq!(first.predict(&x), second.predict(&x));
    }

    #[test]
    fn seeded_coordinate_order_is_reproducible() {
        let mut rng = SmallRng::seed_from_u64(7);
        let x = Array::random_using((60, 8), Uniform::new(-1., 1.), &mut rng);
        let w = Array::random_using(8, Uniform::new(0., 1.), &mut rng);
        let y = x.dot(&w);
        let dataset = Dataset::new(x, y);

        let params = ElasticNet::params().penalty(0.1).random_seed(1234);
        let first = params.fit(&dataset).unwrap();
        let second = params.fit(&dataset).unwrap();

        assert_eq!(first.hyperplane(), second.hyperplane());
        assert_eq!(first.n_steps(), second.n_steps());
    }

    #[test]
    fn select_subset_of_informative_features() {
        let mut rng = SmallRng::seed_from_u64(42);

        // check that the lasso selects the subset of informative features
        let mut w = Array::random_using(50, Uniform::new(1., 2.), &mut rng);
        w.slice_mut(s![10..]).fill(0.0);

        let x = Array::random_using((100, 50), Uniform::new(-1., 1.), &mut rng);
        let y = x.dot(&w);
        let train = Dataset::new(x, y);

        let model = ElasticNet::lasso()
            .penalty(0.1)
            .max_iterations(1000)
            .tolerance(1e-10)
            .fit(&train)
            .unwrap();

        // the last 40 parameters must be zeroed out
        let num_zeros = model
            .hyperplane()
            .into_iter()
            .filter(|x| **x < 1e-5)
            .count();
        assert_eq!(num_zeros, 40);

        // predict a small testing dataset
        let x = Array::random_using((100, 50), Uniform::new(-1., 1.), &mut rng);
        let y = x.dot(&w);

        let predicted = model.predict(&x);
        assert!(predicted.mean_squared_error(&y) < 0.67);
    }

    #[test]
    fn persisted_model_predicts_identically() {
        let dataset = Dataset::new(array![[-1.0], [0.0], [1.0]], array![-1.0, 0.0, 1.0]);
        let t = array![[2.0], [3.0], [4.0]];

        let model = ElasticNet::lasso().penalty(0.1).fit(&dataset).unwrap();
        let reloaded: ElasticNet =
            serde_json::from_slice(&serde_json::to_vec(&model).unwrap()).unwrap();

        assert_eq!(model.predict(&t), reloaded.predict(&t));
    }
}
