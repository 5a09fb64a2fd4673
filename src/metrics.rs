//! Common comparison metrics for regression output.

use ndarray::{ArrayBase, Data, Ix1};

/// Regression metrics, called on the predictions with the ground truth as
/// argument.
///
/// ```ignore
/// let rmse = predictions.root_mean_squared_error(test.targets());
/// ```
pub trait Regression<T> {
    /// Mean absolute error between two continuous variables
    fn mean_absolute_error(&self, compare_to: T) -> f64;
    /// Mean squared error between two continuous variables
    fn mean_squared_error(&self, compare_to: T) -> f64;
    /// Square root of the mean squared error
    fn root_mean_squared_error(&self, compare_to: T) -> f64;
    /// R squared coefficient, the proportion of the variance in the dependent
    /// variable that is predictable from the independent variable
    fn r2(&self, compare_to: T) -> f64;
}

impl<D, D2> Regression<&ArrayBase<D2, Ix1>> for ArrayBase<D, Ix1>
where
    D: Data<Elem = f64>,
    D2: Data<Elem = f64>,
{
    fn mean_absolute_error(&self, compare_to: &ArrayBase<D2, Ix1>) -> f64 {
        (self - compare_to).mapv(f64::abs).mean().unwrap()
    }

    fn mean_squared_error(&self, compare_to: &ArrayBase<D2, Ix1>) -> f64 {
        (self - compare_to).mapv(|x| x * x).mean().unwrap()
    }

    fn root_mean_squared_error(&self, compare_to: &ArrayBase<D2, Ix1>) -> f64 {
        self.mean_squared_error(compare_to).sqrt()
    }

    // r2 = 1 - sum((pred_i - y_i)^2)/sum((mean_y - y_i)^2)
    // the mean is taken over `compare_to`, the ground truth
    fn r2(&self, compare_to: &ArrayBase<D2, Ix1>) -> f64 {
        let mean = compare_to.mean().unwrap();

        1.0 - (self - compare_to).mapv(|x| x * x).sum()
            / (compare_to.mapv(|x| (x - mean) * (x - mean)).sum() + 1e-10)
    }
}
