//! Tabular regressors used to combine base forecasts.

mod forest;
mod linear;
mod traits;
mod tree;

pub use forest::RandomForestRegressor;
pub use linear::LinearRegression;
pub use traits::{BoxedRegressor, Regressor};
pub use tree::DecisionTreeRegressor;

