//! Multi-step price forecasting over the raw close series.
//!
//! Two abstract forecasters are averaged into an ensemble path. The layer is
//! deliberately forgiving: a member that fails to fit is disabled, and any
//! member that cannot produce a forecast of the requested length is replaced
//! by a flat last-observed-price path. Confidence decays with the horizon,
//! 0.05 per step from 0.8, floored at 0.5.

use serde::{Deserialize, Serialize};

use crate::predictor::ModelError;

/// A univariate multi-step price model.
pub trait PriceForecaster: Send + Sync {
    fn fit(&mut self, prices: &[f64]) -> Result<(), ModelError>;

    /// `steps` future prices, or `None` when the model cannot forecast.
    fn forecast(&self, steps: usize) -> Option<Vec<f64>>;
}

/// Forecast paths from both members plus their average.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HorizonForecast {
    pub model_a: Vec<f64>,
    pub model_b: Vec<f64>,
    pub ensemble: Vec<f64>,
    /// max(0.5, 0.8 - 0.05 * steps).
    pub confidence: f64,
}

/// Two-member forecasting ensemble with last-price fallback.
pub struct HorizonForecaster {
    model_a: Option<Box<dyn PriceForecaster>>,
    model_b: Option<Box<dyn PriceForecaster>>,
    last_price: Option<f64>,
}

impl HorizonForecaster {
    pub fn new(model_a: Box<dyn PriceForecaster>, model_b: Box<dyn PriceForecaster>) -> Self {
        Self {
            model_a: Some(model_a),
            model_b: Some(model_b),
            last_price: None,
        }
    }

    /// Fit both members on the price series. A member whose fit fails is
    /// dropped from later forecasts; an empty series is an error.
    pub fn fit(&mut self, prices: &[f64]) -> Result<(), ModelError> {
        let last = match prices.last() {
            Some(&p) => p,
            None => return Err(ModelError::EmptyPriceSeries),
        };
        self.last_price = Some(last);

        if let Some(model) = self.model_a.as_mut() {
            if model.fit(prices).is_err() {
                self.model_a = None;
            }
        }
        if let Some(model) = self.model_b.as_mut() {
            if model.fit(prices).is_err() {
                self.model_b = None;
            }
        }
        Ok(())
    }

    /// Forecast `steps` prices ahead.
    pub fn predict(&self, steps: usize) -> Result<HorizonForecast, ModelError> {
        let last_price = self.last_price.ok_or(ModelError::NotTrained)?;

        let path_a = Self::member_path(&self.model_a, steps, last_price);
        let path_b = Self::member_path(&self.model_b, steps, last_price);
        let ensemble = path_a
            .iter()
            .zip(&path_b)
            .map(|(a, b)| (a + b) / 2.0)
            .collect();

        Ok(HorizonForecast {
            model_a: path_a,
            model_b: path_b,
            ensemble,
            confidence: (0.8 - 0.05 * steps as f64).max(0.5),
        })
    }

    fn member_path(
        member: &Option<Box<dyn PriceForecaster>>,
        steps: usize,
        last_price: f64,
    ) -> Vec<f64> {
        match member.as_ref().and_then(|m| m.forecast(steps)) {
            Some(path) if path.len() == steps && path.iter().all(|p| p.is_finite()) => path,
            _ => vec![last_price; steps],
        }
    }
}
