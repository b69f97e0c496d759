//! Black-Scholes option Greeks
//!
//! Closed-form sensitivities for European options on a non-dividend-paying
//! underlying:
//! - Delta (∂V/∂S): Sensitivity to underlying price
//! - Gamma (∂²V/∂S²): Rate of change of Delta
//! - Vega (∂V/∂σ): Sensitivity to volatility
//! - Theta (∂V/∂t): Time decay
//! - Rho (∂V/∂r): Sensitivity to interest rate
//!
//! Every function shares the same d1/d2 terms:
//! d1 = [ln(S/K) + (r + σ²/2)T] / (σ√T), d2 = d1 - σ√T

use crate::error::{Result, RiskError};
use crate::stats::standard_normal;
use serde::{Deserialize, Serialize};
use statrs::distribution::{Continuous, ContinuousCDF, Normal};

/// Option type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionKind {
    Call,
    Put,
}

/// Black-Scholes inputs for a single European option
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionParams {
    /// Underlying spot price
    pub spot: f64,

    /// Strike price
    pub strike: f64,

    /// Continuously compounded risk-free rate
    pub rate: f64,

    /// Annualized volatility of the underlying
    pub volatility: f64,

    /// Time to expiration in years
    pub time_to_expiry: f64,

    /// Call or put
    pub kind: OptionKind,
}

/// Greeks for a single option
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Greeks {
    /// Delta: ∂V/∂S
    pub delta: f64,

    /// Gamma: ∂²V/∂S²
    pub gamma: f64,

    /// Vega: ∂V/∂σ (per 1% change in volatility)
    pub vega: f64,

    /// Theta: ∂V/∂t (per calendar day)
    pub theta: f64,

    /// Rho: ∂V/∂r (per 1% change in interest rate)
    pub rho: f64,
}

impl OptionParams {
    pub fn new(
        spot: f64,
        strike: f64,
        rate: f64,
        volatility: f64,
        time_to_expiry: f64,
        kind: OptionKind,
    ) -> Self {
        Self {
            spot,
            strike,
            rate,
            volatility,
            time_to_expiry,
            kind,
        }
    }

    pub fn call(spot: f64, strike: f64, rate: f64, volatility: f64, time_to_expiry: f64) -> Self {
        Self::new(spot, strike, rate, volatility, time_to_expiry, OptionKind::Call)
    }

    pub fn put(spot: f64, strike: f64, rate: f64, volatility: f64, time_to_expiry: f64) -> Self {
        Self::new(spot, strike, rate, volatility, time_to_expiry, OptionKind::Put)
    }

    /// Validate inputs for Greeks calculation
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("Spot price", self.spot),
            ("Strike price", self.strike),
            ("Volatility", self.volatility),
            ("Time to expiry", self.time_to_expiry),
        ];

        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(RiskError::InvalidParameter(format!(
                    "{} must be positive and finite, got {}",
                    name, value
                )));
            }
        }

        if !self.rate.is_finite() {
            return Err(RiskError::InvalidParameter(format!(
                "Risk-free rate must be finite, got {}",
                self.rate
            )));
        }

        Ok(())
    }

    /// Calculate d1 and d2 for Black-Scholes
    fn d1_d2(&self) -> Result<(f64, f64)> {
        self.validate()?;

        let sigma_sqrt_t = self.volatility * self.time_to_expiry.sqrt();
        if sigma_sqrt_t == 0.0 {
            return Err(RiskError::DivisionByZero(
                "Volatility times square root of time underflows to zero".to_string(),
            ));
        }

        let numerator = (self.spot / self.strike).ln()
            + (self.rate + 0.5 * self.volatility * self.volatility) * self.time_to_expiry;
        let d1 = numerator / sigma_sqrt_t;

        Ok((d1, d1 - sigma_sqrt_t))
    }

    fn discount_factor(&self) -> f64 {
        (-self.rate * self.time_to_expiry).exp()
    }
}

/// Terms shared by every Greek
struct Terms {
    d1: f64,
    d2: f64,
    normal: Normal,
}

impl Terms {
    fn new(params: &OptionParams) -> Result<Self> {
        let (d1, d2) = params.d1_d2()?;
        Ok(Self {
            d1,
            d2,
            normal: standard_normal()?,
        })
    }

    fn delta(&self, params: &OptionParams) -> f64 {
        let n_d1 = self.normal.cdf(self.d1);
        match params.kind {
            OptionKind::Call => n_d1,
            OptionKind::Put => n_d1 - 1.0,
        }
    }

    fn gamma(&self, params: &OptionParams) -> f64 {
        self.normal.pdf(self.d1)
            / (params.spot * params.volatility * params.time_to_expiry.sqrt())
    }

    fn vega(&self, params: &OptionParams) -> f64 {
        params.spot * self.normal.pdf(self.d1) * params.time_to_expiry.sqrt() / 100.0
    }

    fn theta(&self, params: &OptionParams) -> f64 {
        let decay = -params.spot * self.normal.pdf(self.d1) * params.volatility
            / (2.0 * params.time_to_expiry.sqrt());
        let carry = params.rate * params.strike * params.discount_factor();

        let annual = match params.kind {
            OptionKind::Call => decay - carry * self.normal.cdf(self.d2),
            OptionKind::Put => decay + carry * self.normal.cdf(-self.d2),
        };
        annual / 365.0
    }

    fn rho(&self, params: &OptionParams) -> f64 {
        let k_t_df = params.strike * params.time_to_expiry * params.discount_factor();
        match params.kind {
            OptionKind::Call => k_t_df * self.normal.cdf(self.d2) / 100.0,
            OptionKind::Put => -k_t_df * self.normal.cdf(-self.d2) / 100.0,
        }
    }

    fn price(&self, params: &OptionParams) -> f64 {
        let pv_strike = params.strike * params.discount_factor();
        match params.kind {
            OptionKind::Call => {
                params.spot * self.normal.cdf(self.d1) - pv_strike * self.normal.cdf(self.d2)
            }
            OptionKind::Put => {
                pv_strike * self.normal.cdf(-self.d2) - params.spot * self.normal.cdf(-self.d1)
            }
        }
    }
}

/// Black-Scholes option value
pub fn price(params: &OptionParams) -> Result<f64> {
    Ok(Terms::new(params)?.price(params))
}

/// Delta: Φ(d1) for a call, Φ(d1) - 1 for a put
pub fn delta(params: &OptionParams) -> Result<f64> {
    Ok(Terms::new(params)?.delta(params))
}

/// Gamma, identical for calls and puts
pub fn gamma(params: &OptionParams) -> Result<f64> {
    Ok(Terms::new(params)?.gamma(params))
}

/// Vega per 1% volatility change, identical for calls and puts
pub fn vega(params: &OptionParams) -> Result<f64> {
    Ok(Terms::new(params)?.vega(params))
}

/// Theta per calendar day
pub fn theta(params: &OptionParams) -> Result<f64> {
    Ok(Terms::new(params)?.theta(params))
}

/// Rho per 1% rate change
pub fn rho(params: &OptionParams) -> Result<f64> {
    Ok(Terms::new(params)?.rho(params))
}

/// Calculate all Greeks for a single option
pub fn greeks(params: &OptionParams) -> Result<Greeks> {
    let terms = Terms::new(params)?;

    Ok(Greeks {
        delta: terms.delta(params),
        gamma: terms.gamma(params),
        vega: terms.vega(params),
        theta: terms.theta(params),
        rho: terms.rho(params),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn atm_call() -> OptionParams {
        OptionParams::call(100.0, 100.0, 0.05, 0.20, 1.0)
    }

    fn atm_put() -> OptionParams {
        OptionParams::put(100.0, 100.0, 0.05, 0.20, 1.0)
    }

    #[test]
    fn test_call_option_greeks() {
        let greeks = greeks(&atm_call()).unwrap();

        // Reference values for S = K = 100, r = 5%, σ = 20%, T = 1
        assert_relative_eq!(greeks.delta, 0.636830651, epsilon = 1e-6);
        assert_relative_eq!(greeks.gamma, 0.018762017, epsilon = 1e-6);
        assert_relative_eq!(greeks.vega, 0.375240347, epsilon = 1e-6);
        assert_relative_eq!(greeks.theta, -6.414027546 / 365.0, epsilon = 1e-6);
        assert_relative_eq!(greeks.rho, 0.532324815, epsilon = 1e-6);
    }

    #[test]
    fn test_put_option_greeks() {
        let greeks = greeks(&atm_put()).unwrap();

        assert_relative_eq!(greeks.delta, 0.636830651 - 1.0, epsilon = 1e-6);
        assert!(greeks.gamma > 0.0);
        assert!(greeks.vega > 0.0);
        assert!(greeks.theta < 0.0);
        assert!(greeks.rho < 0.0);
    }

    #[test]
    fn test_price() {
        assert_relative_eq!(price(&atm_call()).unwrap(), 10.450583572, epsilon = 1e-6);
        assert_relative_eq!(price(&atm_put()).unwrap(), 5.573526022, epsilon = 1e-6);
    }

    #[test]
    fn test_put_call_parity() {
        let call = atm_call();
        let put = atm_put();
        let forward_gap = call.spot - call.strike * (-call.rate * call.time_to_expiry).exp();

        assert_relative_eq!(
            price(&call).unwrap() - price(&put).unwrap(),
            forward_gap,
            epsilon = 1e-9
        );
        assert_relative_eq!(
            delta(&call).unwrap() - delta(&put).unwrap(),
            1.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_single_greeks_match_bundle() {
        let params = OptionParams::put(95.0, 105.0, 0.02, 0.35, 0.5);
        let all = greeks(&params).unwrap();

        assert_eq!(delta(&params).unwrap(), all.delta);
        assert_eq!(gamma(&params).unwrap(), all.gamma);
        assert_eq!(vega(&params).unwrap(), all.vega);
        assert_eq!(theta(&params).unwrap(), all.theta);
        assert_eq!(rho(&params).unwrap(), all.rho);
    }

    #[test]
    fn test_delta_matches_finite_difference() {
        let params = OptionParams::call(110.0, 100.0, 0.03, 0.25, 0.75);
        let bump = 1e-4;

        let mut up = params.clone();
        up.spot += bump;
        let mut down = params.clone();
        down.spot -= bump;

        let fd = (price(&up).unwrap() - price(&down).unwrap()) / (2.0 * bump);
        assert_relative_eq!(delta(&params).unwrap(), fd, epsilon = 1e-6);
    }

    #[test]
    fn test_deep_moneyness_bounds() {
        let deep_itm_call = OptionParams::call(1_000.0, 10.0, 0.01, 0.1, 0.1);
        assert!(delta(&deep_itm_call).unwrap() <= 1.0);
        assert_relative_eq!(delta(&deep_itm_call).unwrap(), 1.0, epsilon = 1e-9);

        let deep_otm_put = OptionParams::put(1_000.0, 10.0, 0.01, 0.1, 0.1);
        assert!(delta(&deep_otm_put).unwrap() <= 0.0);
        assert_relative_eq!(delta(&deep_otm_put).unwrap(), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_invalid_inputs() {
        // Negative underlying price
        let result = delta(&OptionParams::call(-100.0, 100.0, 0.05, 0.20, 1.0));
        assert!(matches!(result, Err(RiskError::InvalidParameter(_))));

        // Negative volatility
        let result = delta(&OptionParams::call(100.0, 100.0, 0.05, -0.20, 1.0));
        assert!(matches!(result, Err(RiskError::InvalidParameter(_))));

        // Expired option
        let result = greeks(&OptionParams::put(100.0, 100.0, 0.05, 0.20, 0.0));
        assert!(matches!(result, Err(RiskError::InvalidParameter(_))));

        // Zero strike
        let result = price(&OptionParams::put(100.0, 0.0, 0.05, 0.20, 1.0));
        assert!(matches!(result, Err(RiskError::InvalidParameter(_))));

        // Non-finite rate
        let result = delta(&OptionParams::call(100.0, 100.0, f64::NAN, 0.20, 1.0));
        assert!(matches!(result, Err(RiskError::InvalidParameter(_))));
    }

    #[test]
    fn test_negative_rate_allowed() {
        let params = OptionParams::call(100.0, 100.0, -0.01, 0.20, 1.0);
        let delta = delta(&params).unwrap();
        assert!(delta > 0.0 && delta < 1.0);
    }
}
