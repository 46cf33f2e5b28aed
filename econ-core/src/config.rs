//! Calibration for the baseline economy.
//!
//! Defaults follow the published baseline calibration (Table 1 of the
//! Lengnick baseline model). Values the paper leaves open are marked.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, EconResult};
use crate::types::{Money, Units};

/// Calibration for market firms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FirmConfig {
    /// Liquidity assigned to each firm at t=0 (not stated in paper)
    pub initial_liquidity: Money,
    /// Wage rate at t=0 (not stated in paper)
    pub initial_wage_rate: Money,
    /// Goods price at t=0 (not stated in paper)
    pub initial_goods_price: Money,
    /// Inventory at t=0
    pub initial_inventory: Units,
    /// Whether firms start out looking for their first workers. With no
    /// stock and no sales history the inventory rule alone never opens one.
    pub initial_open_position: bool,
    /// Months of uninterrupted hiring success before the wage is cut (γ)
    pub gamma: u32,
    /// Upper bound of the uniform wage adjustment fraction (δ)
    pub delta: f64,
    /// Inventory floor as a multiple of last month's demand (lower φ)
    pub inventory_lphi: f64,
    /// Inventory ceiling as a multiple of last month's demand (upper φ)
    pub inventory_uphi: f64,
    /// Price floor as a multiple of marginal cost (lower φ)
    pub goods_price_lphi: f64,
    /// Price ceiling as a multiple of marginal cost (upper φ)
    pub goods_price_uphi: f64,
    /// Upper bound of the uniform price adjustment fraction (υ)
    pub upsilon: f64,
    /// Monthly probability of reviewing the goods price (θ)
    pub theta: f64,
    /// Output per unit of labour power (λ)
    pub lambda: Units,
    /// Liquidity buffer kept back from profits, as a share of the wage bill (χ)
    pub chi: f64,
}

impl Default for FirmConfig {
    fn default() -> Self {
        Self {
            initial_liquidity: 0,
            initial_wage_rate: 2100,
            initial_goods_price: 36,
            initial_inventory: 0,
            initial_open_position: true,
            gamma: 24,
            delta: 0.019,
            inventory_lphi: 0.25,
            inventory_uphi: 1.0,
            goods_price_lphi: 1.025,
            goods_price_uphi: 1.15,
            upsilon: 0.02,
            theta: 0.75,
            lambda: 3,
            chi: 0.1,
        }
    }
}

/// Calibration for the job guarantee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobGuaranteeConfig {
    /// The initial float. Its liquidity afterwards is the running deficit.
    pub initial_liquidity: Money,
    pub initial_inventory: Units,
    /// Base rate of the economy: labour paid per day
    pub day_rate: Money,
    /// Output per unit of labour power; assumed below market firms
    pub lambda: Units,
}

impl Default for JobGuaranteeConfig {
    fn default() -> Self {
        Self {
            initial_liquidity: 0,
            initial_inventory: 0,
            day_rate: 50,
            lambda: 1,
        }
    }
}

impl JobGuaranteeConfig {
    /// Fixed monthly wage: the day rate for every working day of the month.
    pub fn wage_rate(&self, month_length: u32) -> Money {
        self.day_rate * self.lambda * Money::from(month_length)
    }

    /// Fixed goods price.
    pub fn goods_price(&self) -> Money {
        if self.lambda == 0 {
            self.day_rate
        } else {
            self.day_rate / self.lambda
        }
    }
}

/// Calibration for households.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HouseholdConfig {
    /// Liquidity assigned to each household at t=0 (not stated in paper)
    pub initial_liquidity: Money,
    /// Reservation wage at t=0 (not stated in paper)
    pub initial_reservation_wage: f64,
    /// Monthly reservation wage decay while unemployed
    pub wage_decay_rate: f64,
    /// Share of daily demand that counts as satisfied
    pub satisfaction_fraction: f64,
    /// Labour power supplied per household per day
    pub labour_supply: Units,
    /// Relative price gap a new vendor must beat (ζ)
    pub zeta: f64,
    /// Employers sampled per search while unemployed (β)
    pub beta: u32,
    /// Probability a content worker looks around anyway (π)
    pub pi: f64,
    /// Curvature of the consumption rule, 0 < α ≤ 1
    pub alpha: f64,
    /// Size of the preferred supplier list (Type A connections)
    pub num_preferred_suppliers: usize,
    /// Probability of searching for a cheaper vendor (ψ price)
    pub psi_price: f64,
    /// Probability of dropping a vendor that failed to deliver (ψ quant)
    pub psi_quant: f64,
}

impl Default for HouseholdConfig {
    fn default() -> Self {
        Self {
            initial_liquidity: 5000,
            initial_reservation_wage: 0.0,
            wage_decay_rate: 0.9,
            satisfaction_fraction: 0.95,
            labour_supply: 1,
            zeta: 0.01,
            beta: 5,
            pi: 0.1,
            alpha: 0.9,
            num_preferred_suppliers: 7,
            psi_price: 0.25,
            psi_quant: 0.25,
        }
    }
}

/// Everything needed to build an economy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    pub seed: u64,
    pub num_households: usize,
    pub num_firms: usize,
    /// Working days per month
    pub month_length: u32,
    pub firm: FirmConfig,
    pub household: HouseholdConfig,
    /// `None` runs the economy without an employer of last resort.
    pub job_guarantee: Option<JobGuaranteeConfig>,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            num_households: 1000,
            num_firms: 100,
            month_length: 21,
            firm: FirmConfig::default(),
            household: HouseholdConfig::default(),
            job_guarantee: Some(JobGuaranteeConfig::default()),
        }
    }
}

// === VALIDATION ===

fn positive(name: &'static str, value: f64) -> EconResult<()> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { name, value })
    }
}

fn non_negative(name: &'static str, value: f64) -> EconResult<()> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { name, value })
    }
}

fn probability(name: &'static str, value: f64) -> EconResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::NotProbability { name, value })
    }
}

fn ordered(
    lower_name: &'static str,
    lower: f64,
    upper_name: &'static str,
    upper: f64,
) -> EconResult<()> {
    if lower < upper {
        Ok(())
    } else {
        Err(ConfigError::InvertedBounds {
            lower_name,
            lower,
            upper_name,
            upper,
        })
    }
}

impl FirmConfig {
    pub fn validate(&self) -> EconResult<()> {
        non_negative("firm.initial_wage_rate", self.initial_wage_rate as f64)?;
        positive("firm.initial_goods_price", self.initial_goods_price as f64)?;
        non_negative("firm.initial_inventory", self.initial_inventory as f64)?;
        non_negative("firm.delta", self.delta)?;
        positive("firm.inventory_lphi", self.inventory_lphi)?;
        ordered(
            "firm.inventory_lphi",
            self.inventory_lphi,
            "firm.inventory_uphi",
            self.inventory_uphi,
        )?;
        positive("firm.goods_price_lphi", self.goods_price_lphi)?;
        ordered(
            "firm.goods_price_lphi",
            self.goods_price_lphi,
            "firm.goods_price_uphi",
            self.goods_price_uphi,
        )?;
        non_negative("firm.upsilon", self.upsilon)?;
        probability("firm.theta", self.theta)?;
        positive("firm.lambda", self.lambda as f64)?;
        non_negative("firm.chi", self.chi)?;
        Ok(())
    }
}

impl JobGuaranteeConfig {
    pub fn validate(&self) -> EconResult<()> {
        non_negative("job_guarantee.day_rate", self.day_rate as f64)?;
        positive("job_guarantee.lambda", self.lambda as f64)?;
        non_negative(
            "job_guarantee.initial_inventory",
            self.initial_inventory as f64,
        )?;
        Ok(())
    }
}

impl HouseholdConfig {
    pub fn validate(&self) -> EconResult<()> {
        non_negative("household.initial_liquidity", self.initial_liquidity as f64)?;
        non_negative(
            "household.initial_reservation_wage",
            self.initial_reservation_wage,
        )?;
        probability("household.wage_decay_rate", self.wage_decay_rate)?;
        probability("household.satisfaction_fraction", self.satisfaction_fraction)?;
        positive("household.labour_supply", self.labour_supply as f64)?;
        probability("household.zeta", self.zeta)?;
        positive("household.beta", f64::from(self.beta))?;
        probability("household.pi", self.pi)?;
        positive("household.alpha", self.alpha)?;
        if self.alpha > 1.0 {
            return Err(ConfigError::NotProbability {
                name: "household.alpha",
                value: self.alpha,
            });
        }
        positive(
            "household.num_preferred_suppliers",
            self.num_preferred_suppliers as f64,
        )?;
        probability("household.psi_price", self.psi_price)?;
        probability("household.psi_quant", self.psi_quant)?;
        Ok(())
    }
}

impl EconomyConfig {
    /// Check every calibration value once, before the first step.
    pub fn validate(&self) -> EconResult<()> {
        positive("month_length", f64::from(self.month_length))?;
        if self.num_firms < self.household.num_preferred_suppliers {
            return Err(ConfigError::TooFewFirms {
                what: "the preferred supplier list",
                needed: self.household.num_preferred_suppliers,
                got: self.num_firms,
            });
        }
        self.firm.validate()?;
        self.household.validate()?;
        if let Some(jg) = &self.job_guarantee {
            jg.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_calibration_is_valid() {
        assert_eq!(EconomyConfig::default().validate(), Ok(()));
    }

    #[test]
    fn calibration_constraints_hold() {
        let firm = FirmConfig::default();
        let hh = HouseholdConfig::default();
        assert!((0.0..=1.0).contains(&hh.alpha));
        assert!(firm.gamma > 0);
        assert!(0.0 < firm.inventory_lphi && firm.inventory_lphi < firm.inventory_uphi);
        assert!(1.0 < firm.goods_price_lphi && firm.goods_price_lphi < firm.goods_price_uphi);
    }

    #[test]
    fn job_guarantee_rates_follow_day_rate() {
        let jg = JobGuaranteeConfig::default();
        assert_eq!(jg.wage_rate(21), 50 * 21);
        assert_eq!(jg.goods_price(), 50);
    }

    #[test]
    fn rejects_inverted_inventory_bounds() {
        let mut config = EconomyConfig::default();
        config.firm.inventory_lphi = 2.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvertedBounds {
                lower_name: "firm.inventory_lphi",
                ..
            })
        ));
    }

    #[test]
    fn rejects_bad_probability() {
        let mut config = EconomyConfig::default();
        config.household.psi_quant = 1.5;
        let err = config.validate().unwrap_err();
        assert_eq!(err.to_string(), "household.psi_quant must lie in [0, 1], got 1.5");
    }

    #[test]
    fn rejects_too_few_firms_for_supplier_list() {
        let config = EconomyConfig {
            num_firms: 3,
            ..EconomyConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::TooFewFirms { needed: 7, got: 3, .. })
        ));
    }

    #[test]
    fn rejects_zero_month_length() {
        let config = EconomyConfig {
            month_length: 0,
            ..EconomyConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotPositive { name: "month_length", .. })
        ));
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: EconomyConfig =
            serde_json::from_str(r#"{"num_households": 10, "household": {"beta": 3}}"#).unwrap();
        assert_eq!(config.num_households, 10);
        assert_eq!(config.num_firms, 100);
        assert_eq!(config.household.beta, 3);
        assert_eq!(config.household.num_preferred_suppliers, 7);
    }
}
