//! Decision rules of a profit-seeking firm.
//!
//! Each month the firm reads only its own state (inventory against last
//! month's sales, whether it managed to hire) and nudges wage, workforce and
//! price by small random steps:
//! - Unfilled position → raise wage
//! - γ months of hiring success → cut wage
//! - Thin inventory → hire (or rescind a pending notice), maybe raise price
//! - Piled-up inventory → give notice, maybe cut price

use slotmap::SlotMap;

use super::Firm;
use crate::config::{EconomyConfig, FirmConfig};
use crate::economy::Shareholdings;
use crate::household::Household;
use crate::rng::SimRng;
#[cfg(feature = "instrument")]
use crate::types::KeyToU64;
use crate::types::{HouseholdId, Money};

/// Uniform wage adjustment fraction in [0, δ].
pub fn wage_adjustment(rng: &mut SimRng, delta: f64) -> f64 {
    rng.fraction(delta)
}

/// Uniform price adjustment fraction in [0, υ].
pub fn price_adjustment(rng: &mut SimRng, upsilon: f64) -> f64 {
    rng.fraction(upsilon)
}

/// ceil(χ · wage bill). Float products that land a hair above a whole number
/// are treated as that number.
pub fn required_buffer(chi: f64, wage_rate: Money, num_workers: usize) -> Money {
    let wage_bill = wage_rate as f64 * num_workers as f64;
    let raw = chi * wage_bill;
    (raw - 1e-9).ceil().max(0.0) as Money
}

impl Firm {
    // === WAGE RULE ===

    /// Count months of hiring success; any open position resets the run.
    pub fn check_for_hire_failure(&mut self) {
        if self.has_open_position {
            self.months_since_hire_failure = 0;
        } else {
            self.months_since_hire_failure += 1;
        }
    }

    pub fn should_raise_wage(&self) -> bool {
        self.has_open_position
    }

    pub fn should_lower_wage(&self, gamma: u32) -> bool {
        self.months_since_hire_failure >= gamma
    }

    /// Raise takes priority over lower; at most one fires.
    pub fn set_wage_rate(&mut self, fc: &FirmConfig, rng: &mut SimRng) {
        if self.should_raise_wage() {
            let change = wage_adjustment(rng, fc.delta);
            let raised = (self.wage_rate as f64 * (1.0 + change)).ceil() as Money;
            self.wage_rate = raised.max(1);
            self.stats.raised_wage = true;
        } else if self.should_lower_wage(fc.gamma) {
            let change = wage_adjustment(rng, fc.delta);
            let lowered = (self.wage_rate as f64 * (1.0 - change)).floor() as Money;
            self.wage_rate = lowered.max(0);
            self.stats.lowered_wage = true;
        } else {
            return;
        }

        #[cfg(feature = "instrument")]
        tracing::debug!(
            target: "wages",
            firm_id = self.id.to_u64(),
            wage_rate = self.wage_rate,
            raised = self.stats.raised_wage,
        );
    }

    // === WORKFORCE ===

    /// Hire or fire against the inventory band.
    ///
    /// A rescinded notice and a new opening are alternatives: a firm short of
    /// stock first takes back a pending notice and only opens a position when
    /// there is nothing to take back. Firing happens one month after notice.
    pub fn manage_workforce(
        &mut self,
        households: &mut SlotMap<HouseholdId, Household>,
        fc: &FirmConfig,
        rng: &mut SimRng,
    ) {
        let inventory = self.inventory as f64;

        if inventory < self.inventory_floor(fc.inventory_lphi) {
            self.stats.inventories_too_low = true;
            if self.worker_on_notice.is_some() {
                self.worker_on_notice = None;
            } else {
                self.has_open_position = true;
            }
        }

        if let Some(worker) = self.worker_on_notice.take() {
            self.fire(worker, households);
        }

        if inventory > self.inventory_ceiling(fc.inventory_uphi) {
            self.stats.inventories_too_high = true;
            self.has_open_position = false;
            self.worker_on_notice = rng.choose(&self.workers).copied();
        }
    }

    // === PRICE RULE ===

    /// Price floor relative to marginal cost.
    pub fn goods_price_floor(&self, config: &EconomyConfig) -> f64 {
        config.firm.goods_price_lphi
            * self.marginal_cost(config.household.labour_supply, config.month_length)
    }

    /// Price ceiling relative to marginal cost.
    pub fn goods_price_ceiling(&self, config: &EconomyConfig) -> f64 {
        config.firm.goods_price_uphi
            * self.marginal_cost(config.household.labour_supply, config.month_length)
    }

    /// With probability θ, move the price toward what the inventory signals,
    /// staying inside the marginal-cost band.
    pub fn set_goods_price(&mut self, config: &EconomyConfig, rng: &mut SimRng) {
        let fc = &config.firm;
        if !rng.with_probability(fc.theta) {
            return;
        }
        self.stats.considered_price_change = true;

        let inventory = self.inventory as f64;
        let price = self.goods_price as f64;

        if inventory < self.inventory_floor(fc.inventory_lphi)
            && price <= self.goods_price_ceiling(config)
        {
            let change = price_adjustment(rng, fc.upsilon);
            self.goods_price = (price * (1.0 + change)).ceil() as Money;
            self.stats.raised_goods_price = true;
        } else if inventory > self.inventory_ceiling(fc.inventory_uphi)
            && price > self.goods_price_floor(config)
        {
            let change = price_adjustment(rng, fc.upsilon);
            self.goods_price = ((price * (1.0 - change)).floor() as Money).max(1);
            self.stats.lowered_goods_price = true;
        } else {
            return;
        }

        #[cfg(feature = "instrument")]
        tracing::debug!(
            target: "pricing",
            firm_id = self.id.to_u64(),
            goods_price = self.goods_price,
            raised = self.stats.raised_goods_price,
        );
    }

    // === MONTH END ===

    /// Pay every worker the wage rate, cutting the rate first when the firm
    /// cannot cover the full bill. A firm that cannot pay even one unit per
    /// worker pays nothing and drops its wage rate to zero.
    pub fn pay_wages(&mut self, households: &mut SlotMap<HouseholdId, Household>) -> Money {
        let num_workers = self.workers.len() as Money;
        if num_workers == 0 {
            return 0;
        }
        if self.liquidity < num_workers {
            self.wage_rate = 0;
            return 0;
        }
        if self.liquidity < num_workers * self.wage_rate {
            self.wage_rate = self.liquidity / num_workers;
        }

        let mut paid = 0;
        for worker in &self.workers {
            if let Some(household) = households.get_mut(*worker) {
                household.receive_wage(self.wage_rate);
                paid += self.wage_rate;
            }
        }
        self.liquidity -= paid;

        #[cfg(feature = "instrument")]
        tracing::debug!(
            target: "wages",
            firm_id = self.id.to_u64(),
            wage_rate = self.wage_rate,
            workers = num_workers,
            paid = paid,
        );

        paid
    }

    /// Liquidity kept back from distribution.
    pub fn calculate_required_buffer(&self, chi: f64) -> Money {
        required_buffer(chi, self.wage_rate, self.workers.len())
    }

    /// Split liquidity above the buffer across households by their share of
    /// household liquidity, rounding each dividend down. The firm pays out
    /// exactly what households receive.
    pub fn distribute_surplus(
        &mut self,
        shareholdings: &Shareholdings,
        households: &mut SlotMap<HouseholdId, Household>,
        chi: f64,
    ) -> Money {
        let surplus = self.liquidity - self.calculate_required_buffer(chi);
        if surplus <= 0 || shareholdings.total <= 0 {
            return 0;
        }

        let mut distributed = 0;
        for (household_id, shares) in &shareholdings.holdings {
            let dividend = shareholdings.dividend(surplus, *shares);
            if dividend <= 0 {
                continue;
            }
            if let Some(household) = households.get_mut(*household_id) {
                household.liquidity += dividend;
                distributed += dividend;
            }
        }
        self.liquidity -= distributed;

        #[cfg(feature = "instrument")]
        tracing::debug!(
            target: "profits",
            firm_id = self.id.to_u64(),
            surplus = surplus,
            distributed = distributed,
        );

        distributed
    }
}
