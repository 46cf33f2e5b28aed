pub mod consumption;
pub mod jobs;
pub mod vendors;

pub use consumption::planned_consumption_amount;

use serde::{Deserialize, Serialize};

use crate::config::EconomyConfig;
use crate::firm::FirmRegistry;
use crate::rng::SimRng;
use crate::types::{FirmId, HouseholdId, Money, Units};

// === SUPPORTING TYPES ===

/// A supplier that could not cover what the household wanted, and by how
/// much. Serial offenders appear once per failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blackmark {
    pub firm: FirmId,
    pub shortfall: Units,
}

/// This month's consumption plan, fixed at month start.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ConsumptionPlan {
    /// Units to buy each day
    pub current_demand: Units,
    /// Units planned for the whole month
    pub planned_consumption: f64,
    /// Liquidity left over if the plan is met at average prices
    pub planned_savings: f64,
}

// === HOUSEHOLD ===

/// A consumer and worker.
///
/// Holds one employer reference at most and a fixed-size list of preferred
/// suppliers drawn from the market firms. Everything a household does
/// happens through its own procedures; firms only touch it through `hire`,
/// `quit_job`, `fire`, wage payments and dividends.
#[derive(Debug, Clone)]
pub struct Household {
    pub id: HouseholdId,
    pub liquidity: Money,
    pub reservation_wage: f64,
    pub employer: Option<FirmId>,
    pub preferred_suppliers: Vec<FirmId>,
    pub blackmarked_firms: Vec<Blackmark>,
    pub consumption: ConsumptionPlan,
    /// Units wanted but not bought since the last month start
    pub unsatisfied_demand: Units,
    /// Wage received at the most recent month end
    pub last_wage: Money,
}

impl Household {
    pub fn new(id: HouseholdId, config: &EconomyConfig, preferred_suppliers: Vec<FirmId>) -> Self {
        let hc = &config.household;
        Self {
            id,
            liquidity: hc.initial_liquidity,
            reservation_wage: hc.initial_reservation_wage,
            employer: None,
            preferred_suppliers,
            blackmarked_firms: Vec::new(),
            consumption: ConsumptionPlan::default(),
            unsatisfied_demand: 0,
            last_wage: 0,
        }
    }

    pub fn with_liquidity(mut self, liquidity: Money) -> Self {
        self.liquidity = liquidity;
        self
    }

    pub fn is_unemployed(&self) -> bool {
        self.employer.is_none()
    }

    // === PHASES ===

    /// Month start: revise suppliers, clear last month's record, look for
    /// work, then plan spending against the revised supplier list.
    pub fn month_start(&mut self, firms: &mut FirmRegistry, config: &EconomyConfig, rng: &mut SimRng) {
        let hc = &config.household;
        self.find_cheaper_vendor(firms, hc, rng);
        self.find_better_vendor(firms, hc, rng);
        self.reset_monthly_stats();
        self.look_for_new_job(firms, hc, rng);
        self.plan_consumption(firms, hc.alpha, config.month_length);
    }

    pub fn day(&mut self, firms: &mut FirmRegistry, config: &EconomyConfig, rng: &mut SimRng) {
        self.buy_goods(firms, config.household.satisfaction_fraction, rng);
    }

    pub fn month_end(&mut self, firms: &FirmRegistry, config: &EconomyConfig) {
        self.adjust_reservation_wage(firms, config.household.wage_decay_rate);
    }

    // === FIRM-FACING CONTRACT ===

    /// Household receives their cards.
    pub fn sacked(&mut self) {
        self.employer = None;
    }

    pub fn receive_wage(&mut self, wage: Money) {
        self.liquidity += wage;
        self.last_wage = wage;
    }

    // === HELPERS ===

    /// Clear blackmarks and the unsatisfied demand accumulator.
    pub fn reset_monthly_stats(&mut self) {
        self.blackmarked_firms.clear();
        self.unsatisfied_demand = 0;
    }
}
