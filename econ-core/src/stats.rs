//! Economy-wide aggregates and serializable snapshots.

use serde::{Deserialize, Serialize};
use tsify_next::Tsify;

use crate::economy::Agents;
use crate::firm::Firm;
use crate::household::Household;
use crate::types::{FirmKind, KeyToU64, Money, Units};

// === AGGREGATES ===

/// Labour, price and liquidity aggregates at a step boundary. Prices and
/// wages average over market firms only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi)]
pub struct EconomyStats {
    pub step: u64,
    pub month: u64,
    pub households: usize,
    /// Households working for a market firm
    pub employed: usize,
    pub job_guarantee_employed: usize,
    pub unemployed: usize,
    pub workers_on_notice: usize,
    /// Market firms with an unfilled position
    pub open_positions: usize,
    pub mean_goods_price: f64,
    pub mean_wage_rate: f64,
    pub household_liquidity: Money,
    /// Market firms only
    pub firm_liquidity: Money,
    pub job_guarantee_liquidity: Money,
    /// Every agent, job guarantee included
    pub total_liquidity: Money,
    /// Gini coefficient of household liquidity
    pub liquidity_gini: f64,
    pub planned_savings: f64,
    pub unsatisfied_demand: Units,
    pub total_inventory: Units,
}

impl EconomyStats {
    pub fn collect(agents: &Agents, step: u64, month: u64) -> Self {
        let mut stats = EconomyStats {
            step,
            month,
            households: agents.households.len(),
            ..Default::default()
        };

        let mut prices = Vec::new();
        let mut wages = Vec::new();
        for firm in agents.firms.iter() {
            stats.total_inventory += firm.inventory;
            match firm.kind {
                FirmKind::Market => {
                    stats.employed += firm.workers.len();
                    stats.workers_on_notice += usize::from(firm.worker_on_notice.is_some());
                    stats.open_positions += usize::from(firm.has_open_position);
                    stats.firm_liquidity += firm.liquidity;
                    prices.push(firm.goods_price as f64);
                    wages.push(firm.wage_rate as f64);
                }
                FirmKind::JobGuarantee => {
                    stats.job_guarantee_employed += firm.workers.len();
                    stats.job_guarantee_liquidity += firm.liquidity;
                }
            }
        }
        stats.mean_goods_price = mean(&prices);
        stats.mean_wage_rate = mean(&wages);

        let mut liquidity = Vec::with_capacity(agents.households.len());
        for household in agents.households.values() {
            stats.unemployed += usize::from(household.is_unemployed());
            stats.household_liquidity += household.liquidity;
            stats.unsatisfied_demand = stats
                .unsatisfied_demand
                .saturating_add(household.unsatisfied_demand);
            if household.consumption.planned_savings.is_finite() {
                stats.planned_savings += household.consumption.planned_savings;
            }
            liquidity.push(household.liquidity as f64);
        }
        stats.liquidity_gini = gini(&mut liquidity);
        stats.total_liquidity =
            stats.household_liquidity + stats.firm_liquidity + stats.job_guarantee_liquidity;
        stats
    }

    pub fn unemployment_rate(&self) -> f64 {
        if self.households == 0 {
            return 0.0;
        }
        self.unemployed as f64 / self.households as f64
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Gini coefficient of a distribution. Zero for empty or non-positive
/// totals.
pub fn gini(values: &mut [f64]) -> f64 {
    let n = values.len();
    let total: f64 = values.iter().sum();
    if n == 0 || total <= 0.0 {
        return 0.0;
    }
    values.sort_by(|a, b| a.total_cmp(b));
    let weighted: f64 = values
        .iter()
        .enumerate()
        .map(|(i, v)| (i + 1) as f64 * v)
        .sum();
    let n = n as f64;
    (2.0 * weighted) / (n * total) - (n + 1.0) / n
}

// === SNAPSHOTS ===

#[derive(Debug, Clone, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi)]
pub struct FirmSnapshot {
    pub id: u64,
    pub kind: FirmKind,
    pub liquidity: Money,
    pub goods_price: Money,
    pub wage_rate: Money,
    pub inventory: Units,
    pub workers: usize,
    pub has_open_position: bool,
    pub worker_on_notice: Option<u64>,
    pub current_demand: Units,
}

impl From<&Firm> for FirmSnapshot {
    fn from(firm: &Firm) -> Self {
        Self {
            id: firm.id.to_u64(),
            kind: firm.kind,
            liquidity: firm.liquidity,
            goods_price: firm.goods_price,
            wage_rate: firm.wage_rate,
            inventory: firm.inventory,
            workers: firm.workers.len(),
            has_open_position: firm.has_open_position,
            worker_on_notice: firm.worker_on_notice.map(KeyToU64::to_u64),
            current_demand: firm.current_demand,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi)]
pub struct HouseholdSnapshot {
    pub id: u64,
    pub liquidity: Money,
    pub employer: Option<u64>,
    pub reservation_wage: f64,
    pub daily_demand: Units,
    pub unsatisfied_demand: Units,
    pub preferred_suppliers: Vec<u64>,
}

impl From<&Household> for HouseholdSnapshot {
    fn from(household: &Household) -> Self {
        Self {
            id: household.id.to_u64(),
            liquidity: household.liquidity,
            employer: household.employer.map(KeyToU64::to_u64),
            reservation_wage: household.reservation_wage,
            daily_demand: household.consumption.current_demand,
            unsatisfied_demand: household.unsatisfied_demand,
            preferred_suppliers: household
                .preferred_suppliers
                .iter()
                .map(|&id| id.to_u64())
                .collect(),
        }
    }
}

/// Full state for rendering layers.
#[derive(Debug, Clone, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi)]
pub struct EconomySnapshot {
    pub step: u64,
    pub month: u64,
    pub day: u32,
    pub stats: EconomyStats,
    pub firms: Vec<FirmSnapshot>,
    pub households: Vec<HouseholdSnapshot>,
}

impl EconomySnapshot {
    pub fn capture(agents: &Agents, stats: EconomyStats, day: u32) -> Self {
        Self {
            step: stats.step,
            month: stats.month,
            day,
            firms: agents.firms.iter().map(FirmSnapshot::from).collect(),
            households: agents
                .household_order
                .iter()
                .filter_map(|&id| agents.households.get(id))
                .map(HouseholdSnapshot::from)
                .collect(),
            stats,
        }
    }
}
