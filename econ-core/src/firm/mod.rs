pub mod job_guarantee;
pub mod market;
pub mod registry;

pub use registry::FirmRegistry;

use slotmap::SlotMap;

use crate::config::EconomyConfig;
use crate::household::Household;
use crate::rng::SimRng;
#[cfg(feature = "instrument")]
use crate::types::KeyToU64;
use crate::types::{FirmId, FirmKind, HouseholdId, Money, Units};

// === MONTHLY STATS ===

/// What the firm decided this month. Reset at every month start; read by
/// reporting layers between months.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FirmMonthStats {
    pub raised_wage: bool,
    pub lowered_wage: bool,
    pub considered_price_change: bool,
    pub inventories_too_low: bool,
    pub inventories_too_high: bool,
    pub raised_goods_price: bool,
    pub lowered_goods_price: bool,
}

// === FIRM ===

/// A producer of the single consumption good, or the job guarantee.
///
/// `workers` is the authoritative employment record: a household's
/// `employer` field is only a back-reference kept in sync by `hire`,
/// `quit_job` and `fire`.
#[derive(Debug, Clone)]
pub struct Firm {
    pub id: FirmId,
    pub kind: FirmKind,
    pub liquidity: Money,
    pub goods_price: Money,
    pub wage_rate: Money,
    pub inventory: Units,
    /// Output per unit of labour power (λ)
    pub productivity: Units,
    pub workers: Vec<HouseholdId>,
    pub worker_on_notice: Option<HouseholdId>,
    pub has_open_position: bool,
    pub months_since_hire_failure: u32,
    /// Units sold since the last month start
    pub current_demand: Units,
    pub stats: FirmMonthStats,
}

impl Firm {
    /// A market firm with the calibrated starting values.
    pub fn new(id: FirmId, config: &EconomyConfig) -> Self {
        let fc = &config.firm;
        Self {
            id,
            kind: FirmKind::Market,
            liquidity: fc.initial_liquidity,
            goods_price: fc.initial_goods_price,
            wage_rate: fc.initial_wage_rate,
            inventory: fc.initial_inventory,
            productivity: fc.lambda,
            workers: Vec::new(),
            worker_on_notice: None,
            has_open_position: fc.initial_open_position,
            months_since_hire_failure: 0,
            current_demand: 0,
            stats: FirmMonthStats::default(),
        }
    }

    pub fn with_wage_rate(mut self, wage_rate: Money) -> Self {
        self.wage_rate = wage_rate;
        self
    }

    pub fn is_job_guarantee(&self) -> bool {
        self.kind == FirmKind::JobGuarantee
    }

    pub fn num_workers(&self) -> usize {
        self.workers.len()
    }

    pub fn employs(&self, worker: HouseholdId) -> bool {
        self.workers.contains(&worker)
    }

    // === PHASES ===

    /// Month start: publish wage, workforce and price decisions before
    /// households act on them.
    pub fn month_start(
        &mut self,
        households: &mut SlotMap<HouseholdId, Household>,
        config: &EconomyConfig,
        rng: &mut SimRng,
    ) {
        self.reset_monthly_stats();
        if self.kind == FirmKind::Market {
            self.check_for_hire_failure();
            self.set_wage_rate(&config.firm, rng);
            self.manage_workforce(households, &config.firm, rng);
            self.set_goods_price(config, rng);
        }
        self.current_demand = 0;
    }

    /// Daily production.
    pub fn day(&mut self, config: &EconomyConfig) {
        self.produce_output(config.household.labour_supply);
    }

    /// Month end wage run. Returns the total paid out.
    pub fn month_end(&mut self, households: &mut SlotMap<HouseholdId, Household>) -> Money {
        match self.kind {
            FirmKind::Market => self.pay_wages(households),
            FirmKind::JobGuarantee => self.pay_fixed_wages(households),
        }
    }

    /// Hand surplus liquidity to households. The job guarantee distributes
    /// nothing.
    pub fn distribute_profits(
        &mut self,
        shareholdings: &crate::economy::Shareholdings,
        households: &mut SlotMap<HouseholdId, Household>,
        config: &EconomyConfig,
    ) -> Money {
        match self.kind {
            FirmKind::Market => self.distribute_surplus(shareholdings, households, config.firm.chi),
            FirmKind::JobGuarantee => 0,
        }
    }

    // === DAILY ===

    /// Turn the labour power of current workers into inventory.
    pub fn produce_output(&mut self, labour_supply: Units) {
        let labour_power = self.workers.len() as Units * labour_supply;
        self.inventory += production_amount(self.productivity, labour_power);
    }

    // === HOUSEHOLD-FACING CONTRACT ===

    /// Add a worker and point their employer reference here. Market firms
    /// close their open position; the job guarantee always keeps one.
    ///
    /// A household still employed elsewhere is turned away: it has to quit
    /// first (see `Household::change_employer`).
    pub fn hire(&mut self, worker: HouseholdId, household: &mut Household) {
        if household.employer.is_some_and(|current| current != self.id) {
            return;
        }
        if !self.workers.contains(&worker) {
            self.workers.push(worker);
        }
        household.employer = Some(self.id);
        self.has_open_position = self.kind == FirmKind::JobGuarantee;

        #[cfg(feature = "instrument")]
        tracing::debug!(
            target: "hiring",
            firm_id = self.id.to_u64(),
            household_id = worker.to_u64(),
            wage_rate = self.wage_rate,
            job_guarantee = self.is_job_guarantee(),
        );
    }

    /// A worker leaves of their own accord.
    pub fn quit_job(&mut self, worker: HouseholdId, household: &mut Household) {
        if self.worker_on_notice == Some(worker) {
            self.worker_on_notice = None;
        }
        self.workers.retain(|&w| w != worker);
        if household.employer == Some(self.id) {
            household.employer = None;
        }
    }

    /// Terminate a worker. No-op if they no longer work here.
    pub(crate) fn fire(&mut self, worker: HouseholdId, households: &mut SlotMap<HouseholdId, Household>) {
        if self.worker_on_notice == Some(worker) {
            self.worker_on_notice = None;
        }
        let before = self.workers.len();
        self.workers.retain(|&w| w != worker);
        if self.workers.len() == before {
            return;
        }
        if let Some(household) = households.get_mut(worker) {
            if household.employer == Some(self.id) {
                household.sacked();
            }
        }

        #[cfg(feature = "instrument")]
        tracing::debug!(
            target: "hiring",
            firm_id = self.id.to_u64(),
            household_id = worker.to_u64(),
            fired = true,
        );
    }

    /// Book a sale: stock out, demand and cash in.
    pub fn sell_goods(&mut self, quantity: Units, total_price: Money) {
        self.inventory -= quantity;
        self.current_demand += quantity;
        self.liquidity += total_price;
    }

    // === HELPERS ===

    /// Reset the monthly recording attributes.
    pub fn reset_monthly_stats(&mut self) {
        self.stats = FirmMonthStats::default();
    }

    /// Inventory below this signals a labour shortage.
    pub fn inventory_floor(&self, inventory_lphi: f64) -> f64 {
        inventory_lphi * self.current_demand as f64
    }

    /// Inventory above this signals a labour surplus.
    pub fn inventory_ceiling(&self, inventory_uphi: f64) -> f64 {
        inventory_uphi * self.current_demand as f64
    }

    /// Wage cost of one unit of output.
    pub fn marginal_cost(&self, labour_supply: Units, month_length: u32) -> f64 {
        let denominator = (self.productivity * labour_supply * Units::from(month_length)) as f64;
        if denominator <= 0.0 {
            return 0.0;
        }
        self.wage_rate as f64 / denominator
    }
}

/// Output produced from `labour_power` at productivity `lambda`.
pub fn production_amount(lambda: Units, labour_power: Units) -> Units {
    lambda * labour_power
}
