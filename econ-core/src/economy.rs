//! The economy: registries, scheduler and random source in one place.

use slotmap::SlotMap;

use crate::config::EconomyConfig;
use crate::error::EconResult;
use crate::firm::{Firm, FirmRegistry};
use crate::household::Household;
use crate::rng::SimRng;
use crate::schedule::{DayReport, Scheduler};
use crate::stats::{EconomySnapshot, EconomyStats};
use crate::types::{FirmId, HouseholdId, Money};

// === SHAREHOLDINGS ===

/// Household liquidity as ownership shares, frozen once per month end
/// after wages are paid and before any firm distributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Shareholdings {
    pub holdings: Vec<(HouseholdId, Money)>,
    pub total: Money,
}

impl Shareholdings {
    /// Negative liquidity holds no shares.
    pub fn from_households(households: &SlotMap<HouseholdId, Household>) -> Self {
        let holdings: Vec<(HouseholdId, Money)> = households
            .iter()
            .map(|(id, household)| (id, household.liquidity.max(0)))
            .collect();
        let total = holdings.iter().map(|(_, shares)| shares).sum();
        Self { holdings, total }
    }

    /// floor(surplus · shares / total), computed without overflow.
    pub fn dividend(&self, surplus: Money, shares: Money) -> Money {
        if self.total <= 0 || surplus <= 0 || shares <= 0 {
            return 0;
        }
        (i128::from(surplus) * i128::from(shares) / i128::from(self.total)) as Money
    }
}

// === AGENTS ===

/// Every agent in the economy. Fields are disjoint so a firm and the
/// household map (or a household and the firm registry) can be borrowed
/// mutably at the same time.
#[derive(Debug, Clone, Default)]
pub struct Agents {
    pub firms: FirmRegistry,
    pub households: SlotMap<HouseholdId, Household>,
    /// Acting order of households; reshuffled every day
    pub household_order: Vec<HouseholdId>,
}

impl Agents {
    /// Build the population: market firms, the job guarantee if configured,
    /// then households each holding a random set of distinct market firms
    /// as preferred suppliers.
    pub fn populate(config: &EconomyConfig, rng: &mut SimRng) -> Self {
        let mut firms = FirmRegistry::new();
        for _ in 0..config.num_firms {
            firms.add_market_firm(config);
        }
        if let Some(jg) = &config.job_guarantee {
            firms.add_job_guarantee(jg, config.month_length);
        }

        let mut households = SlotMap::with_capacity_and_key(config.num_households);
        let mut household_order = Vec::with_capacity(config.num_households);
        for _ in 0..config.num_households {
            let suppliers = rng.sample(firms.market_ids(), config.household.num_preferred_suppliers);
            let id = households.insert_with_key(|id| Household::new(id, config, suppliers));
            household_order.push(id);
        }

        Self {
            firms,
            households,
            household_order,
        }
    }

    /// Employer and roster agree in both directions, and nobody is on two
    /// rosters.
    pub fn employment_is_consistent(&self) -> bool {
        let mut rostered = std::collections::HashSet::new();
        for firm in self.firms.iter() {
            for &worker in &firm.workers {
                if !rostered.insert(worker) {
                    return false;
                }
                let points_back = self
                    .households
                    .get(worker)
                    .is_some_and(|h| h.employer == Some(firm.id));
                if !points_back {
                    return false;
                }
            }
        }
        self.households.iter().all(|(id, h)| match h.employer {
            Some(firm) => self.firms.get(firm).is_some_and(|f| f.employs(id)),
            None => !rostered.contains(&id),
        })
    }
}

// === ECONOMY ===

pub struct Economy {
    config: EconomyConfig,
    agents: Agents,
    scheduler: Scheduler,
    rng: SimRng,
}

impl Economy {
    /// Validate the calibration and build the initial population.
    pub fn new(config: EconomyConfig) -> EconResult<Self> {
        config.validate()?;
        let mut rng = SimRng::new(config.seed);
        let agents = Agents::populate(&config, &mut rng);
        let scheduler = Scheduler::new(config.month_length);
        Ok(Self {
            config,
            agents,
            scheduler,
            rng,
        })
    }

    /// Advance one working day.
    pub fn step(&mut self) -> DayReport {
        let report = self
            .scheduler
            .step(&mut self.agents, &self.config, &mut self.rng);

        #[cfg(feature = "instrument")]
        if report.month_end {
            self.record_month(&report);
        }

        report
    }

    /// Advance `days` working days.
    pub fn run(&mut self, days: u64) {
        for _ in 0..days {
            self.step();
        }
    }

    /// Advance whole months.
    pub fn run_months(&mut self, months: u64) {
        self.run(months * u64::from(self.config.month_length));
    }

    #[cfg(feature = "instrument")]
    fn record_month(&self, report: &DayReport) {
        use crate::types::KeyToU64;

        let stats = self.stats();
        tracing::info!(
            target: "month",
            month = report.month,
            step = report.step,
            employed = stats.employed as u64,
            job_guarantee_employed = stats.job_guarantee_employed as u64,
            unemployed = stats.unemployed as u64,
            workers_on_notice = stats.workers_on_notice as u64,
            open_positions = stats.open_positions as u64,
            mean_goods_price = stats.mean_goods_price,
            mean_wage_rate = stats.mean_wage_rate,
            household_liquidity = stats.household_liquidity,
            firm_liquidity = stats.firm_liquidity,
            job_guarantee_liquidity = stats.job_guarantee_liquidity,
            liquidity_gini = stats.liquidity_gini,
            planned_savings = stats.planned_savings,
            unsatisfied_demand = stats.unsatisfied_demand,
            inventory = stats.total_inventory,
            wages_paid = report.wages_paid,
            dividends_paid = report.dividends_paid,
        );

        for firm in self.agents.firms.iter() {
            tracing::info!(
                target: "firm",
                month = report.month,
                firm_id = firm.id.to_u64(),
                job_guarantee = firm.is_job_guarantee(),
                liquidity = firm.liquidity,
                wage_rate = firm.wage_rate,
                goods_price = firm.goods_price,
                inventory = firm.inventory,
                workers = firm.workers.len() as u64,
                open_position = firm.has_open_position,
                current_demand = firm.current_demand,
            );
        }
    }

    // === ACCESSORS ===

    pub fn config(&self) -> &EconomyConfig {
        &self.config
    }

    pub fn agents(&self) -> &Agents {
        &self.agents
    }

    /// Direct access for scenario setup between steps.
    pub fn agents_mut(&mut self) -> &mut Agents {
        &mut self.agents
    }

    pub fn firms(&self) -> &FirmRegistry {
        &self.agents.firms
    }

    pub fn households(&self) -> &SlotMap<HouseholdId, Household> {
        &self.agents.households
    }

    pub fn firm(&self, id: FirmId) -> Option<&Firm> {
        self.agents.firms.get(id)
    }

    pub fn household(&self, id: HouseholdId) -> Option<&Household> {
        self.agents.households.get(id)
    }

    pub fn job_guarantee(&self) -> Option<&Firm> {
        self.agents.firms.job_guarantee()
    }

    pub fn steps(&self) -> u64 {
        self.scheduler.steps
    }

    pub fn month(&self) -> u64 {
        self.scheduler.month
    }

    /// Zero-based working day within the current month.
    pub fn day(&self) -> u32 {
        self.scheduler.day_of_month()
    }

    pub fn is_month_start(&self) -> bool {
        self.scheduler.is_month_start()
    }

    pub fn is_month_end(&self) -> bool {
        self.scheduler.is_month_end()
    }

    pub fn stats(&self) -> EconomyStats {
        EconomyStats::collect(&self.agents, self.scheduler.steps, self.scheduler.month)
    }

    pub fn snapshot(&self) -> EconomySnapshot {
        EconomySnapshot::capture(&self.agents, self.stats(), self.day())
    }

    /// Liquidity held by households and market firms, excluding the job
    /// guarantee. Constant across days without a month end.
    pub fn private_liquidity(&self) -> Money {
        let households: Money = self.agents.households.values().map(|h| h.liquidity).sum();
        let firms: Money = self.agents.firms.market().map(|f| f.liquidity).sum();
        households + firms
    }

    /// Liquidity across every agent including the job guarantee's deficit.
    /// Constant across every step.
    pub fn total_liquidity(&self) -> Money {
        let households: Money = self.agents.households.values().map(|h| h.liquidity).sum();
        let firms: Money = self.agents.firms.iter().map(|f| f.liquidity).sum();
        households + firms
    }
}
