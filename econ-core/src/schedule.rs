//! Day and month cadence.
//!
//! Every step is one working day. Within a day:
//! 1. Households are reshuffled
//! 2. Month start (first day): firms publish terms, job guarantee last,
//!    then households revise suppliers, search for work and plan spending
//! 3. Households buy, then firms produce
//! 4. Month end (last day): every firm pays wages, one shareholding snapshot
//!    is taken, every firm distributes profits, households adjust their
//!    reservation wage

use serde::{Deserialize, Serialize};

use crate::config::EconomyConfig;
use crate::economy::{Agents, Shareholdings};
use crate::rng::SimRng;
use crate::types::{FirmId, Money};

/// What happened during one step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DayReport {
    /// Step index this report covers
    pub step: u64,
    /// Month the step belonged to
    pub month: u64,
    pub month_start: bool,
    pub month_end: bool,
    pub wages_paid: Money,
    pub dividends_paid: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scheduler {
    pub steps: u64,
    pub month: u64,
    pub month_length: u32,
}

impl Scheduler {
    pub fn new(month_length: u32) -> Self {
        Self {
            steps: 0,
            month: 0,
            month_length: month_length.max(1),
        }
    }

    pub fn is_month_start(&self) -> bool {
        self.steps % u64::from(self.month_length) == 0
    }

    pub fn is_month_end(&self) -> bool {
        (self.steps + 1) % u64::from(self.month_length) == 0
    }

    /// Zero-based working day within the current month.
    pub fn day_of_month(&self) -> u32 {
        (self.steps % u64::from(self.month_length)) as u32
    }

    /// Advance one day.
    pub fn step(&mut self, agents: &mut Agents, config: &EconomyConfig, rng: &mut SimRng) -> DayReport {
        let mut report = DayReport {
            step: self.steps,
            month: self.month,
            month_start: self.is_month_start(),
            month_end: self.is_month_end(),
            ..DayReport::default()
        };

        rng.shuffle(&mut agents.household_order);
        let firm_order: Vec<FirmId> = agents.firms.employer_ids().to_vec();

        if report.month_start {
            for &id in &firm_order {
                if let Some(firm) = agents.firms.get_mut(id) {
                    firm.month_start(&mut agents.households, config, rng);
                }
            }
            for &id in &agents.household_order {
                if let Some(household) = agents.households.get_mut(id) {
                    household.month_start(&mut agents.firms, config, rng);
                }
            }
        }

        for &id in &agents.household_order {
            if let Some(household) = agents.households.get_mut(id) {
                household.day(&mut agents.firms, config, rng);
            }
        }
        for &id in &firm_order {
            if let Some(firm) = agents.firms.get_mut(id) {
                firm.day(config);
            }
        }

        if report.month_end {
            for &id in &firm_order {
                if let Some(firm) = agents.firms.get_mut(id) {
                    report.wages_paid += firm.month_end(&mut agents.households);
                }
            }
            let shareholdings = Shareholdings::from_households(&agents.households);
            for &id in &firm_order {
                if let Some(firm) = agents.firms.get_mut(id) {
                    report.dividends_paid +=
                        firm.distribute_profits(&shareholdings, &mut agents.households, config);
                }
            }
            for &id in &agents.household_order {
                if let Some(household) = agents.households.get_mut(id) {
                    household.month_end(&agents.firms, config);
                }
            }
            self.month += 1;
        }

        self.steps += 1;
        report
    }
}
