//! The job guarantee: a public employer of last resort.
//!
//! It hires anyone at a fixed wage, never fires, never reprices, and pays in
//! full even when that drives its liquidity negative. Its output is ordinary
//! inventory but it is never one of a household's preferred suppliers.

use slotmap::SlotMap;

use super::{Firm, FirmMonthStats};
use crate::config::JobGuaranteeConfig;
use crate::household::Household;
#[cfg(feature = "instrument")]
use crate::types::KeyToU64;
use crate::types::{FirmId, FirmKind, HouseholdId, Money};

impl Firm {
    pub fn job_guarantee(id: FirmId, config: &JobGuaranteeConfig, month_length: u32) -> Self {
        Self {
            id,
            kind: FirmKind::JobGuarantee,
            liquidity: config.initial_liquidity,
            goods_price: config.goods_price(),
            wage_rate: config.wage_rate(month_length),
            inventory: config.initial_inventory,
            productivity: config.lambda,
            workers: Vec::new(),
            worker_on_notice: None,
            has_open_position: true,
            months_since_hire_failure: 0,
            current_demand: 0,
            stats: FirmMonthStats::default(),
        }
    }

    /// Pay every worker the fixed wage regardless of liquidity.
    pub fn pay_fixed_wages(&mut self, households: &mut SlotMap<HouseholdId, Household>) -> Money {
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
            workers = self.workers.len(),
            paid = paid,
            job_guarantee = true,
        );

        paid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EconomyConfig;
    use crate::rng::SimRng;

    fn setup(n: usize) -> (Firm, SlotMap<HouseholdId, Household>, EconomyConfig) {
        let config = EconomyConfig::default();
        let mut keys: SlotMap<FirmId, ()> = SlotMap::with_key();
        let jg_config = config.job_guarantee.clone().unwrap_or_default();
        let jg = Firm::job_guarantee(keys.insert(()), &jg_config, config.month_length);
        let mut households: SlotMap<HouseholdId, Household> = SlotMap::with_key();
        for _ in 0..n {
            households.insert_with_key(|id| Household::new(id, &config, Vec::new()));
        }
        (jg, households, config)
    }

    #[test]
    fn initial_job_guarantee() {
        let (jg, _, config) = setup(0);
        assert!(jg.is_job_guarantee());
        assert!(jg.has_open_position);
        assert_eq!(jg.liquidity, 0);
        assert_eq!(jg.wage_rate, 50 * config.month_length as Money);
        assert_eq!(jg.goods_price, 50);
        assert!(jg.workers.is_empty());
        assert_eq!(jg.worker_on_notice, None);
    }

    #[test]
    fn hiring_keeps_position_open() {
        let (mut jg, mut households, _) = setup(3);
        let ids: Vec<_> = households.keys().collect();
        for &id in &ids {
            jg.hire(id, &mut households[id]);
            assert!(jg.has_open_position);
        }
        assert_eq!(jg.num_workers(), 3);
    }

    #[test]
    fn production_uses_own_productivity() {
        let (mut jg, mut households, config) = setup(3);
        let ids: Vec<_> = households.keys().collect();
        for &id in &ids {
            jg.hire(id, &mut households[id]);
        }
        jg.day(&config);
        assert_eq!(jg.inventory, 3 * config.household.labour_supply);
    }

    #[test]
    fn pays_full_wage_into_deficit() {
        let (mut jg, mut households, _) = setup(3);
        let ids: Vec<_> = households.keys().collect();
        for &id in &ids {
            households[id].liquidity = 0;
            jg.hire(id, &mut households[id]);
        }
        let paid = jg.month_end(&mut households);
        assert_eq!(paid, 3 * jg.wage_rate);
        assert_eq!(jg.liquidity, -3 * jg.wage_rate);
        for &id in &ids {
            assert_eq!(households[id].liquidity, jg.wage_rate);
            assert_eq!(households[id].last_wage, jg.wage_rate);
        }
    }

    #[test]
    fn month_start_leaves_terms_alone() {
        let (mut jg, mut households, config) = setup(1);
        let mut rng = SimRng::new(1);
        let wage = jg.wage_rate;
        let price = jg.goods_price;
        jg.inventory = 10_000;
        jg.month_start(&mut households, &config, &mut rng);
        assert_eq!(jg.wage_rate, wage);
        assert_eq!(jg.goods_price, price);
        assert!(jg.has_open_position);
        assert_eq!(jg.worker_on_notice, None);
    }

    #[test]
    fn everybody_quits() {
        let (mut jg, mut households, _) = setup(3);
        let ids: Vec<_> = households.keys().collect();
        for &id in &ids {
            jg.hire(id, &mut households[id]);
        }
        for &id in &ids {
            jg.quit_job(id, &mut households[id]);
        }
        assert!(jg.workers.is_empty());
        assert!(ids.iter().all(|&id| households[id].employer.is_none()));
        assert!(jg.has_open_position);
    }
}
