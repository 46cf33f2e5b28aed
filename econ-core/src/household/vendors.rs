//! Supplier network maintenance.
//!
//! Two monthly revisions, each gated by its own probability: swap a random
//! supplier for a noticeably cheaper one, and drop a supplier that failed to
//! deliver (picked in proportion to how badly it failed).

use super::Household;
use crate::config::HouseholdConfig;
use crate::firm::FirmRegistry;
use crate::rng::SimRng;
#[cfg(feature = "instrument")]
use crate::types::KeyToU64;
use crate::types::{FirmId, Units};

impl Household {
    /// Uniform pick among market firms not already supplying this household.
    pub fn select_new_firm(&self, firms: &FirmRegistry, rng: &mut SimRng) -> Option<FirmId> {
        let candidates: Vec<FirmId> = firms
            .market_ids()
            .iter()
            .copied()
            .filter(|id| !self.preferred_suppliers.contains(id))
            .collect();
        rng.choose(&candidates).copied()
    }

    /// Market-test one supplier against an outsider. The outsider replaces it
    /// only when cheaper by more than ζ.
    pub fn find_cheaper_vendor(&mut self, firms: &FirmRegistry, hc: &HouseholdConfig, rng: &mut SimRng) {
        if !rng.with_probability(hc.psi_price) {
            return;
        }
        let Some(index) = rng.index(self.preferred_suppliers.len()) else {
            return;
        };
        let change_price = match firms.get(self.preferred_suppliers[index]) {
            Some(incumbent) => incumbent.goods_price as f64 * (1.0 - hc.zeta),
            None => f64::INFINITY,
        };
        let Some(candidate) = self.select_new_firm(firms, rng) else {
            return;
        };
        let cheaper = firms
            .get(candidate)
            .is_some_and(|firm| (firm.goods_price as f64) < change_price);
        if cheaper {
            let _dropped = self.replace_supplier(index, candidate);

            #[cfg(feature = "instrument")]
            tracing::debug!(
                target: "suppliers",
                household_id = self.id.to_u64(),
                dropped = _dropped.to_u64(),
                added = candidate.to_u64(),
                reason = "cheaper",
            );
        }
    }

    /// Pick a blackmarked supplier weighted by shortfall and replace it. A
    /// supplier already swapped out this month is left alone.
    pub fn find_better_vendor(&mut self, firms: &FirmRegistry, hc: &HouseholdConfig, rng: &mut SimRng) {
        if self.blackmarked_firms.is_empty() || !rng.with_probability(hc.psi_quant) {
            return;
        }
        let Some(target) = self.select_blackmarked_firm(rng) else {
            return;
        };
        let Some(index) = self.preferred_suppliers.iter().position(|&id| id == target) else {
            return;
        };
        if let Some(candidate) = self.select_new_firm(firms, rng) {
            self.replace_supplier(index, candidate);

            #[cfg(feature = "instrument")]
            tracing::debug!(
                target: "suppliers",
                household_id = self.id.to_u64(),
                dropped = target.to_u64(),
                added = candidate.to_u64(),
                reason = "unreliable",
            );
        }
    }

    /// Weighted by shortfall; serial offenders weigh once per failure.
    pub fn select_blackmarked_firm(&self, rng: &mut SimRng) -> Option<FirmId> {
        let weights: Vec<(FirmId, f64)> = self
            .blackmarked_firms
            .iter()
            .map(|mark| (mark.firm, mark.shortfall as f64))
            .collect();
        rng.weighted_pick(&weights).copied()
    }

    /// Record a supplier that could not cover what was wanted.
    pub fn blackmark(&mut self, firm: FirmId, shortfall: Units) {
        self.blackmarked_firms.push(super::Blackmark { firm, shortfall });
    }

    /// Swap in `firm` at `index`, returning the supplier it displaced.
    fn replace_supplier(&mut self, index: usize, firm: FirmId) -> FirmId {
        std::mem::replace(&mut self.preferred_suppliers[index], firm)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::fixture;

    #[test]
    fn select_new_firm_avoids_current_suppliers() {
        let mut f = fixture();
        for _ in 0..50 {
            let firm = f.household.select_new_firm(&f.firms, &mut f.rng).unwrap();
            assert!(!f.household.preferred_suppliers.contains(&firm));
            assert_ne!(Some(firm), f.firms.job_guarantee_id());
        }
    }

    #[test]
    fn select_new_firm_exhausted_pool() {
        let mut f = fixture();
        f.household.preferred_suppliers = f.firms.market_ids().to_vec();
        assert_eq!(f.household.select_new_firm(&f.firms, &mut f.rng), None);
    }

    #[test]
    fn find_cheaper_vendor_swaps_expensive_supplier() {
        let mut f = fixture();
        f.config.household.psi_price = 1.0;
        let original = f.household.preferred_suppliers.clone();
        for &id in &original {
            f.firms.get_mut(id).unwrap().goods_price = 100_000_000;
        }
        f.household
            .find_cheaper_vendor(&f.firms, &f.config.household, &mut f.rng);
        assert_eq!(f.household.preferred_suppliers.len(), original.len());
        let changed = f
            .household
            .preferred_suppliers
            .iter()
            .filter(|id| !original.contains(id))
            .count();
        assert_eq!(changed, 1);
    }

    #[test]
    fn find_cheaper_vendor_needs_a_real_discount() {
        let mut f = fixture();
        f.config.household.psi_price = 1.0;
        let original = f.household.preferred_suppliers.clone();
        // Outsiders match the incumbents' price: not cheap enough
        for _ in 0..20 {
            f.household
                .find_cheaper_vendor(&f.firms, &f.config.household, &mut f.rng);
        }
        assert_eq!(f.household.preferred_suppliers, original);
    }

    #[test]
    fn find_better_vendor_replaces_by_weight() {
        let mut f = fixture();
        f.config.household.psi_quant = 1.0;
        let original = f.household.preferred_suppliers.clone();

        // Nobody blackmarked
        f.household
            .find_better_vendor(&f.firms, &f.config.household, &mut f.rng);
        assert_eq!(f.household.preferred_suppliers, original);

        f.household.blackmark(original[0], 0);
        f.household.blackmark(original[1], 1);
        f.household
            .find_better_vendor(&f.firms, &f.config.household, &mut f.rng);
        assert_eq!(f.household.preferred_suppliers[0], original[0]);
        assert_ne!(f.household.preferred_suppliers[1], original[1]);
        assert_eq!(f.household.blackmarked_firms.len(), 2);
    }

    #[test]
    fn replaced_firm_is_skipped() {
        let mut f = fixture();
        f.config.household.psi_quant = 1.0;
        let blackmarked = f.household.preferred_suppliers[1];
        f.household.blackmark(blackmarked, 1);
        let replacement = f.household.select_new_firm(&f.firms, &mut f.rng).unwrap();
        f.household.preferred_suppliers[1] = replacement;
        let before = f.household.preferred_suppliers.clone();

        f.household
            .find_better_vendor(&f.firms, &f.config.household, &mut f.rng);
        assert_eq!(f.household.preferred_suppliers, before);
        assert_eq!(f.household.blackmarked_firms.len(), 1);
    }

    #[test]
    fn supplier_list_stays_distinct() {
        let mut f = fixture();
        f.config.household.psi_price = 1.0;
        f.config.household.psi_quant = 1.0;
        for round in 0..100 {
            let firm = f.household.preferred_suppliers[round % 7];
            f.firms.get_mut(firm).unwrap().goods_price = 1_000;
            f.household.blackmark(firm, 5);
            f.household
                .find_cheaper_vendor(&f.firms, &f.config.household, &mut f.rng);
            f.household
                .find_better_vendor(&f.firms, &f.config.household, &mut f.rng);
            f.household.reset_monthly_stats();

            let mut ids = f.household.preferred_suppliers.clone();
            ids.sort();
            ids.dedup();
            assert_eq!(ids.len(), 7);
        }
    }
}
