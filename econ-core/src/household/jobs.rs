//! Labour market side of the household: job search and the reservation wage.

use super::Household;
use crate::config::HouseholdConfig;
use crate::firm::FirmRegistry;
use crate::rng::SimRng;
use crate::types::{FirmId, Money};

impl Household {
    /// Current employer's wage, if employed by a firm that still exists.
    pub fn employer_wage(&self, firms: &FirmRegistry) -> Option<Money> {
        self.employer
            .and_then(|id| firms.get(id))
            .map(|firm| firm.wage_rate)
    }

    pub fn is_paid_too_little(&self, firms: &FirmRegistry) -> bool {
        self.employer_wage(firms)
            .is_some_and(|wage| (wage as f64) < self.reservation_wage)
    }

    /// Employed, paid at least the reservation wage, and not restless this
    /// month. The restlessness draw only happens for otherwise content
    /// workers.
    pub fn is_happy_at_work(&self, firms: &FirmRegistry, pi: f64, rng: &mut SimRng) -> bool {
        if self.employer_wage(firms).is_none() || self.is_paid_too_little(firms) {
            return false;
        }
        !rng.with_probability(pi)
    }

    /// An open position paying above the reservation wage, or above what the
    /// current employer pays.
    pub fn is_acceptable_job_offer(&self, firms: &FirmRegistry, candidate: FirmId) -> bool {
        let Some(firm) = firms.get(candidate) else {
            return false;
        };
        if !firm.has_open_position {
            return false;
        }
        firm.wage_rate as f64 > self.reservation_wage
            || self
                .employer_wage(firms)
                .is_some_and(|current| firm.wage_rate > current)
    }

    /// Uniform pick among every employer except the current one.
    pub fn select_new_employer(&self, firms: &FirmRegistry, rng: &mut SimRng) -> Option<FirmId> {
        let candidates: Vec<FirmId> = firms
            .employer_ids()
            .iter()
            .copied()
            .filter(|&id| Some(id) != self.employer)
            .collect();
        rng.choose(&candidates).copied()
    }

    /// Sample β employers when unemployed, one otherwise, and take the first
    /// acceptable offer.
    pub fn look_for_new_job(&mut self, firms: &mut FirmRegistry, hc: &HouseholdConfig, rng: &mut SimRng) {
        if self.is_happy_at_work(firms, hc.pi, rng) {
            return;
        }
        let searches = if self.is_unemployed() { hc.beta } else { 1 };
        for _ in 0..searches {
            let Some(candidate) = self.select_new_employer(firms, rng) else {
                return;
            };
            if self.is_acceptable_job_offer(firms, candidate) {
                self.change_employer(candidate, firms);
                return;
            }
        }
    }

    /// Quit the current job (if any) before joining `new_employer`.
    pub fn change_employer(&mut self, new_employer: FirmId, firms: &mut FirmRegistry) {
        if let Some(old) = self.employer {
            if let Some(firm) = firms.get_mut(old) {
                firm.quit_job(self.id, self);
            }
            self.employer = None;
        }
        if let Some(firm) = firms.get_mut(new_employer) {
            firm.hire(self.id, self);
        }
    }

    /// Unemployed households lower their sights; employed ones ratchet up to
    /// the wage they are getting.
    pub fn adjust_reservation_wage(&mut self, firms: &FirmRegistry, wage_decay_rate: f64) {
        match self.employer_wage(firms) {
            Some(wage) => self.reservation_wage = self.reservation_wage.max(wage as f64),
            None => self.reservation_wage *= wage_decay_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{Fixture, fixture};
    use crate::types::{FirmId, Money};

    #[test]
    fn unemployed_adjust_wage() {
        let mut f = fixture();
        f.household.reservation_wage = 100.0;
        f.household
            .adjust_reservation_wage(&f.firms, f.config.household.wage_decay_rate);
        assert_eq!(f.household.reservation_wage, 100.0 * f.config.household.wage_decay_rate);
    }

    #[test]
    fn employed_reservation_wage_only_rises() {
        let mut f = fixture();
        let employer = f.firms.market_ids()[0];
        f.household.change_employer(employer, &mut f.firms);
        f.firms.get_mut(employer).unwrap().wage_rate = 300;

        f.household.reservation_wage = 100.0;
        f.household.adjust_reservation_wage(&f.firms, 0.9);
        assert_eq!(f.household.reservation_wage, 300.0);

        f.household.reservation_wage = 500.0;
        f.household.adjust_reservation_wage(&f.firms, 0.9);
        assert_eq!(f.household.reservation_wage, 500.0);
    }

    #[test]
    fn select_new_employer_skips_current() {
        let mut f = fixture();
        let first = f.household.select_new_employer(&f.firms, &mut f.rng).unwrap();
        f.household.change_employer(first, &mut f.firms);
        for _ in 0..50 {
            let next = f.household.select_new_employer(&f.firms, &mut f.rng).unwrap();
            assert_ne!(next, first);
        }
    }

    #[test]
    fn work_status() {
        let mut f = fixture();
        let mut rng = crate::rng::SimRng::new(1);
        assert!(f.household.is_unemployed());
        assert!(!f.household.is_happy_at_work(&f.firms, 0.0, &mut rng));

        let employer = f.firms.market_ids()[0];
        f.household.change_employer(employer, &mut f.firms);
        assert!(!f.household.is_unemployed());
        assert!(!f.household.is_paid_too_little(&f.firms));
        assert!(f.household.is_happy_at_work(&f.firms, 0.0, &mut rng));

        let wage = f.firms.get(employer).unwrap().wage_rate;
        f.household.reservation_wage = wage as f64 + 1.0;
        assert!(f.household.is_paid_too_little(&f.firms));
        assert!(!f.household.is_happy_at_work(&f.firms, 0.0, &mut rng));
    }

    #[test]
    fn find_work() {
        let mut f = fixture();
        let hc = f.config.household.clone();
        let ids: Vec<_> = f.firms.employer_ids().to_vec();
        for &id in &ids {
            let firm = f.firms.get_mut(id).unwrap();
            firm.has_open_position = true;
            firm.wage_rate = 1;
        }

        // Unemployed with zero reservation wage: any open position will do
        f.household.look_for_new_job(&mut f.firms, &hc, &mut f.rng);
        let current = f.household.employer.unwrap();
        assert!(f.firms.get(current).unwrap().employs(f.household.id));
        f.household.adjust_reservation_wage(&f.firms, hc.wage_decay_rate);
        assert_eq!(f.household.reservation_wage, 1.0);

        // Nothing pays better: never moves
        for _ in 0..20 {
            f.household.look_for_new_job(&mut f.firms, &hc, &mut f.rng);
            assert_eq!(f.household.employer, Some(current));
        }

        // Everyone else now pays more than the reservation wage
        for &id in &ids {
            f.firms.get_mut(id).unwrap().wage_rate = 2;
            f.firms.get_mut(id).unwrap().has_open_position = true;
        }
        f.firms.get_mut(current).unwrap().wage_rate = 1;
        f.household.reservation_wage = 1.5;
        f.household.look_for_new_job(&mut f.firms, &hc, &mut f.rng);
        let new_employer = f.household.employer.unwrap();
        assert_ne!(new_employer, current);
        assert!(!f.firms.get(current).unwrap().employs(f.household.id));

        // Quit and check every roster is clear
        let hh_id = f.household.id;
        f.firms
            .get_mut(new_employer)
            .unwrap()
            .quit_job(hh_id, &mut f.household);
        assert!(f.firms.iter().all(|firm| firm.workers.is_empty()));
        assert!(f.household.is_unemployed());
    }

    /// Candidates `look_for_new_job` will draw, replayed on a copy of the
    /// generator.
    fn replay_candidates(f: &Fixture, draws: u32) -> Vec<FirmId> {
        let mut rng = f.rng.clone();
        (0..draws)
            .filter_map(|_| f.household.select_new_employer(&f.firms, &mut rng))
            .collect()
    }

    #[test]
    fn first_acceptable_offer_wins() {
        let mut f = fixture();
        let hc = f.config.household.clone();
        let ids: Vec<_> = f.firms.employer_ids().to_vec();
        for (i, &id) in ids.iter().enumerate() {
            let firm = f.firms.get_mut(id).unwrap();
            firm.has_open_position = true;
            firm.wage_rate = 100 * (i as Money + 1);
        }
        f.firms.get_mut(ids[ids.len() - 1]).unwrap().wage_rate = 10_000;

        let candidates = replay_candidates(&f, hc.beta);
        assert_eq!(candidates.len(), hc.beta as usize);
        // The first candidate drawn has nothing to offer
        f.firms.get_mut(candidates[0]).unwrap().has_open_position = false;
        let expected = candidates.iter().copied().find(|&id| id != candidates[0]);

        f.household.look_for_new_job(&mut f.firms, &hc, &mut f.rng);
        assert_eq!(f.household.employer, expected);
        if let Some(hired) = expected {
            assert!(f.firms.get(hired).unwrap().employs(f.household.id));
        }
    }

    #[test]
    fn unemployed_draw_beta_candidates_employed_draw_one() {
        let mut f = fixture();
        let hc = f.config.household.clone();
        let ids: Vec<_> = f.firms.employer_ids().to_vec();
        for &id in &ids {
            f.firms.get_mut(id).unwrap().has_open_position = false;
        }

        // Unemployed: β draws, nobody hiring
        let mut replay = f.rng.clone();
        for _ in 0..hc.beta {
            f.household.select_new_employer(&f.firms, &mut replay);
        }
        f.household.look_for_new_job(&mut f.firms, &hc, &mut f.rng);
        assert!(f.household.is_unemployed());
        assert_eq!(f.rng.unit().to_bits(), replay.unit().to_bits());

        // Employed below the reservation wage: searches, but draws once
        let employer = ids[0];
        f.firms.get_mut(employer).unwrap().has_open_position = true;
        f.household.change_employer(employer, &mut f.firms);
        f.household.reservation_wage = f.firms.get(employer).unwrap().wage_rate as f64 + 1.0;
        let candidates = replay_candidates(&f, hc.beta);
        assert!(candidates.iter().all(|&id| id != employer));

        let mut replay = f.rng.clone();
        f.household.select_new_employer(&f.firms, &mut replay);
        f.household.look_for_new_job(&mut f.firms, &hc, &mut f.rng);
        assert_eq!(f.household.employer, Some(employer));
        assert_eq!(f.rng.unit().to_bits(), replay.unit().to_bits());
    }

    #[test]
    fn closed_positions_are_not_offers() {
        let mut f = fixture();
        let candidate = f.firms.market_ids()[0];
        f.firms.get_mut(candidate).unwrap().has_open_position = false;
        assert!(!f.household.is_acceptable_job_offer(&f.firms, candidate));
        let jg = f.firms.job_guarantee_id().unwrap();
        assert!(f.household.is_acceptable_job_offer(&f.firms, jg));
    }
}
