use slotmap::SlotMap;

use super::Firm;
use crate::config::{EconomyConfig, JobGuaranteeConfig};
use crate::types::FirmId;

/// Arena of every firm plus the two orderings the rest of the economy reads:
/// market firms (the supplier pool) and employers (market firms, then the
/// job guarantee). Firms are never removed, so both lists stay valid for
/// the life of the economy.
#[derive(Debug, Clone, Default)]
pub struct FirmRegistry {
    pub arena: SlotMap<FirmId, Firm>,
    market: Vec<FirmId>,
    employers: Vec<FirmId>,
    job_guarantee: Option<FirmId>,
}

impl FirmRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a market firm with the calibrated starting values.
    pub fn add_market_firm(&mut self, config: &EconomyConfig) -> FirmId {
        let id = self.arena.insert_with_key(|id| Firm::new(id, config));
        self.market.push(id);
        match self.job_guarantee {
            // Keep the job guarantee last in employer order
            Some(jg) => {
                let at = self.employers.len().saturating_sub(1);
                debug_assert_eq!(self.employers.get(at), Some(&jg));
                self.employers.insert(at, id);
            }
            None => self.employers.push(id),
        }
        id
    }

    /// Add the job guarantee. A second call returns the existing one.
    pub fn add_job_guarantee(&mut self, config: &JobGuaranteeConfig, month_length: u32) -> FirmId {
        if let Some(id) = self.job_guarantee {
            return id;
        }
        let id = self
            .arena
            .insert_with_key(|id| Firm::job_guarantee(id, config, month_length));
        self.employers.push(id);
        self.job_guarantee = Some(id);
        id
    }

    pub fn get(&self, id: FirmId) -> Option<&Firm> {
        self.arena.get(id)
    }

    pub fn get_mut(&mut self, id: FirmId) -> Option<&mut Firm> {
        self.arena.get_mut(id)
    }

    /// Goods suppliers a household may choose from.
    pub fn market_ids(&self) -> &[FirmId] {
        &self.market
    }

    /// Every firm that can hire: market firms first, the job guarantee last.
    /// This is also the order firms act in.
    pub fn employer_ids(&self) -> &[FirmId] {
        &self.employers
    }

    pub fn job_guarantee_id(&self) -> Option<FirmId> {
        self.job_guarantee
    }

    pub fn job_guarantee(&self) -> Option<&Firm> {
        self.job_guarantee.and_then(|id| self.arena.get(id))
    }

    /// Firms in acting order.
    pub fn iter(&self) -> impl Iterator<Item = &Firm> {
        self.employers.iter().filter_map(|id| self.arena.get(*id))
    }

    /// Market firms only.
    pub fn market(&self) -> impl Iterator<Item = &Firm> {
        self.market.iter().filter_map(|id| self.arena.get(*id))
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }
}
