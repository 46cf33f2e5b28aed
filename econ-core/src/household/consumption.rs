//! Consumption planning (monthly) and purchasing (daily).

use super::{ConsumptionPlan, Household};
use crate::firm::FirmRegistry;
use crate::rng::SimRng;
#[cfg(feature = "instrument")]
use crate::types::KeyToU64;
use crate::types::{Money, Units};

/// Monthly consumption for a given liquidity and average price:
/// (liquidity / price)^α. Concave in real wealth, so richer households save
/// a larger share.
pub fn planned_consumption_amount(liquidity: Money, average_price: f64, alpha: f64) -> f64 {
    let real_wealth = liquidity.max(0) as f64 / average_price;
    real_wealth.powf(alpha)
}

impl Household {
    /// Average price over the preferred suppliers that still exist.
    pub fn average_supplier_price(&self, firms: &FirmRegistry) -> Option<f64> {
        let prices: Vec<f64> = self
            .preferred_suppliers
            .iter()
            .filter_map(|&id| firms.get(id))
            .map(|firm| firm.goods_price as f64)
            .collect();
        if prices.is_empty() {
            return None;
        }
        Some(prices.iter().sum::<f64>() / prices.len() as f64)
    }

    /// Fix this month's daily demand. Free goods (or no suppliers at all)
    /// mean demand has no bound and nothing is saved.
    pub fn plan_consumption(&mut self, firms: &FirmRegistry, alpha: f64, month_length: u32) {
        self.consumption = match self.average_supplier_price(firms) {
            Some(average_price) if average_price > 0.0 => {
                let planned = planned_consumption_amount(self.liquidity, average_price, alpha);
                ConsumptionPlan {
                    current_demand: (planned / f64::from(month_length)).floor() as Units,
                    planned_consumption: planned,
                    planned_savings: self.liquidity as f64 - planned * average_price,
                }
            }
            _ => ConsumptionPlan {
                current_demand: Units::MAX,
                planned_consumption: f64::INFINITY,
                planned_savings: 0.0,
            },
        };
    }

    /// Enough bought once what remains is within the tolerated shortfall.
    pub fn is_satisfied(&self, remaining: Units, satisfaction_fraction: f64) -> bool {
        remaining as f64 <= (1.0 - satisfaction_fraction) * self.consumption.current_demand as f64
    }

    /// Visit suppliers in random order buying what is wanted, affordable and
    /// in stock. Suppliers that fall short get blackmarked; whatever is still
    /// missing at the end counts as unsatisfied demand.
    pub fn buy_goods(&mut self, firms: &mut FirmRegistry, satisfaction_fraction: f64, rng: &mut SimRng) {
        let mut vendors = self.preferred_suppliers.clone();
        rng.shuffle(&mut vendors);

        let mut remaining = self.consumption.current_demand;
        for vendor_id in vendors {
            if self.is_satisfied(remaining, satisfaction_fraction) {
                return;
            }
            let Some(vendor) = firms.get_mut(vendor_id) else {
                continue;
            };

            let price = vendor.goods_price;
            let affordable = if price > 0 {
                self.liquidity.max(0) / price
            } else {
                remaining
            };
            let available = vendor.inventory.max(0);
            let wanted = remaining.min(affordable);

            if available < wanted {
                self.blackmark(vendor_id, wanted - available);
            }

            let quantity = wanted.min(available);
            if quantity <= 0 {
                continue;
            }
            let cost = quantity * price;
            self.liquidity -= cost;
            vendor.sell_goods(quantity, cost);
            remaining -= quantity;

            #[cfg(feature = "instrument")]
            tracing::trace!(
                target: "purchase",
                household_id = self.id.to_u64(),
                firm_id = vendor_id.to_u64(),
                quantity = quantity,
                price = price,
            );
        }

        if !self.is_satisfied(remaining, satisfaction_fraction) {
            self.unsatisfied_demand = self.unsatisfied_demand.saturating_add(remaining);
        }
    }
}
