use econ_core::{Economy, EconomyConfig, FirmId, Money};

fn config(num_households: usize, num_firms: usize) -> EconomyConfig {
    EconomyConfig {
        num_households,
        num_firms,
        ..EconomyConfig::default()
    }
}

#[test]
fn scenario_month_boundaries() {
    let mut economy = Economy::new(config(30, 8)).unwrap();
    let mut starts = Vec::new();
    let mut ends = Vec::new();
    for _ in 0..63 {
        let report = economy.step();
        if report.month_start {
            starts.push(report.step);
        }
        if report.month_end {
            ends.push(report.step);
            assert_eq!(economy.month(), report.month + 1);
        }
    }
    assert_eq!(starts, vec![0, 21, 42]);
    assert_eq!(ends, vec![20, 41, 62]);
    assert_eq!(economy.month(), 3);
}

#[test]
fn scenario_wages_only_flow_at_month_end() {
    let mut economy = Economy::new(config(40, 8)).unwrap();
    for _ in 0..42 {
        let report = economy.step();
        if !report.month_end {
            assert_eq!(report.wages_paid, 0);
            assert_eq!(report.dividends_paid, 0);
        }
    }
}

#[test]
fn scenario_open_position_raises_wage() {
    let mut economy = Economy::new(config(20, 8)).unwrap();
    let firm_id: FirmId = economy.firms().market_ids()[0];
    {
        let firm = economy.agents_mut().firms.get_mut(firm_id).unwrap();
        firm.wage_rate = 1;
        firm.has_open_position = true;
    }
    let report = economy.step();
    assert!(report.month_start);
    let firm = economy.firm(firm_id).unwrap();
    assert_eq!(firm.wage_rate, 2);
    assert!(firm.stats.raised_wage);
}

#[test]
fn scenario_job_guarantee_terms_are_fixed() {
    let mut economy = Economy::new(config(60, 8)).unwrap();
    let jg_config = economy.config().job_guarantee.clone().unwrap();
    let month_length = economy.config().month_length;
    economy.run_months(6);

    let jg = economy.job_guarantee().unwrap();
    assert_eq!(jg.wage_rate, jg_config.wage_rate(month_length));
    assert_eq!(jg.goods_price, jg_config.goods_price());
    assert!(jg.has_open_position);
    assert_eq!(jg.worker_on_notice, None);
    let expected_deficit: Money = -(jg.wage_rate * jg.workers.len() as Money);
    // The deficit is at least the latest month's wage bill
    assert!(jg.liquidity <= expected_deficit);
}

#[test]
fn scenario_unemployed_are_absorbed() {
    // Market firms fill one opening each at the start; the job guarantee
    // takes anyone who finds it
    let mut economy = Economy::new(config(50, 8)).unwrap();
    economy.run_months(3);
    let stats = economy.stats();
    assert!(stats.job_guarantee_employed > 0);
    assert_eq!(stats.employed + stats.job_guarantee_employed + stats.unemployed, 50);
}

#[test]
fn scenario_without_job_guarantee() {
    let mut economy = Economy::new(EconomyConfig {
        job_guarantee: None,
        ..config(50, 8)
    })
    .unwrap();
    economy.run_months(4);
    let stats = economy.stats();
    assert_eq!(stats.job_guarantee_employed, 0);
    assert_eq!(stats.job_guarantee_liquidity, 0);
    assert_eq!(stats.total_liquidity, 50 * economy.config().household.initial_liquidity);
}

#[test]
fn scenario_unemployed_reservation_wage_decays() {
    let mut economy = Economy::new(EconomyConfig {
        job_guarantee: None,
        ..config(10, 8)
    })
    .unwrap();
    let ids: Vec<_> = economy.households().keys().collect();
    for &id in &ids {
        economy.agents_mut().households[id].reservation_wage = 1_000_000.0;
    }
    // Nobody is hiring at that price
    economy.run_months(1);
    for &id in &ids {
        let household = economy.household(id).unwrap();
        if household.is_unemployed() {
            assert!((household.reservation_wage - 900_000.0).abs() < 1e-6);
        }
    }
}
