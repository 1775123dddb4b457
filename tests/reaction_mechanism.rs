#![allow(missing_docs)]

use kinetics_rate_core::arrhenius::Arrhenius;
use kinetics_rate_core::arrhenius_rate::ArrheniusRate;
use kinetics_rate_core::chebyshev_rate::ChebyshevRate;
use kinetics_rate_core::falloff_rate::{FalloffRate, TroeParams};
use kinetics_rate_core::multi_rate::MultiRate;
use kinetics_rate_core::param::{ParamNode, RateUnits};
use kinetics_rate_core::plog_rate::PlogRate;
use kinetics_rate_core::rate::{rate_from_node, Rate};
use kinetics_rate_core::shared_data::ThermoState;
use kinetics_rate_core::three_body_rate::ThreeBodyRate;
use kinetics_rate_core::units::{EnergyUnit, UnitSystem};
use ndarray::Array2;
use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::rc::Rc;

// A small five-reaction mechanism exercising every rate-law variant, evaluated at the conditions
// used throughout this crate's worked examples: T = 1000 K, composition [AR]=[H2]=[H2O]=1 mol/m^3.

fn test_state() -> ThermoState {
    let mut conc = FxHashMap::default();
    conc.insert("AR".to_string(), 1.0);
    conc.insert("H2".to_string(), 1.0);
    conc.insert("H2O".to_string(), 1.0);
    ThermoState::new(1000.0, 101_325.0, conc)
}

#[test]
fn reaction_1_arrhenius_from_parameter_node() {
    let node = ParamNode::from_yaml_str(
        "equation: O + H2 <=> H + OH\nrate-constant:\n  A: 38.7\n  b: 2.7\n  Ea: 6260 cal/mol\n",
    )
    .unwrap();
    let rate_units = RateUnits::bimolecular_kmol();
    let rate = rate_from_node(&node, rate_units, UnitSystem::default()).unwrap();
    rate.validate("O + H2 <=> H + OH").unwrap();

    let state = ThermoState::from_temperature(1000.0);
    let k = rate.eval(&state);

    let k_kmol = 38.7 * 1000_f64.powf(2.7) * (-6260.0 * 4.184 / (8.314_462_618 * 1000.0)).exp();
    let expected = rate_units.to_si(k_kmol);
    assert!((k - expected).abs() / expected < 1e-10);
}

#[test]
fn reaction_2_three_body_worked_example() {
    let mut eff = FxHashMap::default();
    eff.insert("AR".to_string(), 0.83);
    eff.insert("H2".to_string(), 2.4);
    eff.insert("H2O".to_string(), 15.4);
    let rate = ThreeBodyRate::new(Arrhenius::from_normalized(1.2e11, -1.0, 0.0), eff);

    let k = rate.eval_with_state(&test_state());
    let expected = 1.2e11 * 1000_f64.powi(-1) * 18.63;
    assert!((k - expected).abs() / expected < 1e-12);
}

#[test]
fn reaction_3_falloff_troe_worked_example() {
    let rate = FalloffRate::new(
        Arrhenius::from_normalized(1e12, 0.0, 0.0),
        Arrhenius::from_normalized(1e13, 0.0, 0.0),
        FxHashMap::default(),
        Some(TroeParams {
            a: 0.7346,
            t3: 94.0,
            t1: 1756.0,
            t2: 5182.0,
        }),
    );

    let mut conc = FxHashMap::default();
    conc.insert("M".to_string(), 1.0);
    let state = ThermoState::new(1000.0, 101_325.0, conc);
    let k = rate.eval(&state);

    let f_cent = 0.2654 * (-1000.0_f64 / 94.0).exp()
        + 0.7346 * (-1000.0_f64 / 1756.0).exp()
        + (-5182.0_f64 / 1000.0).exp();
    let pr = 1e12 / 1e13;
    let log_pr = pr.log10();
    let log_f_cent = f_cent.log10();
    let c = -0.4 - 0.67 * log_f_cent;
    let n = 0.75 - 1.27 * log_f_cent;
    let f1 = (log_pr + c) / (n - 0.14 * (log_pr + c));
    let f = 10f64.powf(log_f_cent / (1.0 + f1 * f1));
    let expected = 1e13 * (pr / (1.0 + pr)) * f;

    assert!((k - expected).abs() <= 1e-10 * expected.abs());
}

#[test]
fn reaction_4_plog_interpolates_between_tabulated_pressures() {
    let rate = PlogRate::new(vec![
        (0.01 * 101_325.0, Arrhenius::from_normalized(1.0e8, 0.0, 0.0)),
        (1.0 * 101_325.0, Arrhenius::from_normalized(1.0e10, 0.0, 0.0)),
    ]);
    let state = ThermoState::from_temperature(1000.0);

    let at_first_tabulated = rate.eval_at(&state, 0.01 * 101_325.0);
    let expected_first = Arrhenius::from_normalized(1.0e8, 0.0, 0.0).eval(&state);
    assert!((at_first_tabulated - expected_first).abs() / expected_first < 1e-12);

    let k_lo = Arrhenius::from_normalized(1.0e8, 0.0, 0.0).eval(&state);
    let k_hi = Arrhenius::from_normalized(1.0e10, 0.0, 0.0).eval(&state);
    let log_p_lo = (0.01 * 101_325.0_f64).ln();
    let log_p_hi = (1.0 * 101_325.0_f64).ln();
    let log_p_mid = (0.5 * 101_325.0_f64).ln();
    let frac = (log_p_mid - log_p_lo) / (log_p_hi - log_p_lo);
    let expected_mid = (k_lo.ln() + (k_hi.ln() - k_lo.ln()) * frac).exp();

    let at_mid = rate.eval_at(&state, 0.5 * 101_325.0);
    assert!((at_mid - expected_mid).abs() / expected_mid < 1e-12);
}

#[test]
fn reaction_5_chebyshev_matches_clenshaw_double_sum() {
    let coeffs = Array2::from_shape_vec((2, 2), vec![1.0, 0.2, -0.3, 0.05]).unwrap();
    let rate = ChebyshevRate::new(300.0, 2500.0, 1000.0, 1.0e7, coeffs);

    let k = rate.eval_at(1000.0, 101_325.0);

    let recip_t_min = 1.0 / 300.0;
    let recip_t_max = 1.0 / 2500.0;
    let t_tilde =
        ((2.0 / 1000.0 - recip_t_min - recip_t_max) / (recip_t_max - recip_t_min)).clamp(-1.0, 1.0);
    let p_tilde = ((2.0 * 101_325.0_f64.ln() - 1000.0_f64.ln() - 1.0e7_f64.ln())
        / (1.0e7_f64.ln() - 1000.0_f64.ln()))
    .clamp(-1.0, 1.0);

    let phi = |n: u32, x: f64| (f64::from(n) * x.acos()).cos();
    let coeffs = [[1.0, 0.2], [-0.3, 0.05]];
    let mut expected_log10_k = 0.0;
    for (i, row) in coeffs.iter().enumerate() {
        for (j, c) in row.iter().enumerate() {
            expected_log10_k += c * phi(i as u32, t_tilde) * phi(j as u32, p_tilde);
        }
    }
    let expected = 10f64.powf(expected_log10_k);

    assert!((k - expected).abs() / expected < 1e-9);
}

#[test]
fn doubling_pre_exponential_factor_doubles_linked_evaluator_output() {
    let evaluator = Rc::new(RefCell::new(MultiRate::<ArrheniusRate>::new()));
    let triple = Arrhenius::from_energy(
        RateUnits::bimolecular_kmol().to_si(38.7),
        2.7,
        6260.0,
        EnergyUnit::CaloriePerMole,
    );
    let mut rate = ArrheniusRate::from_triple(triple);
    let index = evaluator.borrow_mut().add(rate.clone());
    rate.link_evaluator(&evaluator, index);

    let state = ThermoState::from_temperature(1000.0);
    let mut out = vec![0.0; 1];
    evaluator.borrow_mut().update(state.clone());
    evaluator.borrow().eval(&mut out);
    let k_before = out[0];

    rate.set_pre_exponential_factor(2.0 * triple.a);

    evaluator.borrow_mut().update(state);
    evaluator.borrow().eval(&mut out);
    let k_after = out[0];

    assert!((k_after - 2.0 * k_before).abs() / k_before < 1e-12);
}
