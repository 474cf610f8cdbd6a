//! Unit tests for the compliance model.

#[cfg(test)]
mod helpers {
    use pw_core::{AgentId, AgentRng, MasterRng, RngStream};

    use crate::{DecisionInputs, Weights};

    pub fn rng(agent: u32) -> AgentRng {
        MasterRng::new(1234).agent_stream(AgentId(agent), RngStream::Decision)
    }

    pub fn neutral_weights() -> Weights {
        Weights {
            constant: 0.0,
            rel_total_detour: 0.0,
            one_way: 0.0,
        }
    }

    pub fn inputs(detour: f64, one_way: bool) -> DecisionInputs {
        DecisionInputs {
            detour,
            len_traversed: 100.0,
            remaining_length: 300.0,
            one_way,
            edge_density: 0.0,
        }
    }
}

#[cfg(test)]
mod logit {
    use pw_core::Scenario;

    use super::helpers::{inputs, neutral_weights};
    use crate::{ComplianceModel, Weights};

    #[test]
    fn zero_z_is_half() {
        let m = ComplianceModel::new(Scenario::ComplexCompliance, 0.0);
        let p = m.stay_probability(&neutral_weights(), &inputs(50.0, false));
        assert!((p - 0.5).abs() < 1e-12);
    }

    #[test]
    fn relative_detour_normalization() {
        // z = w_rtd · detour / (traversed + remaining) = −10 · 40/400 = −1.
        let m = ComplianceModel::new(Scenario::ComplexCompliance, 0.0);
        let w = Weights {
            constant: 0.0,
            rel_total_detour: -10.0,
            one_way: 0.0,
        };
        let p = m.stay_probability(&w, &inputs(40.0, false));
        let expected = 1.0 / (1.0 + 1.0_f64.exp());
        assert!((p - expected).abs() < 1e-12);
    }

    #[test]
    fn one_way_indicator_shifts_z() {
        let m = ComplianceModel::new(Scenario::ComplexCompliance, 0.0);
        let w = Weights {
            constant: 0.0,
            rel_total_detour: 0.0,
            one_way: -1.5,
        };
        let p_normal = m.stay_probability(&w, &inputs(0.0, false));
        let p_ows = m.stay_probability(&w, &inputs(0.0, true));
        assert!((p_normal - 0.5).abs() < 1e-12);
        assert!(p_ows < p_normal, "restriction should push towards deviating");
    }

    #[test]
    fn density_term_uses_model_weight() {
        let m = ComplianceModel::new(Scenario::ComplexCompliance, -2.0);
        let mut inp = inputs(0.0, false);
        inp.edge_density = 0.25;
        // z = −2 · 0.25 = −0.5
        let p = m.stay_probability(&neutral_weights(), &inp);
        let expected = 1.0 / (1.0 + 0.5_f64.exp());
        assert!((p - expected).abs() < 1e-12);
    }

    #[test]
    fn empty_route_does_not_divide_by_zero() {
        let m = ComplianceModel::new(Scenario::ComplexCompliance, 0.0);
        let w = Weights {
            constant: 0.0,
            rel_total_detour: -10.0,
            one_way: 0.0,
        };
        let inp = crate::DecisionInputs {
            detour: 40.0,
            len_traversed: 0.0,
            remaining_length: 0.0,
            one_way: false,
            edge_density: 0.0,
        };
        let p = m.stay_probability(&w, &inp);
        assert!(p.is_finite());
        assert!((p - 0.5).abs() < 1e-12);
    }
}

#[cfg(test)]
mod decide {
    use pw_core::Scenario;

    use super::helpers::{inputs, neutral_weights, rng};
    use crate::{ComplianceModel, Weights};

    #[test]
    fn simple_compliance_forces_deviation_without_draw() {
        let m = ComplianceModel::new(Scenario::SimpleCompliance, 0.0);
        let mut r = rng(0);
        for _ in 0..20 {
            let d = m.decide(&neutral_weights(), &inputs(1_000.0, true), &mut r, true);
            assert!(d.deviate);
            assert_eq!(d.stay_probability, None);
        }
    }

    #[test]
    fn simple_compliance_still_draws_on_normal_streets() {
        // Certain stay: z → +∞.
        let m = ComplianceModel::new(Scenario::SimpleCompliance, 0.0);
        let w = Weights {
            constant: 50.0,
            ..neutral_weights()
        };
        let mut r = rng(1);
        let d = m.decide(&w, &inputs(10.0, false), &mut r, true);
        assert!(!d.deviate);
    }

    #[test]
    fn probability_recorded_only_for_one_way() {
        let m = ComplianceModel::new(Scenario::ComplexCompliance, 0.0);
        let mut r = rng(2);
        let d_normal = m.decide(&neutral_weights(), &inputs(0.0, false), &mut r, true);
        assert_eq!(d_normal.stay_probability, None);

        let d_ows = m.decide(&neutral_weights(), &inputs(0.0, true), &mut r, true);
        assert!(d_ows.stay_probability.is_some());

        let d_unrecorded = m.decide(&neutral_weights(), &inputs(0.0, true), &mut r, false);
        assert_eq!(d_unrecorded.stay_probability, None);
    }

    #[test]
    fn extreme_weights_are_deterministic() {
        let m = ComplianceModel::new(Scenario::ComplexCompliance, 0.0);
        let mut r = rng(3);

        // z = +50 → P(stay) ≈ 1 → never deviate.
        let stay = Weights {
            constant: 50.0,
            ..neutral_weights()
        };
        // z = −50 → P(stay) ≈ 0 → always deviate.
        let go = Weights {
            constant: -50.0,
            ..neutral_weights()
        };
        for _ in 0..50 {
            assert!(!m.decide(&stay, &inputs(0.0, true), &mut r, false).deviate);
            assert!(m.decide(&go, &inputs(0.0, true), &mut r, false).deviate);
        }
    }

    #[test]
    fn same_stream_reproduces_decisions() {
        let m = ComplianceModel::new(Scenario::ComplexCompliance, 0.0);
        let mut a = rng(7);
        let mut b = rng(7);
        for _ in 0..32 {
            let da = m.decide(&neutral_weights(), &inputs(5.0, true), &mut a, true);
            let db = m.decide(&neutral_weights(), &inputs(5.0, true), &mut b, true);
            assert_eq!(da, db);
        }
    }
}

#[cfg(test)]
mod outcome {
    use crate::DecisionOutcome;

    #[test]
    fn classification_matrix() {
        use DecisionOutcome::*;
        // (deviated, one_way, alt_forbidden) → outcome
        let cases = [
            ((true, true, false), Compliance),
            ((true, false, false), RandomRerouting),
            ((true, true, true), NonCompliance),
            ((true, false, true), NonCompliance),
            ((false, true, false), NonCompliance),
            ((false, true, true), NonCompliance),
            ((false, false, false), NoRouteChange),
            ((false, false, true), NoRouteChange),
        ];
        for ((dev, ows, alt), expected) in cases {
            assert_eq!(
                DecisionOutcome::classify(dev, ows, alt),
                expected,
                "classify({dev}, {ows}, {alt})"
            );
        }
    }

    #[test]
    fn exactly_one_flag_per_outcome() {
        for dev in [false, true] {
            for ows in [false, true] {
                for alt in [false, true] {
                    let flags = DecisionOutcome::classify(dev, ows, alt).flags();
                    assert_eq!(flags.count_set(), 1);
                }
            }
        }
    }
}

#[cfg(test)]
mod weights {
    use pw_core::{AgentId, MasterRng, ModelConfig, NormalParams, RngStream};

    use crate::Weights;

    #[test]
    fn point_mass_when_sd_zero() {
        let cfg = ModelConfig {
            constant_weight: NormalParams::new(0.3, 0.0),
            rtd_weight: NormalParams::new(-8.0, 0.0),
            ows_weight: NormalParams::new(-1.2, 0.0),
            ..Default::default()
        };
        let master = MasterRng::new(5);
        let mut rng = master.agent_stream(AgentId(0), RngStream::Attributes);
        let w = Weights::sample(&cfg, &mut rng);
        assert_eq!(w.constant, 0.3);
        assert_eq!(w.rel_total_detour, -8.0);
        assert_eq!(w.one_way, -1.2);
    }

    #[test]
    fn draws_are_reproducible_per_agent() {
        let cfg = ModelConfig {
            constant_weight: NormalParams::new(0.0, 1.0),
            ..Default::default()
        };
        let master = MasterRng::new(5);
        let mut a = master.agent_stream(AgentId(3), RngStream::Attributes);
        let mut b = master.agent_stream(AgentId(3), RngStream::Attributes);
        assert_eq!(Weights::sample(&cfg, &mut a), Weights::sample(&cfg, &mut b));
    }
}
