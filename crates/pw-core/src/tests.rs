//! Unit tests for pw-core primitives.

#[cfg(test)]
mod ids {
    use crate::{AgentId, EdgeId, NodeId};

    #[test]
    fn index_roundtrip() {
        let id = AgentId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(AgentId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(AgentId::INVALID.0, u32::MAX);
        assert_eq!(NodeId::INVALID.0, u32::MAX);
        assert_eq!(EdgeId::INVALID.0, u32::MAX);
    }

    #[test]
    fn display() {
        assert_eq!(NodeId(7).to_string(), "NodeId(7)");
    }
}

#[cfg(test)]
mod geom {
    use crate::{Point2, Polyline};

    #[test]
    fn point_distance() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(3.0, 4.0);
        assert_eq!(a.distance(b), 5.0);
    }

    #[test]
    fn polyline_length_sums_segments() {
        let line = Polyline(vec![
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(10.0, 5.0),
        ]);
        assert!((line.length() - 15.0).abs() < 1e-12);
    }

    #[test]
    fn point_at_interpolates_across_vertices() {
        let line = Polyline(vec![
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(10.0, 5.0),
        ]);
        assert_eq!(line.point_at(5.0), Point2::new(5.0, 0.0));
        assert_eq!(line.point_at(12.0), Point2::new(10.0, 2.0));
    }

    #[test]
    fn point_at_clamps() {
        let line = Polyline::segment(Point2::new(0.0, 0.0), Point2::new(10.0, 0.0));
        assert_eq!(line.point_at(-1.0), line.first());
        assert_eq!(line.point_at(99.0), line.last());
    }

    #[test]
    fn directed_offsets_mirror() {
        // Offset o from one end equals offset (len - o) from the other.
        let line = Polyline(vec![
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(10.0, 10.0),
        ]);
        let fwd = line.point_at_directed(4.0, true);
        let rev = line.point_at_directed(16.0, false);
        assert!(fwd.distance(rev) < 1e-9);
    }
}

#[cfg(test)]
mod rng {
    use crate::{AgentId, MasterRng, RngStream};

    #[test]
    fn streams_are_reproducible() {
        let master = MasterRng::new(7);
        let mut a = master.agent_stream(AgentId(3), RngStream::Decision);
        let mut b = master.agent_stream(AgentId(3), RngStream::Decision);
        for _ in 0..16 {
            assert_eq!(a.uniform(), b.uniform());
        }
    }

    #[test]
    fn streams_differ_by_agent_and_tag() {
        let master = MasterRng::new(7);
        let mut a = master.agent_stream(AgentId(0), RngStream::Decision);
        let mut b = master.agent_stream(AgentId(1), RngStream::Decision);
        let mut c = master.agent_stream(AgentId(0), RngStream::Destination);
        let (xa, xb, xc) = (a.uniform(), b.uniform(), c.uniform());
        assert_ne!(xa, xb);
        assert_ne!(xa, xc);
    }

    #[test]
    fn uniform_in_unit_interval() {
        let master = MasterRng::new(99);
        let mut s = master.agent_stream(AgentId(5), RngStream::Decision);
        for _ in 0..100 {
            let x = s.uniform();
            assert!((0.0..1.0).contains(&x));
        }
    }
}

#[cfg(test)]
mod config {
    use crate::{ModelConfig, Scenario};

    #[test]
    fn default_is_valid() {
        assert!(ModelConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_zero_agents() {
        let cfg = ModelConfig {
            agents: 0,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_negative_sd() {
        let mut cfg = ModelConfig::default();
        cfg.ows_weight.sd = -0.1;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn scenario_intervention_clearing() {
        assert!(Scenario::NoInterventions.clears_interventions());
        assert!(!Scenario::SimpleCompliance.clears_interventions());
        assert!(!Scenario::ComplexCompliance.clears_interventions());
    }
}
