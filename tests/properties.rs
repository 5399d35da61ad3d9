use ballsim::core::{layout, Simulation};
use ballsim::error::Result;
use proptest::prelude::*;

const RADIUS: f64 = 0.08;
const TOL: f64 = 1e-9;

/// Smallest centre distance between two balls moving in straight lines from
/// `(ra, va)` and `(rb, vb)` over `[0, dt]`.
fn closest_approach(ra: [f64; 2], va: [f64; 2], rb: [f64; 2], vb: [f64; 2], dt: f64) -> f64 {
    let dl = [rb[0] - ra[0], rb[1] - ra[1]];
    let dv = [vb[0] - va[0], vb[1] - va[1]];
    let dv_sq = dv[0] * dv[0] + dv[1] * dv[1];
    let t = if dv_sq > 0.0 {
        (-(dl[0] * dv[0] + dl[1] * dv[1]) / dv_sq).clamp(0.0, dt)
    } else {
        0.0
    };
    let d = [dl[0] + dv[0] * t, dl[1] + dv[1] * t];
    (d[0] * d[0] + d[1] * d[1]).sqrt()
}

/// Step `sim` `steps` times, checking every pair along each free flight.
fn assert_no_tunnelling(sim: &mut Simulation, steps: usize) -> Result<()> {
    for _ in 0..steps {
        let (r0, v0) = (sim.positions(), sim.velocities());
        let Some(event) = sim.step()? else { break };
        let dt = event.dt();
        assert!(dt >= 0.0);
        for i in 0..r0.len() {
            for j in (i + 1)..r0.len() {
                let d = closest_approach(r0[i], v0[i], r0[j], v0[j], dt);
                assert!(
                    d >= 2.0 * RADIUS - TOL,
                    "balls {i} and {j} came within {d} during a step of {dt} ({event})"
                );
            }
        }
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// Random layouts never penetrate, keep time monotone and conserve energy.
    #[test]
    fn random_layouts_keep_invariants(seed in any::<u64>(), n in 2usize..12) {
        let balls = layout::random(n, 2.0, RADIUS, Some(seed)).unwrap();
        let mut sim = Simulation::new(balls, 2.0).unwrap();
        let e0 = sim.kinetic_energy();
        let mut last_t = 0.0_f64;
        let mut ok = true;

        sim.run_with(300, |ev, t, _| {
            ok &= ev.dt() >= 0.0 && t >= last_t;
            last_t = t;
        }).unwrap();

        prop_assert!(ok, "time went backwards");
        prop_assert!(sim.check_invariants().is_ok());
        let e1 = sim.kinetic_energy();
        prop_assert!(((e1 - e0) / e0).abs() < 1e-10);
    }

    /// Slow balls (velocity components up to 1e-6) still collide rather than
    /// passing through each other between events.
    #[test]
    fn slow_balls_never_pass_through(seed in any::<u64>(), n in 2usize..10, scale_exp in 6i32..9) {
        let balls = layout::random(n, 1.0, RADIUS, Some(seed)).unwrap();
        let mut sim = Simulation::new(balls, 1.0).unwrap();
        let scale = 10f64.powi(-scale_exp);
        let slow: Vec<[f64; 2]> = sim
            .velocities()
            .iter()
            .map(|v| [v[0] * scale, v[1] * scale])
            .collect();
        sim.set_velocities(&slow).unwrap();

        assert_no_tunnelling(&mut sim, 200).unwrap();
        prop_assert!(sim.check_invariants().is_ok());
    }
}

#[test]
fn head_on_slow_pair_has_no_tunnelling() -> Result<()> {
    let balls = vec![
        ballsim::Ball::new("a", [0.3, 0.5], [2.5e-7, 0.0], RADIUS)?,
        ballsim::Ball::new("b", [0.7, 0.5], [-2.5e-7, 0.0], RADIUS)?,
    ];
    let mut sim = Simulation::new(balls, 1.0)?;
    assert_no_tunnelling(&mut sim, 20)
}
