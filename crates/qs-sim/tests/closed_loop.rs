//! Integration test: quiet standing on a perturbed platform.
//!
//! Test that demonstrates:
//! - Open loop, a small lean grows (the upright posture is unstable)
//! - Closed loop, the same lean decays and platform excitation stays small
//! - The feedback gains can be recovered from the simulated trajectory
//! - Shooting identification recovers the gains from states alone, and fits
//!   noisy states down to the noise level
//! - Forward Euler converges toward RK4 as the step shrinks

use qs_controls::{FeedbackGains, identify_gains};
use qs_dynamics::{Constants, DynamicsEvaluator, PhysicalParams, State};
use qs_sim::{
    IntegratorType, MeasurementNoise, QuietStandingModel, SampledInput, ShootingConfig,
    SimOptions, SpecifiedInput, SumOfSines, ZeroInput, identify_gains_shooting, run_sim,
};

fn gains() -> FeedbackGains {
    FeedbackGains::unscaled([[950.0, 175.0, 185.0, 50.0], [45.0, 290.0, 60.0, 26.0]]).unwrap()
}

fn evaluator(fb: FeedbackGains) -> DynamicsEvaluator {
    DynamicsEvaluator::new(Constants::new(PhysicalParams::reference(), fb)).unwrap()
}

fn max_angle(x: &[State]) -> f64 {
    x.iter()
        .map(|s| s.theta_a.abs().max(s.theta_h.abs()))
        .fold(0.0, f64::max)
}

#[test]
fn open_loop_lean_grows() {
    let lean = State::new(0.02, 0.0, 0.0, 0.0);
    let mut model =
        QuietStandingModel::new(evaluator(FeedbackGains::zero()), ZeroInput).with_initial_state(lean);
    let opts = SimOptions {
        dt: 1e-3,
        t_end: 0.5,
        ..SimOptions::default()
    };

    let record = run_sim(&mut model, &opts).unwrap();
    assert!(
        max_angle(&record.x) > 0.04,
        "lean should at least double, got {}",
        max_angle(&record.x)
    );
}

#[test]
fn closed_loop_lean_decays() {
    let lean = State::new(0.02, 0.0, 0.0, 0.0);
    let mut model = QuietStandingModel::new(evaluator(gains()), ZeroInput).with_initial_state(lean);
    let opts = SimOptions {
        dt: 1e-2,
        t_end: 10.0,
        ..SimOptions::default()
    };

    let record = run_sim(&mut model, &opts).unwrap();
    assert!(max_angle(&record.x) <= 0.0201);
    let (_, last) = record.last().unwrap();
    assert!(last.theta_a.abs() < 1e-6);
    assert!(last.theta_h.abs() < 1e-6);
}

#[test]
fn excitation_response_is_small_and_identifiable() {
    let platform = SumOfSines::standard(0.01).unwrap();
    let mut model = QuietStandingModel::new(evaluator(gains()), platform);
    let opts = SimOptions {
        dt: 1e-2,
        t_end: 10.0,
        ..SimOptions::default()
    };

    let record = run_sim(&mut model, &opts).unwrap();
    assert_eq!(record.len(), 1001);
    assert!(max_angle(&record.x) < 0.01);

    let torques = model.trajectory_torques(&record);
    let inputs = model.trajectory_inputs(&record);
    assert_eq!(torques.len(), record.len());
    assert!(inputs.iter().any(|a| a.abs() > 0.01));

    let states: Vec<[f64; 4]> = record.x.iter().map(State::to_array).collect();
    let id = identify_gains(&states, &torques).unwrap();
    assert_eq!(id.rank, 4);
    let truth = gains().effective();
    for i in 0..2 {
        for j in 0..4 {
            let rel = (id.gains[i][j] - truth[i][j]).abs() / truth[i][j].abs();
            assert!(rel < 1e-6, "gain [{i}][{j}] off by {rel}");
        }
    }
}

#[test]
fn sampled_input_matches_analytic_signal() {
    let platform = SumOfSines::standard(0.01).unwrap();
    let sampled = SampledInput::from_signal(&platform, 2.0, 2001).unwrap();
    let opts = SimOptions {
        dt: 1e-3,
        t_end: 2.0,
        ..SimOptions::default()
    };

    let mut exact = QuietStandingModel::new(evaluator(gains()), platform.clone());
    let mut interp = QuietStandingModel::new(evaluator(gains()), sampled);
    let a = run_sim(&mut exact, &opts).unwrap();
    let b = run_sim(&mut interp, &opts).unwrap();

    assert!((interp.input().value(0.0005) - platform.value(0.0005)).abs() < 1e-4);
    let (_, xa) = a.last().unwrap();
    let (_, xb) = b.last().unwrap();
    assert!((xa.theta_a - xb.theta_a).abs() < 1e-5);
    assert!((xa.theta_h - xb.theta_h).abs() < 1e-5);
}

#[test]
fn euler_converges_toward_rk4() {
    let lean = State::new(0.02, -0.01, 0.0, 0.0);
    let reference = {
        let mut m = QuietStandingModel::new(evaluator(gains()), ZeroInput).with_initial_state(lean);
        let opts = SimOptions {
            dt: 1e-3,
            t_end: 0.5,
            ..SimOptions::default()
        };
        *run_sim(&mut m, &opts).unwrap().last().unwrap().1
    };

    let euler_error = |dt: f64| {
        let mut m = QuietStandingModel::new(evaluator(gains()), ZeroInput).with_initial_state(lean);
        let opts = SimOptions {
            dt,
            t_end: 0.5,
            integrator: IntegratorType::ForwardEuler,
            ..SimOptions::default()
        };
        let record = run_sim(&mut m, &opts).unwrap();
        let (_, x) = record.last().unwrap();
        (x.theta_a - reference.theta_a).abs() + (x.theta_h - reference.theta_h).abs()
    };

    let coarse = euler_error(1e-3);
    let fine = euler_error(1e-4);
    assert!(fine < coarse);
    assert!(fine < 1e-4);
}

fn excited_run() -> SimOptions {
    SimOptions {
        dt: 1e-2,
        t_end: 5.0,
        ..SimOptions::default()
    }
}

#[test]
fn shooting_recovers_gains_from_clean_states() {
    let platform = SumOfSines::standard(0.01).unwrap();
    let mut actual = QuietStandingModel::new(evaluator(gains()), platform.clone());
    let record = run_sim(&mut actual, &excited_run()).unwrap();
    let data = actual.measure(&record, &MeasurementNoise::none()).unwrap();

    let guess = QuietStandingModel::new(evaluator(gains().scaled_by(0.8)), platform);
    let result =
        identify_gains_shooting(&guess, &data.states, &excited_run(), &ShootingConfig::default())
            .unwrap();

    assert!(result.converged);
    assert!(result.residual_norm < 1e-8, "residual {}", result.residual_norm);
    assert!(result.initial_residual_norm > 1e-3);
    let truth = gains().effective();
    for i in 0..2 {
        for j in 0..4 {
            let rel = (result.gains[i][j] - truth[i][j]).abs() / truth[i][j].abs();
            assert!(rel < 1e-5, "gain [{i}][{j}] off by {rel}");
        }
    }
}

#[test]
fn shooting_fits_noisy_states_to_noise_level() {
    let platform = SumOfSines::standard(0.01).unwrap();
    let mut actual = QuietStandingModel::new(evaluator(gains()), platform.clone());
    let record = run_sim(&mut actual, &excited_run()).unwrap();
    let noise = MeasurementNoise {
        coordinate_std: 1e-4,
        speed_std: 1e-3,
        ..MeasurementNoise::none()
    }
    .with_seed(2024);
    let data = actual.measure(&record, &noise).unwrap();

    // Error of the true trajectory against the measurements: pure noise.
    let noise_norm = data
        .states
        .iter()
        .zip(&record.x)
        .flat_map(|(m, x)| {
            let (m, x) = (m.to_array(), x.to_array());
            (0..4).map(move |j| (m[j] - x[j]).powi(2))
        })
        .sum::<f64>()
        .sqrt();

    let guess = QuietStandingModel::new(evaluator(gains().scaled_by(0.8)), platform);
    let result =
        identify_gains_shooting(&guess, &data.states, &excited_run(), &ShootingConfig::default())
            .unwrap();

    // The least-squares fit can only do better than the truth, and with 8
    // free gains against ~2000 residuals it cannot absorb much of the noise.
    assert!(result.residual_norm <= noise_norm * (1.0 + 1e-9));
    assert!(
        result.residual_norm > 0.9 * noise_norm,
        "{} vs {noise_norm}",
        result.residual_norm
    );
    assert!(result.residual_norm < 0.5 * result.initial_residual_norm);
}
