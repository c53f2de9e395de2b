use approx::{assert_abs_diff_eq, assert_relative_eq};
use rand::{rngs::StdRng, Rng, SeedableRng};
use stage_sizing::{
    evaluate, Driver, DriverSettings, ModelVariant, MultiStart, OptimizationProblem,
    ProblemConfig, RunConfig, SizingError, StageDesign, StageParameters,
};

// Thinnest wall that satisfies the hoop constraint with default parameters.
fn hoop_limited_thickness(params: &StageParameters) -> f64 {
    params.pressure * params.radius / params.tensile_strength
}

fn problem_for(variant: ModelVariant) -> OptimizationProblem {
    OptimizationProblem::new(
        variant.build(variant.default_parameters()),
        ProblemConfig::default(),
    )
    .expect("default problem should be valid")
}

fn random_design(rng: &mut StdRng, radius: f64) -> StageDesign {
    StageDesign::new(rng.gen_range(0.0..20.0), rng.gen_range(1e-6..radius * 0.999))
}

#[test]
fn test_reference_scenario() {
    let evaluation = evaluate(&StageDesign::new(8.0, 0.01), &StageParameters::default())
        .expect("reference design is valid");

    assert!(evaluation.geometry.shell_volume > 0.0);
    assert_abs_diff_eq!(evaluation.geometry.total_volume, 6.806784082777885, epsilon = 1e-9);
    assert_abs_diff_eq!(evaluation.mass.structural, 2236.8474796775786, epsilon = 1e-6);
    assert_abs_diff_eq!(evaluation.mass.gross, 8901.955855597296, epsilon = 1e-6);
    assert_abs_diff_eq!(evaluation.objective, 8901.955855597296, epsilon = 1e-6);
    assert_abs_diff_eq!(evaluation.constraints.hoop, -497e6, epsilon = 1e-3);
    assert_abs_diff_eq!(evaluation.constraints.aspect, -15.0, epsilon = 1e-12);
}

#[test]
fn test_volume_and_mass_conservation() {
    let params = StageParameters::default();
    let mut rng = StdRng::seed_from_u64(2021);

    for _ in 0..500 {
        let design = random_design(&mut rng, params.radius);
        let evaluation = evaluate(&design, &params).expect("sampled design is valid");

        assert!(evaluation.geometry.shell_volume > 0.0);
        assert_relative_eq!(
            evaluation.geometry.shell_volume + evaluation.geometry.propellant_volume,
            evaluation.geometry.total_volume,
            max_relative = 1e-12
        );
        assert_relative_eq!(
            evaluation.propellant.fuel_volume + evaluation.propellant.oxidizer_volume,
            evaluation.geometry.propellant_volume,
            max_relative = 1e-12
        );
        assert!(evaluation.mass.gross >= params.payload_mass);
        assert!(evaluation.mass.structural >= 0.0);
    }
}

#[test]
fn test_thicker_wall_is_heavier_and_holds_less() {
    let params = StageParameters::default();
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..200 {
        let length = rng.gen_range(0.0..20.0);
        let thin = rng.gen_range(1e-5..0.2);
        let thick = thin + rng.gen_range(1e-4..0.2);

        let a = evaluate(&StageDesign::new(length, thin), &params).unwrap();
        let b = evaluate(&StageDesign::new(length, thick), &params).unwrap();

        assert!(b.mass.structural > a.mass.structural);
        assert!(b.geometry.propellant_volume < a.geometry.propellant_volume);
    }
}

#[test]
fn test_wall_thickness_limits() {
    let params = StageParameters::default();

    let near_radius = evaluate(&StageDesign::new(3.0, params.radius * (1.0 - 1e-6)), &params)
        .unwrap();
    assert!(near_radius.geometry.propellant_volume < 1e-9);

    let near_zero = evaluate(&StageDesign::new(3.0, 1e-12), &params).unwrap();
    assert!(near_zero.geometry.shell_volume < 1e-9);
    assert!(near_zero.geometry.shell_volume > 0.0);
}

#[test]
fn test_evaluation_is_repeatable() {
    let params = StageParameters::default();
    let design = StageDesign::new(4.321, 0.00789);
    let first = evaluate(&design, &params).unwrap();
    let second = evaluate(&design, &params).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.objective.to_bits(), second.objective.to_bits());
    assert_eq!(
        first.constraints.combined_stress.to_bits(),
        second.constraints.combined_stress.to_bits()
    );
}

#[test]
fn test_invalid_designs_are_rejected() {
    let params = StageParameters::default();

    for design in [
        StageDesign::new(5.0, 0.5),
        StageDesign::new(5.0, 0.75),
        StageDesign::new(5.0, 0.0),
        StageDesign::new(5.0, -0.01),
        StageDesign::new(f64::NAN, 0.01),
    ] {
        let err = evaluate(&design, &params).unwrap_err();
        assert!(
            matches!(err, SizingError::InvalidDesign(_)),
            "expected InvalidDesign for {:?}, got {:?}",
            design,
            err
        );
    }

    let negative_density = StageParameters {
        structure_density: -8000.0,
        ..params
    };
    assert!(matches!(
        evaluate(&StageDesign::new(5.0, 0.01), &negative_density),
        Err(SizingError::InvalidParameter(_))
    ));
}

#[test]
fn test_basecase_optimum_sits_on_hoop_and_aspect_limits() {
    let problem = problem_for(ModelVariant::Basecase);
    let params = problem.model.params;

    let outcome = Driver::default()
        .optimize(&problem)
        .expect("basecase should converge");

    println!(
        "L = {:.6} m, t = {:.6e} m, m01 = {:.4} kg after {} iterations",
        outcome.design.length, outcome.design.thickness, outcome.objective, outcome.iterations
    );

    assert_relative_eq!(outcome.design.length, params.radius, max_relative = 1e-2);
    assert_relative_eq!(
        outcome.design.thickness,
        hoop_limited_thickness(&params),
        max_relative = 1e-2
    );
    assert!(outcome.max_violation < DriverSettings::default().constraint_tolerance);

    let initial = problem.model.evaluate(&problem.config.initial).unwrap();
    assert!(outcome.objective < initial.objective);
    assert!(outcome.objective > params.payload_mass);
}

#[test]
fn test_structural_variant_reaches_same_design() {
    let problem = problem_for(ModelVariant::Structural);
    let params = problem.model.params;

    let outcome = Driver::default()
        .optimize(&problem)
        .expect("structural variant should converge");

    assert_relative_eq!(outcome.design.length, params.radius, max_relative = 1e-2);
    assert_relative_eq!(
        outcome.design.thickness,
        hoop_limited_thickness(&params),
        max_relative = 1e-2
    );
    assert_relative_eq!(
        outcome.objective,
        outcome.evaluation.mass.structural,
        max_relative = 1e-12
    );
}

#[test]
fn test_inverted_hoop_variant_is_infeasible() {
    // s_t/(p·R) is far above any admissible wall thickness, so no design satisfies con1.
    let problem = problem_for(ModelVariant::InvertedHoop);
    let driver = Driver::new(DriverSettings {
        max_outer_iterations: 5,
        ..Default::default()
    });

    let err = driver.optimize(&problem).unwrap_err();
    assert!(!err.is_domain_error(), "got domain error {:?}", err);
    assert!(matches!(
        err,
        SizingError::NotConverged { .. } | SizingError::SolverError(_)
    ));
}

fn assert_reaches_hoop_limited_design(variant: ModelVariant, initial: StageDesign) {
    let problem = problem_for(variant)
        .with_initial(initial)
        .expect("start on a bound is inside the box");
    let params = problem.model.params;

    let outcome = Driver::default()
        .optimize(&problem)
        .unwrap_or_else(|e| panic!("{:?} from {:?} failed: {}", variant, initial, e));

    assert_relative_eq!(outcome.design.length, params.radius, max_relative = 1e-2);
    assert_relative_eq!(
        outcome.design.thickness,
        hoop_limited_thickness(&params),
        max_relative = 1e-2
    );
}

#[test]
fn test_starts_on_bounds_reach_same_design() {
    for initial in [
        StageDesign::new(0.0, 0.01),
        StageDesign::new(5.0, 1e-6),
        StageDesign::new(20.0, 0.49),
        StageDesign::new(0.0, 1e-6),
    ] {
        assert_reaches_hoop_limited_design(ModelVariant::Basecase, initial);
    }
}

#[test]
fn test_thick_wall_start_is_not_reported_as_minimum() {
    for variant in [ModelVariant::Structural, ModelVariant::ShellVolume] {
        assert_reaches_hoop_limited_design(variant, StageDesign::new(20.0, 0.49));
    }
}

#[test]
fn test_multistart_is_no_worse_than_single_start() {
    let problem = problem_for(ModelVariant::PressureOnly);
    let driver = Driver::default();

    let single = driver.optimize(&problem).expect("single start converges");
    let best = MultiStart::new(3, 11)
        .run(&driver, &problem)
        .expect("multi-start converges");

    assert!(best.objective <= single.objective);
    assert!(problem.model.is_feasible(&best.evaluation) || best.max_violation < 1e-6);
}

#[test]
fn test_config_file_round_trip() {
    let config = RunConfig {
        variant: ModelVariant::ShellVolume,
        ..Default::default()
    };
    let json = serde_json::to_string_pretty(&config).unwrap();

    let path = std::env::temp_dir().join(format!("stage-sizer-{}.json", std::process::id()));
    std::fs::write(&path, json).unwrap();
    let loaded = RunConfig::from_json_file(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(loaded, config);
    assert_eq!(loaded.model().params.yield_strength, 200e6);
}
