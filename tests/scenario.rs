use std::io::Write;

use u_spc::bootstrap::{BootstrapConfig, Granularity};
use u_spc::capability::{IndexKind, SpecificationLimits};
use u_spc::constants::EstimatorConfig;
use u_spc::dataset::{ColumnSelection, Dataset};
use u_spc::session::Analysis;
use u_spc::spc::ChartKind;
use u_spc::SpcError;

fn scenario() -> Analysis {
    let data = Dataset::from_subgroups(&[
        &[10.0, 11.0, 9.0, 10.0],
        &[12.0, 13.0, 11.0, 12.0],
        &[9.0, 10.0, 8.0, 9.0],
    ])
    .unwrap();
    Analysis::new(data)
        .unwrap()
        .with_estimator(EstimatorConfig::default().with_trials(20_000).with_seed(99))
        .with_bootstrap(BootstrapConfig::default().with_reps(2_000).with_seed(99))
}

#[test]
fn end_to_end_scenario() {
    let a = scenario();
    let pooled = a.pooled();
    assert!((pooled.grand_mean - 10.333).abs() < 1e-3);
    assert!((pooled.sigma_short.unwrap() - 0.8165).abs() < 1e-4);
    assert!((pooled.sigma_total.unwrap() - 1.497).abs() < 1e-3);

    let limits = SpecificationLimits::two_sided(5.0, 15.0).unwrap();
    let table = a.capability(&limits);
    assert!((table.cp.unwrap() - 2.041).abs() < 1e-3);
    assert!((table.pp.unwrap() - 1.113).abs() < 1e-3);
    assert!((table.cpk.unwrap() - 1.905).abs() < 1e-3);
    assert!((table.ppk.unwrap() - 1.039).abs() < 1e-3);

    let lhs = table.pp.unwrap() * table.cpk.unwrap();
    let rhs = table.ppk.unwrap() * table.cp.unwrap();
    assert!((lhs - rhs).abs() <= 1e-9 * lhs);

    let boot = a.bootstrap(IndexKind::Cp, &limits).unwrap();
    assert!(boot.lower - 1e-9 <= boot.estimate && boot.estimate <= boot.upper + 1e-9);
}

#[test]
fn scenario_charts() {
    let a = scenario();
    let xbar = a.average_chart().unwrap();
    // 3 σ_short / √4 = 1.5 √(2/3)
    let half = 1.5 * (2.0_f64 / 3.0).sqrt();
    assert!((xbar.rows[0].limits.ucl - (31.0 / 3.0 + half)).abs() < 1e-12);
    // Subgroup means 12 and 9 fall outside 10.333 ± 1.225.
    let flagged: Vec<_> = xbar.out_of_control().map(|r| r.label.as_str()).collect();
    assert_eq!(flagged, vec!["2", "3"]);

    let r = a.range_chart().unwrap();
    assert!((r.center - 2.0).abs() < 1e-12);
    assert_eq!(r.rows[0].limits.lcl, 0.0);
    assert!(r.is_in_control());

    let s = a.stddev_chart().unwrap();
    assert_eq!(s.kind, ChartKind::StdDev);
    assert!(s.rows.iter().all(|row| row.limits.lcl <= row.limits.ucl));
}

#[test]
fn single_observation_routes_to_moving_range() {
    let data = Dataset::from_pairs([("1", 42.0)]).unwrap();
    let a = Analysis::new(data)
        .unwrap()
        .with_estimator(EstimatorConfig::default().with_trials(2_000).with_seed(1));
    assert_eq!(a.recommended_chart(), ChartKind::MovingRange);
    assert!(matches!(
        a.stddev_chart(),
        Err(SpcError::InsufficientData { .. })
    ));
}

const ONSEN: &str = "\
id,time,temp,ph,sulfur
1,1,43.2,5.1,0.0
2,1,45.3,4.8,0.4
3,1,44.1,5.0,0.2
4,3,45.5,5.3,0.1
5,3,43.9,5.0,0.3
6,3,44.8,5.2,0.0
7,5,45.1,5.2,0.0
8,5,46.0,4.9,0.2
9,5,44.4,5.1,0.1
";

#[test]
fn csv_file_analysis() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(ONSEN.as_bytes()).unwrap();

    let columns = ColumnSelection::new("time", "temp");
    let a = Analysis::from_csv_path(file.path(), &columns)
        .unwrap()
        .with_bootstrap(
            BootstrapConfig::default()
                .with_reps(1_000)
                .with_granularity(Granularity::Observation)
                .with_seed(7),
        );
    let labels: Vec<_> = a.summaries().iter().map(|s| s.label.as_str()).collect();
    assert_eq!(labels, vec!["1", "3", "5"]);
    assert_eq!(a.dataset().len(), 9);

    let limits = SpecificationLimits::lower_only(42.0).unwrap();
    let table = a.capability(&limits);
    assert!(table.cp.is_none());
    assert!(table.cpk.unwrap() > 0.0);

    let boot = a.bootstrap(IndexKind::Ppk, &limits).unwrap();
    assert!(boot.contains(boot.estimate));

    let caption = a.describe().unwrap().caption();
    assert!(caption.starts_with("Process Mean: 44.7"));
}

#[test]
fn csv_missing_column_named() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(ONSEN.as_bytes()).unwrap();
    let err = Analysis::from_csv_path(file.path(), &ColumnSelection::new("month", "temp")).unwrap_err();
    assert!(matches!(err, SpcError::MissingColumn { ref column } if column == "month"));
}

#[test]
fn observation_bootstrap_estimate_matches_capability_table() {
    let data = Dataset::from_subgroups(&[&[10.0, 11.0, 9.0, 10.0, 12.0, 11.0], &[14.0, 15.0]])
        .unwrap();
    let a = Analysis::new(data).unwrap().with_bootstrap(
        BootstrapConfig::default()
            .with_reps(800)
            .with_granularity(Granularity::Observation)
            .with_seed(5),
    );
    let limits = SpecificationLimits::two_sided(5.0, 15.0).unwrap();
    let table = a.capability(&limits);
    let boot = a.bootstrap(IndexKind::Ppk, &limits).unwrap();
    assert_eq!(table.ppk, Some(boot.estimate));
}
