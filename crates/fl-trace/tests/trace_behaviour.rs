//! End-to-end tracing behaviour on small analytic fields.

use std::collections::BTreeMap;

use fl_field::{ComponentConvention, Grid, VectorField};
use fl_trace::{FieldLine, NoopObserver, TraceError, TraceOptions, Termination};
use ndarray::{ArrayD, IxDyn};

fn linspace(a: f64, b: f64, n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| a + (b - a) * i as f64 / (n - 1) as f64)
        .collect()
}

/// 2D field built from a closure evaluated on every node.
fn field_2d(axes: Vec<Vec<f64>>, names: [&str; 2], f: impl Fn(f64, f64) -> (f64, f64)) -> VectorField {
    let grid = Grid::new(axes).unwrap();
    let shape = grid.shape();
    let mut a = ArrayD::zeros(IxDyn(&shape));
    let mut b = ArrayD::zeros(IxDyn(&shape));
    for (i, &x) in grid.axis(0).iter().enumerate() {
        for (j, &y) in grid.axis(1).iter().enumerate() {
            let (u, v) = f(x, y);
            a[[i, j].as_slice()] = u;
            b[[i, j].as_slice()] = v;
        }
    }
    let mut named = BTreeMap::new();
    named.insert(names[0].to_string(), a);
    named.insert(names[1].to_string(), b);
    VectorField::from_named(grid, named).unwrap()
}

fn field_3d(f: impl Fn(f64, f64, f64) -> [f64; 3]) -> VectorField {
    let axis = linspace(-1.0, 1.0, 5);
    let grid = Grid::new(vec![axis.clone(), axis.clone(), axis]).unwrap();
    let shape = grid.shape();
    let mut comps = vec![ArrayD::zeros(IxDyn(&shape)); 3];
    for (i, &x) in grid.axis(0).iter().enumerate() {
        for (j, &y) in grid.axis(1).iter().enumerate() {
            for (k, &z) in grid.axis(2).iter().enumerate() {
                let v = f(x, y, z);
                for c in 0..3 {
                    comps[c][[i, j, k].as_slice()] = v[c];
                }
            }
        }
    }
    VectorField::new(grid, ComponentConvention::Cartesian3D, comps).unwrap()
}

#[test]
fn every_step_has_step_length() {
    // rotational field: lines are circles around the origin
    let axis = linspace(-2.0, 2.0, 41);
    let field = field_2d(vec![axis.clone(), axis], ["Ex", "Ey"], |x, y| (-y, x));
    let mut line = FieldLine::new(&field, None).unwrap();
    line.set_initial_point(&[1.0, 0.0]).unwrap();

    let opts = TraceOptions::new(0.05).with_max_steps(200);
    let traj = line.trajectory_with(&opts, &mut NoopObserver).unwrap();

    assert_eq!(traj.termination, Termination::StepLimit);
    for w in traj.points.windows(2) {
        let d = (&w[1] - &w[0]).norm();
        assert!((d - 0.05).abs() < 1e-12, "step length {d}");
    }
}

#[test]
fn stagnation_at_seed_returns_only_seed() {
    let axis = linspace(0.0, 1.0, 3);
    let field = field_2d(vec![axis.clone(), axis], ["Ex", "Ey"], |x, y| {
        (x - 0.5, y - 0.5)
    });
    let mut line = FieldLine::new(&field, None).unwrap();
    line.set_initial_point(&[0.5, 0.5]).unwrap();

    let traj = line.trajectory(0.01, false).unwrap();
    assert_eq!(traj.termination, Termination::Stagnation);
    assert_eq!(traj.len(), 1);
    assert_eq!(traj.points[0].as_slice(), &[0.5, 0.5]);
}

#[test]
fn boundary_exit_keeps_last_inside_point() {
    let axis = linspace(-1.0, 1.0, 5);
    let field = field_2d(vec![axis.clone(), axis], ["Ex", "Ey"], |_, _| (2.0, 0.0));
    let edges = [-1.0, 0.15, -1.0, 1.0];
    let mut line = FieldLine::new(&field, Some(&edges)).unwrap();
    line.set_initial_point(&[0.0, 0.0]).unwrap();

    let traj = line.trajectory(0.1, false).unwrap();
    assert_eq!(traj.termination, Termination::BoundaryExit);
    assert_eq!(traj.len(), 2);
    let last = traj.last().unwrap();
    assert!((last[0] - 0.1).abs() < 1e-12);
    assert!(line.contains(last.as_slice()));
    assert!(last[0] < 0.15);
}

#[test]
fn seed_outside_box_is_domain_error() {
    let axis = linspace(-1.0, 1.0, 5);
    let field = field_2d(vec![axis.clone(), axis], ["Ex", "Ey"], |_, _| (1.0, 0.0));
    let mut line = FieldLine::new(&field, Some(&[-0.5, 0.5, -0.5, 0.5])).unwrap();
    line.set_initial_point(&[0.75, 0.0]).unwrap();

    let err = line.trajectory(0.1, false).unwrap_err();
    assert!(matches!(err, TraceError::OutOfDomain { .. }));
    assert!(!err.is_configuration());
}

#[test]
fn dimension_mismatch_at_seed_time() {
    let field = field_3d(|_, _, _| [0.0, 0.0, 1.0]);
    let mut line = FieldLine::new(&field, None).unwrap();
    let err = line.set_initial_point(&[0.0, 0.0]).unwrap_err();
    assert_eq!(
        err,
        TraceError::DimensionMismatch {
            expected: 3,
            got: 2
        }
    );
    assert!(err.is_configuration());
    assert!(line.seed().is_none());
}

#[test]
fn edge_one_step_away_is_reached_then_exited() {
    let axis = linspace(-1.0, 1.0, 5);
    let field = field_2d(vec![axis.clone(), axis], ["Ex", "Ey"], |_, _| (2.0, 0.0));
    let edges = [-1.0, 0.25, -1.0, 1.0];
    let mut line = FieldLine::new(&field, Some(&edges)).unwrap();
    line.set_initial_point(&[0.0, 0.0]).unwrap();

    let traj = line.trajectory(0.25, false).unwrap();
    assert_eq!(traj.termination, Termination::BoundaryExit);
    assert_eq!(traj.len(), 2);
    assert_eq!(traj.last().unwrap().as_slice(), &[0.25, 0.0]);
}

#[test]
fn trace_in_three_dimensions() {
    let field = field_3d(|_, _, _| [0.0, 0.0, 1.0]);
    let mut line = FieldLine::new(&field, None).unwrap();
    line.set_initial_point(&[0.1, -0.2, -1.0]).unwrap();

    let traj = line.trajectory(0.25, false).unwrap();
    assert_eq!(traj.termination, Termination::BoundaryExit);
    // z: -1.0, -0.75, ..., 1.0
    assert_eq!(traj.len(), 9);
    let last = traj.last().unwrap();
    assert!((last[2] - 1.0).abs() < 1e-12);
    assert!((last[0] - 0.1).abs() < 1e-12);
}

#[test]
fn cylindrical_field_traces_along_z() {
    let r = linspace(0.0, 1.0, 3);
    let z = linspace(0.0, 2.0, 5);
    let field = field_2d(vec![r, z], ["Er", "Ez"], |_, _| (0.0, 5.0));
    assert_eq!(field.convention(), ComponentConvention::Cylindrical2D);

    let mut line = FieldLine::new(&field, None).unwrap();
    line.set_initial_point(&[0.5, 0.0]).unwrap();
    let traj = line.trajectory(0.5, false).unwrap();
    assert_eq!(traj.len(), 5);
}

#[test]
fn non_finite_field_stops_trace() {
    let axis = linspace(0.0, 1.0, 3);
    let field = field_2d(vec![axis.clone(), axis], ["Ex", "Ey"], |x, _| {
        if x > 0.75 { (f64::NAN, f64::NAN) } else { (1.0, 0.0) }
    });
    let mut line = FieldLine::new(&field, None).unwrap();
    line.set_initial_point(&[0.0, 0.0]).unwrap();

    let traj = line.trajectory(0.1, false).unwrap();
    assert_eq!(traj.termination, Termination::NonFiniteField);
    assert!(traj.len() > 1);
}

#[test]
fn lines_share_one_field() {
    let axis = linspace(-1.0, 1.0, 9);
    let field = field_2d(vec![axis.clone(), axis], ["Ex", "Ey"], |_, _| (0.0, -1.0));

    let seeds = [[-0.5, 0.9], [0.0, 0.9], [0.5, 0.9]];
    let results: Vec<usize> = std::thread::scope(|s| {
        let handles: Vec<_> = seeds
            .iter()
            .map(|seed| {
                let field = &field;
                s.spawn(move || {
                    let mut line = FieldLine::new(field, None).unwrap();
                    line.set_initial_point(seed).unwrap();
                    line.trajectory(0.1, false).unwrap().len()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert!(results.iter().all(|&n| n == results[0]));
}
