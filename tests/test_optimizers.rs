// Update rules on the quadratic ½·|w|², whose gradient is w itself.

use approx::assert_relative_eq;

use chain_nn::{Adagrad, Adam, LevenbergMarquardt, Momentum, Optimizer, ParamId, RmsProp, Sgd};

fn descend<O: Optimizer>(optimizer: &mut O, steps: usize) -> Vec<f64> {
    let mut w = vec![1.0, -2.0, 0.5];
    let hessian = vec![1.0; w.len()];
    optimizer.reset();
    for _ in 0..steps {
        let grad = w.clone();
        optimizer.update(ParamId::weight(1), &grad, &hessian, &mut w);
    }
    w
}

fn norm(w: &[f64]) -> f64 {
    w.iter().map(|x| x * x).sum::<f64>().sqrt()
}

#[test]
fn every_rule_shrinks_the_quadratic() {
    let start = norm(&[1.0, -2.0, 0.5]);
    assert!(norm(&descend(&mut Sgd::new(0.1), 50)) < start * 0.1);
    assert!(norm(&descend(&mut Momentum::default(), 500)) < start * 0.5);
    assert!(norm(&descend(&mut Adagrad::default(), 500)) < start);
    assert!(norm(&descend(&mut RmsProp::default(), 500)) < start);
    assert!(norm(&descend(&mut Adam::default(), 500)) < start);
    assert!(norm(&descend(&mut LevenbergMarquardt::new(0.5, 0.02), 20)) < start * 1e-3);
}

#[test]
fn sgd_step_is_exact() {
    let mut sgd = Sgd::with_weight_decay(0.5, 0.1);
    let mut w = vec![2.0];
    sgd.update(ParamId::bias(1), &[1.0], &[0.0], &mut w);
    // 2 - 0.5·(1 + 0.1·2)
    assert_relative_eq!(w[0], 1.4, epsilon = 1e-12);
}

#[test]
fn adam_first_step_is_learning_rate_sized() {
    let mut adam = Adam::default();
    let mut w = vec![1.0, -1.0];
    adam.update(ParamId::weight(1), &[0.3, -20.0], &[0.0, 0.0], &mut w);
    assert_relative_eq!(w[0], 1.0 - 0.001, epsilon = 1e-6);
    assert_relative_eq!(w[1], -1.0 + 0.001, epsilon = 1e-6);
}

#[test]
fn state_is_kept_per_parameter_vector() {
    let mut momentum = Momentum::new(0.1, 0.9);
    let mut a = vec![1.0];
    let mut b = vec![1.0];
    momentum.update(ParamId::weight(1), &[1.0], &[0.0], &mut a);
    momentum.update(ParamId::weight(1), &[1.0], &[0.0], &mut a);
    momentum.update(ParamId::bias(1), &[1.0], &[0.0], &mut b);
    // second step on `a` carries velocity, the first step on `b` does not
    assert!(1.0 - a[0] > 2.0 * (1.0 - b[0]));
    assert_relative_eq!(1.0 - b[0], 0.1, epsilon = 1e-12);

    momentum.reset();
    let mut c = vec![1.0];
    momentum.update(ParamId::weight(1), &[1.0], &[0.0], &mut c);
    assert_relative_eq!(1.0 - c[0], 0.1, epsilon = 1e-12);
}
