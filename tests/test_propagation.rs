// Forward/backward propagation through the public network API.

use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use chain_nn::network::{canonical_delta, chain_rule_delta, is_canonical_link};
use chain_nn::{ActivationFunction, FullyConnected, LossFunction, Network, NetworkError, Sgd, Workspace};

fn random_output(rng: &mut StdRng, n: usize, activation: ActivationFunction) -> Vec<f64> {
    let mut v: Vec<f64> = (0..n).map(|_| rng.gen_range(-2.0..2.0)).collect();
    activation.apply(&mut v);
    v
}

fn one_hot(n: usize, k: usize, lo: f64, hi: f64) -> Vec<f64> {
    let mut t = vec![lo; n];
    t[k] = hi;
    t
}

#[test]
fn canonical_shortcut_matches_chain_rule() {
    let mut rng = StdRng::seed_from_u64(11);
    let pairs = [
        (ActivationFunction::Sigmoid, LossFunction::CrossEntropy, 0.1, 0.9),
        (ActivationFunction::Identity, LossFunction::Mse, -0.3, 1.7),
        (ActivationFunction::Softmax, LossFunction::CrossEntropyMulticlass, 0.0, 1.0),
    ];

    for (activation, loss, lo, hi) in pairs {
        assert!(is_canonical_link(activation, loss));
        for trial in 0..20 {
            let y = random_output(&mut rng, 5, activation);
            let t = one_hot(5, trial % 5, lo, hi);
            let shortcut = canonical_delta(&y, &t);
            let general = chain_rule_delta(loss, activation, &y, &t);
            for (a, b) in shortcut.iter().zip(general.iter()) {
                assert_relative_eq!(*a, *b, epsilon = 1e-9);
            }
        }
    }
}

#[test]
fn label2vector_reads_back_declared_range() {
    for activation in [
        ActivationFunction::Sigmoid,
        ActivationFunction::Tanh,
        ActivationFunction::Softmax,
        ActivationFunction::Identity,
    ] {
        let mut net = Network::new("labels", LossFunction::Mse, Sgd::default());
        net.add(FullyConnected::new(4, 3, activation)).unwrap();
        let (lo, hi) = activation.scale();
        for label in 0..4 {
            let v = net.label2vector(label).unwrap();
            assert_eq!(v.len(), 4);
            for (i, x) in v.iter().enumerate() {
                assert_eq!(*x, if i == label { hi } else { lo });
            }
        }
    }
}

#[test]
fn wrong_input_length_fails_without_mutation() {
    let mut net = Network::new("dims", LossFunction::Mse, Sgd::default());
    net.add(FullyConnected::new(3, 4, ActivationFunction::Tanh)).unwrap();
    net.add(FullyConnected::new(2, 3, ActivationFunction::Identity)).unwrap();
    net.set_seed(2);
    net.init_weight();
    let before: Vec<Vec<f64>> = (0..net.depth()).map(|i| net.layer(i).unwrap().weight().to_vec()).collect();

    match net.predict(&[1.0, 2.0]) {
        Err(NetworkError::InputDimensionMismatch { expected, actual, .. }) => {
            assert_eq!((expected, actual), (4, 2));
        }
        other => panic!("expected dimension mismatch, got {other:?}"),
    }

    let after: Vec<Vec<f64>> = (0..net.depth()).map(|i| net.layer(i).unwrap().weight().to_vec()).collect();
    assert_eq!(before, after);
}

#[test]
fn derived_queries_agree_with_predict() {
    let mut net = Network::new("queries", LossFunction::CrossEntropyMulticlass, Sgd::default());
    net.add(FullyConnected::new(5, 3, ActivationFunction::Softmax)).unwrap();
    net.set_seed(4);
    net.init_weight();

    let input = [0.2, -0.7, 1.1];
    let out = net.predict(&input).unwrap();
    assert_relative_eq!(out.iter().sum::<f64>(), 1.0, epsilon = 1e-12);

    let label = net.predict_label(&input).unwrap();
    assert_eq!(out[label], net.predict_max_value(&input).unwrap());

    let mut ws = Workspace::forward_only(net.layers());
    assert_eq!(net.fprop_max_index(&input, &mut ws).unwrap(), label);
    assert_eq!(net.fprop_max(&input, &mut ws).unwrap(), out[label]);
    assert_eq!(net.predict(&input).unwrap(), out);
}

#[test]
fn bprop_accumulates_across_samples() {
    let mut net = Network::new("accumulate", LossFunction::Mse, Sgd::default());
    net.add(FullyConnected::new(1, 2, ActivationFunction::Identity)).unwrap();
    net.layer_mut(0).unwrap().weight_mut().copy_from_slice(&[0.5, -0.5]);

    let mut ws = Workspace::for_chain(net.layers());
    for (x, t) in [([1.0, 0.0], 1.0), ([0.0, 1.0], 0.0)] {
        let out = net.fprop(&x, &mut ws).unwrap().to_vec();
        net.bprop(&out, chain_nn::Target::Vector(&[t]), &mut ws).unwrap();
    }

    // deltas are 0.5 - 1 and -0.5 - 0
    let grads = ws.grads(1);
    assert_eq!(grads.dw, vec![-0.5, -0.5]);
    assert_eq!(grads.db, vec![-1.0]);
}
