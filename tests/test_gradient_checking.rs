// Backpropagated gradients against central differences.

use chain_nn::{
    ActivationFunction, FullyConnected, GradCheckMode, LossFunction, Network, NetworkError, Sgd,
};

fn samples() -> (Vec<Vec<f64>>, Vec<usize>) {
    let inputs = vec![
        vec![0.1, -0.4, 0.7],
        vec![-0.6, 0.2, 0.3],
        vec![0.9, 0.5, -0.2],
        vec![-0.3, -0.8, 0.05],
    ];
    (inputs, vec![0, 1, 1, 0])
}

fn network(hidden: ActivationFunction, output: ActivationFunction, loss: LossFunction, seed: u64) -> Network<Sgd> {
    let mut net = Network::new("gradcheck", loss, Sgd::default());
    net.add(FullyConnected::new(4, 3, hidden)).unwrap();
    net.add(FullyConnected::new(2, 4, output)).unwrap();
    net.set_seed(seed);
    net.init_weight();
    net
}

#[test]
fn all_coordinates_pass_on_fresh_network() {
    let (inputs, labels) = samples();
    let mut net = network(ActivationFunction::Tanh, ActivationFunction::Sigmoid, LossFunction::CrossEntropy, 1);
    assert!(net.gradient_check(&inputs, &labels, 1e-2, GradCheckMode::All).unwrap());
}

#[test]
fn non_canonical_softmax_passes() {
    let (inputs, labels) = samples();
    let mut net = network(ActivationFunction::Sigmoid, ActivationFunction::Softmax, LossFunction::Mse, 2);
    assert!(net.gradient_check(&inputs, &labels, 1e-2, GradCheckMode::All).unwrap());
}

#[test]
fn random_mode_passes() {
    let (inputs, labels) = samples();
    let mut net = network(ActivationFunction::Tanh, ActivationFunction::Identity, LossFunction::Mse, 3);
    assert!(net.gradient_check(&inputs, &labels, 1e-2, GradCheckMode::Random).unwrap());
}

#[test]
fn mode_is_parsed_before_any_work() {
    let err = "everything".parse::<GradCheckMode>().unwrap_err();
    assert!(matches!(err, NetworkError::UnknownGradCheckMode(_)));
    assert!(err.to_string().contains("everything"));
}

#[test]
fn labels_are_validated() {
    let (inputs, _) = samples();
    let mut net = network(ActivationFunction::Tanh, ActivationFunction::Sigmoid, LossFunction::CrossEntropy, 4);
    let err = net.gradient_check(&inputs, &[0, 1, 2, 0], 1e-2, GradCheckMode::All).unwrap_err();
    match err {
        NetworkError::InvalidSample { index, source } => {
            assert_eq!(index, 2);
            assert!(matches!(*source, NetworkError::LabelOutOfRange { label: 2, out_dim: 2 }));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
