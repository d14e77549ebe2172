// The library holds all network logic; this binary trains XOR as a smoke
// demo. Set RUST_LOG=debug to see per-epoch progress.
use chain_nn::{ActivationFunction, FullyConnected, LossFunction, Network, Sgd, TrainConfig};

fn main() -> chain_nn::Result<()> {
    env_logger::init();

    let mut net = Network::new("xor", LossFunction::CrossEntropy, Sgd::new(0.5));
    net.add(FullyConnected::new(4, 2, ActivationFunction::Tanh))?;
    net.add(FullyConnected::new(1, 4, ActivationFunction::Sigmoid))?;
    net.set_seed(1);

    let inputs = vec![
        vec![1.0, 0.0],
        vec![1.0, 1.0],
        vec![0.0, 1.0],
        vec![0.0, 0.0],
    ];
    let targets = vec![vec![1.0], vec![0.0], vec![1.0], vec![0.0]];

    let config = TrainConfig { epochs: 2000, ..TrainConfig::default() };
    if !net.fit(&inputs, &targets, &config, &mut ())? {
        eprintln!("training diverged");
        return Ok(());
    }

    println!("loss = {:.6}", net.get_loss(&inputs, &targets)?);
    for input in &inputs {
        println!("Input: {:?} -> Output: {:.4}", input, net.predict(input)?[0]);
    }
    Ok(())
}
