pub mod init;
pub mod vector;

pub use init::WeightInit;
