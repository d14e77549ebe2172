//! Plain-text weight stream.
//!
//! For every layer in chain order the stream holds its weights, then its
//! biases, as whitespace-separated decimal values. Values are written with
//! the shortest representation that parses back to the same `f64`, so a
//! save/load round trip is bit-exact. The stream carries no shape
//! information; loading into a chain of a different structure fills it
//! positionally.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::error::{NetworkError, Result};
use crate::network::network::Network;
use crate::optim::Optimizer;

impl<O: Optimizer> Network<O> {
    pub fn save<W: Write>(&self, writer: &mut W) -> Result<()> {
        for layer in self.layers.nodes() {
            for w in layer.weight().iter().chain(layer.bias()) {
                write!(writer, "{} ", w)?;
            }
            if !layer.weight().is_empty() || !layer.bias().is_empty() {
                writeln!(writer)?;
            }
        }
        writer.flush()?;
        Ok(())
    }

    /// Overwrites every weight and bias from a stream written by `save`.
    /// Trailing values past the last layer are ignored.
    ///
    /// The whole stream is parsed and counted first; on error the network
    /// is left untouched.
    pub fn load<R: Read>(&mut self, reader: &mut R) -> Result<()> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        let values = text.split_whitespace().map(parse_value).collect::<Result<Vec<f64>>>()?;

        let mut needed = 0;
        for (index, layer) in self.layers.nodes().enumerate() {
            needed += layer.weight().len() + layer.bias().len();
            if values.len() < needed {
                return Err(NetworkError::WeightStreamTruncated { layer: index });
            }
        }

        let mut values = values.into_iter();
        for index in 0..self.layers.len() {
            let Some(layer) = self.layers.node_mut(index) else {
                continue;
            };
            for (slot, v) in layer.weight_mut().iter_mut().zip(values.by_ref()) {
                *slot = v;
            }
            for (slot, v) in layer.bias_mut().iter_mut().zip(values.by_ref()) {
                *slot = v;
            }
        }
        self.workspaces.clear();
        Ok(())
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.save(&mut writer)
    }

    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let mut reader = BufReader::new(File::open(path)?);
        self.load(&mut reader)
    }
}

fn parse_value(token: &str) -> Result<f64> {
    token
        .parse::<f64>()
        .map_err(|e| NetworkError::ParseWeight(format!("{token:?}: {e}")))
}
