use std::collections::{BTreeMap, BTreeSet};
use std::io::{self, Write};

/// Classification results: success count and a confusion matrix keyed by
/// `[predicted][actual]`. Classes appear as soon as they are observed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TestResult {
    pub num_success: usize,
    pub num_total: usize,
    pub confusion_matrix: BTreeMap<usize, BTreeMap<usize, usize>>,
}

impl TestResult {
    pub fn new() -> Self {
        TestResult::default()
    }

    pub fn record(&mut self, predicted: usize, actual: usize) {
        self.num_total += 1;
        if predicted == actual {
            self.num_success += 1;
        }
        *self
            .confusion_matrix
            .entry(predicted)
            .or_default()
            .entry(actual)
            .or_insert(0) += 1;
    }

    /// Percentage of correct predictions, 0 when nothing was recorded.
    pub fn accuracy(&self) -> f64 {
        if self.num_total == 0 {
            return 0.0;
        }
        self.num_success as f64 * 100.0 / self.num_total as f64
    }

    /// Count of samples of class `actual` predicted as `predicted`.
    pub fn count(&self, predicted: usize, actual: usize) -> usize {
        self.confusion_matrix
            .get(&predicted)
            .and_then(|row| row.get(&actual))
            .copied()
            .unwrap_or(0)
    }

    /// Every class seen as a prediction or as an actual label, ascending.
    pub fn labels(&self) -> Vec<usize> {
        let mut all = BTreeSet::new();
        for (predicted, row) in &self.confusion_matrix {
            all.insert(*predicted);
            all.extend(row.keys().copied());
        }
        all.into_iter().collect()
    }

    /// `accuracy:75% (3/4)`
    pub fn print_summary<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "accuracy:{}% ({}/{})", self.accuracy(), self.num_success, self.num_total)
    }

    /// Summary followed by the confusion matrix: one row per predicted
    /// class, one column per actual class.
    pub fn print_detail<W: Write>(&self, out: &mut W) -> io::Result<()> {
        self.print_summary(out)?;
        let labels = self.labels();

        write!(out, "{:>5}", "*")?;
        for actual in &labels {
            write!(out, "{:>5}", actual)?;
        }
        writeln!(out)?;

        for predicted in &labels {
            write!(out, "{:>5}", predicted)?;
            for actual in &labels {
                write!(out, "{:>5}", self.count(*predicted, *actual))?;
            }
            writeln!(out)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TestResult {
        let mut r = TestResult::new();
        for (p, a) in [(0, 0), (1, 1), (1, 0), (0, 0)] {
            r.record(p, a);
        }
        r
    }

    #[test]
    fn counts_and_accuracy() {
        let r = sample();
        assert_eq!((r.num_success, r.num_total), (3, 4));
        assert_eq!(r.accuracy(), 75.0);
        assert_eq!(r.count(1, 0), 1);
        assert_eq!(r.count(0, 1), 0);
        assert_eq!(r.labels(), vec![0, 1]);
    }

    #[test]
    fn renders_summary_and_matrix() {
        let mut buf = Vec::new();
        sample().print_detail(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "accuracy:75% (3/4)");
        assert_eq!(lines[1], "    *    0    1");
        assert_eq!(lines[2], "    0    2    0");
        assert_eq!(lines[3], "    1    1    1");
    }
}
