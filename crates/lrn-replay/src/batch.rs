use super::*;
use lrn_core::*;

/// The decoded samples of one unit, in table order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Batch(Vec<Sample>);

impl Batch {
    /// Decodes a sample table: one sample per line, [`SAMPLE_WIDTH`]
    /// whitespace-separated `f32` columns. Blank lines are skipped.
    pub fn parse(bytes: &[u8]) -> Result<Self, ParseError> {
        let text = std::str::from_utf8(bytes)?;
        let mut samples = Vec::new();
        let mut row = Vec::with_capacity(SAMPLE_WIDTH);
        for (i, line) in text.lines().enumerate() {
            row.clear();
            for (j, token) in line.split_whitespace().enumerate() {
                let x = token.parse::<Scalar>().map_err(|_| ParseError::Token {
                    row: i + 1,
                    column: j + 1,
                    token: token.to_string(),
                })?;
                row.push(x);
            }
            if row.is_empty() {
                continue;
            }
            let sample = Sample::try_from(row.as_slice()).map_err(|found| ParseError::Width {
                row: i + 1,
                expected: SAMPLE_WIDTH,
                found,
            })?;
            samples.push(sample);
        }
        Ok(Self(samples))
    }

    /// Encodes back into the table format producers upload.
    pub fn table(&self) -> String {
        self.0
            .iter()
            .map(|s| s.row().map(|x| x.to_string()).collect::<Vec<_>>().join("\t"))
            .map(|line| line + "\n")
            .collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    pub fn samples(&self) -> &[Sample] {
        &self.0
    }
}

impl From<Vec<Sample>> for Batch {
    fn from(samples: Vec<Sample>) -> Self {
        Self(samples)
    }
}

impl IntoIterator for Batch {
    type Item = Sample;
    type IntoIter = std::vec::IntoIter<Sample>;
    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
