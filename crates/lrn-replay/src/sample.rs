use lrn_core::*;

/// One training triple. Anonymous and fungible; only its position in the
/// buffer distinguishes it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub state: [Scalar; STATE_NUM],
    pub policy: [Scalar; ACTION_NUM],
    pub value: Scalar,
}

impl Default for Sample {
    fn default() -> Self {
        Self {
            state: [0.; STATE_NUM],
            policy: [0.; ACTION_NUM],
            value: 0.,
        }
    }
}

/// Splits one table row: state columns, then policy columns, then the value.
impl TryFrom<&[Scalar]> for Sample {
    type Error = usize;
    fn try_from(row: &[Scalar]) -> Result<Self, Self::Error> {
        if row.len() != SAMPLE_WIDTH {
            return Err(row.len());
        }
        let mut sample = Self::default();
        sample.state.copy_from_slice(&row[..STATE_NUM]);
        sample.policy.copy_from_slice(&row[STATE_NUM..STATE_NUM + ACTION_NUM]);
        sample.value = row[SAMPLE_WIDTH - 1];
        Ok(sample)
    }
}

impl Sample {
    /// Columns in table order.
    pub fn row(&self) -> impl Iterator<Item = Scalar> + '_ {
        self.state
            .iter()
            .chain(self.policy.iter())
            .chain(std::iter::once(&self.value))
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_splits_into_columns() {
        let row = (0..SAMPLE_WIDTH).map(|i| i as Scalar).collect::<Vec<_>>();
        let sample = Sample::try_from(row.as_slice()).unwrap();
        assert_eq!(sample.state[0], 0.);
        assert_eq!(sample.state[STATE_NUM - 1], (STATE_NUM - 1) as Scalar);
        assert_eq!(sample.policy[0], STATE_NUM as Scalar);
        assert_eq!(sample.value, (SAMPLE_WIDTH - 1) as Scalar);
        assert_eq!(sample.row().collect::<Vec<_>>(), row);
    }

    #[test]
    fn short_row_reports_its_width() {
        assert_eq!(Sample::try_from(&[1., 2., 3.][..]), Err(3));
    }
}
