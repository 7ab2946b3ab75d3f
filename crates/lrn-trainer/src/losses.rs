use lrn_core::Loss;

/// Mean losses over a set of samples.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Losses {
    pub policy: Loss,
    pub value: Loss,
}

impl Losses {
    pub fn total(&self) -> Loss {
        self.policy + self.value
    }
}

impl std::ops::Add for Losses {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self {
            policy: self.policy + other.policy,
            value: self.value + other.value,
        }
    }
}

impl std::ops::Div<usize> for Losses {
    type Output = Self;
    fn div(self, n: usize) -> Self {
        match n {
            0 => self,
            n => Self {
                policy: self.policy / n as Loss,
                value: self.value / n as Loss,
            },
        }
    }
}

impl std::fmt::Display for Losses {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "loss {:8.5}  policy {:8.5}  value {:8.5}",
            self.total(),
            self.policy,
            self.value
        )
    }
}
