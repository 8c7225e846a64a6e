// src/table/sample.rs

/// One cell of a topic table before the merge is finalized.
///
/// `Unavailable` marks a value that was logged as NaN in a field where NaN
/// means "not used" (e.g. a position setpoint axis that is not controlled).
/// It is carried through resampling like a real value, so interpolation never
/// blends it with its neighbours, and is turned into a missing value only in
/// the final table. `Missing` means nothing was recorded for this row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sample {
    Present(f64),
    Unavailable,
    Missing,
}

impl Sample {
    pub fn is_missing(&self) -> bool {
        matches!(self, Sample::Missing)
    }

    /// True for `Present` and `Unavailable`: the row has a logged value.
    pub fn is_known(&self) -> bool {
        !self.is_missing()
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Sample::Present(v) => Some(*v),
            _ => None,
        }
    }
}

impl Default for Sample {
    fn default() -> Self {
        Sample::Missing
    }
}

// src/table/sample.rs
