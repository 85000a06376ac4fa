use std::fmt;
use strum::{AsRefStr, EnumString};

/// Summary attribute of a statpoint.
#[derive(AsRefStr, EnumString, Debug, PartialEq, Eq, Hash, Clone, Copy)]
#[strum(serialize_all = "snake_case")]
pub enum Aggregate {
    Min,
    Mean,
    Max,
    Count,
    Stddev,
}

impl Aggregate {
    pub const ALL: [Aggregate; 5] = [
        Aggregate::Min,
        Aggregate::Mean,
        Aggregate::Max,
        Aggregate::Count,
        Aggregate::Stddev,
    ];
}

impl fmt::Display for Aggregate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_ref())
    }
}

/// Which statpoint attributes end up as columns.
#[derive(Debug, PartialEq, Clone)]
pub enum AggregateSelection {
    All,
    Only(Vec<Aggregate>),
}

impl AggregateSelection {
    /// selected aggregates, first appearance wins on duplicates
    pub fn aggregates(&self) -> Vec<Aggregate> {
        match self {
            Self::All => Aggregate::ALL.to_vec(),
            Self::Only(aggregates) => {
                let mut deduped = Vec::<Aggregate>::with_capacity(aggregates.len());
                for each in aggregates {
                    if !deduped.contains(each) {
                        deduped.push(*each);
                    }
                }
                deduped
            }
        }
    }

    /// "all" or a comma separated list such as "mean,max"
    pub fn parse(s: &str) -> Result<Self, strum::ParseError> {
        if s.trim() == "all" {
            return Ok(Self::All);
        }
        let aggregates = s
            .split(',')
            .map(|each| each.trim().parse::<Aggregate>())
            .collect::<Result<Vec<Aggregate>, strum::ParseError>>()?;
        Ok(Self::Only(aggregates))
    }
}

impl Default for AggregateSelection {
    fn default() -> Self {
        Self::All
    }
}
