use crate::occupations::merge::MergedOccupationRecord;
use std::fmt;

/// A value that would be wrong downstream. Reported, never fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataQualityIssue {
    ZeroMedianPay,
    ZeroProgressionPay { step: String },
}

impl fmt::Display for DataQualityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataQualityIssue::ZeroMedianPay => write!(f, "median pay is zero"),
            DataQualityIssue::ZeroProgressionPay { step } => {
                write!(f, "progression step '{}' has zero pay", step)
            }
        }
    }
}

pub fn issues(record: &MergedOccupationRecord) -> Vec<DataQualityIssue> {
    let median = (record.median_pay == Some(0)).then_some(DataQualityIssue::ZeroMedianPay);
    let progression = record
        .progression
        .iter()
        .filter(|step| step.median_pay == 0)
        .map(|step| DataQualityIssue::ZeroProgressionPay {
            step: step.title.clone(),
        });

    median.into_iter().chain(progression).collect()
}
