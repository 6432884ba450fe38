//! Canonical record model produced by normalization.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::EngineError;
use crate::period::Period;

/// One normalized input row: a store's monthly figures for one grouping.
///
/// `margin` is always recomputed as `sales - cost` during normalization and
/// never trusted from the input sheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub grouping: String,
    pub store: String,
    /// Canonical division label ("GRC+FRS" or "BZR").
    pub division: String,
    pub period: Period,
    pub sales: f64,
    pub cost: f64,
    pub margin: f64,
    pub stock_value: f64,
}

/// The measures carried by every record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Sales,
    Cost,
    Margin,
    StockValue,
}

impl Metric {
    pub fn value(&self, record: &Record) -> f64 {
        match self {
            Metric::Sales => record.sales,
            Metric::Cost => record.cost,
            Metric::Margin => record.margin,
            Metric::StockValue => record.stock_value,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Metric::Sales => "Sales",
            Metric::Cost => "Cost",
            Metric::Margin => "Gross Margin",
            Metric::StockValue => "Stock",
        }
    }
}

/// Grouping axis for pivots and the cross-metric comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Division,
    Store,
    Grouping,
}

impl Dimension {
    /// The record field this dimension selects.
    pub fn key<'a>(&self, record: &'a Record) -> &'a str {
        match self {
            Dimension::Division => &record.division,
            Dimension::Store => &record.store,
            Dimension::Grouping => &record.grouping,
        }
    }

    /// Column header used when the dimension appears in an exported table.
    pub fn column_label(&self) -> &'static str {
        match self {
            Dimension::Division => "Group",
            Dimension::Store => "Store Name",
            Dimension::Grouping => "Grouping",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Dimension::Division => "Division",
            Dimension::Store => "Store",
            Dimension::Grouping => "Grouping",
        };
        f.write_str(name)
    }
}

impl FromStr for Dimension {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "division" => Ok(Dimension::Division),
            "store" => Ok(Dimension::Store),
            "grouping" => Ok(Dimension::Grouping),
            _ => Err(EngineError::UnknownDimension(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> Record {
        Record {
            grouping: "GRC MILK".to_string(),
            store: "Store A".to_string(),
            division: "GRC+FRS".to_string(),
            period: Period::from_ym(2025, 1).unwrap(),
            sales: 100.0,
            cost: 60.0,
            margin: 40.0,
            stock_value: 250.0,
        }
    }

    #[test]
    fn test_metric_value() {
        let r = record();
        assert_eq!(Metric::Sales.value(&r), 100.0);
        assert_eq!(Metric::Margin.value(&r), 40.0);
        assert_eq!(Metric::StockValue.value(&r), 250.0);
    }

    #[test]
    fn test_dimension_key() {
        let r = record();
        assert_eq!(Dimension::Division.key(&r), "GRC+FRS");
        assert_eq!(Dimension::Store.key(&r), "Store A");
        assert_eq!(Dimension::Grouping.key(&r), "GRC MILK");
    }

    #[test]
    fn test_dimension_from_str() {
        assert_eq!("Division".parse::<Dimension>().unwrap(), Dimension::Division);
        assert_eq!(" store ".parse::<Dimension>().unwrap(), Dimension::Store);
        assert!("region".parse::<Dimension>().is_err());
    }
}
