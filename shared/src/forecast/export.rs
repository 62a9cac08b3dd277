//! CSV export of reorder recommendations

use csv::{QuoteStyle, Terminator, WriterBuilder};
use thiserror::Error;

use super::reorder::ReorderRecommendation;

pub const REORDER_CSV_HEADERS: [&str; 7] = [
    "Variety",
    "Current Bags",
    "Weekly Usage",
    "Est. Depletion Date",
    "Recommended Reorder Qty",
    "Top Cupping Score",
    "Avg Cost Per Pound",
];

/// Placeholder for a missing depletion date
pub const NO_DATE: &str = "–";
pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("No recommendations to export")]
    NoRecommendations,

    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV writer error: {0}")]
    Io(#[from] std::io::Error),

    #[error("UTF-8 conversion error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

fn row(rec: &ReorderRecommendation) -> [String; 7] {
    [
        rec.variety.clone(),
        rec.current_bags.to_string(),
        format!("{:.2}", rec.weekly_usage),
        rec.depletion_date
            .map(|d| d.format("%b %-d, %Y").to_string())
            .unwrap_or_else(|| NO_DATE.to_string()),
        rec.recommended_reorder_qty.to_string(),
        rec.top_quality_score
            .map(|s| format!("{:.1}", s))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        rec.avg_cost_per_pound
            .filter(|c| c.is_finite() && *c > 0.0)
            .map(|c| format!("${:.2}", c))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
    ]
}

/// Render recommendations as CSV: a plain header line, then one fully quoted row each
pub fn export_reorder_csv(recommendations: &[ReorderRecommendation]) -> Result<String, ExportError> {
    if recommendations.is_empty() {
        return Err(ExportError::NoRecommendations);
    }

    let mut header = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(vec![]);
    header.write_record(REORDER_CSV_HEADERS)?;
    let buf = header.into_inner().map_err(|e| e.into_error())?;

    let mut wtr = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(buf);
    for rec in recommendations {
        wtr.write_record(row(rec))?;
    }

    let data = wtr.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8(data)?)
}

/// Download name for an export generated on `date`
pub fn reorder_csv_filename(date: chrono::NaiveDate) -> String {
    format!("reorder-recommendations-{}.csv", date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use rust_decimal::Decimal;

    fn recommendation() -> ReorderRecommendation {
        ReorderRecommendation {
            variety: "Yirgacheffe".to_string(),
            current_bags: 10,
            weekly_usage: 5.0,
            depletion_date: Some(Utc.with_ymd_and_hms(2025, 3, 5, 0, 0, 0).unwrap()),
            recommended_reorder_qty: 20,
            top_quality_score: Some(Decimal::new(875, 1)),
            avg_cost_per_pound: Some(4.256),
        }
    }

    #[test]
    fn test_export_layout() {
        let csv = export_reorder_csv(&[recommendation()]).unwrap();
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(
            lines[0],
            "Variety,Current Bags,Weekly Usage,Est. Depletion Date,Recommended Reorder Qty,Top Cupping Score,Avg Cost Per Pound"
        );
        assert_eq!(
            lines[1],
            r#""Yirgacheffe","10","5.00","Mar 5, 2025","20","87.5","$4.26""#
        );
    }

    #[test]
    fn test_export_placeholders() {
        let rec = ReorderRecommendation {
            depletion_date: None,
            top_quality_score: None,
            avg_cost_per_pound: None,
            weekly_usage: 0.0,
            ..recommendation()
        };
        let csv = export_reorder_csv(&[rec]).unwrap();
        assert!(csv.lines().nth(1).unwrap().ends_with(r#""0.00","–","20","N/A","N/A""#));
    }

    #[test]
    fn test_export_escapes_quotes() {
        let rec = ReorderRecommendation {
            variety: "Bourbon \"Red\", Rwanda".to_string(),
            ..recommendation()
        };
        let csv = export_reorder_csv(&[rec]).unwrap();
        assert!(csv.contains(r#""Bourbon ""Red"", Rwanda""#));
    }

    #[test]
    fn test_export_requires_rows() {
        assert!(matches!(
            export_reorder_csv(&[]),
            Err(ExportError::NoRecommendations)
        ));
    }

    #[test]
    fn test_filename() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 5).unwrap();
        assert_eq!(reorder_csv_filename(date), "reorder-recommendations-2025-03-05.csv");
    }
}
