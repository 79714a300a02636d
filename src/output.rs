use crate::client::{ApiError, PerformanceOutcome};
use crate::fields::{resolve, resolve_field, CanonicalKey, Resolved};
use crate::format::{
    format_count, format_currency, format_field, format_grouped, format_plain, format_signed_percent, PLACEHOLDER,
};
use crate::labels::{description_for, glossary, icon_for, label_for, Locale};
use crate::trend::{build_trend, TrendSeries};
use crate::types::{
    CardRow, ComparativeResult, ComparisonRow, DistrictComparison, DistrictFigures, DomainError, PerformanceRecord,
    RecordRow, StateAverageComparison, TrendRow,
};
use crate::util::{group_indian, value_text};
use serde::Serialize;
use serde_json::Value;
use std::error::Error;
use std::fmt::Write as _;
use tabled::{settings::Style, Table, Tabled};

/// Raw keys shown when a record carries none of the canonical ones.
const FALLBACK_CARDS: usize = 6;
/// Available districts listed under a missing-district hint.
const MAX_HINTED: usize = 10;

pub fn write_csv<T: Serialize>(path: &str, rows: &[T]) -> Result<(), Box<dyn Error>> {
    let mut wtr = csv::Writer::from_path(path)?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<T: Serialize>(path: &str, value: &T) -> Result<(), Box<dyn Error>> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}

pub fn table<T>(rows: &[T]) -> String
where
    T: Tabled + Clone,
{
    if rows.is_empty() {
        return "(no rows)\n".to_string();
    }
    let table_str = Table::new(rows.to_vec()).with(Style::markdown()).to_string();
    format!("{}\n", table_str)
}

/// Key cards for the newest record.
pub fn card_rows(record: &PerformanceRecord, locale: Locale) -> Vec<CardRow> {
    let cards: Vec<CardRow> = CanonicalKey::ALL
        .into_iter()
        .map(|key| resolve_field(record, key))
        .filter(|f| f.value.is_available())
        .map(|f| CardRow {
            label: format!("{} {}", icon_for(f.key), label_for(f.key.as_str(), locale)),
            value: format_field(&f),
            description: description_for(f.key, locale).unwrap_or_default().to_string(),
        })
        .collect();
    if !cards.is_empty() {
        return cards;
    }
    tracing::warn!(keys = ?record.keys().collect::<Vec<_>>(), "no standard keys found, showing raw keys");
    record
        .0
        .iter()
        .filter(|(_, v)| !v.is_null())
        .take(FALLBACK_CARDS)
        .map(|(k, v)| CardRow { label: k.clone(), value: value_text(v), description: String::new() })
        .collect()
}

/// Table cells: grouped numbers, currency for wage fields, `-` when absent.
pub fn record_rows(records: &[PerformanceRecord]) -> Vec<RecordRow> {
    records
        .iter()
        .map(|r| {
            let get = |key| resolve(r, key);
            RecordRow {
                month: format_plain(&get(CanonicalKey::Month)),
                fin_year: format_plain(&get(CanonicalKey::FinYear)),
                households_worked: format_grouped(&get(CanonicalKey::HouseholdsWorked)),
                persondays_generated: format_grouped(&get(CanonicalKey::PersondaysGenerated)),
                ongoing_works: format_grouped(&get(CanonicalKey::OngoingWorks)),
                completed_works: format_grouped(&get(CanonicalKey::CompletedWorks)),
                avg_wage_rate: format_currency(&get(CanonicalKey::AvgWageRate)),
                total_wages: format_currency(&get(CanonicalKey::TotalWages)),
            }
        })
        .collect()
}

/// `month • fin_year • state • district`, skipping missing parts.
pub fn recent_months(records: &[PerformanceRecord]) -> Vec<String> {
    records
        .iter()
        .map(|r| {
            [
                CanonicalKey::Month,
                CanonicalKey::FinYear,
                CanonicalKey::StateName,
                CanonicalKey::DistrictName,
            ]
            .into_iter()
            .filter_map(|k| resolve(r, k).value().map(value_text))
            .collect::<Vec<_>>()
            .join(" • ")
        })
        .collect()
}

pub fn render_trend(series: &TrendSeries, locale: Locale) -> String {
    let p = locale.phrases();
    let rows: Vec<TrendRow> = series
        .points
        .iter()
        .map(|pt| TrendRow { period: pt.label.clone(), persondays: group_indian(pt.value) })
        .collect();
    let mut out = String::new();
    let _ = writeln!(out, "📈 {} ({})", p.trend_title, rows.len());
    let _ = writeln!(out, "{}", p.trend_help);
    let _ = writeln!(out, "{}\n", series.sparkline());
    out.push_str(&table(&rows));
    let _ = writeln!(out, "{}: {} {}", p.average, series.mean_display(), p.days);
    out
}

pub fn render_performance(outcome: &PerformanceOutcome, locale: Locale) -> String {
    let p = locale.phrases();
    let mut out = String::new();
    let (records, source) = match outcome {
        PerformanceOutcome::Empty { source } => {
            let _ = writeln!(out, "⚠️ {}", p.no_data_found);
            let _ = writeln!(out, "{}", p.no_records);
            if let Some(src) = source {
                let _ = writeln!(out, "{}: {}", p.source, src);
            }
            return out;
        }
        PerformanceOutcome::Records { records, source } => (records, source),
    };

    // Records are newest first; cards describe the newest month.
    if let Some(latest) = records.first() {
        out.push_str(&table(&card_rows(latest, locale)));
        out.push('\n');
    }
    if let Some(series) = build_trend(records) {
        out.push_str(&render_trend(&series, locale));
        out.push('\n');
    }
    let _ = writeln!(out, "{}", p.recent);
    for line in recent_months(records) {
        let _ = writeln!(out, "  {}", line);
    }
    out.push('\n');
    let _ = writeln!(out, "{}", p.table_title);
    out.push_str(&table(&record_rows(records)));
    if let Some(src) = source {
        let _ = writeln!(out, "{}: {}", p.source, src);
    }
    out
}

fn number(v: Option<f64>) -> Resolved {
    match v {
        Some(n) => Resolved::Value(Value::from(n)),
        None => Resolved::Unavailable,
    }
}

fn optional(v: &Option<Value>) -> Resolved {
    match v {
        Some(Value::Null) | None => Resolved::Unavailable,
        Some(v) => Resolved::Value(v.clone()),
    }
}

fn render_state_average(cmp: &StateAverageComparison, locale: Locale) -> String {
    let p = locale.phrases();
    let mut out = String::new();
    let state_avg = cmp.state_average_persondays;
    let district = cmp.district_persondays.unwrap_or(0.0);

    if state_avg == 0.0 && district == 0.0 {
        let _ = writeln!(out, "⚠️ {}", p.both_zero);
        if cmp.district_data_missing == Some(true) {
            let _ = writeln!(out, "{}", p.district_missing);
            if let Some(names) = cmp.available_districts.as_ref().filter(|n| !n.is_empty()) {
                let shown: Vec<&str> = names.iter().take(MAX_HINTED).map(String::as_str).collect();
                let more = if names.len() > MAX_HINTED { "..." } else { "" };
                let _ = writeln!(out, "{}: {}{}", p.available_districts, shown.join(", "), more);
            }
        } else {
            let _ = writeln!(out, "{}", p.click_view);
        }
        return out;
    }

    let rows = vec![
        ComparisonRow {
            name: cmp.district.clone().unwrap_or_else(|| PLACEHOLDER.to_string()),
            persondays: format_count(&number(cmp.district_persondays)),
            households: format_count(&number(cmp.district_households)),
        },
        ComparisonRow {
            name: format!("{} ({})", p.state_average, cmp.state.as_deref().unwrap_or(PLACEHOLDER)),
            persondays: format_count(&number(Some(state_avg))),
            households: format_count(&number(cmp.state_average_households)),
        },
    ];
    let _ = writeln!(out, "{}", p.employment_days);
    out.push_str(&table(&rows));
    if state_avg > 0.0 && district > 0.0 {
        let diff = cmp.persondays_difference_percent.unwrap_or(0.0);
        let verdict = if cmp.above_state_average == Some(true) {
            format!("✅ {}", p.above_average)
        } else {
            format!("⚠️ {}", p.below_average)
        };
        let _ = writeln!(out, "{}: {}  {}", p.difference, format_signed_percent(diff), verdict);
    } else {
        let _ = writeln!(out, "{}: {}", p.difference, PLACEHOLDER);
    }
    if let (Some(month), Some(year)) = (&cmp.month, &cmp.year) {
        let _ = writeln!(out, "{}: {} {}", p.period, value_text(month), value_text(year));
    }
    out
}

fn figures_row(d: &DistrictFigures) -> ComparisonRow {
    ComparisonRow {
        name: d.name.clone(),
        persondays: format_count(&optional(&d.persondays_generated)),
        households: format_count(&optional(&d.households_worked)),
    }
}

fn render_district_pair(cmp: &DistrictComparison, locale: Locale) -> String {
    let p = locale.phrases();
    let mut out = String::new();
    if let Some(err) = cmp.district1.error.as_ref().or(cmp.district2.error.as_ref()) {
        let _ = writeln!(out, "⚠️ {}", err);
        let _ = writeln!(out, "{}", p.need_both_districts);
        return out;
    }
    let blank = |d: &DistrictFigures| {
        matches!(optional(&d.persondays_generated), Resolved::Unavailable)
            && matches!(optional(&d.households_worked), Resolved::Unavailable)
    };
    if blank(&cmp.district1) && blank(&cmp.district2) {
        let _ = writeln!(out, "⚠️ {}", p.no_comparison_data);
        return out;
    }
    let _ = writeln!(out, "{}", p.compare_district);
    out.push_str(&table(&[figures_row(&cmp.district1), figures_row(&cmp.district2)]));
    if let Some(better) = &cmp.better_district {
        let _ = write!(out, "{}: ✅ {}", p.better_district, better);
        match cmp.difference_persondays.filter(|d| *d != 0.0) {
            Some(diff) => {
                let _ = writeln!(out, " ({} {})", group_indian(diff.abs()), p.more_persondays);
            }
            None => out.push('\n'),
        }
    }
    out
}

pub fn render_domain_error(err: &DomainError, locale: Locale) -> String {
    let p = locale.phrases();
    let mut out = String::new();
    let _ = writeln!(out, "⚠️ {}", err.error);
    let _ = writeln!(out, "{}", p.load_performance_first);
    if let Some(states) = err.available_states.as_ref().filter(|s| !s.is_empty()) {
        let _ = writeln!(out, "{}: {}", p.available_states, states.join(", "));
    }
    if let Some(hint) = &err.hint {
        let _ = writeln!(out, "💡 {}", hint);
    }
    out
}

pub fn render_comparison(cmp: &ComparativeResult, locale: Locale) -> String {
    match cmp {
        ComparativeResult::Failure(err) => render_domain_error(err, locale),
        ComparativeResult::StateAverage(s) => render_state_average(s, locale),
        ComparativeResult::DistrictPair(d) => render_district_pair(d, locale),
    }
}

/// Which action failed; picks the headline of the inline error message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failing {
    Districts,
    Performance,
    Comparison,
}

/// Locale-appropriate inline message for a failed request.
pub fn describe_error(err: &ApiError, failing: Failing, locale: Locale, base: &str) -> String {
    let p = locale.phrases();
    match err {
        ApiError::Domain(domain) => render_domain_error(domain, locale),
        ApiError::MalformedJson { raw } => format!("⚠️ {}\n{}\n", p.malformed, raw),
        other => {
            let headline = match failing {
                Failing::Districts => format!("{} {}", p.districts_failed, base),
                Failing::Performance => p.perf_failed.to_string(),
                Failing::Comparison => p.comparison_failed.to_string(),
            };
            format!("❌ {}\n({})\n", headline, other)
        }
    }
}

pub fn render_glossary(locale: Locale) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", locale.phrases().glossary_title);
    for (term, meaning) in glossary(locale) {
        let _ = writeln!(out, "  • {}: {}", term, meaning);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PerformanceResponse;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    fn sample() -> Vec<PerformanceRecord> {
        vec![
            PerformanceRecord::from(json!({
                "fin_year": "2024-2025",
                "month": "Dec",
                "state_name": "MAHARASHTRA",
                "district_name": "PUNE",
                "Total_Households_Worked": "12,345",
                "persondays_generated": 250000,
                "avgWageRate": 297.5,
                "Total_Wages": 12000000
            })),
            PerformanceRecord::from(json!({
                "fin_year": "2024-2025",
                "month": "Nov",
                "persondays_generated": 150000
            })),
        ]
    }

    #[test]
    fn cards_resolve_and_format() {
        let cards = card_rows(&sample()[0], Locale::En);
        let by_value: Vec<(&str, &str)> =
            cards.iter().map(|c| (c.label.as_str(), c.value.as_str())).collect();
        assert!(by_value.contains(&("👨‍👩‍👧‍👦 Households Worked", "12.3K")));
        assert!(by_value.contains(&("⏱️ Persondays Generated", "2.50 Lakh")));
        assert!(by_value.contains(&("₹ Avg Wage Rate", "₹297.5")));
        assert!(by_value.contains(&("💰 Total Wages", "₹1.20 Cr")));
        // Ongoing/completed works are absent and get no card.
        assert_eq!(cards.len(), 8);
    }

    #[test]
    fn cards_fall_back_to_raw_keys() {
        let r = PerformanceRecord::from(json!({"a": 1, "b": null, "c": "x"}));
        let cards = card_rows(&r, Locale::Hi);
        assert_eq!(
            cards.iter().map(|c| c.label.as_str()).collect::<Vec<_>>(),
            vec!["a", "c"]
        );
    }

    #[test]
    fn table_rows_group_without_abbreviating() {
        let rows = record_rows(&sample());
        assert_eq!(rows[0].households_worked, "12,345");
        assert_eq!(rows[0].persondays_generated, "2,50,000");
        assert_eq!(rows[0].total_wages, "₹1.20 Cr");
        assert_eq!(rows[1].avg_wage_rate, "-");
    }

    #[test]
    fn recent_lines_skip_missing_parts() {
        let lines = recent_months(&sample());
        assert_eq!(lines[0], "Dec • 2024-2025 • MAHARASHTRA • PUNE");
        assert_eq!(lines[1], "Nov • 2024-2025");
    }

    #[test]
    fn empty_outcome_is_a_message_not_a_table() {
        let outcome: PerformanceOutcome = PerformanceResponse { records: vec![], source: Some("api".into()) }.into();
        let text = render_performance(&outcome, Locale::Hi);
        assert!(text.contains("कोई डेटा नहीं मिला"));
        assert!(text.contains("स्रोत: api"));
    }

    #[test]
    fn performance_view_includes_trend() {
        let outcome = PerformanceOutcome::Records { records: sample(), source: None };
        let text = render_performance(&outcome, Locale::En);
        assert!(text.contains("Trend: Employment Days Created (2)"));
        assert!(text.contains("Average: 2,00,000 days"));
        assert!(text.contains("Detailed Records"));
    }

    #[test]
    fn state_average_with_both_zero_lists_districts() {
        let cmp: ComparativeResult = serde_json::from_value(json!({
            "stateAveragePersondays": 0,
            "districtPersondays": null,
            "districtDataMissing": true,
            "availableDistricts": ["A","B","C","D","E","F","G","H","I","J","K"]
        }))
        .unwrap();
        let text = render_comparison(&cmp, Locale::En);
        assert!(text.contains("Both state average and district data are 0"));
        assert!(text.contains("Available districts: A, B, C, D, E, F, G, H, I, J..."));
    }

    #[test]
    fn state_average_shows_signed_difference() {
        let cmp: ComparativeResult = serde_json::from_value(json!({
            "state": "MAHARASHTRA",
            "district": "Pune",
            "month": "Dec",
            "year": "2024-2025",
            "stateAveragePersondays": 200000,
            "districtPersondays": 250000,
            "persondaysDifferencePercent": 25.0,
            "aboveStateAverage": true
        }))
        .unwrap();
        let text = render_comparison(&cmp, Locale::En);
        assert!(text.contains("Difference: +25.0%  ✅ Above State Average"));
        assert!(text.contains("2.50 Lakh"));
        assert!(text.contains("Period: Dec 2024-2025"));
    }

    #[test]
    fn district_pair_error_is_shown() {
        let cmp: ComparativeResult = serde_json::from_value(json!({
            "district1": {"name": "Pune", "persondaysGenerated": 5000},
            "district2": {"name": "Nagpur", "error": "No data available"}
        }))
        .unwrap();
        let text = render_comparison(&cmp, Locale::En);
        assert!(text.starts_with("⚠️ No data available"));
    }

    #[test]
    fn district_pair_names_the_better_one() {
        let cmp: ComparativeResult = serde_json::from_value(json!({
            "district1": {"name": "Pune", "persondaysGenerated": 5000, "householdsWorked": 120},
            "district2": {"name": "Nagpur", "persondaysGenerated": 3500, "householdsWorked": 90},
            "differencePersondays": 1500,
            "betterDistrict": "Pune"
        }))
        .unwrap();
        let text = render_comparison(&cmp, Locale::En);
        assert!(text.contains("Better Performing District: ✅ Pune (1,500 more persondays)"));
        assert!(text.contains("5.0K"));
    }

    #[rstest]
    #[case(Locale::En, "⚠️ No data available for comparison")]
    #[case(Locale::Hi, "⚠️ तुलना के लिए कोई डेटा उपलब्ध नहीं है")]
    fn district_pair_without_figures_says_so(#[case] locale: Locale, #[case] expected: &str) {
        let cmp: ComparativeResult = serde_json::from_value(json!({
            "district1": {"name": "Pune"},
            "district2": {"name": "Nagpur", "persondaysGenerated": null}
        }))
        .unwrap();
        assert_eq!(render_comparison(&cmp, locale).trim_end(), expected);
    }

    #[test]
    fn domain_errors_render_hints() {
        let err = ApiError::Domain(DomainError {
            error: "No data available for state: Goa".into(),
            hint: Some("Available states in database: MAHARASHTRA".into()),
            available_states: Some(vec!["MAHARASHTRA".into()]),
            available_districts: None,
        });
        let text = describe_error(&err, Failing::Comparison, Locale::En, "http://x");
        assert!(text.contains("Available states: MAHARASHTRA"));
        assert!(text.contains("💡 Available states in database"));
    }

    #[test]
    fn status_errors_use_the_failing_action_headline() {
        let err = ApiError::InvalidBase(String::new());
        let text = describe_error(&err, Failing::Districts, Locale::En, "http://localhost:9090");
        assert!(text.starts_with("❌ Failed to load districts. Make sure the backend is running on http://localhost:9090"));
    }

    #[test]
    fn exports_write_files() {
        let dir = tempfile::tempdir().unwrap();
        let csv_path = dir.path().join("records.csv");
        let json_path = dir.path().join("latest.json");
        write_csv(csv_path.to_str().unwrap(), &record_rows(&sample())).unwrap();
        write_json(json_path.to_str().unwrap(), &card_rows(&sample()[0], Locale::En)).unwrap();
        let csv_text = std::fs::read_to_string(csv_path).unwrap();
        assert!(csv_text.starts_with("Month,FinYear,Households"));
        assert!(std::fs::read_to_string(json_path).unwrap().contains("\"Field\""));
    }
}
