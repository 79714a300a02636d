use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tabled::Tabled;

/// One entry of `/api/districts`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct District {
    pub id: i64,
    pub name: String,
}

/// One district-month as delivered by the API.
///
/// Key naming is not stable across upstream sources, so the record is kept
/// as the raw JSON object and only read through `fields::resolve`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct PerformanceRecord(pub Map<String, Value>);

impl PerformanceRecord {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }
}

impl From<Value> for PerformanceRecord {
    fn from(v: Value) -> Self {
        match v {
            Value::Object(map) => PerformanceRecord(map),
            _ => PerformanceRecord::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct PerformanceResponse {
    #[serde(default)]
    pub records: Vec<PerformanceRecord>,
    #[serde(default)]
    pub source: Option<String>,
}

/// API-level error object, returned with a success status.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainError {
    pub error: String,
    #[serde(default)]
    pub hint: Option<String>,
    #[serde(default)]
    pub available_states: Option<Vec<String>>,
    #[serde(default)]
    pub available_districts: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateAverageComparison {
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub district: Option<String>,
    #[serde(default)]
    pub year: Option<Value>,
    #[serde(default)]
    pub month: Option<Value>,
    pub state_average_persondays: f64,
    #[serde(default)]
    pub state_average_households: Option<f64>,
    #[serde(default)]
    pub district_persondays: Option<f64>,
    #[serde(default)]
    pub district_households: Option<f64>,
    #[serde(default)]
    pub persondays_difference_percent: Option<f64>,
    #[serde(default)]
    pub above_state_average: Option<bool>,
    #[serde(default)]
    pub district_data_missing: Option<bool>,
    #[serde(default)]
    pub available_districts: Option<Vec<String>>,
}

/// One side of a two-district comparison. Either carries figures or an
/// `error` explaining why it has none.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DistrictFigures {
    pub name: String,
    #[serde(default)]
    pub persondays_generated: Option<Value>,
    #[serde(default)]
    pub households_worked: Option<Value>,
    #[serde(default)]
    pub no_of_ongoing_works: Option<Value>,
    #[serde(default)]
    pub no_of_completed_works: Option<Value>,
    #[serde(default)]
    pub avg_wage_rate: Option<Value>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DistrictComparison {
    #[serde(default)]
    pub year: Option<Value>,
    #[serde(default)]
    pub month: Option<Value>,
    pub district1: DistrictFigures,
    pub district2: DistrictFigures,
    #[serde(default)]
    pub difference_persondays: Option<f64>,
    #[serde(default)]
    pub better_district: Option<String>,
}

/// Any payload of the comparatives endpoints. Variant order matters for the
/// untagged match: an `error` key wins over everything else.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ComparativeResult {
    Failure(DomainError),
    StateAverage(StateAverageComparison),
    DistrictPair(DistrictComparison),
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct CardRow {
    #[serde(rename = "Field")]
    #[tabled(rename = "Field")]
    pub label: String,
    #[serde(rename = "Value")]
    #[tabled(rename = "Value")]
    pub value: String,
    #[serde(rename = "About")]
    #[tabled(rename = "About")]
    pub description: String,
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct RecordRow {
    #[serde(rename = "Month")]
    #[tabled(rename = "Month")]
    pub month: String,
    #[serde(rename = "FinYear")]
    #[tabled(rename = "FinYear")]
    pub fin_year: String,
    #[serde(rename = "Households")]
    #[tabled(rename = "Households")]
    pub households_worked: String,
    #[serde(rename = "Persondays")]
    #[tabled(rename = "Persondays")]
    pub persondays_generated: String,
    #[serde(rename = "OngoingWorks")]
    #[tabled(rename = "OngoingWorks")]
    pub ongoing_works: String,
    #[serde(rename = "CompletedWorks")]
    #[tabled(rename = "CompletedWorks")]
    pub completed_works: String,
    #[serde(rename = "AvgWageRate")]
    #[tabled(rename = "AvgWageRate")]
    pub avg_wage_rate: String,
    #[serde(rename = "TotalWages")]
    #[tabled(rename = "TotalWages")]
    pub total_wages: String,
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct TrendRow {
    #[serde(rename = "Period")]
    #[tabled(rename = "Period")]
    pub period: String,
    #[serde(rename = "Persondays")]
    #[tabled(rename = "Persondays")]
    pub persondays: String,
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct ComparisonRow {
    #[serde(rename = "Name")]
    #[tabled(rename = "Name")]
    pub name: String,
    #[serde(rename = "Persondays")]
    #[tabled(rename = "Persondays")]
    pub persondays: String,
    #[serde(rename = "Households")]
    #[tabled(rename = "Households")]
    pub households: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn error_payload_wins_over_shape() {
        let v = json!({
            "error": "No data available for state: Goa",
            "hint": "Available states in database: MAHARASHTRA",
            "availableStates": ["MAHARASHTRA"],
            "stateAveragePersondays": 0
        });
        let parsed: ComparativeResult = serde_json::from_value(v).unwrap();
        match parsed {
            ComparativeResult::Failure(e) => {
                assert_eq!(e.available_states, Some(vec!["MAHARASHTRA".to_string()]));
                assert!(e.hint.is_some());
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[test]
    fn state_average_payload() {
        let v = json!({
            "state": "MAHARASHTRA",
            "year": "2024-2025",
            "month": "Dec",
            "stateAveragePersondays": 120000,
            "districtPersondays": 150000,
            "persondaysDifferencePercent": 25.0,
            "aboveStateAverage": true
        });
        let parsed: ComparativeResult = serde_json::from_value(v).unwrap();
        let ComparativeResult::StateAverage(s) = parsed else {
            panic!("expected state average");
        };
        assert_eq!(s.state_average_persondays, 120000.0);
        assert_eq!(s.above_state_average, Some(true));
    }

    #[test]
    fn district_pair_payload() {
        let v = json!({
            "district1": {"name": "Pune", "persondaysGenerated": 5000},
            "district2": {"name": "Nagpur", "error": "No data available"},
            "betterDistrict": "Pune"
        });
        let parsed: ComparativeResult = serde_json::from_value(v).unwrap();
        let ComparativeResult::DistrictPair(p) = parsed else {
            panic!("expected district pair");
        };
        assert_eq!(p.district2.error.as_deref(), Some("No data available"));
        assert_eq!(p.better_district.as_deref(), Some("Pune"));
    }

    #[test]
    fn performance_records_default_to_empty() {
        let parsed: PerformanceResponse = serde_json::from_value(json!({"source": "cache"})).unwrap();
        assert!(parsed.records.is_empty());
        assert_eq!(parsed.source.as_deref(), Some("cache"));
    }
}
