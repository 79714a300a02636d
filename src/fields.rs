// Canonical metric keys and lookup-with-fallback against raw records.
//
// A key resolves by trying, in order: the canonical snake_case name, its
// lowerCamelCase form, then the alternate labels listed in
// `CanonicalKey::alternates`. The first usable value wins; a value is
// usable when present, not null and not the empty string.
use crate::types::PerformanceRecord;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonicalKey {
    FinYear,
    Month,
    StateName,
    DistrictName,
    HouseholdsWorked,
    PersondaysGenerated,
    OngoingWorks,
    CompletedWorks,
    AvgWageRate,
    TotalWages,
}

impl CanonicalKey {
    /// Display order of the key cards.
    pub const ALL: [CanonicalKey; 10] = [
        CanonicalKey::FinYear,
        CanonicalKey::Month,
        CanonicalKey::StateName,
        CanonicalKey::DistrictName,
        CanonicalKey::HouseholdsWorked,
        CanonicalKey::PersondaysGenerated,
        CanonicalKey::OngoingWorks,
        CanonicalKey::CompletedWorks,
        CanonicalKey::AvgWageRate,
        CanonicalKey::TotalWages,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CanonicalKey::FinYear => "fin_year",
            CanonicalKey::Month => "month",
            CanonicalKey::StateName => "state_name",
            CanonicalKey::DistrictName => "district_name",
            CanonicalKey::HouseholdsWorked => "households_worked",
            CanonicalKey::PersondaysGenerated => "persondays_generated",
            CanonicalKey::OngoingWorks => "no_of_ongoing_works",
            CanonicalKey::CompletedWorks => "no_of_completed_works",
            CanonicalKey::AvgWageRate => "avg_wage_rate",
            CanonicalKey::TotalWages => "total_wages",
        }
    }

    pub fn camel_case(self) -> String {
        camel_case(self.as_str())
    }

    /// Alternate labels seen in upstream exports, highest priority first.
    pub fn alternates(self) -> &'static [&'static str] {
        match self {
            CanonicalKey::AvgWageRate => &["Average_Wage_rate_per_day_per_person", "average_wage_rate"],
            CanonicalKey::TotalWages => &["Material_and_skilled_Wages", "Wages", "Total_Wages"],
            CanonicalKey::HouseholdsWorked => &[
                "Total_Households_Worked",
                "Households_Worked",
                "No_of_Households_Worked",
                "Number_of_Households_Worked",
            ],
            CanonicalKey::PersondaysGenerated => &[
                "Total_Persondays_Generated",
                "Persondays_Generated",
                "Persondays_of_Central_Liability_so_far",
            ],
            CanonicalKey::OngoingWorks => &[
                "Number_of_Ongoing_Works",
                "No_of_Ongoing_Works",
                "Ongoing_Works",
                "OngoingWorks",
            ],
            CanonicalKey::CompletedWorks => &[
                "Number_of_Completed_Works",
                "No_of_Completed_Works",
                "Completed_Works",
                "CompletedWorks",
            ],
            CanonicalKey::FinYear
            | CanonicalKey::Month
            | CanonicalKey::StateName
            | CanonicalKey::DistrictName => &[],
        }
    }
}

impl fmt::Display for CanonicalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown metric key: {0}")]
pub struct UnknownKey(pub String);

impl FromStr for CanonicalKey {
    type Err = UnknownKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CanonicalKey::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| UnknownKey(s.to_string()))
    }
}

/// Result of looking one key up in one record.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved {
    Value(Value),
    Unavailable,
}

impl Resolved {
    pub fn is_available(&self) -> bool {
        matches!(self, Resolved::Value(_))
    }

    pub fn value(&self) -> Option<&Value> {
        match self {
            Resolved::Value(v) => Some(v),
            Resolved::Unavailable => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedField {
    pub key: CanonicalKey,
    pub value: Resolved,
}

/// `snake_case` → `lowerCamelCase`.
pub fn camel_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for (i, word) in key.split('_').enumerate() {
        if i == 0 {
            out.push_str(word);
            continue;
        }
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}

fn usable<'a>(record: &'a PerformanceRecord, key: &str) -> Option<&'a Value> {
    match record.get(key)? {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        v => Some(v),
    }
}

pub fn resolve(record: &PerformanceRecord, key: CanonicalKey) -> Resolved {
    let found = usable(record, key.as_str())
        .or_else(|| usable(record, &key.camel_case()))
        .or_else(|| key.alternates().iter().find_map(|alt| usable(record, alt)));
    match found {
        Some(v) => Resolved::Value(v.clone()),
        None => Resolved::Unavailable,
    }
}

pub fn resolve_field(record: &PerformanceRecord, key: CanonicalKey) -> ResolvedField {
    ResolvedField { key, value: resolve(record, key) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    fn rec(v: Value) -> PerformanceRecord {
        PerformanceRecord::from(v)
    }

    fn single(key: &str, v: Value) -> PerformanceRecord {
        let mut map = serde_json::Map::new();
        map.insert(key.to_string(), v);
        PerformanceRecord(map)
    }

    #[rstest]
    #[case("no_of_ongoing_works", "noOfOngoingWorks")]
    #[case("fin_year", "finYear")]
    #[case("month", "month")]
    #[case("avg_wage_rate", "avgWageRate")]
    fn camel_cases_snake_keys(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(camel_case(input), expected);
    }

    #[test]
    fn canonical_name_wins() {
        let r = rec(json!({
            "persondays_generated": 100,
            "persondaysGenerated": 200,
            "Total_Persondays_Generated": 300
        }));
        assert_eq!(resolve(&r, CanonicalKey::PersondaysGenerated), Resolved::Value(json!(100)));
    }

    #[test]
    fn camel_case_before_alternates() {
        let r = rec(json!({"persondaysGenerated": 200, "Total_Persondays_Generated": 300}));
        assert_eq!(resolve(&r, CanonicalKey::PersondaysGenerated), Resolved::Value(json!(200)));
    }

    #[test]
    fn null_and_empty_are_skipped() {
        let r = rec(json!({
            "avg_wage_rate": null,
            "avgWageRate": "",
            "Average_Wage_rate_per_day_per_person": "",
            "average_wage_rate": "256.4"
        }));
        assert_eq!(resolve(&r, CanonicalKey::AvgWageRate), Resolved::Value(json!("256.4")));
    }

    #[test]
    fn alternates_follow_listed_order() {
        let r = rec(json!({"Wages": 10, "Total_Wages": 20}));
        assert_eq!(resolve(&r, CanonicalKey::TotalWages), Resolved::Value(json!(10)));
    }

    #[test]
    fn every_key_resolves_the_same_through_its_alternates() {
        for key in CanonicalKey::ALL {
            let direct = single(key.as_str(), json!("42"));
            let camel = single(&key.camel_case(), json!("42"));
            assert_eq!(resolve(&direct, key), resolve(&camel, key), "{}", key);
            for alt in key.alternates() {
                let via_alt = single(alt, json!("42"));
                assert_eq!(resolve(&direct, key), resolve(&via_alt, key), "{} via {}", key, alt);
            }
        }
    }

    #[test]
    fn missing_keys_are_unavailable() {
        let r = rec(json!({"unrelated": 1}));
        for key in CanonicalKey::ALL {
            assert_eq!(resolve(&r, key), Resolved::Unavailable);
        }
    }

    #[test]
    fn zero_is_a_real_value() {
        let r = rec(json!({"households_worked": 0}));
        assert!(resolve(&r, CanonicalKey::HouseholdsWorked).is_available());
    }

    #[test]
    fn parses_known_keys_only() {
        assert_eq!("total_wages".parse::<CanonicalKey>(), Ok(CanonicalKey::TotalWages));
        let err = "totalWages".parse::<CanonicalKey>().unwrap_err();
        assert_eq!(err.to_string(), "unknown metric key: totalWages");
    }
}
