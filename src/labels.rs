// Locale-specific labels and phrases.
//
// Both phrase tables are `const` instances of `Phrases`, so adding a
// phrase field without translating it fails to compile.
use crate::fields::CanonicalKey;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, clap::ValueEnum)]
pub enum Locale {
    #[default]
    En,
    Hi,
}

impl Locale {
    pub fn code(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Hi => "hi",
        }
    }

    /// BCP 47 tag handed to the speech engine.
    pub fn speech_tag(self) -> &'static str {
        match self {
            Locale::En => "en-IN",
            Locale::Hi => "hi-IN",
        }
    }

    pub fn phrases(self) -> &'static Phrases {
        match self {
            Locale::En => &EN,
            Locale::Hi => &HI,
        }
    }

    pub fn toggled(self) -> Locale {
        match self {
            Locale::En => Locale::Hi,
            Locale::Hi => Locale::En,
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported locale: {0}")]
pub struct UnknownLocale(pub String);

impl FromStr for Locale {
    type Err = UnknownLocale;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "en" => Ok(Locale::En),
            "hi" => Ok(Locale::Hi),
            other => Err(UnknownLocale(other.to_string())),
        }
    }
}

#[derive(Debug)]
pub struct Phrases {
    pub heading: &'static str,
    pub view: &'static str,
    pub selected: &'static str,
    pub recent: &'static str,
    pub speak: &'static str,
    pub speaking: &'static str,
    pub table_title: &'static str,
    pub compare_state: &'static str,
    pub compare_district: &'static str,
    pub above_average: &'static str,
    pub below_average: &'static str,
    pub difference: &'static str,
    pub better_district: &'static str,
    pub select_district: &'static str,
    pub toggle_language: &'static str,
    pub export: &'static str,
    pub glossary_title: &'static str,
    pub exit: &'static str,
    pub no_data_found: &'static str,
    pub no_records: &'static str,
    pub source: &'static str,
    pub perf_failed: &'static str,
    pub districts_failed: &'static str,
    pub comparison_failed: &'static str,
    pub malformed: &'static str,
    pub load_performance_first: &'static str,
    pub both_zero: &'static str,
    pub district_missing: &'static str,
    pub available_districts: &'static str,
    pub available_states: &'static str,
    pub click_view: &'static str,
    pub need_both_districts: &'static str,
    pub no_comparison_data: &'static str,
    pub trend_title: &'static str,
    pub trend_help: &'static str,
    pub average: &'static str,
    pub days: &'static str,
    pub employment_days: &'static str,
    pub state_average: &'static str,
    pub period: &'static str,
    pub more_persondays: &'static str,
    pub no_district_selected: &'static str,
    pub invalid_choice: &'static str,
}

pub const EN: Phrases = Phrases {
    heading: "Select Your District",
    view: "View Performance",
    selected: "Selected District",
    recent: "Recent Months",
    speak: "Play Audio Help",
    speaking: "Speaking…",
    table_title: "Detailed Records",
    compare_state: "Compare with State Average",
    compare_district: "Compare with Another District",
    above_average: "Above State Average",
    below_average: "Below State Average",
    difference: "Difference",
    better_district: "Better Performing District",
    select_district: "Select District to Compare",
    toggle_language: "हिंदी",
    export: "Export Records",
    glossary_title: "What do these terms mean?",
    exit: "Exit",
    no_data_found: "No data found",
    no_records: "No records available for this district.",
    source: "Source",
    perf_failed: "Could not load performance data. Please try again later.",
    districts_failed: "Failed to load districts. Make sure the backend is running on",
    comparison_failed: "Could not load the comparison. Please try again later.",
    malformed: "The server sent data that could not be read.",
    load_performance_first: "Please load district performance data first. Choose \"View Performance\".",
    both_zero: "Both state average and district data are 0. No data available.",
    district_missing: "This district was not found in data for this period.",
    available_districts: "Available districts",
    available_states: "Available states",
    click_view: "Please choose \"View Performance\" to load data.",
    need_both_districts: "Data must be available for both districts. Try fetching performance data first.",
    no_comparison_data: "No data available for comparison",
    trend_title: "Trend: Employment Days Created",
    trend_help: "This graph shows how many employment days were created over the past months",
    average: "Average",
    days: "days",
    employment_days: "Employment Days",
    state_average: "State Average",
    period: "Period",
    more_persondays: "more persondays",
    no_district_selected: "No district selected.",
    invalid_choice: "Invalid choice.",
};

pub const HI: Phrases = Phrases {
    heading: "अपना ज़िला चुनें",
    view: "प्रदर्शन देखें",
    selected: "चुना गया ज़िला",
    recent: "हाल के महीने",
    speak: "आवाज़ में जानकारी",
    speaking: "बोला जा रहा है…",
    table_title: "विस्तृत रिकॉर्ड",
    compare_state: "राज्य औसत से तुलना",
    compare_district: "दूसरे ज़िले से तुलना",
    above_average: "राज्य औसत से ऊपर",
    below_average: "राज्य औसत से नीचे",
    difference: "अंतर",
    better_district: "बेहतर प्रदर्शन करने वाला ज़िला",
    select_district: "तुलना के लिए ज़िला चुनें",
    toggle_language: "English",
    export: "रिकॉर्ड सहेजें",
    glossary_title: "इन शब्दों का क्या मतलब है?",
    exit: "बाहर निकलें",
    no_data_found: "कोई डेटा नहीं मिला",
    no_records: "इस जिले के लिए कोई रिकॉर्ड उपलब्ध नहीं है।",
    source: "स्रोत",
    perf_failed: "प्रदर्शन डेटा लोड नहीं हो सका। कृपया बाद में पुनः प्रयास करें।",
    districts_failed: "ज़िले लोड नहीं हो सके। जाँचें कि बैकएंड चल रहा है:",
    comparison_failed: "तुलना लोड नहीं हो सकी। कृपया बाद में पुनः प्रयास करें।",
    malformed: "सर्वर से आया डेटा पढ़ा नहीं जा सका।",
    load_performance_first: "पहले जिला प्रदर्शन डेटा लोड करें। \"प्रदर्शन देखें\" चुनें।",
    both_zero: "राज्य औसत और जिला डेटा दोनों 0 हैं। कोई डेटा उपलब्ध नहीं है।",
    district_missing: "यह जिला इस अवधि के लिए डेटा में नहीं मिला।",
    available_districts: "उपलब्ध ज़िले",
    available_states: "उपलब्ध राज्य",
    click_view: "कृपया \"प्रदर्शन देखें\" चुनकर डेटा लोड करें।",
    need_both_districts: "दोनों जिलों के लिए डेटा उपलब्ध होना चाहिए।",
    no_comparison_data: "तुलना के लिए कोई डेटा उपलब्ध नहीं है",
    trend_title: "रुझान: रोज़गार दिवस",
    trend_help: "यह ग्राफ दिखाता है कि पिछले महीनों में कितने रोज़गार दिवस बनाए गए",
    average: "औसत",
    days: "दिवस",
    employment_days: "रोज़गार दिवस",
    state_average: "राज्य औसत",
    period: "अवधि",
    more_persondays: "अधिक मानव-दिवस",
    no_district_selected: "कोई ज़िला नहीं चुना गया।",
    invalid_choice: "अमान्य विकल्प।",
};

fn hindi_label(key: CanonicalKey) -> &'static str {
    match key {
        CanonicalKey::FinYear => "वित्तीय वर्ष",
        CanonicalKey::Month => "महीना",
        CanonicalKey::StateName => "राज्य",
        CanonicalKey::DistrictName => "ज़िला",
        CanonicalKey::HouseholdsWorked => "काम करने वाले परिवार",
        CanonicalKey::PersondaysGenerated => "सृजित मानव-दिवस",
        CanonicalKey::OngoingWorks => "चल रहे कार्य",
        CanonicalKey::CompletedWorks => "पूरा हुए कार्य",
        CanonicalKey::AvgWageRate => "औसत मज़दूरी दर",
        CanonicalKey::TotalWages => "कुल मज़दूरी",
    }
}

/// `no_of_ongoing_works` → `No Of Ongoing Works`.
pub fn pretty_label(key: &str) -> String {
    key.split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Human label for a raw or canonical key. Never empty.
pub fn label_for(key: &str, locale: Locale) -> String {
    if locale == Locale::Hi {
        if let Ok(canonical) = key.parse::<CanonicalKey>() {
            return hindi_label(canonical).to_string();
        }
    }
    let pretty = pretty_label(key);
    if !pretty.is_empty() {
        return pretty;
    }
    // Keys made only of underscores have no words to title-case.
    if key.is_empty() {
        "-".to_string()
    } else {
        key.to_string()
    }
}

pub fn description_for(key: CanonicalKey, locale: Locale) -> Option<&'static str> {
    let text = match (locale, key) {
        (Locale::En, CanonicalKey::HouseholdsWorked) => "Families who received work",
        (Locale::En, CanonicalKey::PersondaysGenerated) => "Total days of employment created",
        (Locale::En, CanonicalKey::OngoingWorks) => "Projects currently running",
        (Locale::En, CanonicalKey::CompletedWorks) => "Projects finished this period",
        (Locale::En, CanonicalKey::AvgWageRate) => "Average payment per day per person",
        (Locale::En, CanonicalKey::TotalWages) => "Total money paid to workers",
        (Locale::Hi, CanonicalKey::HouseholdsWorked) => "काम पाने वाले परिवार",
        (Locale::Hi, CanonicalKey::PersondaysGenerated) => "बनाए गए रोज़गार के दिन",
        (Locale::Hi, CanonicalKey::OngoingWorks) => "अभी चल रहे प्रोजेक्ट",
        (Locale::Hi, CanonicalKey::CompletedWorks) => "इस अवधि में पूरे हुए प्रोजेक्ट",
        (Locale::Hi, CanonicalKey::AvgWageRate) => "प्रति व्यक्ति प्रति दिन औसत भुगतान",
        (Locale::Hi, CanonicalKey::TotalWages) => "मजदूरों को कुल भुगतान",
        _ => return None,
    };
    Some(text)
}

pub fn icon_for(key: CanonicalKey) -> &'static str {
    match key {
        CanonicalKey::FinYear => "📅",
        CanonicalKey::Month => "🗓️",
        CanonicalKey::StateName => "🗺️",
        CanonicalKey::DistrictName => "🏢",
        CanonicalKey::HouseholdsWorked => "👨‍👩‍👧‍👦",
        CanonicalKey::PersondaysGenerated => "⏱️",
        CanonicalKey::OngoingWorks => "🏗️",
        CanonicalKey::CompletedWorks => "✅",
        CanonicalKey::AvgWageRate => "₹",
        CanonicalKey::TotalWages => "💰",
    }
}

/// Term / explanation pairs for the glossary screen.
pub fn glossary(locale: Locale) -> &'static [(&'static str, &'static str)] {
    match locale {
        Locale::En => &[
            ("Persondays", "One day of work done by one person. 100 persondays = 100 people working 1 day, or 1 person working 100 days."),
            ("Households Worked", "Number of families in which at least one member got work under the scheme."),
            ("Ongoing Works", "Public works (ponds, roads, wells) that have started but are not finished."),
            ("Completed Works", "Public works finished during this period."),
            ("Average Wage Rate", "Average money paid to one worker for one day of work."),
            ("Lakh / Crore", "1 Lakh = 1,00,000. 1 Crore = 1,00,00,000."),
        ],
        Locale::Hi => &[
            ("मानव-दिवस", "एक व्यक्ति द्वारा किया गया एक दिन का काम। 100 मानव-दिवस = 100 लोग 1 दिन, या 1 व्यक्ति 100 दिन।"),
            ("काम करने वाले परिवार", "ऐसे परिवार जिनके कम से कम एक सदस्य को योजना में काम मिला।"),
            ("चल रहे कार्य", "सार्वजनिक कार्य (तालाब, सड़क, कुएँ) जो शुरू हो चुके हैं पर पूरे नहीं हुए।"),
            ("पूरे हुए कार्य", "इस अवधि में पूरे हुए सार्वजनिक कार्य।"),
            ("औसत मज़दूरी दर", "एक मज़दूर को एक दिन के काम के लिए मिलने वाली औसत राशि।"),
            ("लाख / करोड़", "1 लाख = 1,00,000। 1 करोड़ = 1,00,00,000।"),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("no_of_ongoing_works", "No Of Ongoing Works")]
    #[case("fin_year", "Fin Year")]
    #[case("Total_Households_Worked", "Total Households Worked")]
    #[case("month", "Month")]
    fn english_labels_are_title_cased(#[case] key: &str, #[case] expected: &str) {
        assert_eq!(label_for(key, Locale::En), expected);
    }

    #[test]
    fn hindi_labels_for_canonical_keys() {
        assert_eq!(label_for("persondays_generated", Locale::Hi), "सृजित मानव-दिवस");
        // No translation: falls back to the pretty form.
        assert_eq!(label_for("women_persondays", Locale::Hi), "Women Persondays");
    }

    #[rstest]
    fn labels_are_never_empty(
        #[values(Locale::En, Locale::Hi)] locale: Locale,
        #[values("fin_year", "x", "_", "__a__", "already Pretty", "ÿ_z")] key: &str,
    ) {
        assert!(!label_for(key, locale).is_empty());
    }

    #[test]
    fn every_canonical_key_has_a_label() {
        for locale in [Locale::En, Locale::Hi] {
            for key in CanonicalKey::ALL {
                assert!(!label_for(key.as_str(), locale).is_empty());
            }
        }
    }

    #[test]
    fn descriptions_cover_metrics_only() {
        assert!(description_for(CanonicalKey::TotalWages, Locale::Hi).is_some());
        assert!(description_for(CanonicalKey::FinYear, Locale::En).is_none());
    }

    #[test]
    fn locale_codes_round_trip() {
        for locale in [Locale::En, Locale::Hi] {
            assert_eq!(locale.code().parse::<Locale>(), Ok(locale));
        }
        let err = "fr".parse::<Locale>().unwrap_err();
        assert_eq!(err.to_string(), "unsupported locale: fr");
        assert_eq!(Locale::En.toggled(), Locale::Hi);
    }
}
