// Application state as immutable snapshots.
//
// Every user action or finished request becomes an `Action`; `update`
// maps the current snapshot and the action to the next snapshot. Responses
// carry the `RequestToken` handed out when their request was issued, and
// a response older than the newest request for the same endpoint is
// dropped.
use crate::client::PerformanceOutcome;
use crate::labels::Locale;
use crate::types::{ComparativeResult, District};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Districts,
    Performance,
    Comparison,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestToken(u64);

#[derive(Debug, Clone, PartialEq)]
pub enum Slot<T> {
    Idle,
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Slot::Idle
    }
}

impl<T> Slot<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            Slot::Ready(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Slot::Loading)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
struct Latest {
    districts: Option<RequestToken>,
    performance: Option<RequestToken>,
    comparison: Option<RequestToken>,
}

impl Latest {
    fn get(&self, endpoint: Endpoint) -> Option<RequestToken> {
        match endpoint {
            Endpoint::Districts => self.districts,
            Endpoint::Performance => self.performance,
            Endpoint::Comparison => self.comparison,
        }
    }

    fn set(&mut self, endpoint: Endpoint, token: RequestToken) {
        match endpoint {
            Endpoint::Districts => self.districts = Some(token),
            Endpoint::Performance => self.performance = Some(token),
            Endpoint::Comparison => self.comparison = Some(token),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    pub locale: Locale,
    pub districts: Slot<Vec<District>>,
    pub selected: Option<String>,
    pub compare_with: Option<String>,
    pub performance: Slot<PerformanceOutcome>,
    pub comparison: Slot<ComparativeResult>,
    next_token: u64,
    latest: Latest,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SetLocale(Locale),
    Select(String),
    SelectComparison(String),
    /// Geolocation suggestion; ignored unless it names a loaded district.
    Suggest(String),
    Started(Endpoint, RequestToken),
    DistrictsLoaded(RequestToken, Result<Vec<District>, String>),
    PerformanceLoaded(RequestToken, Result<PerformanceOutcome, String>),
    ComparisonLoaded(RequestToken, Result<ComparativeResult, String>),
}

impl AppState {
    pub fn new(locale: Locale) -> Self {
        AppState { locale, ..AppState::default() }
    }

    /// Next request token. Dispatch it with [`Action::Started`] before the
    /// request goes out.
    pub fn issue(&self) -> RequestToken {
        RequestToken(self.next_token + 1)
    }

    fn is_current(&self, endpoint: Endpoint, token: RequestToken) -> bool {
        self.latest.get(endpoint) == Some(token)
    }

    pub fn district_names(&self) -> Vec<String> {
        self.districts
            .ready()
            .map(|ds| ds.iter().map(|d| d.name.clone()).collect())
            .unwrap_or_default()
    }
}

fn knows(state: &AppState, name: &str) -> bool {
    state.districts.ready().is_some_and(|ds| ds.iter().any(|d| d.name == name))
}

pub fn update(state: &AppState, action: Action) -> AppState {
    let mut next = state.clone();
    match action {
        Action::SetLocale(locale) => next.locale = locale,
        Action::Select(name) => next.selected = Some(name),
        Action::SelectComparison(name) => next.compare_with = Some(name),
        Action::Suggest(name) => {
            if knows(state, &name) {
                next.selected = Some(name);
            } else {
                tracing::debug!(%name, "suggested district is not in the list");
            }
        }
        Action::Started(endpoint, token) => {
            next.next_token = next.next_token.max(token.0);
            next.latest.set(endpoint, token);
            match endpoint {
                Endpoint::Districts => next.districts = Slot::Loading,
                Endpoint::Performance => {
                    next.performance = Slot::Loading;
                    next.comparison = Slot::Idle;
                }
                Endpoint::Comparison => next.comparison = Slot::Loading,
            }
        }
        Action::DistrictsLoaded(token, result) => {
            if !state.is_current(Endpoint::Districts, token) {
                tracing::debug!(?token, "dropping stale districts response");
                return next;
            }
            match result {
                Ok(districts) => {
                    if next.selected.is_none() {
                        next.selected = districts.first().map(|d| d.name.clone());
                    }
                    next.districts = Slot::Ready(districts);
                }
                Err(msg) => next.districts = Slot::Failed(msg),
            }
        }
        Action::PerformanceLoaded(token, result) => {
            if !state.is_current(Endpoint::Performance, token) {
                tracing::debug!(?token, "dropping stale performance response");
                return next;
            }
            next.performance = match result {
                Ok(outcome) => Slot::Ready(outcome),
                Err(msg) => Slot::Failed(msg),
            };
        }
        Action::ComparisonLoaded(token, result) => {
            if !state.is_current(Endpoint::Comparison, token) {
                tracing::debug!(?token, "dropping stale comparison response");
                return next;
            }
            next.comparison = match result {
                Ok(cmp) => Slot::Ready(cmp),
                Err(msg) => Slot::Failed(msg),
            };
        }
    }
    next
}
