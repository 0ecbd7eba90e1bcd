//! Place-name lookups through an injected geocoder.
//!
//! Nothing in the geometry or statistics code talks to the network. Callers
//! hand in a `PlaceLookup` implementation and a sleep function; failures are
//! retried only when their class says so.

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_STATION_NAME;
use crate::error::RemoteError;
use crate::geometry::Coordinate;

/// Granularity of place to describe a system by, chosen from its extent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaceScope {
    Place,
    Region,
    Country,
    /// Spans several countries
    International,
    World,
}

impl PlaceScope {
    /// Scope for a system whose stations reach `max_dist` miles from the centroid
    #[must_use]
    pub fn for_extent(max_dist: f64) -> Self {
        if max_dist > 3000.0 {
            PlaceScope::World
        } else if max_dist > 1500.0 {
            PlaceScope::International
        } else if max_dist > 500.0 {
            PlaceScope::Country
        } else if max_dist > 60.0 {
            PlaceScope::Region
        } else {
            PlaceScope::Place
        }
    }

    /// Geocoder feature type to pick for this scope
    #[must_use]
    pub fn feature_type(self) -> Option<PlaceScope> {
        match self {
            PlaceScope::Place | PlaceScope::Region | PlaceScope::Country => Some(self),
            PlaceScope::International => Some(PlaceScope::Country),
            PlaceScope::World => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlaceContext {
    pub text: String,
    #[serde(default)]
    pub short_code: Option<String>,
}

/// One geocoder result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceFeature {
    pub text: String,
    pub place_types: Vec<PlaceScope>,
    #[serde(default)]
    pub short_code: Option<String>,
    /// Enclosing places, innermost first
    #[serde(default)]
    pub context: Vec<PlaceContext>,
}

/// Reverse geocoder
#[allow(async_fn_in_trait)]
pub trait PlaceLookup {
    /// Features containing `coordinate`, most specific first
    async fn lookup(&self, coordinate: Coordinate) -> Result<Vec<PlaceFeature>, RemoteError>;
}

/// Bounded exponential backoff
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(200),
            max_backoff: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    /// Wait before retry number `retry` (1-based), doubling each time
    #[must_use]
    pub fn backoff(&self, retry: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry.saturating_sub(1));
        self.initial_backoff.saturating_mul(factor).min(self.max_backoff)
    }
}

/// Run `op` until it succeeds, fails terminally or runs out of attempts.
///
/// # Errors
/// Returns the last error seen.
pub async fn retry_with<T, Op, OpFut, Sleep, SleepFut>(
    policy: &RetryPolicy,
    mut sleep: Sleep,
    mut op: Op,
) -> Result<T, RemoteError>
where
    Op: FnMut() -> OpFut,
    OpFut: Future<Output = Result<T, RemoteError>>,
    Sleep: FnMut(Duration) -> SleepFut,
    SleepFut: Future<Output = ()>,
{
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(error) if error.is_retryable() && attempt < policy.max_attempts => {
                let wait = policy.backoff(attempt);
                tracing::warn!(attempt, ?wait, %error, "retrying remote call");
                sleep(wait).await;
                attempt += 1;
            }
            Err(error) => return Err(error),
        }
    }
}

/// Lowercase words of `text`, split on whitespace and punctuation
#[must_use]
pub fn split_keywords(text: &str) -> Vec<String> {
    const SEPARATORS: &str = ",.-_:;<>/\\[]()=+|{}'\"?!*#";

    text.to_lowercase()
        .split(|c: char| c.is_whitespace() || SEPARATORS.contains(c))
        .filter(|word| !word.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Name for a new station: the most specific feature with text, or the
/// default name when the lookup fails or finds nothing
pub async fn suggest_station_name<L, Sleep, SleepFut>(
    lookup: &L,
    coordinate: Coordinate,
    policy: &RetryPolicy,
    sleep: Sleep,
) -> String
where
    L: PlaceLookup,
    Sleep: FnMut(Duration) -> SleepFut,
    SleepFut: Future<Output = ()>,
{
    match retry_with(policy, sleep, || lookup.lookup(coordinate)).await {
        Ok(features) => features
            .into_iter()
            .map(|feature| feature.text)
            .find(|text| !text.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_STATION_NAME.to_string()),
        Err(error) => {
            tracing::warn!(%error, "station name lookup failed");
            DEFAULT_STATION_NAME.to_string()
        }
    }
}

/// Search keywords describing where a system is.
///
/// Systems spanning the world get fixed keywords without a lookup. A failed
/// lookup yields whatever keywords were known without it.
pub async fn geo_keywords<L, Sleep, SleepFut>(
    lookup: &L,
    centroid: Option<Coordinate>,
    max_dist: f64,
    policy: &RetryPolicy,
    sleep: Sleep,
) -> Vec<String>
where
    L: PlaceLookup,
    Sleep: FnMut(Duration) -> SleepFut,
    SleepFut: Future<Output = ()>,
{
    let Some(centroid) = centroid else {
        return Vec::new();
    };

    let scope = PlaceScope::for_extent(max_dist);
    let Some(feature_type) = scope.feature_type() else {
        return ["world", "worldwide", "global", "earth", "international"]
            .iter()
            .map(ToString::to_string)
            .collect();
    };

    let mut words = Vec::new();
    if scope == PlaceScope::International {
        words.push("international".to_string());
    }

    let features = match retry_with(policy, sleep, || lookup.lookup(centroid)).await {
        Ok(features) => features,
        Err(error) => {
            tracing::warn!(%error, "place keyword lookup failed");
            return words;
        }
    };

    let Some(feature) = features.into_iter().find(|f| f.place_types.contains(&feature_type)) else {
        return words;
    };

    words.extend(split_keywords(&feature.text));
    if let Some(code) = &feature.short_code {
        words.extend(split_keywords(code));
    }
    for context in &feature.context {
        words.extend(split_keywords(&context.text));
        if let Some(code) = &context.short_code {
            words.extend(split_keywords(code));
        }
    }

    words
}

/// Title words followed by place words, without duplicates
#[must_use]
pub fn merge_keywords(title: &str, geo: Vec<String>) -> Vec<String> {
    let mut keywords: Vec<String> = Vec::new();
    for word in split_keywords(title).into_iter().chain(geo) {
        if !keywords.contains(&word) {
            keywords.push(word);
        }
    }
    keywords
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use super::*;
    use crate::error::RemoteErrorKind;

    /// Replays canned responses, one per call
    struct Scripted {
        responses: RefCell<Vec<Result<Vec<PlaceFeature>, RemoteError>>>,
        calls: Cell<usize>,
    }

    impl Scripted {
        fn new(mut responses: Vec<Result<Vec<PlaceFeature>, RemoteError>>) -> Self {
            responses.reverse();
            Self {
                responses: RefCell::new(responses),
                calls: Cell::new(0),
            }
        }
    }

    impl PlaceLookup for Scripted {
        async fn lookup(&self, _coordinate: Coordinate) -> Result<Vec<PlaceFeature>, RemoteError> {
            self.calls.set(self.calls.get() + 1);
            self.responses
                .borrow_mut()
                .pop()
                .unwrap_or_else(|| Err(RemoteError::new(RemoteErrorKind::Other, "script exhausted")))
        }
    }

    fn feature(text: &str, scope: PlaceScope) -> PlaceFeature {
        PlaceFeature {
            text: text.to_string(),
            place_types: vec![scope],
            short_code: None,
            context: Vec::new(),
        }
    }

    fn no_wait(_: Duration) -> std::future::Ready<()> {
        std::future::ready(())
    }

    #[test]
    fn test_scope_for_extent() {
        assert_eq!(PlaceScope::for_extent(10.0), PlaceScope::Place);
        assert_eq!(PlaceScope::for_extent(60.0), PlaceScope::Place);
        assert_eq!(PlaceScope::for_extent(61.0), PlaceScope::Region);
        assert_eq!(PlaceScope::for_extent(501.0), PlaceScope::Country);
        assert_eq!(PlaceScope::for_extent(1501.0), PlaceScope::International);
        assert_eq!(PlaceScope::for_extent(3001.0), PlaceScope::World);
        assert_eq!(PlaceScope::International.feature_type(), Some(PlaceScope::Country));
    }

    #[test]
    fn test_backoff_doubles_and_caps() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff(1), Duration::from_millis(200));
        assert_eq!(policy.backoff(2), Duration::from_millis(400));
        assert_eq!(policy.backoff(10), Duration::from_secs(2));
    }

    #[test]
    fn test_split_keywords() {
        assert_eq!(split_keywords("New York-City (NYC)"), vec!["new", "york", "city", "nyc"]);
        assert!(split_keywords("  --  ").is_empty());
    }

    #[tokio::test]
    async fn test_retries_only_retryable_failures() {
        let lookup = Scripted::new(vec![
            Err(RemoteError::from_status(503, "busy")),
            Ok(vec![feature("Harbor Point", PlaceScope::Place)]),
        ]);
        let name = suggest_station_name(&lookup, Coordinate::new(0.0, 0.0), &RetryPolicy::default(), no_wait).await;
        assert_eq!(name, "Harbor Point");
        assert_eq!(lookup.calls.get(), 2);

        let lookup = Scripted::new(vec![Err(RemoteError::from_status(403, "denied"))]);
        let name = suggest_station_name(&lookup, Coordinate::new(0.0, 0.0), &RetryPolicy::default(), no_wait).await;
        assert_eq!(name, DEFAULT_STATION_NAME);
        assert_eq!(lookup.calls.get(), 1);
    }

    #[tokio::test]
    async fn test_retry_gives_up_after_max_attempts() {
        let lookup = Scripted::new(vec![
            Err(RemoteError::from_status(503, "busy")),
            Err(RemoteError::from_status(503, "busy")),
            Err(RemoteError::from_status(503, "busy")),
            Ok(Vec::new()),
        ]);
        let mut waits = Vec::new();
        let result = retry_with(
            &RetryPolicy::default(),
            |wait| {
                waits.push(wait);
                tokio::time::sleep(Duration::ZERO)
            },
            || lookup.lookup(Coordinate::new(0.0, 0.0)),
        )
        .await;

        assert_eq!(result.map_err(|e| e.kind), Err(RemoteErrorKind::Unavailable));
        assert_eq!(waits, vec![Duration::from_millis(200), Duration::from_millis(400)]);
    }

    #[tokio::test]
    async fn test_empty_lookup_falls_back_to_default_name() {
        let lookup = Scripted::new(vec![Ok(vec![feature("  ", PlaceScope::Place)])]);
        let name = suggest_station_name(&lookup, Coordinate::new(0.0, 0.0), &RetryPolicy::default(), no_wait).await;
        assert_eq!(name, DEFAULT_STATION_NAME);
    }

    #[tokio::test]
    async fn test_geo_keywords_use_matching_scope() {
        let mut region = feature("Île-de-France", PlaceScope::Region);
        region.short_code = Some("FR-IDF".to_string());
        region.context = vec![PlaceContext {
            text: "France".to_string(),
            short_code: Some("fr".to_string()),
        }];
        let lookup = Scripted::new(vec![Ok(vec![feature("Paris", PlaceScope::Place), region])]);

        let words = geo_keywords(
            &lookup,
            Some(Coordinate::new(48.85, 2.35)),
            100.0,
            &RetryPolicy::default(),
            no_wait,
        )
        .await;
        assert_eq!(words, vec!["île", "de", "france", "fr", "idf", "france", "fr"]);
        assert_eq!(
            merge_keywords("Grand Paris Express", words),
            vec!["grand", "paris", "express", "île", "de", "france", "fr", "idf"]
        );
    }

    #[tokio::test]
    async fn test_geo_keywords_without_lookup() {
        let lookup = Scripted::new(Vec::new());
        let world = geo_keywords(&lookup, Some(Coordinate::new(0.0, 0.0)), 5000.0, &RetryPolicy::default(), no_wait).await;
        assert!(world.contains(&"worldwide".to_string()));
        assert_eq!(lookup.calls.get(), 0);

        let none = geo_keywords(&lookup, None, 10.0, &RetryPolicy::default(), no_wait).await;
        assert!(none.is_empty());

        let failed = geo_keywords(&lookup, Some(Coordinate::new(0.0, 0.0)), 2000.0, &RetryPolicy::default(), no_wait).await;
        assert_eq!(failed, vec!["international"]);
    }
}
