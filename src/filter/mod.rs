//! Pin filtering and fuzzy-search engine.
//!
//! Given the full pin collection and a set of independent, composable
//! criteria (region, category, keyword, authorship, viewport bounds), this
//! module produces the ordered subset of pins to display. All criteria are
//! ANDed; an absent criterion passes everything through. When exact keyword
//! matching finds nothing, a fuzzy subsequence ranking over the
//! already-filtered pool supplies the top three nearest matches.

use crate::models::Pin;

/// Fixed closed set of US state names and two-letter codes offered as
/// region-filter choices. Location-name tokens outside this set are never
/// offered.
pub const US_STATES: [&str; 100] = [
    "Alabama",
    "Alaska",
    "Arizona",
    "Arkansas",
    "California",
    "Colorado",
    "Connecticut",
    "Delaware",
    "Florida",
    "Georgia",
    "Hawaii",
    "Idaho",
    "Illinois",
    "Indiana",
    "Iowa",
    "Kansas",
    "Kentucky",
    "Louisiana",
    "Maine",
    "Maryland",
    "Massachusetts",
    "Michigan",
    "Minnesota",
    "Mississippi",
    "Missouri",
    "Montana",
    "Nebraska",
    "Nevada",
    "New Hampshire",
    "New Jersey",
    "New Mexico",
    "New York",
    "North Carolina",
    "North Dakota",
    "Ohio",
    "Oklahoma",
    "Oregon",
    "Pennsylvania",
    "Rhode Island",
    "South Carolina",
    "South Dakota",
    "Tennessee",
    "Texas",
    "Utah",
    "Vermont",
    "Virginia",
    "Washington",
    "West Virginia",
    "Wisconsin",
    "Wyoming",
    "AL",
    "AK",
    "AZ",
    "AR",
    "CA",
    "CO",
    "CT",
    "DE",
    "FL",
    "GA",
    "HI",
    "ID",
    "IL",
    "IN",
    "IA",
    "KS",
    "KY",
    "LA",
    "ME",
    "MD",
    "MA",
    "MI",
    "MN",
    "MS",
    "MO",
    "MT",
    "NE",
    "NV",
    "NH",
    "NJ",
    "NM",
    "NY",
    "NC",
    "ND",
    "OH",
    "OK",
    "OR",
    "PA",
    "RI",
    "SC",
    "SD",
    "TN",
    "TX",
    "UT",
    "VT",
    "VA",
    "WA",
    "WV",
    "WI",
    "WY",
];

/// Score awarded when a field contains the keyword as a substring.
const SUBSTRING_SCORE: u32 = 100;
/// Score per keyword character matched in order by the subsequence scan.
const CHAR_SCORE: u32 = 10;
/// Maximum number of pins the fuzzy fallback returns.
const FUZZY_LIMIT: usize = 3;

/// Rectangular map-viewport bound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub west: f64,
    pub east: f64,
    pub south: f64,
    pub north: f64,
}

impl Bounds {
    pub fn contains(&self, lat: f64, lng: f64) -> bool {
        self.west <= lng && lng <= self.east && self.south <= lat && lat <= self.north
    }
}

/// Independent, composable filter criteria. Each is optional; absent or
/// empty means pass-through.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    /// Exact match against a US-state token of the pin's location name.
    pub region: Option<String>,
    /// Exact match against the pin's category field.
    pub category: Option<String>,
    /// Free-text keyword.
    pub keyword: String,
    /// Restrict to pins authored by this email.
    pub author_email: Option<String>,
    /// Restrict to pins inside the current map viewport.
    pub bounds: Option<Bounds>,
}

impl FilterCriteria {
    pub fn is_empty(&self) -> bool {
        self.region.is_none()
            && self.category.is_none()
            && self.keyword.trim().is_empty()
            && self.author_email.is_none()
            && self.bounds.is_none()
    }
}

/// Apply the criteria to the collection, in original collection order.
///
/// Region, category, authorship, and viewport narrow the pool first; the
/// keyword pass then runs inside that pool. If exact substring matching
/// yields nothing, the fuzzy fallback ranks the same pool and returns at
/// most [`FUZZY_LIMIT`] pins with a positive score, best first.
pub fn apply<'a>(pins: &'a [Pin], criteria: &FilterCriteria) -> Vec<&'a Pin> {
    let pool: Vec<&Pin> = pins
        .iter()
        .filter(|pin| matches_region(pin, criteria.region.as_deref()))
        .filter(|pin| {
            criteria
                .category
                .as_deref()
                .map_or(true, |c| pin.category == c)
        })
        .filter(|pin| {
            criteria.author_email.as_deref().map_or(true, |email| {
                pin.author.as_ref().is_some_and(|a| a.email == email)
            })
        })
        .filter(|pin| {
            criteria
                .bounds
                .map_or(true, |b| b.contains(pin.lat, pin.lng))
        })
        .collect();

    let keyword = criteria.keyword.trim().to_lowercase();
    if keyword.is_empty() {
        return pool;
    }

    let exact: Vec<&Pin> = pool
        .iter()
        .copied()
        .filter(|pin| {
            pin.name.to_lowercase().contains(&keyword)
                || pin.comment.to_lowercase().contains(&keyword)
                || pin.location_name.to_lowercase().contains(&keyword)
        })
        .collect();
    if !exact.is_empty() {
        return exact;
    }

    // Fuzzy fallback: rank the already-filtered pool, never the whole
    // collection, so the other criteria are not weakened.
    let mut scored: Vec<(&Pin, u32)> = pool
        .iter()
        .map(|pin| (*pin, fuzzy_pin_score(pin, &keyword)))
        .filter(|(_, score)| *score > 0)
        .collect();
    scored.sort_by(|a, b| b.1.cmp(&a.1));
    scored
        .into_iter()
        .take(FUZZY_LIMIT)
        .map(|(pin, _)| pin)
        .collect()
}

/// Best fuzzy score for a pin over its name, description, and location name.
pub fn fuzzy_pin_score(pin: &Pin, keyword: &str) -> u32 {
    fuzzy_match_score(&pin.name, keyword)
        .max(fuzzy_match_score(&pin.comment, keyword))
        .max(fuzzy_match_score(&pin.location_name, keyword))
}

/// Score a single field against a keyword.
///
/// A case-insensitive substring hit scores [`SUBSTRING_SCORE`]. Otherwise
/// the field is scanned once left to right, greedily matching each
/// successive keyword character on its first occurrence; every matched
/// character scores [`CHAR_SCORE`].
pub fn fuzzy_match_score(field: &str, keyword: &str) -> u32 {
    if field.is_empty() || keyword.is_empty() {
        return 0;
    }
    let field = field.to_lowercase();
    let keyword = keyword.to_lowercase();
    if field.contains(&keyword) {
        return SUBSTRING_SCORE;
    }

    let mut score = 0;
    let mut wanted = keyword.chars();
    let mut next = wanted.next();
    for ch in field.chars() {
        match next {
            Some(want) if want == ch => {
                score += CHAR_SCORE;
                next = wanted.next();
            }
            Some(_) => {}
            None => break,
        }
    }
    score
}

fn matches_region(pin: &Pin, region: Option<&str>) -> bool {
    match region {
        None => true,
        Some(region) => state_tokens(&pin.location_name).any(|token| token == region),
    }
}

/// US-state tokens of a comma-separated location name, in order.
fn state_tokens(location_name: &str) -> impl Iterator<Item = &str> {
    location_name
        .split(',')
        .map(str::trim)
        .filter(|token| US_STATES.contains(token))
}

/// Region-filter choices: the union of US-state tokens found across all
/// pins' location names, in first-seen order.
pub fn region_choices(pins: &[Pin]) -> Vec<String> {
    let mut choices: Vec<String> = Vec::new();
    for pin in pins {
        for token in state_tokens(&pin.location_name) {
            if !choices.iter().any(|c| c == token) {
                choices.push(token.to_string());
            }
        }
    }
    choices
}

/// Category choices: the union of category values actually present on pins
/// (not the full registry), in first-seen order.
pub fn category_choices(pins: &[Pin]) -> Vec<String> {
    let mut choices: Vec<String> = Vec::new();
    for pin in pins {
        if !pin.category.is_empty() && !choices.iter().any(|c| c == &pin.category) {
            choices.push(pin.category.clone());
        }
    }
    choices
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_pin(id: &str, name: &str, comment: &str, location_name: &str) -> Pin {
        Pin {
            id: id.to_string(),
            lat: 40.0,
            lng: -74.0,
            name: name.to_string(),
            category: "Food".to_string(),
            color: "#e53935".to_string(),
            comment: comment.to_string(),
            photos: Vec::new(),
            location_name: location_name.to_string(),
            author: None,
            created_at: "2024-01-01T00:00:00Z".to_string(),
            comments: Vec::new(),
        }
    }

    #[test]
    fn test_substring_scores_100() {
        assert_eq!(fuzzy_match_score("Central Park", "park"), 100);
        assert_eq!(fuzzy_match_score("Central Park", "PARK"), 100);
    }

    #[test]
    fn test_subsequence_scores_per_char() {
        // 'p' and 'k' of "pk" match in order within "park"
        assert_eq!(fuzzy_match_score("park", "pk"), 20);
        // Greedy scan matches 'a' then finds no 'z'
        assert_eq!(fuzzy_match_score("park", "az"), 10);
        assert_eq!(fuzzy_match_score("park", "zzz"), 0);
        assert_eq!(fuzzy_match_score("", "park"), 0);
        assert_eq!(fuzzy_match_score("park", ""), 0);
    }

    #[test]
    fn test_exact_match_suppresses_fuzzy() {
        let pins = vec![
            test_pin("1", "Taco stand", "", ""),
            test_pin("2", "Tea house", "best taco in town", ""),
            test_pin("3", "Viewpoint", "", ""),
        ];
        let criteria = FilterCriteria {
            keyword: "taco".to_string(),
            ..Default::default()
        };
        let result = apply(&pins, &criteria);
        let ids: Vec<&str> = result.iter().map(|p| p.id.as_str()).collect();
        // Exact matches only, in collection order; no fuzzy additions
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn test_fuzzy_fallback_caps_at_three() {
        let pins = vec![
            test_pin("1", "abcd", "", ""),
            test_pin("2", "axbxcxd", "", ""),
            test_pin("3", "abxcd", "", ""),
            test_pin("4", "axxbd", "", ""),
            test_pin("5", "zzzz", "", ""),
        ];
        let criteria = FilterCriteria {
            // Not a substring of any pin; all but "zzzz" match as subsequence
            keyword: "abcde".to_string(),
            ..Default::default()
        };
        let result = apply(&pins, &criteria);
        assert_eq!(result.len(), 3);
        // Scores: 40, 40, 40 for 1/2/3 and 30 for 4; stable order keeps 1,2,3
        let ids: Vec<&str> = result.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_fuzzy_excludes_zero_scores() {
        let pins = vec![
            test_pin("1", "qqq", "", ""),
            test_pin("2", "has x and y", "", ""),
        ];
        let criteria = FilterCriteria {
            keyword: "xy".to_string(),
            ..Default::default()
        };
        let result = apply(&pins, &criteria);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, "2");
    }

    #[test]
    fn test_fuzzy_pool_is_pre_filtered() {
        let mut other = test_pin("1", "taco place", "", "");
        other.category = "Museum".to_string();
        let pins = vec![other, test_pin("2", "quiet garden", "", "")];
        let criteria = FilterCriteria {
            category: Some("Food".to_string()),
            keyword: "taco".to_string(),
            ..Default::default()
        };
        // The only subsequence candidate is outside the category pool
        let result = apply(&pins, &criteria);
        assert!(result.is_empty());
    }

    #[test]
    fn test_region_filter_uses_state_tokens() {
        let pins = vec![
            test_pin("1", "", "", "Brooklyn, New York, United States"),
            test_pin("2", "", "", "Austin, TX, United States"),
        ];
        let criteria = FilterCriteria {
            region: Some("New York".to_string()),
            ..Default::default()
        };
        let result = apply(&pins, &criteria);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, "1");
    }

    #[test]
    fn test_region_choices_first_seen_order() {
        let pins = vec![
            test_pin("1", "", "", "Austin, TX, United States"),
            test_pin("2", "", "", "Brooklyn, New York, 11201, United States"),
            test_pin("3", "", "", "Dallas, TX, United States"),
            test_pin("4", "", "", "Paris, France"),
        ];
        assert_eq!(region_choices(&pins), vec!["TX", "New York"]);
    }

    #[test]
    fn test_category_choices_from_pins_not_registry() {
        let mut museum = test_pin("2", "", "", "");
        museum.category = "Museum".to_string();
        let pins = vec![test_pin("1", "", "", ""), museum, test_pin("3", "", "", "")];
        assert_eq!(category_choices(&pins), vec!["Food", "Museum"]);
    }

    #[test]
    fn test_viewport_bounds() {
        let mut far = test_pin("2", "", "", "");
        far.lat = 10.0;
        far.lng = 10.0;
        let pins = vec![test_pin("1", "", "", ""), far];
        let criteria = FilterCriteria {
            bounds: Some(Bounds {
                west: -80.0,
                east: -70.0,
                south: 35.0,
                north: 45.0,
            }),
            ..Default::default()
        };
        let result = apply(&pins, &criteria);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, "1");
    }

    #[test]
    fn test_author_only() {
        use crate::models::Author;
        let mut mine = test_pin("1", "", "", "");
        mine.author = Some(Author {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
        });
        let pins = vec![mine, test_pin("2", "", "", "")];
        let criteria = FilterCriteria {
            author_email: Some("ada@example.com".to_string()),
            ..Default::default()
        };
        let result = apply(&pins, &criteria);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, "1");
    }

    #[test]
    fn test_additional_criterion_never_grows_result() {
        let pins = vec![
            test_pin("1", "Taco stand", "", "Austin, TX, United States"),
            test_pin("2", "Tea house", "", "Brooklyn, New York, United States"),
            test_pin("3", "Viewpoint", "", ""),
        ];
        let base = FilterCriteria {
            keyword: "t".to_string(),
            ..Default::default()
        };
        let narrowed = FilterCriteria {
            region: Some("TX".to_string()),
            ..base.clone()
        };
        let base_len = apply(&pins, &base).len();
        let narrowed_len = apply(&pins, &narrowed).len();
        assert!(narrowed_len <= base_len);
        assert!(base_len <= pins.len());
    }
}
