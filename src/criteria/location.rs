use super::{Criteria, FilterKind};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use url::form_urlencoded;

const SEARCH_PARAM: &str = "search";
const TRUE: &str = "true";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LocationError {
    #[error("Location must start with '/': {0}")]
    Relative(String),
}

/// Path, query and fragment of the address bar.
///
/// Only the query is interpreted; path and fragment are carried verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    path: String,
    query: String,
    fragment: Option<String>,
}

impl Default for Location {
    fn default() -> Self {
        Self {
            path: "/".to_string(),
            query: String::new(),
            fragment: None,
        }
    }
}

impl Location {
    /// Split a location string without validating it.
    pub fn parse(raw: &str) -> Self {
        let (rest, fragment) = match raw.split_once('#') {
            Some((rest, fragment)) => (rest, Some(fragment.to_string())),
            None => (raw, None),
        };
        let (path, query) = rest.split_once('?').unwrap_or((rest, ""));
        Self {
            path: path.to_string(),
            query: query.to_string(),
            fragment,
        }
    }

    /// Read criteria from the query string.
    ///
    /// `search` is trimmed; each toggle is on only for the literal value
    /// `"true"`. Missing parameters take their defaults. When a parameter
    /// repeats, the first occurrence wins.
    pub fn criteria(&self) -> Criteria {
        let mut search: Option<String> = None;
        let mut seen = [false; 3];
        let mut criteria = Criteria::default();

        for (key, value) in form_urlencoded::parse(self.query.as_bytes()) {
            if key == SEARCH_PARAM {
                if search.is_none() {
                    search = Some(value.trim().to_string());
                }
                continue;
            }
            for (i, kind) in FilterKind::ALL.into_iter().enumerate() {
                if key == kind.param() && !seen[i] {
                    seen[i] = true;
                    criteria.filters.set(kind, value == TRUE);
                }
            }
        }

        criteria.search = search.unwrap_or_default();
        criteria
    }

    /// Canonical location for `criteria` on this path.
    ///
    /// Parameters at their default value are omitted, and unrelated query
    /// parameters are dropped.
    pub fn with_criteria(&self, criteria: &Criteria) -> Location {
        let mut query = form_urlencoded::Serializer::new(String::new());
        let term = criteria.search_term();
        if !term.is_empty() {
            query.append_pair(SEARCH_PARAM, term);
        }
        for kind in FilterKind::ALL {
            if criteria.filters.get(kind) {
                query.append_pair(kind.param(), TRUE);
            }
        }

        Location {
            path: self.path.clone(),
            query: query.finish(),
            fragment: self.fragment.clone(),
        }
    }
}

impl FromStr for Location {
    type Err = LocationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !s.starts_with('/') {
            return Err(LocationError::Relative(s.to_string()));
        }
        Ok(Location::parse(s))
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)?;
        if !self.query.is_empty() {
            write!(f, "?{}", self.query)?;
        }
        if let Some(fragment) = &self.fragment {
            write!(f, "#{}", fragment)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::Filters;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_empty_query_gives_defaults() {
        assert_eq!(Location::parse("/catalog").criteria(), Criteria::default());
        assert_eq!(Location::parse("/catalog?").criteria(), Criteria::default());
    }

    #[test]
    fn test_parse_all_params() {
        let location = Location::parse("/catalog?search=%20red+hat%20&paid=true&viewOnly=true");
        assert_eq!(
            location.criteria(),
            Criteria {
                search: "red hat".into(),
                filters: Filters {
                    paid: true,
                    free: false,
                    view_only: true,
                },
            }
        );
    }

    #[test]
    fn test_only_literal_true_enables_toggle() {
        let criteria = Location::parse("/?paid=TRUE&free=1&viewOnly=yes").criteria();
        assert_eq!(criteria.filters, Filters::default());
    }

    #[test]
    fn test_first_duplicate_wins() {
        let criteria = Location::parse("/?search=a&search=b&free=true&free=false").criteria();
        assert_eq!(criteria.search, "a");
        assert!(criteria.filters.free);
    }

    #[test]
    fn test_canonical_omits_defaults() {
        let base = Location::parse("/catalog?utm=x");
        assert_eq!(base.with_criteria(&Criteria::default()).to_string(), "/catalog");

        let criteria = Criteria {
            search: "  ".into(),
            filters: Filters {
                free: true,
                ..Filters::default()
            },
        };
        assert_eq!(base.with_criteria(&criteria).to_string(), "/catalog?free=true");
    }

    #[test]
    fn test_canonical_param_order_and_encoding() {
        let criteria = Criteria {
            search: "café & co ".into(),
            filters: Filters {
                paid: true,
                free: true,
                view_only: true,
            },
        };
        let location = Location::default().with_criteria(&criteria);
        assert_eq!(
            location.to_string(),
            "/?search=caf%C3%A9+%26+co&paid=true&free=true&viewOnly=true"
        );
    }

    #[test]
    fn test_path_and_fragment_preserved() {
        let base = Location::parse("/shop/items#top");
        let criteria = Criteria {
            search: "hat".into(),
            ..Criteria::default()
        };
        let location = base.with_criteria(&criteria);
        assert_eq!(location.to_string(), "/shop/items?search=hat#top");
    }

    #[test]
    fn test_from_str_requires_absolute_path() {
        assert!("/catalog?paid=true".parse::<Location>().is_ok());
        assert_eq!(
            "catalog".parse::<Location>(),
            Err(LocationError::Relative("catalog".into()))
        );
    }

    fn criteria_strategy() -> impl Strategy<Value = Criteria> {
        (".{0,24}", any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
            |(search, paid, free, view_only)| Criteria {
                search,
                filters: Filters {
                    paid,
                    free,
                    view_only,
                },
            },
        )
    }

    proptest! {
        #[test]
        fn prop_round_trip_reproduces_criteria(criteria in criteria_strategy()) {
            let serialized = Location::parse("/catalog").with_criteria(&criteria).to_string();
            let restored = Location::parse(&serialized).criteria();
            prop_assert_eq!(restored, criteria.canonical());
        }

        #[test]
        fn prop_canonical_location_is_stable(criteria in criteria_strategy()) {
            let first = Location::default().with_criteria(&criteria);
            let second = Location::default().with_criteria(&first.criteria());
            prop_assert_eq!(first, second);
        }
    }
}
