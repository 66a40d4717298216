use std::str::FromStr;

use crate::catalog::EventCatalog;
use crate::event::Event;

#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("Unknown sort key: {0}")]
    UnknownSortKey(String),
}

/// The four sort modes the storefront offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    PriceAsc,
    PriceDesc,
    DateAsc,
    DateDesc,
}

impl FromStr for SortKey {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "price-asc" => Ok(SortKey::PriceAsc),
            "price-desc" => Ok(SortKey::PriceDesc),
            "date-asc" => Ok(SortKey::DateAsc),
            "date-desc" => Ok(SortKey::DateDesc),
            other => Err(QueryError::UnknownSortKey(other.to_string())),
        }
    }
}

/// A browse of the catalog: optional search text, optional sort mode.
///
/// Filtering is a case-insensitive substring match against title or location.
/// Sorting is stable, so events that compare equal keep their catalog order.
/// With no sort key the catalog order is returned as-is.
#[derive(Debug, Clone, Default)]
pub struct CatalogQuery {
    pub search: Option<String>,
    pub sort: Option<SortKey>,
}

impl CatalogQuery {
    pub fn run(&self, catalog: &EventCatalog) -> Vec<Event> {
        let mut results: Vec<Event> = match &self.search {
            Some(term) => {
                let needle = term.to_lowercase();
                catalog
                    .all()
                    .iter()
                    .filter(|event| {
                        event.title.to_lowercase().contains(&needle)
                            || event.location.to_lowercase().contains(&needle)
                    })
                    .cloned()
                    .collect()
            }
            None => catalog.all().to_vec(),
        };

        match self.sort {
            Some(SortKey::PriceAsc) => {
                results.sort_by(|a, b| a.price_cents.cmp(&b.price_cents))
            }
            Some(SortKey::PriceDesc) => {
                results.sort_by(|a, b| b.price_cents.cmp(&a.price_cents))
            }
            Some(SortKey::DateAsc) => results.sort_by(|a, b| a.date.cmp(&b.date)),
            Some(SortKey::DateDesc) => results.sort_by(|a, b| b.date.cmp(&a.date)),
            None => {}
        }

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn event(id: u32, title: &str, location: &str, price_cents: i64, date: &str) -> Event {
        Event {
            id,
            title: title.to_string(),
            date: date.parse::<NaiveDate>().unwrap(),
            location: location.to_string(),
            price_cents,
            thumbnail: format!("/images/{}.jpg", id),
            description: String::new(),
        }
    }

    fn catalog() -> EventCatalog {
        EventCatalog::new(vec![
            event(1, "Summer Jazz Festival", "Riverside Park", 45_00, "2026-07-18"),
            event(2, "Indie Rock Night", "The Fillmore", 35_00, "2026-06-05"),
            event(3, "Blues Brunch", "Jazz Quarter", 30_00, "2026-06-14"),
            event(4, "Film Night", "Griffith Park", 35_00, "2026-07-04"),
        ])
    }

    #[test]
    fn test_filter_matches_title_or_location_case_insensitively() {
        let results = CatalogQuery {
            search: Some("JaZz".to_string()),
            sort: None,
        }
        .run(&catalog());

        let ids: Vec<u32> = results.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_empty_search_matches_everything() {
        let results = CatalogQuery {
            search: Some(String::new()),
            sort: None,
        }
        .run(&catalog());
        assert_eq!(results.len(), 4);
    }

    #[test]
    fn test_no_sort_keeps_catalog_order() {
        let results = CatalogQuery::default().run(&catalog());
        let ids: Vec<u32> = results.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_price_ascending_is_non_decreasing() {
        let results = CatalogQuery {
            search: None,
            sort: Some(SortKey::PriceAsc),
        }
        .run(&catalog());

        let prices: Vec<i64> = results.iter().map(|e| e.price_cents).collect();
        assert!(prices.windows(2).all(|pair| pair[0] <= pair[1]));
        assert_eq!(prices, vec![30_00, 35_00, 35_00, 45_00]);
    }

    #[test]
    fn test_equal_prices_keep_catalog_order() {
        let results = CatalogQuery {
            search: None,
            sort: Some(SortKey::PriceAsc),
        }
        .run(&catalog());

        // Events 2 and 4 are both 3500; 2 comes first in the catalog
        let ids: Vec<u32> = results.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![3, 2, 4, 1]);
    }

    #[test]
    fn test_date_descending() {
        let results = CatalogQuery {
            search: None,
            sort: Some(SortKey::DateDesc),
        }
        .run(&catalog());

        let ids: Vec<u32> = results.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 4, 3, 2]);
    }

    #[test]
    fn test_filter_and_sort_compose() {
        let results = CatalogQuery {
            search: Some("night".to_string()),
            sort: Some(SortKey::DateAsc),
        }
        .run(&catalog());

        let ids: Vec<u32> = results.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![2, 4]);
    }

    #[test]
    fn test_sort_key_parses_wire_form() {
        assert_eq!("price-asc".parse::<SortKey>().unwrap(), SortKey::PriceAsc);
        assert_eq!("date-desc".parse::<SortKey>().unwrap(), SortKey::DateDesc);
        assert!("priciest-first".parse::<SortKey>().is_err());
    }
}
