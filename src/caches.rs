// Fixed cache configurations used by the services, one per entity kind.

use std::sync::Arc;

use crate::lfu_cache::FrequencyCache;
use crate::models::{Facility, Hotel, Room};

pub const ROOM_CACHE_CAPACITY: usize = 3;
pub const HOTEL_LIST_CACHE_CAPACITY: usize = 3;
pub const FACILITY_LIST_CACHE_CAPACITY: usize = 6;

// Single-entity cache keyed by room id.
pub type RoomCache = FrequencyCache<Room>;

// List-valued caches keyed by entity id or by filter combination; the whole
// list is one opaque value per key.
pub type HotelListCache = FrequencyCache<Vec<Hotel>>;
pub type FacilityListCache = FrequencyCache<Vec<Facility>>;

pub fn room_cache() -> Arc<RoomCache> {
    Arc::new(FrequencyCache::new(ROOM_CACHE_CAPACITY))
}

pub fn hotel_list_cache() -> Arc<HotelListCache> {
    Arc::new(FrequencyCache::new(HOTEL_LIST_CACHE_CAPACITY))
}

pub fn facility_list_cache() -> Arc<FacilityListCache> {
    Arc::new(FrequencyCache::new(FACILITY_LIST_CACHE_CAPACITY))
}

/// Composite key for filtered hotel queries. Absent filters are encoded with
/// the literal `"null"` so that every filter combination maps to one stable
/// key; the cache itself treats keys as opaque strings.
pub fn filter_key(city: Option<&str>, category: Option<&str>) -> String {
    format!("{}:{}", city.unwrap_or("null"), category.unwrap_or("null"))
}

/// Key for the cached facility list of one room.
pub fn room_facilities_key(room_id: &str) -> String {
    format!("room:{room_id}")
}

/// Key for the cached full facility listing.
pub const ALL_FACILITIES_KEY: &str = "all";

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(Some("Paris"), Some("Luxury"), "Paris:Luxury")]
    #[test_case(Some("Paris"), None, "Paris:null")]
    #[test_case(None, Some("Luxury"), "null:Luxury")]
    #[test_case(None, None, "null:null")]
    fn filter_key_is_stable_per_combination(
        city: Option<&str>,
        category: Option<&str>,
        expected: &str,
    ) {
        assert_eq!(filter_key(city, category), expected);
    }

    #[test]
    fn configured_capacities() {
        assert_eq!(room_cache().capacity(), 3);
        assert_eq!(hotel_list_cache().capacity(), 3);
        assert_eq!(facility_list_cache().capacity(), 6);
    }

    #[test]
    fn list_cache_treats_each_list_as_one_value() {
        let cache = hotel_list_cache();
        let hotels = |city: &str| {
            vec![Hotel {
                id: format!("{city}-1"),
                name: format!("{city} Hotel"),
                city: city.to_string(),
                category: "Standard".to_string(),
                available_from_date: chrono::NaiveDate::from_ymd_opt(2030, 1, 1).unwrap(),
            }]
        };

        cache.put(&filter_key(Some("Paris"), None), hotels("Paris"));
        cache.put(&filter_key(Some("Rome"), None), hotels("Rome"));
        cache.put(&filter_key(Some("Oslo"), None), hotels("Oslo"));

        // Keep the Paris list warm, then overflow.
        assert!(cache.get(&filter_key(Some("Paris"), None)).is_some());
        cache.put(&filter_key(Some("Kyiv"), None), hotels("Kyiv"));

        assert_eq!(cache.len(), 3);
        assert!(cache.contains(&filter_key(Some("Paris"), None)));
        assert!(!cache.contains(&filter_key(Some("Rome"), None)));
    }
}
