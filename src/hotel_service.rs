// Hotel lookups and mutations with a list-valued LFU cache in front of the
// repository. Filtered listings are cached under composite filter keys,
// single hotels under their id as a one-element list.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::{debug, info};

use crate::caches::{filter_key, HotelListCache};
use crate::error::{require_non_blank, Result, ServiceError};
use crate::models::{Hotel, NewHotel};
use crate::repository::{generate_id, HotelRepository};
use crate::visit_counter::VisitCounter;

pub struct HotelService {
    repository: Arc<dyn HotelRepository>,
    cache: Arc<HotelListCache>,
    visits: Arc<VisitCounter>,
}

impl HotelService {
    pub fn new(
        repository: Arc<dyn HotelRepository>,
        cache: Arc<HotelListCache>,
        visits: Arc<VisitCounter>,
    ) -> Self {
        Self {
            repository,
            cache,
            visits,
        }
    }

    /// Filtered listing with read-through caching keyed by the filter
    /// combination. The cache can serve a stale list until the key is evicted
    /// or rewritten; the repository stays authoritative.
    pub async fn find_hotels(&self, city: Option<&str>, category: Option<&str>) -> Vec<Hotel> {
        self.visits.record("hotels.find");
        let key = filter_key(city, category);

        if let Some(hotels) = self.cache.get(&key) {
            return hotels;
        }

        let hotels = match (city, category) {
            (Some(city), Some(category)) => {
                self.repository
                    .find_by_city_and_category(city, category)
                    .await
            }
            (Some(city), None) => self.repository.find_by_city(city).await,
            (None, Some(category)) => self.repository.find_by_category(category).await,
            (None, None) => self.repository.find_all().await,
        };

        debug!(key = %key, hits = hotels.len(), "hotel listing fetched from store");
        self.cache.put(&key, hotels.clone());
        hotels
    }

    pub async fn find_hotel(&self, id: &str) -> Result<Hotel> {
        self.visits.record("hotels.get");
        require_non_blank(id, "hotel id")?;

        if let Some(hotels) = self.cache.get(id) {
            if let Some(hotel) = hotels.first() {
                return Ok(hotel.clone());
            }
        }

        self.repository
            .find_by_id(id)
            .await
            .ok_or_else(|| ServiceError::NotFound(format!("hotel with id {id} not found")))
    }

    pub async fn create_hotel(&self, new: NewHotel) -> Result<Hotel> {
        self.visits.record("hotels.create");
        require_non_blank(&new.name, "hotel name")?;
        let available_from_date = parse_available_from(&new.available_from_date)?;

        let hotel = Hotel {
            id: generate_id(),
            name: new.name,
            city: new.city,
            category: new.category,
            available_from_date,
        };
        let saved = self.repository.save(hotel).await;

        self.cache.put(&saved.id, vec![saved.clone()]);
        info!(id = %saved.id, name = %saved.name, "hotel created");
        Ok(saved)
    }

    pub async fn update_hotel(&self, id: &str, update: NewHotel) -> Result<Hotel> {
        self.visits.record("hotels.update");
        require_non_blank(id, "hotel id")?;
        require_non_blank(&update.name, "hotel name")?;
        require_non_blank(&update.city, "hotel city")?;
        require_non_blank(&update.category, "hotel category")?;
        let available_from_date = parse_available_from(&update.available_from_date)?;

        let mut hotel = self
            .repository
            .find_by_id(id)
            .await
            .ok_or_else(|| ServiceError::NotFound(format!("hotel with id {id} not found")))?;

        hotel.name = update.name;
        hotel.city = update.city;
        hotel.category = update.category;
        hotel.available_from_date = available_from_date;

        let saved = self.repository.save(hotel).await;
        self.cache.put(id, vec![saved.clone()]);
        info!(id, "hotel updated");
        Ok(saved)
    }

    pub async fn delete_hotel(&self, id: &str) -> Result<()> {
        self.visits.record("hotels.delete");
        require_non_blank(id, "hotel id")?;

        if !self.repository.exists(id).await {
            return Err(ServiceError::NotFound(format!(
                "hotel with id {id} not found"
            )));
        }

        self.repository.delete(id).await;
        self.cache.remove(id);
        info!(id, "hotel deleted");
        Ok(())
    }
}

fn parse_available_from(raw: &str) -> Result<NaiveDate> {
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        ServiceError::InvalidInput(format!(
            "available_from_date must be a yyyy-mm-dd date, got {raw:?}"
        ))
    })?;
    if date < Utc::now().date_naive() {
        return Err(ServiceError::InvalidInput(
            "available_from_date must be today or later".to_string(),
        ));
    }
    Ok(date)
}
