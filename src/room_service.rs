// Room lookups and mutations with a single-entity LFU cache keyed by room id.

use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, info};

use crate::caches::RoomCache;
use crate::error::{require_non_blank, Result, ServiceError};
use crate::models::{Facility, NewRoom, Room};
use crate::repository::{generate_id, FacilityRepository, RoomRepository};
use crate::visit_counter::VisitCounter;

const MIN_PRICE: f64 = 0.1;

pub struct RoomService {
    rooms: Arc<dyn RoomRepository>,
    facilities: Arc<dyn FacilityRepository>,
    cache: Arc<RoomCache>,
    visits: Arc<VisitCounter>,
}

impl RoomService {
    pub fn new(
        rooms: Arc<dyn RoomRepository>,
        facilities: Arc<dyn FacilityRepository>,
        cache: Arc<RoomCache>,
        visits: Arc<VisitCounter>,
    ) -> Self {
        Self {
            rooms,
            facilities,
            cache,
            visits,
        }
    }

    pub async fn find_rooms_by_hotel(&self, hotel_id: &str) -> Result<Vec<Room>> {
        self.visits.record("rooms.by_hotel");
        require_non_blank(hotel_id, "hotel id")?;

        let rooms = self.rooms.find_by_hotel(hotel_id).await;
        if rooms.is_empty() {
            return Err(ServiceError::NotFound(format!(
                "no rooms found for hotel with id {hotel_id}"
            )));
        }
        Ok(rooms)
    }

    pub async fn find_rooms_by_facility(&self, facility_name: &str) -> Result<Vec<Room>> {
        self.visits.record("rooms.by_facility");
        require_non_blank(facility_name, "facility name")?;

        let rooms = self.rooms.find_by_facility(facility_name).await;
        if rooms.is_empty() {
            return Err(ServiceError::NotFound(format!(
                "no rooms found with facility {facility_name}"
            )));
        }
        Ok(rooms)
    }

    pub async fn find_room(&self, id: &str) -> Result<Room> {
        self.visits.record("rooms.get");
        require_non_blank(id, "room id")?;

        if let Some(room) = self.cache.get(id) {
            return Ok(room);
        }

        self.rooms
            .find_by_id(id)
            .await
            .ok_or_else(|| ServiceError::NotFound(format!("room with id {id} not found")))
    }

    pub async fn create_room(&self, new: NewRoom) -> Result<Room> {
        self.visits.record("rooms.create");
        require_non_blank(&new.hotel_id, "hotel id")?;
        require_non_blank(&new.room_number, "room number")?;
        require_non_blank(&new.kind, "room type")?;
        let price = validate_price(new.price)?;

        if self
            .rooms
            .exists_by_room_number_and_hotel(&new.room_number, &new.hotel_id)
            .await
        {
            return Err(ServiceError::AlreadyExists(format!(
                "room {} already exists in hotel {}",
                new.room_number, new.hotel_id
            )));
        }

        let facilities = self.resolve_facilities(&new.facility_ids).await;
        let room = Room {
            id: generate_id(),
            room_number: new.room_number,
            kind: new.kind,
            price,
            hotel_id: new.hotel_id,
            facilities,
        };
        let saved = self.rooms.save(room).await;

        self.cache.put(&saved.id, saved.clone());
        info!(id = %saved.id, room_number = %saved.room_number, "room created");
        Ok(saved)
    }

    pub async fn update_room(&self, id: &str, update: NewRoom) -> Result<Room> {
        self.visits.record("rooms.update");
        require_non_blank(id, "room id")?;
        require_non_blank(&update.room_number, "room number")?;
        let price = validate_price(update.price)?;

        let mut room = self
            .rooms
            .find_by_id(id)
            .await
            .ok_or_else(|| ServiceError::NotFound(format!("room with id {id} not found")))?;

        room.room_number = update.room_number;
        room.kind = update.kind;
        room.price = price;
        if !update.facility_ids.is_empty() {
            room.facilities = self.resolve_facilities(&update.facility_ids).await;
        }

        let saved = self.rooms.save(room).await;
        self.cache.put(id, saved.clone());
        info!(id, "room updated");
        Ok(saved)
    }

    pub async fn delete_room(&self, id: &str) -> Result<()> {
        self.visits.record("rooms.delete");
        require_non_blank(id, "room id")?;

        if !self.rooms.exists(id).await {
            return Err(ServiceError::NotFound(format!(
                "room with id {id} not found"
            )));
        }

        self.rooms.delete(id).await;
        self.cache.remove(id);
        info!(id, "room deleted");
        Ok(())
    }

    // Unknown ids are skipped rather than rejected, matching the batch-lookup
    // behavior of the backing store.
    async fn resolve_facilities(&self, ids: &[String]) -> Vec<Facility> {
        let lookups = ids.iter().map(|id| self.facilities.find_by_id(id));
        let resolved: Vec<Facility> = join_all(lookups).await.into_iter().flatten().collect();
        if resolved.len() < ids.len() {
            debug!(
                requested = ids.len(),
                resolved = resolved.len(),
                "some facility ids did not resolve"
            );
        }
        resolved
    }
}

fn validate_price(price: Option<f64>) -> Result<f64> {
    let price = price.ok_or_else(|| ServiceError::InvalidInput("room price is required".into()))?;
    if price < MIN_PRICE {
        return Err(ServiceError::InvalidInput(
            "room price must be greater than zero".to_string(),
        ));
    }
    Ok(price)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::caches::room_cache;
    use crate::repository::{InMemoryFacilityRepository, InMemoryRoomRepository};
    use test_case::test_case;

    struct Fixture {
        service: RoomService,
        rooms: Arc<dyn RoomRepository>,
        facilities: Arc<dyn FacilityRepository>,
        cache: Arc<RoomCache>,
    }

    fn fixture() -> Fixture {
        let rooms: Arc<dyn RoomRepository> = Arc::new(InMemoryRoomRepository::new());
        let facilities: Arc<dyn FacilityRepository> = Arc::new(InMemoryFacilityRepository::new());
        let cache = room_cache();
        let service = RoomService::new(
            Arc::clone(&rooms),
            Arc::clone(&facilities),
            Arc::clone(&cache),
            Arc::new(VisitCounter::new()),
        );
        Fixture {
            service,
            rooms,
            facilities,
            cache,
        }
    }

    fn draft(room_number: &str, hotel_id: &str) -> NewRoom {
        NewRoom {
            room_number: room_number.to_string(),
            kind: "Deluxe".to_string(),
            price: Some(120.0),
            hotel_id: hotel_id.to_string(),
            facility_ids: vec![],
        }
    }

    #[tokio::test]
    async fn create_writes_through_and_find_reads_from_cache() {
        let fx = fixture();
        let created = fx.service.create_room(draft("101", "h1")).await.unwrap();
        assert!(fx.cache.contains(&created.id));

        // Remove behind the cache's back; the cached room still answers.
        fx.rooms.delete(&created.id).await;
        let found = fx.service.find_room(&created.id).await.unwrap();
        assert_eq!(found, created);
    }

    #[tokio::test]
    async fn duplicate_room_number_in_a_hotel_is_rejected() {
        let fx = fixture();
        fx.service.create_room(draft("101", "h1")).await.unwrap();

        let err = fx.service.create_room(draft("101", "h1")).await.unwrap_err();
        assert!(matches!(err, ServiceError::AlreadyExists(_)));

        // The same number in another hotel is fine.
        assert!(fx.service.create_room(draft("101", "h2")).await.is_ok());
    }

    #[test_case(None ; "missing price")]
    #[test_case(Some(0.0) ; "zero price")]
    #[test_case(Some(0.05) ; "below minimum")]
    #[tokio::test]
    async fn invalid_prices_are_rejected(price: Option<f64>) {
        let fx = fixture();
        let mut new = draft("101", "h1");
        new.price = price;
        let err = fx.service.create_room(new).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn create_resolves_known_facilities_and_skips_unknown_ids() {
        let fx = fixture();
        let wifi = fx
            .facilities
            .save(Facility {
                id: generate_id(),
                name: "WiFi".to_string(),
            })
            .await;

        let mut new = draft("101", "h1");
        new.facility_ids = vec![wifi.id.clone(), "missing".to_string()];
        let created = fx.service.create_room(new).await.unwrap();

        assert_eq!(created.facilities, vec![wifi]);
    }

    #[tokio::test]
    async fn update_relinks_facilities_and_refreshes_the_cache() {
        let fx = fixture();
        let created = fx.service.create_room(draft("101", "h1")).await.unwrap();
        let sauna = fx
            .facilities
            .save(Facility {
                id: generate_id(),
                name: "Sauna".to_string(),
            })
            .await;

        let mut update = draft("102", "h1");
        update.price = Some(200.0);
        update.facility_ids = vec![sauna.id.clone()];
        let updated = fx.service.update_room(&created.id, update).await.unwrap();

        assert_eq!(updated.room_number, "102");
        assert_eq!(updated.facilities, vec![sauna]);

        let cached = fx.cache.get(&created.id).unwrap();
        assert_eq!(cached.price, 200.0);
    }

    #[tokio::test]
    async fn lookups_by_hotel_and_facility_error_when_nothing_matches() {
        let fx = fixture();
        assert!(matches!(
            fx.service.find_rooms_by_hotel("h1").await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(
            fx.service.find_rooms_by_facility("WiFi").await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(
            fx.service.find_rooms_by_hotel(" ").await,
            Err(ServiceError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn delete_removes_the_cached_room() {
        let fx = fixture();
        let created = fx.service.create_room(draft("101", "h1")).await.unwrap();

        fx.service.delete_room(&created.id).await.unwrap();
        assert!(!fx.cache.contains(&created.id));
        assert!(matches!(
            fx.service.find_room(&created.id).await,
            Err(ServiceError::NotFound(_))
        ));
    }
}
