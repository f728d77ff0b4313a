// Facility management with a list-valued LFU cache over facility listings.
// The full listing lives under one key, per-room facility lists under
// composite `room:<id>` keys; mutations invalidate whatever could be stale.

use std::sync::Arc;

use tracing::{debug, info};

use crate::caches::{room_facilities_key, FacilityListCache, ALL_FACILITIES_KEY};
use crate::error::{require_non_blank, Result, ServiceError};
use crate::models::{Facility, NewFacility};
use crate::repository::{generate_id, FacilityRepository, RoomRepository};
use crate::visit_counter::VisitCounter;

pub struct FacilityService {
    facilities: Arc<dyn FacilityRepository>,
    rooms: Arc<dyn RoomRepository>,
    cache: Arc<FacilityListCache>,
    visits: Arc<VisitCounter>,
}

impl FacilityService {
    pub fn new(
        facilities: Arc<dyn FacilityRepository>,
        rooms: Arc<dyn RoomRepository>,
        cache: Arc<FacilityListCache>,
        visits: Arc<VisitCounter>,
    ) -> Self {
        Self {
            facilities,
            rooms,
            cache,
            visits,
        }
    }

    pub async fn create_facility(&self, new: NewFacility) -> Result<Facility> {
        self.visits.record("facilities.create");
        require_non_blank(&new.name, "facility name")?;

        if self.facilities.find_by_name(&new.name).await.is_some() {
            return Err(ServiceError::AlreadyExists(format!(
                "facility {} already exists",
                new.name
            )));
        }

        let facility = Facility {
            id: generate_id(),
            name: new.name,
        };
        let saved = self.facilities.save(facility).await;

        // Only the full listing can be stale: the new facility is not yet
        // attached to any room.
        self.cache.remove(ALL_FACILITIES_KEY);
        info!(id = %saved.id, name = %saved.name, "facility created");
        Ok(saved)
    }

    pub async fn find_facility(&self, id: &str) -> Result<Facility> {
        self.visits.record("facilities.get");
        require_non_blank(id, "facility id")?;

        self.facilities
            .find_by_id(id)
            .await
            .ok_or_else(|| ServiceError::NotFound(format!("facility with id {id} not found")))
    }

    pub async fn find_facilities(&self) -> Vec<Facility> {
        self.visits.record("facilities.find");

        if let Some(facilities) = self.cache.get(ALL_FACILITIES_KEY) {
            return facilities;
        }

        let facilities = self.facilities.find_all().await;
        debug!(count = facilities.len(), "facility listing fetched from store");
        self.cache.put(ALL_FACILITIES_KEY, facilities.clone());
        facilities
    }

    pub async fn facilities_for_room(&self, room_id: &str) -> Result<Vec<Facility>> {
        self.visits.record("facilities.by_room");
        require_non_blank(room_id, "room id")?;

        let key = room_facilities_key(room_id);
        if let Some(facilities) = self.cache.get(&key) {
            return Ok(facilities);
        }

        let room = self
            .rooms
            .find_by_id(room_id)
            .await
            .ok_or_else(|| ServiceError::NotFound(format!("room with id {room_id} not found")))?;

        self.cache.put(&key, room.facilities.clone());
        Ok(room.facilities)
    }

    pub async fn update_facility(&self, id: &str, update: NewFacility) -> Result<Facility> {
        self.visits.record("facilities.update");
        require_non_blank(id, "facility id")?;
        require_non_blank(&update.name, "facility name")?;

        let mut facility = self
            .facilities
            .find_by_id(id)
            .await
            .ok_or_else(|| ServiceError::NotFound(format!("facility with id {id} not found")))?;

        let previous_name = facility.name.clone();
        facility.name = update.name;
        let saved = self.facilities.save(facility).await;

        // Rooms hold their own copy of the facility record; propagate the
        // rename so both sides stay consistent.
        for mut room in self.rooms.find_by_facility(&previous_name).await {
            for attached in room.facilities.iter_mut().filter(|f| f.id == id) {
                attached.name = saved.name.clone();
            }
            self.rooms.save(room).await;
        }

        // A rename can stale the full listing and any per-room list holding
        // the facility; drop everything rather than track dependencies here.
        self.cache.clear();
        info!(id, "facility updated");
        Ok(saved)
    }

    pub async fn add_facility_to_room(&self, room_id: &str, facility_id: &str) -> Result<()> {
        self.visits.record("facilities.attach");
        require_non_blank(room_id, "room id")?;
        require_non_blank(facility_id, "facility id")?;

        let mut room = self
            .rooms
            .find_by_id(room_id)
            .await
            .ok_or_else(|| ServiceError::NotFound(format!("room with id {room_id} not found")))?;

        let facility = self.facilities.find_by_id(facility_id).await.ok_or_else(|| {
            ServiceError::NotFound(format!("facility with id {facility_id} not found"))
        })?;

        if room.facilities.iter().any(|f| f.id == facility_id) {
            return Err(ServiceError::AlreadyExists(format!(
                "facility {facility_id} is already attached to room {room_id}"
            )));
        }

        room.facilities.push(facility);
        self.rooms.save(room).await;

        self.cache.remove(&room_facilities_key(room_id));
        info!(room_id, facility_id, "facility attached to room");
        Ok(())
    }

    pub async fn remove_facility_from_room(&self, room_id: &str, facility_id: &str) -> Result<()> {
        self.visits.record("facilities.detach");
        require_non_blank(room_id, "room id")?;
        require_non_blank(facility_id, "facility id")?;

        let mut room = self
            .rooms
            .find_by_id(room_id)
            .await
            .ok_or_else(|| ServiceError::NotFound(format!("room with id {room_id} not found")))?;

        if !room.facilities.iter().any(|f| f.id == facility_id) {
            return Err(ServiceError::NotFound(format!(
                "facility {facility_id} is not attached to room {room_id}"
            )));
        }

        room.facilities.retain(|f| f.id != facility_id);
        self.rooms.save(room).await;

        self.cache.remove(&room_facilities_key(room_id));
        info!(room_id, facility_id, "facility detached from room");
        Ok(())
    }

    pub async fn delete_facility(&self, id: &str) -> Result<()> {
        self.visits.record("facilities.delete");
        require_non_blank(id, "facility id")?;

        let facility = self
            .facilities
            .find_by_id(id)
            .await
            .ok_or_else(|| ServiceError::NotFound(format!("facility with id {id} not found")))?;

        // Detach from every room still offering it before dropping the record.
        for mut room in self.rooms.find_by_facility(&facility.name).await {
            room.facilities.retain(|f| f.id != id);
            self.rooms.save(room).await;
        }

        self.facilities.delete(id).await;
        self.cache.clear();
        info!(id, "facility deleted");
        Ok(())
    }
}
