// Backing-store seams for the services, with in-memory implementations.
// The caches sit in front of these; the repositories stay authoritative.

use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use crate::models::{Facility, Hotel, Room};

#[async_trait]
pub trait HotelRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Option<Hotel>;
    async fn find_all(&self) -> Vec<Hotel>;
    async fn find_by_city(&self, city: &str) -> Vec<Hotel>;
    async fn find_by_category(&self, category: &str) -> Vec<Hotel>;
    async fn find_by_city_and_category(&self, city: &str, category: &str) -> Vec<Hotel>;
    async fn exists(&self, id: &str) -> bool;
    async fn save(&self, hotel: Hotel) -> Hotel;
    async fn delete(&self, id: &str) -> bool;
}

#[async_trait]
pub trait RoomRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Option<Room>;
    async fn find_by_hotel(&self, hotel_id: &str) -> Vec<Room>;
    /// Rooms offering a facility with the given name.
    async fn find_by_facility(&self, facility_name: &str) -> Vec<Room>;
    async fn exists(&self, id: &str) -> bool;
    async fn exists_by_room_number_and_hotel(&self, room_number: &str, hotel_id: &str) -> bool;
    async fn save(&self, room: Room) -> Room;
    async fn delete(&self, id: &str) -> bool;
}

#[async_trait]
pub trait FacilityRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Option<Facility>;
    async fn find_by_name(&self, name: &str) -> Option<Facility>;
    async fn find_all(&self) -> Vec<Facility>;
    async fn save(&self, facility: Facility) -> Facility;
    async fn delete(&self, id: &str) -> bool;
}

pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

// Listings are sorted by id so repeated queries return stable output.
fn sorted_by_id<T, F: Fn(&T) -> &str>(mut items: Vec<T>, id_of: F) -> Vec<T> {
    items.sort_by(|a, b| id_of(a).cmp(id_of(b)));
    items
}

#[derive(Default)]
pub struct InMemoryHotelRepository {
    hotels: DashMap<String, Hotel>,
}

impl InMemoryHotelRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HotelRepository for InMemoryHotelRepository {
    async fn find_by_id(&self, id: &str) -> Option<Hotel> {
        self.hotels.get(id).map(|hotel| hotel.value().clone())
    }

    async fn find_all(&self) -> Vec<Hotel> {
        let all = self.hotels.iter().map(|entry| entry.value().clone()).collect();
        sorted_by_id(all, |hotel: &Hotel| &hotel.id)
    }

    async fn find_by_city(&self, city: &str) -> Vec<Hotel> {
        let matched = self
            .hotels
            .iter()
            .filter(|entry| entry.city == city)
            .map(|entry| entry.value().clone())
            .collect();
        sorted_by_id(matched, |hotel: &Hotel| &hotel.id)
    }

    async fn find_by_category(&self, category: &str) -> Vec<Hotel> {
        let matched = self
            .hotels
            .iter()
            .filter(|entry| entry.category == category)
            .map(|entry| entry.value().clone())
            .collect();
        sorted_by_id(matched, |hotel: &Hotel| &hotel.id)
    }

    async fn find_by_city_and_category(&self, city: &str, category: &str) -> Vec<Hotel> {
        let matched = self
            .hotels
            .iter()
            .filter(|entry| entry.city == city && entry.category == category)
            .map(|entry| entry.value().clone())
            .collect();
        sorted_by_id(matched, |hotel: &Hotel| &hotel.id)
    }

    async fn exists(&self, id: &str) -> bool {
        self.hotels.contains_key(id)
    }

    async fn save(&self, hotel: Hotel) -> Hotel {
        self.hotels.insert(hotel.id.clone(), hotel.clone());
        hotel
    }

    async fn delete(&self, id: &str) -> bool {
        self.hotels.remove(id).is_some()
    }
}

#[derive(Default)]
pub struct InMemoryRoomRepository {
    rooms: DashMap<String, Room>,
}

impl InMemoryRoomRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn find_by_id(&self, id: &str) -> Option<Room> {
        self.rooms.get(id).map(|room| room.value().clone())
    }

    async fn find_by_hotel(&self, hotel_id: &str) -> Vec<Room> {
        let matched = self
            .rooms
            .iter()
            .filter(|entry| entry.hotel_id == hotel_id)
            .map(|entry| entry.value().clone())
            .collect();
        sorted_by_id(matched, |room: &Room| &room.id)
    }

    async fn find_by_facility(&self, facility_name: &str) -> Vec<Room> {
        let matched = self
            .rooms
            .iter()
            .filter(|entry| {
                entry
                    .facilities
                    .iter()
                    .any(|facility| facility.name == facility_name)
            })
            .map(|entry| entry.value().clone())
            .collect();
        sorted_by_id(matched, |room: &Room| &room.id)
    }

    async fn exists(&self, id: &str) -> bool {
        self.rooms.contains_key(id)
    }

    async fn exists_by_room_number_and_hotel(&self, room_number: &str, hotel_id: &str) -> bool {
        self.rooms
            .iter()
            .any(|entry| entry.room_number == room_number && entry.hotel_id == hotel_id)
    }

    async fn save(&self, room: Room) -> Room {
        self.rooms.insert(room.id.clone(), room.clone());
        room
    }

    async fn delete(&self, id: &str) -> bool {
        self.rooms.remove(id).is_some()
    }
}

#[derive(Default)]
pub struct InMemoryFacilityRepository {
    facilities: DashMap<String, Facility>,
}

impl InMemoryFacilityRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FacilityRepository for InMemoryFacilityRepository {
    async fn find_by_id(&self, id: &str) -> Option<Facility> {
        self.facilities.get(id).map(|facility| facility.value().clone())
    }

    async fn find_by_name(&self, name: &str) -> Option<Facility> {
        self.facilities
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.value().clone())
    }

    async fn find_all(&self) -> Vec<Facility> {
        let all = self.facilities.iter().map(|entry| entry.value().clone()).collect();
        sorted_by_id(all, |facility: &Facility| &facility.id)
    }

    async fn save(&self, facility: Facility) -> Facility {
        self.facilities.insert(facility.id.clone(), facility.clone());
        facility
    }

    async fn delete(&self, id: &str) -> bool {
        self.facilities.remove(id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn hotel(id: &str, city: &str, category: &str) -> Hotel {
        Hotel {
            id: id.to_string(),
            name: format!("Hotel {id}"),
            city: city.to_string(),
            category: category.to_string(),
            available_from_date: NaiveDate::from_ymd_opt(2030, 1, 1).unwrap(),
        }
    }

    #[tokio::test]
    async fn hotel_finders_filter_by_city_and_category() {
        let repo = InMemoryHotelRepository::new();
        repo.save(hotel("h1", "Paris", "Luxury")).await;
        repo.save(hotel("h2", "Paris", "Budget")).await;
        repo.save(hotel("h3", "Rome", "Luxury")).await;

        assert_eq!(repo.find_by_city("Paris").await.len(), 2);
        assert_eq!(repo.find_by_category("Luxury").await.len(), 2);

        let both = repo.find_by_city_and_category("Paris", "Luxury").await;
        assert_eq!(both.len(), 1);
        assert_eq!(both[0].id, "h1");

        let all = repo.find_all().await;
        assert_eq!(
            all.iter().map(|h| h.id.as_str()).collect::<Vec<_>>(),
            vec!["h1", "h2", "h3"]
        );
    }

    #[tokio::test]
    async fn room_uniqueness_is_scoped_to_the_hotel() {
        let repo = InMemoryRoomRepository::new();
        repo.save(Room {
            id: "r1".to_string(),
            room_number: "101".to_string(),
            kind: "Deluxe".to_string(),
            price: 120.0,
            hotel_id: "h1".to_string(),
            facilities: vec![],
        })
        .await;

        assert!(repo.exists_by_room_number_and_hotel("101", "h1").await);
        assert!(!repo.exists_by_room_number_and_hotel("101", "h2").await);
        assert!(!repo.exists_by_room_number_and_hotel("102", "h1").await);
    }

    #[tokio::test]
    async fn rooms_are_searchable_by_facility_name() {
        let repo = InMemoryRoomRepository::new();
        let wifi = Facility {
            id: "f1".to_string(),
            name: "WiFi".to_string(),
        };
        repo.save(Room {
            id: "r1".to_string(),
            room_number: "101".to_string(),
            kind: "Deluxe".to_string(),
            price: 120.0,
            hotel_id: "h1".to_string(),
            facilities: vec![wifi],
        })
        .await;

        assert_eq!(repo.find_by_facility("WiFi").await.len(), 1);
        assert!(repo.find_by_facility("Sauna").await.is_empty());
    }

    #[tokio::test]
    async fn delete_reports_whether_anything_was_removed() {
        let repo = InMemoryHotelRepository::new();
        repo.save(hotel("h1", "Paris", "Luxury")).await;

        assert!(repo.delete("h1").await);
        assert!(!repo.delete("h1").await);
        assert!(repo.find_by_id("h1").await.is_none());
    }
}
