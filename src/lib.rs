// Hotel booking service core: frequency-based side-caches in front of an
// in-memory backing store, plus the services that exercise them.

pub mod caches;
pub mod error;
pub mod facility_service;
pub mod hotel_service;
pub mod lfu_cache;
pub mod models;
pub mod repository;
pub mod room_service;
pub mod visit_counter;

// Re-export key types for convenience
pub use caches::{
    facility_list_cache, filter_key, hotel_list_cache, room_cache, FacilityListCache,
    HotelListCache, RoomCache,
};
pub use error::{Result, ServiceError};
pub use facility_service::FacilityService;
pub use hotel_service::HotelService;
pub use lfu_cache::{CacheStatsReport, FrequencyCache};
pub use models::{Facility, Hotel, NewFacility, NewHotel, NewRoom, Room};
pub use repository::{
    FacilityRepository, HotelRepository, InMemoryFacilityRepository, InMemoryHotelRepository,
    InMemoryRoomRepository, RoomRepository,
};
pub use room_service::RoomService;
pub use visit_counter::VisitCounter;
