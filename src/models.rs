// Domain entities shared by the repositories, services and caches.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hotel {
    pub id: String,
    pub name: String,
    pub city: String,
    pub category: String,
    pub available_from_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: String,
    pub room_number: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub price: f64,
    pub hotel_id: String,
    #[serde(default)]
    pub facilities: Vec<Facility>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facility {
    pub id: String,
    pub name: String,
}

// Input payloads for create/update operations. Ids are assigned by the
// repositories, so drafts carry none.

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewHotel {
    pub name: String,
    pub city: String,
    pub category: String,
    pub available_from_date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRoom {
    pub room_number: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub price: Option<f64>,
    pub hotel_id: String,
    #[serde(default)]
    pub facility_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFacility {
    pub name: String,
}
