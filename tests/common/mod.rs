#![allow(dead_code)]

use lightbnb_store::prelude::*;
use serde_json::json;

pub fn new_user(name: &str, email: &str) -> NewUser {
    NewUser {
        name: name.to_string(),
        email: email.to_string(),
        password: "$2a$10$FB/BOAVhpuLvpOREQVmvmezD4ED/.JBIDRh70tGevYzYzQgFId2u.".to_string(),
    }
}

pub fn listing(owner_id: i64, title: &str, city: &str, cost_per_night: i64) -> NewProperty {
    NewProperty {
        owner_id,
        title: title.to_string(),
        description: "description".to_string(),
        thumbnail_photo_url: "https://images.example/thumb.jpg".to_string(),
        cover_photo_url: "https://images.example/cover.jpg".to_string(),
        cost_per_night,
        street: "1 Main St".to_string(),
        city: city.to_string(),
        province: "British Columbia".to_string(),
        post_code: "V5K 0A1".to_string(),
        country: "Canada".to_string(),
        parking_spaces: 1,
        number_of_bathrooms: 1,
        number_of_bedrooms: 2,
    }
}

pub fn listing_json(owner_id: i64) -> serde_json::Value {
    json!({
        "owner_id": owner_id.to_string(),
        "title": "Form listing",
        "description": "posted from a form",
        "thumbnail_photo_url": "https://images.example/t.jpg",
        "cover_photo_url": "https://images.example/c.jpg",
        "cost_per_night": "12000",
        "street": "9 Side Rd",
        "city": "Calgary",
        "province": "Alberta",
        "post_code": "T2P 1J9",
        "country": "Canada",
        "parking_spaces": "0",
        "number_of_bathrooms": "1",
        "number_of_bedrooms": "1"
    })
}

/// One completed reservation by `guest_id` at `property_id` plus a review of it.
pub fn past_stay_with_review(
    guest_id: i64,
    property_id: i64,
    start: &str,
    end: &str,
    rating: i16,
) -> String {
    format!(
        "WITH r AS (
            INSERT INTO reservations (start_date, end_date, property_id, guest_id)
            VALUES ('{start}', '{end}', {property_id}, {guest_id})
            RETURNING id
         )
         INSERT INTO property_reviews (guest_id, property_id, reservation_id, rating, message)
         SELECT {guest_id}, {property_id}, r.id, {rating}, 'stayed' FROM r;"
    )
}
