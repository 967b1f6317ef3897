//! Records returned by the store and the inputs used to create them.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::StoreError;
use crate::results::StoreRow;
use crate::types::{RowValues, fits_integer_column};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password: String,
}

impl TryFrom<&StoreRow> for User {
    type Error = StoreError;

    fn try_from(row: &StoreRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.int("id")?,
            name: row.text("name")?,
            email: row.text("email")?,
            password: row.text("password")?,
        })
    }
}

/// A user to be created. The password is stored exactly as given, so hash it first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl NewUser {
    pub const COLUMNS: [&'static str; 3] = ["name", "email", "password"];

    #[must_use]
    pub fn values(&self) -> [RowValues; 3] {
        [
            self.name.as_str().into(),
            self.email.as_str().into(),
            self.password.as_str().into(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub id: i64,
    pub owner_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub thumbnail_photo_url: String,
    pub cover_photo_url: String,
    pub cost_per_night: i64,
    pub parking_spaces: i64,
    pub number_of_bathrooms: i64,
    pub number_of_bedrooms: i64,
    pub country: String,
    pub street: String,
    pub city: String,
    pub province: String,
    pub post_code: String,
    pub active: bool,
}

impl TryFrom<&StoreRow> for Property {
    type Error = StoreError;

    fn try_from(row: &StoreRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.int("id")?,
            owner_id: row.int("owner_id")?,
            title: row.text("title")?,
            description: row.opt_text("description")?,
            thumbnail_photo_url: row.text("thumbnail_photo_url")?,
            cover_photo_url: row.text("cover_photo_url")?,
            cost_per_night: row.int("cost_per_night")?,
            parking_spaces: row.int("parking_spaces")?,
            number_of_bathrooms: row.int("number_of_bathrooms")?,
            number_of_bedrooms: row.int("number_of_bedrooms")?,
            country: row.text("country")?,
            street: row.text("street")?,
            city: row.text("city")?,
            province: row.text("province")?,
            post_code: row.text("post_code")?,
            active: row.boolean("active")?,
        })
    }
}

/// A listing to be created.
///
/// [`NewProperty::COLUMNS`] and [`NewProperty::values`] are fixed-size arrays of the same
/// length, so the column list and the bound values cannot disagree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewProperty {
    #[serde(deserialize_with = "lenient_i64")]
    pub owner_id: i64,
    pub title: String,
    pub description: String,
    pub thumbnail_photo_url: String,
    pub cover_photo_url: String,
    #[serde(deserialize_with = "lenient_i64")]
    pub cost_per_night: i64,
    pub street: String,
    pub city: String,
    pub province: String,
    pub post_code: String,
    pub country: String,
    #[serde(deserialize_with = "lenient_i64")]
    pub parking_spaces: i64,
    #[serde(deserialize_with = "lenient_i64")]
    pub number_of_bathrooms: i64,
    #[serde(deserialize_with = "lenient_i64")]
    pub number_of_bedrooms: i64,
}

impl NewProperty {
    pub const COLUMNS: [&'static str; 14] = [
        "owner_id",
        "title",
        "description",
        "thumbnail_photo_url",
        "cover_photo_url",
        "cost_per_night",
        "street",
        "city",
        "province",
        "post_code",
        "country",
        "parking_spaces",
        "number_of_bathrooms",
        "number_of_bedrooms",
    ];

    #[must_use]
    pub fn values(&self) -> [RowValues; 14] {
        [
            self.owner_id.into(),
            self.title.as_str().into(),
            self.description.as_str().into(),
            self.thumbnail_photo_url.as_str().into(),
            self.cover_photo_url.as_str().into(),
            self.cost_per_night.into(),
            self.street.as_str().into(),
            self.city.as_str().into(),
            self.province.as_str().into(),
            self.post_code.as_str().into(),
            self.country.as_str().into(),
            self.parking_spaces.into(),
            self.number_of_bathrooms.into(),
            self.number_of_bedrooms.into(),
        ]
    }

    /// Reject integer fields that do not fit their `INTEGER` columns.
    ///
    /// # Errors
    /// Returns `StoreError::MalformedInput` naming the first offending field.
    pub fn check_ranges(&self) -> Result<(), StoreError> {
        for (column, value) in [
            ("owner_id", self.owner_id),
            ("cost_per_night", self.cost_per_night),
            ("parking_spaces", self.parking_spaces),
            ("number_of_bathrooms", self.number_of_bathrooms),
            ("number_of_bedrooms", self.number_of_bedrooms),
        ] {
            if !fits_integer_column(value) {
                return Err(StoreError::MalformedInput(format!(
                    "{column} is out of range for an integer column, got {value}"
                )));
            }
        }
        Ok(())
    }

    /// Parse a listing from an untyped object, such as a submitted form body.
    ///
    /// The object must carry exactly the fourteen listing fields; integer fields may be
    /// JSON numbers or numeric strings.
    ///
    /// # Errors
    /// Returns `StoreError::MalformedInput` for a non-object, a missing or unknown field,
    /// or a field of the wrong type.
    pub fn from_json(value: serde_json::Value) -> Result<Self, StoreError> {
        let Some(object) = value.as_object() else {
            return Err(StoreError::MalformedInput(
                "property must be a JSON object".to_string(),
            ));
        };
        if object.len() != Self::COLUMNS.len() {
            return Err(StoreError::MalformedInput(format!(
                "property has {} fields, expected {}",
                object.len(),
                Self::COLUMNS.len()
            )));
        }
        serde_json::from_value(value)
            .map_err(|e| StoreError::MalformedInput(format!("invalid property: {e}")))
    }
}

fn lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrText {
        Number(i64),
        Text(String),
    }

    match NumberOrText::deserialize(deserializer)? {
        NumberOrText::Number(n) => Ok(n),
        NumberOrText::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("expected an integer, got '{s}'"))),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: i64,
    pub guest_id: i64,
    pub property_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl Reservation {
    /// Map a reservation out of a joined row where its id was aliased to `id_column`.
    ///
    /// # Errors
    /// Returns `StoreError::RowMapping` if a column is missing or mistyped.
    pub fn from_joined_row(row: &StoreRow, id_column: &str) -> Result<Self, StoreError> {
        Ok(Self {
            id: row.int(id_column)?,
            guest_id: row.int("guest_id")?,
            property_id: row.int("property_id")?,
            start_date: row.date("start_date")?,
            end_date: row.date("end_date")?,
        })
    }
}

impl TryFrom<&StoreRow> for Reservation {
    type Error = StoreError;

    fn try_from(row: &StoreRow) -> Result<Self, Self::Error> {
        Self::from_joined_row(row, "id")
    }
}

/// A search result: the listing plus the mean of its review ratings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyWithRating {
    #[serde(flatten)]
    pub property: Property,
    pub average_rating: Option<f64>,
}

impl TryFrom<&StoreRow> for PropertyWithRating {
    type Error = StoreError;

    fn try_from(row: &StoreRow) -> Result<Self, Self::Error> {
        Ok(Self {
            property: Property::try_from(row)?,
            average_rating: row.opt_float("average_rating")?,
        })
    }
}

/// A completed stay: the reservation, the listing it was for, and that listing's rating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservationWithProperty {
    pub reservation: Reservation,
    pub property: Property,
    pub average_rating: Option<f64>,
}
