use regex::Regex;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::OnceLock;

/// City -> districts mapping as delivered by `GET /cities`.
///
/// Keys keep the order of the response body, so the city list shown to the
/// user matches the service's ordering. Loaded once and never mutated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationTaxonomy {
    entries: Vec<(String, Vec<String>)>,
}

impl LocationTaxonomy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cities(&self) -> Vec<String> {
        self.entries.iter().map(|(city, _)| city.clone()).collect()
    }

    pub fn districts(&self, city: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(name, _)| name == city)
            .map(|(_, districts)| districts.as_slice())
    }

    pub fn contains_city(&self, city: &str) -> bool {
        self.entries.iter().any(|(name, _)| name == city)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(city, districts)| (city.as_str(), districts.as_slice()))
    }

    // 重複的鍵：保留第一次出現的位置，值以最後一次為準
    fn insert(&mut self, city: String, districts: Vec<String>) {
        match self.entries.iter_mut().find(|(name, _)| *name == city) {
            Some(entry) => entry.1 = districts,
            None => self.entries.push((city, districts)),
        }
    }
}

impl<C, D> FromIterator<(C, Vec<D>)> for LocationTaxonomy
where
    C: Into<String>,
    D: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (C, Vec<D>)>>(iter: I) -> Self {
        let mut taxonomy = LocationTaxonomy::new();
        for (city, districts) in iter {
            taxonomy.insert(city.into(), districts.into_iter().map(Into::into).collect());
        }
        taxonomy
    }
}

impl Serialize for LocationTaxonomy {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (city, districts) in &self.entries {
            map.serialize_entry(city, districts)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for LocationTaxonomy {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TaxonomyVisitor;

        impl<'de> Visitor<'de> for TaxonomyVisitor {
            type Value = LocationTaxonomy;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object mapping city names to arrays of district names")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut taxonomy = LocationTaxonomy::new();
                while let Some((city, districts)) = access.next_entry::<String, Vec<String>>()? {
                    taxonomy.insert(city, districts);
                }
                Ok(taxonomy)
            }
        }

        deserializer.deserialize_map(TaxonomyVisitor)
    }
}

/// The three free-text numeric inputs of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Area,
    RoomCount,
    LivingRoomCount,
}

impl FormField {
    pub const ALL: [FormField; 3] = [FormField::Area, FormField::RoomCount, FormField::LivingRoomCount];

    pub fn label(&self) -> &'static str {
        match self {
            FormField::Area => "Metrekare (m²)",
            FormField::RoomCount => "Oda Sayısı",
            FormField::LivingRoomCount => "Salon Sayısı",
        }
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            FormField::Area => "100",
            FormField::RoomCount => "3",
            FormField::LivingRoomCount => "1",
        }
    }
}

/// Raw form input. Empty strings mean "not filled in".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub selected_city: String,
    pub selected_district: String,
    pub area: String,
    pub room_count: String,
    pub living_room_count: String,
}

impl FormState {
    pub fn set_field(&mut self, field: FormField, value: String) {
        match field {
            FormField::Area => self.area = value,
            FormField::RoomCount => self.room_count = value,
            FormField::LivingRoomCount => self.living_room_count = value,
        }
    }

    pub fn has_location(&self) -> bool {
        !self.selected_city.is_empty() && !self.selected_district.is_empty()
    }
}

/// Body of `POST /predict`.
///
/// Non-finite numbers serialize as JSON `null`, which is what the service
/// receives for inputs that do not parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestPayload {
    pub il: String,
    pub ilce: String,
    pub metrekare: f64,
    pub oda_sayisi: f64,
    pub salon_sayisi: f64,
}

impl RequestPayload {
    /// Returns `None` unless both city and district are selected.
    pub fn from_form(state: &FormState) -> Option<Self> {
        if !state.has_location() {
            return None;
        }

        Some(Self {
            il: state.selected_city.clone(),
            ilce: state.selected_district.clone(),
            metrekare: parse_float(&state.area),
            oda_sayisi: parse_float(&state.room_count),
            salon_sayisi: parse_float(&state.living_room_count),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub tahmin_fiyat: f64,
    pub konum: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum UiStatus {
    #[default]
    Idle,
    Loading,
    Success(PredictionResult),
    Error(String),
}

/// Why the last operation failed. Never changes the message the user sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Validation,
    Network,
    Timeout,
    Status(u16),
    Decode,
}

fn float_prefix() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[+-]?(?:Infinity|(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:[eE][+-]?[0-9]+)?)")
            .expect("float prefix pattern is valid")
    })
}

/// Lenient number parsing for form inputs: leading whitespace is skipped and
/// the longest numeric prefix wins (`"12abc"` -> 12). Anything else is NaN.
pub fn parse_float(input: &str) -> f64 {
    let trimmed = input.trim_start();
    let Some(m) = float_prefix().find(trimmed) else {
        return f64::NAN;
    };

    let literal = m.as_str();
    match literal.trim_start_matches(['+', '-']) {
        "Infinity" if literal.starts_with('-') => f64::NEG_INFINITY,
        "Infinity" => f64::INFINITY,
        _ => literal.parse().unwrap_or(f64::NAN),
    }
}
