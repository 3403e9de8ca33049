//! Hard-coded option lists substituted when a fetch fails or comes back empty.
//!
//! Only a handful of tables exist: the country list, the states of India and
//! the cities of Goa. Every other level falls back to an empty list.

use serde::{Deserialize, Serialize};

/// What to show when a fetch fails or returns no options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackPolicy {
    /// Leave the dropdown empty.
    #[default]
    Disabled,
    /// Use the static table for the level if there is one.
    Static,
}

const FALLBACK_COUNTRY_COUNT: usize = 300;

const STATES_INDIA: &[&str] = &[
    "Andhra Pradesh",
    "Arunachal Pradesh",
    "Assam",
    "Bihar",
    "Chhattisgarh",
    "Goa",
    "Gujarat",
    "Haryana",
    "Himachal Pradesh",
    "Jharkhand",
    "Karnataka",
    "Kerala",
    "Madhya Pradesh",
    "Maharashtra",
    "Manipur",
    "Meghalaya",
    "Mizoram",
    "Nagaland",
    "Odisha",
    "Punjab",
    "Rajasthan",
    "Sikkim",
    "Tamil Nadu",
    "Telangana",
    "Tripura",
    "Uttar Pradesh",
    "Uttarakhand",
    "West Bengal",
    "Andaman and Nicobar Islands",
    "Chandigarh",
    "Dadra and Nagar Haveli",
    "Daman and Diu",
    "Delhi",
    "Jammu and Kashmir",
    "Ladakh",
    "Lakshadweep",
    "Puducherry",
];

const CITIES_GOA: &[&str] = &[
    "Panaji",
    "Margao",
    "Vasco da Gama",
    "Mapusa",
    "Ponda",
    "Canacona",
    "Bicholim",
    "Quepem",
    "Sanguem",
    "Curchorem",
    "Valpoi",
    "Cuncolim",
];

/// `India` followed by placeholder names up to 300 entries.
pub fn countries() -> Vec<String> {
    std::iter::once("India".to_string())
        .chain((1..FALLBACK_COUNTRY_COUNT).map(|i| format!("Country{}", i)))
        .collect()
}

pub fn states(country: &str) -> Vec<String> {
    match country {
        "India" => owned(STATES_INDIA),
        _ => Vec::new(),
    }
}

pub fn cities(country: &str, state: &str) -> Vec<String> {
    match (country, state) {
        ("India", "Goa") => owned(CITIES_GOA),
        _ => Vec::new(),
    }
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
