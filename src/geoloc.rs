/*
 *  geoloc.rs
 *
 *  RetroCast - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Location lookup: place-name geocoding with an IP fallback
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */
use serde::Deserialize;
use reqwest::Client;
use log::{debug, info};

use crate::weather::WeatherApiError;

const GEOCODE_URL: &str = "https://nominatim.openstreetmap.org/search";
const GEOIP_URL: &str = "https://ipapi.co/json/";

/// A resolved location and the address text shown on the board
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    pub lat: f64,
    pub lon: f64,
    pub address: String,
}

#[derive(Debug, Deserialize)]
struct GeocodeHit {
    lat: String,
    lon: String,
    display_name: String,
}

#[derive(Debug, Deserialize)]
struct GeoLocation {
    city: String,
    region_code: String,
    latitude: f64,
    longitude: f64,
}

/// First hit of a geocoding search body
pub fn parse_geocode(body: &str, query: &str) -> Result<Place, WeatherApiError> {
    let hits: Vec<GeocodeHit> = serde_json::from_str(body)?;
    let hit = hits
        .into_iter()
        .next()
        .ok_or_else(|| WeatherApiError::GeolocationError(format!("no match for {query:?}")))?;
    let coord = |s: &str| {
        s.parse::<f64>()
            .map_err(|_| WeatherApiError::GeolocationError(format!("bad coordinate {s:?}")))
    };
    Ok(Place {
        lat: coord(&hit.lat)?,
        lon: coord(&hit.lon)?,
        address: hit.display_name,
    })
}

/// Resolve a free-form location (zip, city, address) to coordinates.
pub async fn geocode(client: &Client, query: &str) -> Result<Place, WeatherApiError> {
    debug!("Geocoding {query:?}");
    let body = client
        .get(GEOCODE_URL)
        .query(&[("q", query), ("format", "jsonv2"), ("limit", "1")])
        .send()
        .await?
        .error_for_status()? // none 2xx raise
        .text()
        .await?;
    let place = parse_geocode(&body, query)?;
    info!("Geocoded {:?} to {}", query, place.address);
    Ok(place)
}

/// Where are we? IP-based lookup.
pub async fn fetch_location(client: &Client) -> Result<Place, WeatherApiError> {
    let geo = client
        .get(GEOIP_URL)
        .send()
        .await?
        .error_for_status()?
        .json::<GeoLocation>()
        .await?;
    info!("Geolocation successful: {} {}", geo.city, geo.region_code);
    Ok(Place {
        lat: geo.latitude,
        lon: geo.longitude,
        address: format!("{}, {}", geo.city, geo.region_code),
    })
}
