//! Wire-to-domain normalization.

use crate::domain::StationRecord;

use super::types::StationDto;

/// Normalize one raw station object.
///
/// Mostly a field-for-field move; the feed sometimes reports an empty string
/// where it means "no last communication", which collapses to `None`.
pub fn normalize(dto: StationDto) -> StationRecord {
    let last_communication_time = dto.last_communication_time.filter(|t| !t.is_empty());

    StationRecord {
        id: dto.id,
        station_name: dto.station_name,
        available_docks: dto.available_docks,
        total_docks: dto.total_docks,
        available_bikes: dto.available_bikes,
        latitude: dto.latitude,
        longitude: dto.longitude,
        status_key: dto.status_key,
        st_address_1: dto.st_address_1,
        st_address_2: dto.st_address_2,
        city: dto.city,
        postal_code: dto.postal_code,
        location: dto.location,
        altitude: dto.altitude,
        test_station: dto.test_station,
        land_mark: dto.land_mark,
        last_communication_time,
    }
}

/// Normalize a fetched station list, preserving feed order.
pub fn normalize_all(stations: Vec<StationDto>) -> Vec<StationRecord> {
    stations.into_iter().map(normalize).collect()
}
