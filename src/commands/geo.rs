//! Geospatial command factories.

use bytes::Bytes;

use crate::{
    encoding::ArgBuilder,
    error::{Error, Result},
    protocol::{Command, RequestType},
};

/// `{ longitude ∈ [-180, 180], latitude ∈ [-85.05112878, 85.05112878] }`.
/// Out-of-range coordinates are not revalidated here — they fail at the
/// server (§3 "Geospatial Point").
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub longitude: f64,
    pub latitude: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistanceUnit {
    Meters,
    Kilometers,
    Miles,
    Feet,
}

impl DistanceUnit {
    fn token(self) -> &'static str {
        match self {
            DistanceUnit::Meters => "m",
            DistanceUnit::Kilometers => "km",
            DistanceUnit::Miles => "mi",
            DistanceUnit::Feet => "ft",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeoExistCondition {
    OnlyIfAbsent,
    OnlyIfExists,
}

#[derive(Debug, Clone, Default)]
pub struct GeoAddOptions {
    pub exists: Option<GeoExistCondition>,
    pub changed: bool,
}

pub fn geoadd(
    key: Bytes,
    members: impl IntoIterator<Item = (GeoPoint, Bytes)>,
    options: GeoAddOptions,
) -> Command {
    let mut builder = ArgBuilder::new().push_bytes(key);
    match options.exists {
        Some(GeoExistCondition::OnlyIfAbsent) => builder = builder.push("NX"),
        Some(GeoExistCondition::OnlyIfExists) => builder = builder.push("XX"),
        None => {}
    }
    builder = builder.push_if(options.changed, "CH");
    for (point, member) in members {
        builder = builder
            .push_float(point.longitude)
            .push_float(point.latitude)
            .push_bytes(member);
    }
    Command::new(RequestType::GeoAdd, builder.build())
}

pub fn geopos(key: Bytes, members: impl IntoIterator<Item = Bytes>) -> Command {
    Command::new(RequestType::GeoPos, ArgBuilder::new().push_bytes(key).extend(members).build())
}

pub fn geodist(key: Bytes, member1: Bytes, member2: Bytes, unit: Option<DistanceUnit>) -> Command {
    let mut builder = ArgBuilder::new().push_bytes(key).push_bytes(member1).push_bytes(member2);
    if let Some(unit) = unit {
        builder = builder.push(unit.token());
    }
    Command::new(RequestType::GeoDist, builder.build())
}

#[derive(Debug, Clone)]
pub enum FromPosition {
    Member(Bytes),
    LonLat(GeoPoint),
}

#[derive(Debug, Clone, Copy)]
pub enum GeoShape {
    Radius(f64, DistanceUnit),
    Box(f64, f64, DistanceUnit),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Default)]
pub struct GeoSearchOptions {
    pub with_coord: bool,
    pub with_dist: bool,
    pub with_hash: bool,
    /// `COUNT n [ANY]`.
    pub count: Option<(i64, bool)>,
    pub order: Option<SortOrder>,
}

fn encode_search_core(
    mut builder: ArgBuilder,
    from: &FromPosition,
    shape: GeoShape,
) -> ArgBuilder {
    match from {
        FromPosition::Member(member) => builder = builder.push("FROMMEMBER").push_bytes(member.clone()),
        FromPosition::LonLat(point) => {
            builder = builder
                .push("FROMLONLAT")
                .push_float(point.longitude)
                .push_float(point.latitude)
        }
    }
    match shape {
        GeoShape::Radius(radius, unit) => {
            builder = builder.push("BYRADIUS").push_float(radius).push(unit.token())
        }
        GeoShape::Box(width, height, unit) => {
            builder = builder
                .push("BYBOX")
                .push_float(width)
                .push_float(height)
                .push(unit.token())
        }
    }
    builder
}

/// `GEOSEARCH key (FROMMEMBER m | FROMLONLAT lon lat) (BYRADIUS r unit | BYBOX w h unit)
/// [WITHCOORD] [WITHDIST] [WITHHASH] [COUNT n [ANY]] [ASC|DESC]`.
pub fn geosearch(
    key: Bytes,
    from: FromPosition,
    shape: GeoShape,
    options: GeoSearchOptions,
) -> Command {
    let mut builder = ArgBuilder::new().push_bytes(key);
    builder = encode_search_core(builder, &from, shape);
    builder = builder.push_if(options.with_coord, "WITHCOORD");
    builder = builder.push_if(options.with_dist, "WITHDIST");
    builder = builder.push_if(options.with_hash, "WITHHASH");
    if let Some((count, any)) = options.count {
        builder = builder.push("COUNT").push_int(count);
        builder = builder.push_if(any, "ANY");
    }
    match options.order {
        Some(SortOrder::Ascending) => builder = builder.push("ASC"),
        Some(SortOrder::Descending) => builder = builder.push("DESC"),
        None => {}
    }
    Command::new(RequestType::GeoSearch, builder.build())
}

/// `GEOSEARCHSTORE dest key ... [COUNT n [ANY]] [ASC|DESC] [STOREDIST]`.
///
/// `WITH*` flags are only valid for the non-store form; passing any of them
/// here is a [`crate::error::ErrorKind::ValidationError`], matching §4.1.
pub fn geosearchstore(
    destination: Bytes,
    key: Bytes,
    from: FromPosition,
    shape: GeoShape,
    options: GeoSearchOptions,
    store_dist: bool,
) -> Result<Command> {
    if options.with_coord || options.with_dist || options.with_hash {
        return Err(Error::validation(
            "GEOSEARCHSTORE does not support WITHCOORD/WITHDIST/WITHHASH",
        ));
    }
    let mut builder = ArgBuilder::new().push_bytes(destination).push_bytes(key);
    builder = encode_search_core(builder, &from, shape);
    if let Some((count, any)) = options.count {
        builder = builder.push("COUNT").push_int(count);
        builder = builder.push_if(any, "ANY");
    }
    match options.order {
        Some(SortOrder::Ascending) => builder = builder.push("ASC"),
        Some(SortOrder::Descending) => builder = builder.push("DESC"),
        None => {}
    }
    builder = builder.push_if(store_dist, "STOREDIST");
    Ok(Command::new(RequestType::GeoSearchStore, builder.build()))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn geosearchstore_rejects_with_flags() {
        let err = geosearchstore(
            Bytes::from_static(b"dest"),
            Bytes::from_static(b"geo"),
            FromPosition::Member(Bytes::from_static(b"m")),
            GeoShape::Radius(100.0, DistanceUnit::Meters),
            GeoSearchOptions {
                with_dist: true,
                ..Default::default()
            },
            true,
        )
        .unwrap_err();
        assert!(matches!(
            err.kind(),
            crate::error::ErrorKind::ValidationError { .. }
        ));
    }

    #[test]
    fn geosearch_encodes_fromlonlat_and_byradius() {
        let cmd = geosearch(
            Bytes::from_static(b"geo"),
            FromPosition::LonLat(GeoPoint {
                longitude: 15.0,
                latitude: 37.0,
            }),
            GeoShape::Radius(200.0, DistanceUnit::Kilometers),
            GeoSearchOptions::default(),
        );
        assert_eq!(
            cmd.args,
            vec![
                Bytes::from_static(b"geo"),
                Bytes::from_static(b"FROMLONLAT"),
                Bytes::from_static(b"15"),
                Bytes::from_static(b"37"),
                Bytes::from_static(b"BYRADIUS"),
                Bytes::from_static(b"200"),
                Bytes::from_static(b"km"),
            ]
        );
    }
}
