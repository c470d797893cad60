//! Process-wide reference tables.
//!
//! The datum and ellipsoid tables hold the subset of the receiver's
//! geodetic database this crate knows about; they are read-only data used to
//! validate and fill in datum configuration. Coordinate conversion between
//! datums is not provided.

/// A reference ellipsoid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipsoid {
    /// Index in the receiver's ellipsoid table.
    pub index: u8,
    pub name: &'static str,
    /// Semi-major axis in metres.
    pub semi_major_axis: f64,
    pub inverse_flattening: f64,
}

/// A geodetic datum: translation offsets against WGS 84 plus its ellipsoid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Datum {
    /// Index in the receiver's datum table.
    pub index: u16,
    pub name: &'static str,
    /// Translation offsets in metres.
    pub delta_x: i16,
    pub delta_y: i16,
    pub delta_z: i16,
    pub ellipsoid: &'static Ellipsoid,
    /// Region of use.
    pub region: &'static str,
}

pub static CLARKE_1880: Ellipsoid = Ellipsoid {
    index: 7,
    name: "Clarke 1880",
    semi_major_axis: 6_378_249.145,
    inverse_flattening: 293.465,
};

pub static WGS_84_ELLIPSOID: Ellipsoid = Ellipsoid {
    index: 23,
    name: "WGS 84",
    semi_major_axis: 6_378_137.0,
    inverse_flattening: 298.257_223_563,
};

/// Known ellipsoids, ordered by index.
pub static ELLIPSOIDS: [&Ellipsoid; 2] = [&CLARKE_1880, &WGS_84_ELLIPSOID];

/// Known datums, ordered by index.
pub static DATUMS: [Datum; 3] = [
    Datum {
        index: 0,
        name: "WGS-84",
        delta_x: 0,
        delta_y: 0,
        delta_z: 0,
        ellipsoid: &WGS_84_ELLIPSOID,
        region: "Global",
    },
    Datum {
        index: 19,
        name: "Arc 1950",
        delta_x: -134,
        delta_y: -105,
        delta_z: -295,
        ellipsoid: &CLARKE_1880,
        region: "Swaziland",
    },
    Datum {
        index: 42,
        name: "Cape",
        delta_x: -136,
        delta_y: -108,
        delta_z: -292,
        ellipsoid: &CLARKE_1880,
        region: "South Africa",
    },
];

/// Baud rates in receiver code order: the code of a rate is its position.
///
/// The serial-port configuration field carries the code, not the rate.
pub static BAUD_RATES: [u32; 6] = [4800, 9600, 19200, 38400, 57600, 115_200];

/// Look up an ellipsoid by index.
pub fn ellipsoid(index: u8) -> Option<&'static Ellipsoid> {
    ELLIPSOIDS.iter().copied().find(|e| e.index == index)
}

/// Look up a datum by index.
pub fn datum(index: u16) -> Option<&'static Datum> {
    DATUMS.iter().find(|d| d.index == index)
}

/// The rate in bps for a baud-rate code.
pub fn baud_rate(code: u8) -> Option<u32> {
    BAUD_RATES.get(code as usize).copied()
}

/// The baud-rate code for a rate in bps.
pub fn baud_rate_code(rate: u32) -> Option<u8> {
    BAUD_RATES
        .iter()
        .position(|&r| r == rate)
        .and_then(|pos| u8::try_from(pos).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn datum_lookup_links_ellipsoid() {
        let arc = datum(19).unwrap();
        assert_eq!(arc.name, "Arc 1950");
        assert_eq!(arc.ellipsoid.index, 7);
        assert_eq!(arc.ellipsoid.name, "Clarke 1880");
        assert!(datum(1).is_none());
    }

    #[test]
    fn ellipsoid_lookup() {
        assert_eq!(ellipsoid(23).unwrap().semi_major_axis, 6_378_137.0);
        assert!(ellipsoid(0).is_none());
    }

    #[test]
    fn every_datum_ellipsoid_is_in_table() {
        for d in &DATUMS {
            assert_eq!(ellipsoid(d.ellipsoid.index), Some(d.ellipsoid));
        }
    }

    #[test]
    fn baud_rate_code_mapping_is_bijective() {
        for (code, &rate) in BAUD_RATES.iter().enumerate() {
            assert_eq!(baud_rate(code as u8), Some(rate));
            assert_eq!(baud_rate_code(rate), Some(code as u8));
        }
        assert_eq!(baud_rate_code(57600), Some(4));
        assert_eq!(baud_rate_code(14400), None);
        assert_eq!(baud_rate(6), None);
    }
}
