//! Fuzz-style property tests for the entity record codecs.
//!
//! Critical properties:
//! - Decoders never panic, whatever bytes the client left on disk
//! - A decoded record re-encodes to an equal record
//! - The additive checksum is invariant under decode/encode

use nubridge_codec::byte_checksum;
use nubridge_v3::{BaseRecord, PlanetRecord, ShipRecord, TargetRecord};
use proptest::prelude::*;

proptest! {
    /// Arbitrary bytes either decode or fail with an error; no panics.
    #[test]
    fn arbitrary_bytes_never_crash_the_decoders(
        bytes in prop::collection::vec(any::<u8>(), 0..200),
    ) {
        let _ = ShipRecord::decode(&bytes);
        let _ = PlanetRecord::decode(&bytes);
        let _ = BaseRecord::decode(&bytes);
        let _ = TargetRecord::decode(&bytes);
    }

    /// Decoded ship records survive an encode/decode cycle, and their
    /// checksum is stable under it.
    #[test]
    fn ship_records_survive_reencoding(
        bytes in prop::collection::vec(any::<u8>(), ShipRecord::SIZE),
    ) {
        let record = ShipRecord::decode(&bytes).unwrap();
        let encoded = record.encode();
        let again = ShipRecord::decode(&encoded).unwrap();
        prop_assert_eq!(&again, &record);
        prop_assert_eq!(byte_checksum(&again.encode()), byte_checksum(&encoded));
    }

    /// Same cycle for planet records, which mix widths and signed fields.
    #[test]
    fn planet_records_survive_reencoding(
        bytes in prop::collection::vec(any::<u8>(), PlanetRecord::SIZE),
    ) {
        let record = PlanetRecord::decode(&bytes).unwrap();
        let again = PlanetRecord::decode(&record.encode()).unwrap();
        prop_assert_eq!(again, record);
    }
}
