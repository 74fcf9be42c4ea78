use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

bitflags! {
    /// Access rights of an exposed feature, as reported by zigbee2mqtt
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Access: u8 {
        /// The device publishes the value in its state messages
        const PUBLISH = 1 << 0;
        /// The value can be written with `<device>/set`
        const SET     = 1 << 1;
        /// The value can be requested with `<device>/get`
        const GET     = 1 << 2;
    }
}

impl Access {
    #[must_use]
    pub const fn is_gettable(self) -> bool {
        self.contains(Self::GET)
    }

    #[must_use]
    pub const fn is_settable(self) -> bool {
        self.contains(Self::SET)
    }
}

/* z2m sends access as a plain integer bitmask, so keep unknown bits */
impl Serialize for Access {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.bits())
    }
}

impl<'de> Deserialize<'de> for Access {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Self::from_bits_retain(u8::deserialize(deserializer)?))
    }
}
