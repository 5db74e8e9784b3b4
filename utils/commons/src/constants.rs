/// Domain prefix for deriving auction record addresses.
pub const AUCTION_DOMAIN: &[u8] = b"auction";

/// Domain prefix for deriving bid record addresses.
pub const BID_DOMAIN: &[u8] = b"bid";

/// Tag for the Custom Created event.
pub const CREATED_TAG: u8 = u8::MAX - 1;

/// Tag for the Custom Bid event.
pub const BID_TAG: u8 = u8::MAX - 2;

/// Tag for the Custom Resolved event.
pub const RESOLVED_TAG: u8 = u8::MAX - 3;

/// Tag for the Custom Refunded event.
pub const REFUNDED_TAG: u8 = u8::MAX - 4;

/// Tag for the Custom Cancelled event.
pub const CANCELLED_TAG: u8 = u8::MAX - 5;
