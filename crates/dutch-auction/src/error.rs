use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum AuctionError {
    InvalidTimeRange = 1,
    InvalidBounds = 2,
    UnsupportedCurve = 3,
    UnsupportedPricingFunction = 4,
    DivisionByZero = 5,
    ArithmeticOverflow = 6,
    InvalidAmount = 7,
    MalformedInteraction = 8,
}
