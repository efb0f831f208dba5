use crate::error::TradeError;

pub const NON_POSITIVE_QUANTITY: &str = "Quantity must be positive.";
pub const UNPARSABLE_QUANTITY: &str = "Invalid quantity.";
pub const QUANTITY_TOO_LARGE: &str = "Quantity is too large.";

/// Parses user-entered share counts the same way for every front end.
pub fn parse_quantity(input: &str) -> Result<u64, TradeError> {
    let value: i64 = input
        .trim()
        .parse()
        .map_err(|_| TradeError::InvalidQuantity(UNPARSABLE_QUANTITY))?;

    if value <= 0 {
        return Err(TradeError::InvalidQuantity(NON_POSITIVE_QUANTITY));
    }

    Ok(value as u64)
}
