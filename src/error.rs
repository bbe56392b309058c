/// Error type for LTC6802 operations
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// The SPI transaction could not be performed
    BusUnavailable(E),
    /// Destination buffer is smaller than the requested register count
    OutOfBounds {
        /// Number of registers requested
        required: usize,
        /// Capacity of the caller supplied buffer
        available: usize,
    },
    /// Bounded polling gave up while the chip was still converting
    Timeout,
    /// Cell selection outside `1..=12`
    InvalidCell(u8),
}
