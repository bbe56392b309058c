//! Command bytes and conversion selections for the LTC6802-2.

/// Command codes understood by the LTC6802-2
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
#[repr(u8)]
pub enum Command {
    /// Write configuration register group (WRCFG)
    WriteConfig = 0x01,
    /// Read configuration register group (RDCFG)
    ReadConfig = 0x02,
    /// Read cell voltage register group (RDCV)
    ReadCellVoltages = 0x04,
    /// Read flag register group (RDFLG)
    ReadFlags = 0x06,
    /// Read temperature register group (RDTMP)
    ReadTemperatures = 0x08,

    /// Start cell voltage A/D conversion and poll status (STCVAD)
    StartCellConversion = 0x10,
    /// Start open-wire A/D conversion and poll status (STOWAD)
    StartOpenWireConversion = 0x20,
    /// Start temperature A/D conversion and poll status (STTMPAD)
    StartTemperatureConversion = 0x30,
    /// Poll A/D converter status (PLADC)
    PollAdc = 0x40,
    /// Poll interrupt status (PLINT)
    PollInterrupt = 0x50,
    /// Start cell voltage A/D conversion with discharge permitted (STCDC)
    StartCellConversionDischarge = 0x60,
    /// Start open-wire A/D conversion with discharge permitted (STOWDC)
    StartOpenWireConversionDischarge = 0x70,
}

impl From<Command> for u8 {
    fn from(command: Command) -> u8 {
        command as u8
    }
}

/// Channel selection for cell voltage and open-wire conversions
///
/// Occupies the low nibble of the start command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CellSelection {
    /// All cell voltage inputs
    All,
    /// A single cell, numbered `1..=12`
    ///
    /// Cells 11 and 12 are only converted when the CELL10 bit is cleared.
    Cell(u8),
    /// Self test 1; every cell reads `0x555`
    SelfTest1,
    /// Self test 2; every cell reads `0xAAA`
    SelfTest2,
}

impl CellSelection {
    /// Low nibble of the conversion command
    ///
    /// Only meaningful for cells `1..=12`; the driver rejects anything else
    /// before it reaches the bus.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::All => 0x00,
            Self::Cell(n) => n & 0x0F,
            Self::SelfTest1 => 0x0E,
            Self::SelfTest2 => 0x0F,
        }
    }
}

/// Channel selection for temperature conversions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum TemperatureSelection {
    /// All temperature inputs
    All = 0x00,
    /// External temperature input 1 only
    External1 = 0x01,
    /// External temperature input 2 only
    External2 = 0x02,
    /// Internal die temperature only
    Internal = 0x03,
    /// Self test 1; every channel reads `0x555`
    SelfTest1 = 0x0E,
    /// Self test 2; every channel reads `0xAAA`
    SelfTest2 = 0x0F,
}

impl From<TemperatureSelection> for u8 {
    fn from(selection: TemperatureSelection) -> u8 {
        selection as u8
    }
}

/// Combine a conversion command with its channel selection nibble
#[must_use]
pub(crate) const fn with_selection(command: Command, selection: u8) -> u8 {
    command as u8 | (selection & 0x0F)
}
