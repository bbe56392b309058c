//! Register group images for the LTC6802-2.
//!
//! Each group is stored exactly as it travels on the wire, byte 0 first.
//! Bits are numbered from the least significant bit of byte 0, so bit 8 is
//! bit 0 of byte 1 and 12-bit results packed with nibble interleaving are
//! plain consecutive bit ranges.

use crate::utils;

/// Width of the configuration register group in bytes
pub const CONFIG_GROUP_LEN: usize = 6;
/// Width of the temperature register group in bytes
pub const TEMPERATURE_GROUP_LEN: usize = 5;
/// Width of the cell voltage register group in bytes
pub const CELL_VOLTAGE_GROUP_LEN: usize = 18;
/// Width of the flag register group in bytes
pub const FLAG_GROUP_LEN: usize = 3;
/// Number of cells monitored by one chip
pub const MAX_CELLS: usize = 12;
/// Number of external temperature inputs
pub const EXTERNAL_TEMPERATURES: usize = 2;

/// Configuration image held by the driver
pub type Configuration = ConfigurationRegisterGroup<[u8; CONFIG_GROUP_LEN]>;
/// Temperature image held by the driver
pub type Temperatures = TemperatureRegisterGroup<[u8; TEMPERATURE_GROUP_LEN]>;
/// Cell voltage image held by the driver
pub type CellVoltages = CellVoltageRegisterGroup<[u8; CELL_VOLTAGE_GROUP_LEN]>;
/// Flag image held by the driver
pub type Flags = FlagRegisterGroup<[u8; FLAG_GROUP_LEN]>;

bitfield::bitfield! {
    /// CFGR0..CFGR5
    ///
    /// Setters only touch the bits of their own field.
    #[derive(Clone, Copy, PartialEq, Eq)]
    pub struct ConfigurationRegisterGroup([u8]);
    impl Debug;
    u8;
    /// Whole CFGR0 byte
    pub cfgr0, _: 7, 0;
    /// Watchdog timer: state of the WDTB pin (read only)
    pub wdt, _: 7;
    /// GPIO2 pin control
    ///
    /// - `0` = pull down on
    /// - `1` = pull down off (default)
    pub gpio2, set_gpio2: 6;
    /// GPIO1 pin control
    ///
    /// - `0` = pull down on
    /// - `1` = pull down off (default)
    pub gpio1, set_gpio1: 5;
    /// Level polling mode
    ///
    /// - `0` = toggle polling (default)
    /// - `1` = level polling
    pub lvlpl, set_lvlpl: 4;
    /// 10-cell mode
    ///
    /// - `0` = 12-cell mode (default)
    /// - `1` = 10-cell mode
    pub cell10, set_cell10: 3;
    /// Comparator duty cycle, see [`ComparatorDutyCycle`]
    pub cdc, set_cdc: 2, 0;
    /// Discharge cell switches, bit `n` controls cell `n + 1`
    pub u16, dcc, set_dcc: 19, 8;
    /// Mask cell interrupts, bit `n` masks cell `n + 1`
    pub u16, mci, set_mci: 31, 20;
    /// Undervoltage comparison voltage, raw register units
    pub vuv, set_vuv: 39, 32;
    /// Overvoltage comparison voltage, raw register units
    pub vov, set_vov: 47, 40;
}

impl Default for Configuration {
    fn default() -> Self {
        Self([0; CONFIG_GROUP_LEN])
    }
}

impl<T: AsRef<[u8]>> ConfigurationRegisterGroup<T> {
    /// Comparator duty cycle as a typed value
    #[must_use]
    pub fn comparator_duty_cycle(&self) -> ComparatorDutyCycle {
        ComparatorDutyCycle::from_bits(self.cdc())
    }

    /// Undervoltage comparison voltage (`VUV * 16 / 1.5`)
    #[must_use]
    pub fn undervoltage_threshold(&self) -> u16 {
        utils::threshold_from_raw(self.vuv())
    }

    /// Overvoltage comparison voltage (`VOV * 16 / 1.5`)
    #[must_use]
    pub fn overvoltage_threshold(&self) -> u16 {
        utils::threshold_from_raw(self.vov())
    }
}

impl<T: AsRef<[u8]> + AsMut<[u8]>> ConfigurationRegisterGroup<T> {
    /// Set the comparator duty cycle
    pub fn set_comparator_duty_cycle(&mut self, cdc: ComparatorDutyCycle) {
        self.set_cdc(cdc.into());
    }

    /// Set the undervoltage comparison voltage (`voltage * 1.5 / 16`)
    pub fn set_undervoltage_threshold(&mut self, voltage: u16) {
        self.set_vuv(utils::threshold_to_raw(voltage));
    }

    /// Set the overvoltage comparison voltage (`voltage * 1.5 / 16`)
    pub fn set_overvoltage_threshold(&mut self, voltage: u16) {
        self.set_vov(utils::threshold_to_raw(voltage));
    }
}

/// Comparator duty cycle (CDC field of CFGR0)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ComparatorDutyCycle {
    /// Standby mode
    Standby = 0,
    /// Measure mode, comparator off
    ComparatorOff = 1,
    /// Comparator every 13 ms
    Period13ms = 2,
    /// Comparator every 130 ms
    Period130ms = 3,
    /// Comparator every 500 ms
    Period500ms = 4,
    /// Comparator every 130 ms with power down
    Period130msPowerDown = 5,
    /// Comparator every 500 ms with power down
    Period500msPowerDown = 6,
    /// Comparator every 2000 ms with power down
    Period2000msPowerDown = 7,
}

impl ComparatorDutyCycle {
    /// Decode the low three bits of `bits`
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0x07 {
            0 => Self::Standby,
            1 => Self::ComparatorOff,
            2 => Self::Period13ms,
            3 => Self::Period130ms,
            4 => Self::Period500ms,
            5 => Self::Period130msPowerDown,
            6 => Self::Period500msPowerDown,
            _ => Self::Period2000msPowerDown,
        }
    }
}

impl From<ComparatorDutyCycle> for u8 {
    fn from(cdc: ComparatorDutyCycle) -> u8 {
        cdc as u8
    }
}

bitfield::bitfield! {
    /// TMPR0..TMPR4
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct TemperatureRegisterGroup([u8]);
    u8;
    u16, etmp, _: 11, 0, 2;
    /// Internal die temperature, raw 12-bit result
    pub u16, itmp, _: 35, 24;
    /// Thermal shutdown has occurred
    pub thsd, _: 36;
    /// Chip revision code
    pub rev, _: 39, 37;
}

impl Default for Temperatures {
    fn default() -> Self {
        Self([0; TEMPERATURE_GROUP_LEN])
    }
}

impl<T: AsRef<[u8]>> TemperatureRegisterGroup<T> {
    /// Internal die temperature in whole degrees Celsius
    #[must_use]
    pub fn internal_celsius(&self) -> i16 {
        utils::internal_celsius(self.itmp())
    }

    /// Raw 12-bit result of external temperature input `index` (0 or 1)
    #[must_use]
    pub fn external_raw(&self, index: usize) -> Option<u16> {
        (index < EXTERNAL_TEMPERATURES).then(|| self.etmp(index))
    }

    /// Voltage at external temperature input `index` (0 or 1)
    #[must_use]
    pub fn external_volts(&self, index: usize) -> Option<f32> {
        self.external_raw(index).map(utils::adc_to_volts)
    }
}

bitfield::bitfield! {
    /// CVR00..CVR17
    ///
    /// Twelve 12-bit results; every byte triplet carries two cells.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CellVoltageRegisterGroup([u8]);
    u16;
    cv, _: 11, 0, 12;
}

impl Default for CellVoltages {
    fn default() -> Self {
        Self([0; CELL_VOLTAGE_GROUP_LEN])
    }
}

impl<T: AsRef<[u8]>> CellVoltageRegisterGroup<T> {
    /// Raw 12-bit result for the cell at `index` (`0..12`)
    #[must_use]
    pub fn raw(&self, index: usize) -> Option<u16> {
        (index < MAX_CELLS).then(|| self.cv(index))
    }

    /// Voltage of the cell at `index` (`0..12`)
    #[must_use]
    pub fn volts(&self, index: usize) -> Option<f32> {
        self.raw(index).map(utils::adc_to_volts)
    }

    /// Raw results for all cells
    #[must_use]
    pub fn raw_all(&self) -> [u16; MAX_CELLS] {
        core::array::from_fn(|index| self.cv(index))
    }

    /// Voltages of all cells
    #[must_use]
    pub fn volts_all(&self) -> [f32; MAX_CELLS] {
        self.raw_all().map(utils::adc_to_volts)
    }
}

bitfield::bitfield! {
    /// FLGR0..FLGR2
    ///
    /// Two bits per cell: undervoltage in the low bit, overvoltage in the high.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FlagRegisterGroup([u8]);
    u8;
    cell_flags, _: 1, 0, 12;
}

impl Default for Flags {
    fn default() -> Self {
        Self([0; FLAG_GROUP_LEN])
    }
}

impl<T: AsRef<[u8]>> FlagRegisterGroup<T> {
    /// Undervoltage flag of the cell at `index` (`0..12`)
    #[must_use]
    pub fn undervoltage(&self, index: usize) -> Option<bool> {
        (index < MAX_CELLS).then(|| self.cell_flags(index) & 0b01 != 0)
    }

    /// Overvoltage flag of the cell at `index` (`0..12`)
    #[must_use]
    pub fn overvoltage(&self, index: usize) -> Option<bool> {
        (index < MAX_CELLS).then(|| self.cell_flags(index) & 0b10 != 0)
    }

    /// Check if any cell reports an under- or overvoltage condition
    #[must_use]
    pub fn any_set(&self) -> bool {
        self.0.as_ref().iter().any(|&b| b != 0)
    }
}
