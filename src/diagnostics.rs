//! Human readable dumps of the register images, for any `core::fmt::Write` sink

use core::fmt;

use crate::register::{
    CellVoltageRegisterGroup, ConfigurationRegisterGroup, FlagRegisterGroup,
    TemperatureRegisterGroup,
};

impl<T: AsRef<[u8]>> fmt::Display for ConfigurationRegisterGroup<T> {
    /// One field per line: CFGR0 in binary, the rest in hex
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "WDT GPIO2/1 LVLPL Cell10 CDC: {:08b}", self.cfgr0())?;
        writeln!(f, "DCC: {:03X}", self.dcc())?;
        writeln!(f, "MCI: {:03X}", self.mci())?;
        writeln!(f, "VUV: {:02X}", self.vuv())?;
        write!(f, "VOV: {:02X}", self.vov())
    }
}

impl<T: AsRef<[u8]>> fmt::Display for TemperatureRegisterGroup<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "iCelsius: {}", self.internal_celsius())?;
        writeln!(f, "THSD: {}", u8::from(self.thsd()))?;
        write!(f, "REV: {:X}", self.rev())
    }
}

impl<T: AsRef<[u8]>> fmt::Display for CellVoltageRegisterGroup<T> {
    /// Comma separated cell voltages, cell 1 first
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, volts) in self.volts_all().iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{volts:.2}")?;
        }
        Ok(())
    }
}

impl<T: AsRef<[u8]>> fmt::Display for FlagRegisterGroup<T> {
    /// Raw flag bytes in hex, FLGR2 first
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, byte) in self.0.as_ref().iter().rev().enumerate() {
            if index > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{byte:02X}")?;
        }
        Ok(())
    }
}
