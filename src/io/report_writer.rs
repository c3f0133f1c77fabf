use std::io::Write;

use crate::{errors::*, exact::Solution};

impl Solution {
    /// Writes the two-line summary
    ///
    /// ```text
    /// Optimal Distance: 80 km
    /// Optimal Path: 0 -> 1 -> 3 -> 2 -> 0
    /// ```
    pub fn write_report<W: Write>(&self, mut writer: W) -> Result<()> {
        writeln!(writer, "Optimal Distance: {} km", self.cost)?;
        writeln!(writer, "Optimal Path: {}", self.tour)?;
        Ok(())
    }

    /// Writes cost, tour, strategy and statistics as a single JSON object
    pub fn write_json<W: Write>(&self, mut writer: W) -> Result<()> {
        serde_json::to_writer_pretty(&mut writer, self)?;
        writeln!(writer)?;
        Ok(())
    }
}
