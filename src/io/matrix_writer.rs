use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use itertools::Itertools;
use serde::Serialize;

use crate::{errors::*, instance::*};

pub trait DistanceMatrixWriter {
    fn try_write_text<W: Write>(&self, writer: W) -> Result<()>;
    fn try_write_text_file<P: AsRef<Path>>(&self, path: P) -> Result<()>;
    fn try_write_json<W: Write>(&self, writer: W) -> Result<()>;
    fn try_write_json_file<P: AsRef<Path>>(&self, path: P) -> Result<()>;
}

#[derive(Serialize)]
struct MatrixDocument<'a> {
    distances: Vec<&'a [Distance]>,
}

impl DistanceMatrixWriter for DistanceMatrix {
    fn try_write_text<W: Write>(&self, mut writer: W) -> Result<()> {
        writeln!(writer, "p tsp {}", self.number_of_cities())?;

        for row in self.rows() {
            writeln!(writer, "{}", row.iter().join(" "))?;
        }

        Ok(())
    }

    fn try_write_text_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.try_write_text(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    fn try_write_json<W: Write>(&self, mut writer: W) -> Result<()> {
        let document = MatrixDocument {
            distances: self.rows().collect(),
        };
        serde_json::to_writer(&mut writer, &document)?;
        writeln!(writer)?;
        Ok(())
    }

    fn try_write_json_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.try_write_json(&mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
