//! Tab-separated population report.

use std::io::{self, Write};

use mosquito_sim_core::PopulationCounts;

const HEADER: &str = "day\ttotal\tmales\tfemales\tFF\tFf\tff";

/// Writes population rows to an output stream.
pub(crate) struct Report<W> {
    out: W,
}

impl<W: Write> Report<W> {
    pub(crate) fn new(mut out: W) -> io::Result<Self> {
        writeln!(out, "{HEADER}")?;
        Ok(Self { out })
    }

    pub(crate) fn row(&mut self, day: f64, counts: &PopulationCounts) -> io::Result<()> {
        writeln!(
            self.out,
            "{day}\t{}\t{}\t{}\t{}\t{}\t{}",
            counts.total,
            counts.males,
            counts.females,
            counts.homozygous_dominant,
            counts.heterozygous,
            counts.homozygous_recessive,
        )
    }

    pub(crate) fn finish(mut self) -> io::Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_follow_header_columns() {
        let mut report = Report::new(Vec::new()).expect("in-memory write");
        let counts = PopulationCounts {
            total: 12,
            males: 7,
            females: 5,
            homozygous_dominant: 2,
            heterozygous: 3,
            homozygous_recessive: 7,
        };
        report.row(4.0, &counts).expect("in-memory write");
        report.row(4.5, &PopulationCounts::default()).expect("in-memory write");

        let text = String::from_utf8(report.finish().expect("flush")).expect("utf-8");
        assert_eq!(
            text,
            "day\ttotal\tmales\tfemales\tFF\tFf\tff\n4\t12\t7\t5\t2\t3\t7\n4.5\t0\t0\t0\t0\t0\t0\n"
        );
    }
}
