#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Plain-text checkpoints of a paused simulation.
//!
//! Every organism is stored as one line of whitespace-delimited fields.
//! Numbers use their shortest round-trip decimal form and enumerations are
//! stored as small integers: `0` male or `ff`, `1` female or `Ff`, `2` `FF`.
//! A checkpoint consists of two texts. The adult text is a count line
//! followed by one record per adult. The breeding-site text is a count line
//! followed by one block per site: an `x y n` header and `n` pupa records.

mod record;

pub use record::{
    decode_mosquito, decode_pupa, encode_breeding_site, encode_mosquito, encode_pupa, RecordError,
    NO_MATE,
};

use std::{iter::Enumerate, str::Lines};

use mosquito_sim_core::ConfigError;
use mosquito_sim_world::{query, BreedingSiteState, Config, MosquitoState, World};

/// Conventional file name of the adult text.
pub const MOSQUITO_FILE: &str = "mosquitoes.txt";

/// Conventional file name of the breeding-site text.
pub const BREEDING_SITE_FILE: &str = "breeding_sites.txt";

/// Errors raised while parsing a checkpoint text.
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum CheckpointError {
    /// The text ended before the count line.
    #[error("{section}: missing count line")]
    MissingCount {
        /// Section being parsed.
        section: &'static str,
    },
    /// A count could not be parsed.
    #[error("{section} line {line}: invalid count `{value}`")]
    InvalidCount {
        /// Section being parsed.
        section: &'static str,
        /// One-based line number.
        line: usize,
        /// Offending text.
        value: String,
    },
    /// A record could not be parsed.
    #[error("{section} line {line}: {source}")]
    Record {
        /// Section being parsed.
        section: &'static str,
        /// One-based line number.
        line: usize,
        /// Underlying record error.
        #[source]
        source: RecordError,
    },
    /// The text holds fewer records than announced.
    #[error("{section}: expected {expected} records, found {found}")]
    Truncated {
        /// Section being parsed.
        section: &'static str,
        /// Announced number of records.
        expected: usize,
        /// Records actually present.
        found: usize,
    },
    /// Non-blank lines follow the last announced record.
    #[error("{section} line {line}: unexpected trailing data")]
    TrailingData {
        /// Section being parsed.
        section: &'static str,
        /// One-based line number.
        line: usize,
    },
}

const MOSQUITO_SECTION: &str = "mosquitoes";
const BREEDING_SITE_SECTION: &str = "breeding sites";

/// Persisted population of a paused world.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Checkpoint {
    /// Every live adult.
    pub mosquitoes: Vec<MosquitoState>,
    /// Every breeding site with its occupants.
    pub breeding_sites: Vec<BreedingSiteState>,
}

impl Checkpoint {
    /// Captures the population of `world`.
    #[must_use]
    pub fn capture(world: &World) -> Self {
        Self {
            mosquitoes: query::mosquitoes(world).iter().map(|m| m.state()).collect(),
            breeding_sites: query::breeding_sites(world)
                .iter()
                .map(|site| site.state())
                .collect(),
        }
    }

    /// Rebuilds a world holding the captured population.
    pub fn into_world(self, config: Config) -> Result<World, ConfigError> {
        World::restore(config, self.mosquitoes, self.breeding_sites)
    }

    /// Renders the adult text.
    #[must_use]
    pub fn encode_mosquitoes(&self) -> String {
        let mut text = format!("{}\n", self.mosquitoes.len());
        for state in &self.mosquitoes {
            text.push_str(&encode_mosquito(state));
            text.push('\n');
        }
        text
    }

    /// Renders the breeding-site text.
    #[must_use]
    pub fn encode_breeding_sites(&self) -> String {
        let mut text = format!("{}\n", self.breeding_sites.len());
        for site in &self.breeding_sites {
            text.push_str(&encode_breeding_site(site));
        }
        text
    }

    /// Parses both checkpoint texts.
    pub fn decode(mosquitoes: &str, breeding_sites: &str) -> Result<Self, CheckpointError> {
        Ok(Self {
            mosquitoes: decode_mosquitoes(mosquitoes)?,
            breeding_sites: decode_breeding_sites(breeding_sites)?,
        })
    }
}

/// Parses the adult text.
pub fn decode_mosquitoes(text: &str) -> Result<Vec<MosquitoState>, CheckpointError> {
    let mut reader = LineReader::new(text, MOSQUITO_SECTION);
    let count = reader.count()?;

    let mut mosquitoes = Vec::with_capacity(count);
    for found in 0..count {
        let (line, content) = reader.expect_line(count, found)?;
        mosquitoes.push(reader.record(line, decode_mosquito(content))?);
    }
    reader.finish()?;
    Ok(mosquitoes)
}

/// Parses the breeding-site text.
pub fn decode_breeding_sites(text: &str) -> Result<Vec<BreedingSiteState>, CheckpointError> {
    let mut reader = LineReader::new(text, BREEDING_SITE_SECTION);
    let count = reader.count()?;

    let mut sites = Vec::with_capacity(count);
    for found in 0..count {
        let (line, content) = reader.expect_line(count, found)?;
        let (location, pupa_count) = reader.record(line, record::decode_site_header(content))?;

        let mut pupae = Vec::with_capacity(pupa_count);
        for held in 0..pupa_count {
            let (line, content) = reader.expect_line(pupa_count, held)?;
            pupae.push(reader.record(line, decode_pupa(content))?);
        }
        sites.push(BreedingSiteState { location, pupae });
    }
    reader.finish()?;
    Ok(sites)
}

/// Non-blank lines of a section tagged with one-based line numbers.
struct LineReader<'a> {
    section: &'static str,
    lines: Enumerate<Lines<'a>>,
}

impl<'a> LineReader<'a> {
    fn new(text: &'a str, section: &'static str) -> Self {
        Self {
            section,
            lines: text.lines().enumerate(),
        }
    }

    fn next_line(&mut self) -> Option<(usize, &'a str)> {
        for (index, content) in self.lines.by_ref() {
            if !content.trim().is_empty() {
                return Some((index + 1, content));
            }
        }
        None
    }

    fn count(&mut self) -> Result<usize, CheckpointError> {
        let (line, content) = self.next_line().ok_or(CheckpointError::MissingCount {
            section: self.section,
        })?;
        content
            .trim()
            .parse::<usize>()
            .map_err(|_| CheckpointError::InvalidCount {
                section: self.section,
                line,
                value: content.trim().to_owned(),
            })
    }

    fn expect_line(
        &mut self,
        expected: usize,
        found: usize,
    ) -> Result<(usize, &'a str), CheckpointError> {
        self.next_line().ok_or(CheckpointError::Truncated {
            section: self.section,
            expected,
            found,
        })
    }

    fn record<T>(&self, line: usize, parsed: Result<T, RecordError>) -> Result<T, CheckpointError> {
        parsed.map_err(|source| CheckpointError::Record {
            section: self.section,
            line,
            source,
        })
    }

    fn finish(&mut self) -> Result<(), CheckpointError> {
        match self.next_line() {
            Some((line, _)) => Err(CheckpointError::TrailingData {
                section: self.section,
                line,
            }),
            None => Ok(()),
        }
    }
}
