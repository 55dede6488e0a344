//! Single-line records of individual organisms.

use std::str::SplitWhitespace;

use mosquito_sim_core::{Gender, Genotype, Position};
use mosquito_sim_world::{BreedingSiteState, MosquitoState, PupaState};

/// Mate genotype code stored when no mate is recorded.
pub const NO_MATE: i8 = -1;

/// Errors raised while parsing a single record.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum RecordError {
    /// The record ended before the named field.
    #[error("missing field `{field}`")]
    MissingField {
        /// Name of the absent field.
        field: &'static str,
    },
    /// The named field could not be parsed.
    #[error("invalid value `{value}` for field `{field}`")]
    InvalidField {
        /// Name of the offending field.
        field: &'static str,
        /// Offending text.
        value: String,
    },
    /// The record holds more fields than expected.
    #[error("unexpected trailing field `{value}`")]
    TrailingField {
        /// First superfluous token.
        value: String,
    },
    /// The fields parse individually but contradict each other.
    #[error("inconsistent record: {reason}")]
    Inconsistent {
        /// Description of the contradiction.
        reason: &'static str,
    },
}

/// Renders an adult as a single record.
#[must_use]
pub fn encode_mosquito(state: &MosquitoState) -> String {
    let mate = state.mate_genotype.map_or(NO_MATE, genotype_code);
    format!(
        "{} {} {} {} {} {} {} {} {} {} {} {} {} {} {}",
        state.radius,
        state.speed,
        state.position.x(),
        state.position.y(),
        state.birth_location.x(),
        state.birth_location.y(),
        state.age,
        gender_code(state.gender),
        genotype_code(state.genotype),
        state.heading,
        state.days_since_oviposition,
        state.mating_count,
        state.days_carrying_eggs,
        state.carrying_eggs,
        mate,
    )
}

/// Parses an adult record.
pub fn decode_mosquito(line: &str) -> Result<MosquitoState, RecordError> {
    let mut fields = Fields::new(line);
    let state = MosquitoState {
        radius: fields.positive("radius")?,
        speed: fields.non_negative("speed")?,
        position: Position::new(fields.float("x")?, fields.float("y")?),
        birth_location: Position::new(fields.float("birth_x")?, fields.float("birth_y")?),
        age: fields.non_negative("age")?,
        gender: fields.gender("gender")?,
        genotype: fields.genotype("genotype")?,
        heading: fields.float("heading")?,
        days_since_oviposition: fields.non_negative("days_since_oviposition")?,
        mating_count: fields.parse::<u32>("mating_count")?,
        days_carrying_eggs: fields.non_negative("days_carrying_eggs")?,
        carrying_eggs: fields.parse::<bool>("carrying_eggs")?,
        mate_genotype: fields.mate_genotype("mate_genotype")?,
    };
    fields.finish()?;

    if state.carrying_eggs && state.gender == Gender::Male {
        return Err(RecordError::Inconsistent {
            reason: "a male cannot carry eggs",
        });
    }
    if state.carrying_eggs && state.mate_genotype.is_none() {
        return Err(RecordError::Inconsistent {
            reason: "carried eggs need a mate genotype",
        });
    }
    Ok(state)
}

/// Renders an immature individual as a single record.
#[must_use]
pub fn encode_pupa(state: &PupaState) -> String {
    format!(
        "{} {} {} {} {} {}",
        state.age,
        state.larval_duration,
        gender_code(state.gender),
        genotype_code(state.genotype),
        state.birth_location.x(),
        state.birth_location.y(),
    )
}

/// Parses an immature individual record.
pub fn decode_pupa(line: &str) -> Result<PupaState, RecordError> {
    let mut fields = Fields::new(line);
    let state = PupaState {
        age: fields.non_negative("age")?,
        larval_duration: fields.non_negative("larval_duration")?,
        gender: fields.gender("gender")?,
        genotype: fields.genotype("genotype")?,
        birth_location: Position::new(fields.float("birth_x")?, fields.float("birth_y")?),
    };
    fields.finish()?;
    Ok(state)
}

/// Renders a breeding site as a header line followed by one line per occupant.
#[must_use]
pub fn encode_breeding_site(state: &BreedingSiteState) -> String {
    let mut text = format!(
        "{} {} {}\n",
        state.location.x(),
        state.location.y(),
        state.pupae.len()
    );
    for pupa in &state.pupae {
        text.push_str(&encode_pupa(pupa));
        text.push('\n');
    }
    text
}

pub(crate) fn decode_site_header(line: &str) -> Result<(Position, usize), RecordError> {
    let mut fields = Fields::new(line);
    let location = Position::new(fields.float("x")?, fields.float("y")?);
    let count = fields.parse::<usize>("pupa_count")?;
    fields.finish()?;
    Ok((location, count))
}

fn gender_code(gender: Gender) -> i8 {
    match gender {
        Gender::Male => 0,
        Gender::Female => 1,
    }
}

fn genotype_code(genotype: Genotype) -> i8 {
    match genotype {
        Genotype::HomozygousRecessive => 0,
        Genotype::Heterozygous => 1,
        Genotype::HomozygousDominant => 2,
    }
}

struct Fields<'a> {
    tokens: SplitWhitespace<'a>,
}

impl<'a> Fields<'a> {
    fn new(line: &'a str) -> Self {
        Self {
            tokens: line.split_whitespace(),
        }
    }

    fn token(&mut self, field: &'static str) -> Result<&'a str, RecordError> {
        self.tokens
            .next()
            .ok_or(RecordError::MissingField { field })
    }

    fn parse<T: std::str::FromStr>(&mut self, field: &'static str) -> Result<T, RecordError> {
        let token = self.token(field)?;
        token.parse::<T>().map_err(|_| RecordError::InvalidField {
            field,
            value: token.to_owned(),
        })
    }

    fn bounded(
        &mut self,
        field: &'static str,
        accept: impl FnOnce(f64) -> bool,
    ) -> Result<f64, RecordError> {
        let token = self.token(field)?;
        match token.parse::<f64>() {
            Ok(value) if value.is_finite() && accept(value) => Ok(value),
            _ => Err(RecordError::InvalidField {
                field,
                value: token.to_owned(),
            }),
        }
    }

    fn float(&mut self, field: &'static str) -> Result<f64, RecordError> {
        self.bounded(field, |_| true)
    }

    fn non_negative(&mut self, field: &'static str) -> Result<f64, RecordError> {
        self.bounded(field, |value| value >= 0.0)
    }

    fn positive(&mut self, field: &'static str) -> Result<f64, RecordError> {
        self.bounded(field, |value| value > 0.0)
    }

    fn code(&mut self, field: &'static str) -> Result<(i8, &'a str), RecordError> {
        let token = self.token(field)?;
        let code = token.parse::<i8>().map_err(|_| RecordError::InvalidField {
            field,
            value: token.to_owned(),
        })?;
        Ok((code, token))
    }

    fn gender(&mut self, field: &'static str) -> Result<Gender, RecordError> {
        match self.code(field)? {
            (0, _) => Ok(Gender::Male),
            (1, _) => Ok(Gender::Female),
            (_, token) => Err(RecordError::InvalidField {
                field,
                value: token.to_owned(),
            }),
        }
    }

    fn genotype(&mut self, field: &'static str) -> Result<Genotype, RecordError> {
        let (code, token) = self.code(field)?;
        genotype_from_code(code).ok_or_else(|| RecordError::InvalidField {
            field,
            value: token.to_owned(),
        })
    }

    fn mate_genotype(&mut self, field: &'static str) -> Result<Option<Genotype>, RecordError> {
        let (code, token) = self.code(field)?;
        if code == NO_MATE {
            return Ok(None);
        }
        genotype_from_code(code)
            .map(Some)
            .ok_or_else(|| RecordError::InvalidField {
                field,
                value: token.to_owned(),
            })
    }

    fn finish(mut self) -> Result<(), RecordError> {
        match self.tokens.next() {
            Some(extra) => Err(RecordError::TrailingField {
                value: extra.to_owned(),
            }),
            None => Ok(()),
        }
    }
}

fn genotype_from_code(code: i8) -> Option<Genotype> {
    match code {
        0 => Some(Genotype::HomozygousRecessive),
        1 => Some(Genotype::Heterozygous),
        2 => Some(Genotype::HomozygousDominant),
        _ => None,
    }
}
