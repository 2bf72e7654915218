//! Reader for the subset of the Gmsh `.geo` language that [`crate::write_geo`] emits.
//!
//! One statement per line, `//` comments, and entities defined before use.

use polygmsh_topology::EntityCounts;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeoParseError {
    #[error("line {line}: malformed statement `{text}`")]
    Malformed { line: usize, text: String },
    #[error("line {line}: unknown entity `{keyword}`")]
    UnknownEntity { line: usize, keyword: String },
    #[error("line {line}: invalid number `{token}`")]
    InvalidNumber { line: usize, token: String },
    #[error("line {line}: {kind} expects {expected} values, found {found}")]
    Arity {
        line: usize,
        kind: &'static str,
        expected: &'static str,
        found: usize,
    },
    #[error("line {line}: {kind} {id} is defined twice")]
    Duplicate {
        line: usize,
        kind: &'static str,
        id: u64,
    },
    #[error("line {line}: {kind} {id} is not defined")]
    Undefined {
        line: usize,
        kind: &'static str,
        id: u64,
    },
}

type ParseResult<T> = std::result::Result<T, GeoParseError>;

/// Entities read from a script, keyed by tag. Signed references keep their sign.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GeoScript {
    pub points: BTreeMap<u64, [f64; 3]>,
    pub lines: BTreeMap<u64, [u64; 2]>,
    pub line_loops: BTreeMap<u64, Vec<i64>>,
    pub plane_surfaces: BTreeMap<u64, Vec<u64>>,
    pub surface_loops: BTreeMap<u64, Vec<i64>>,
    pub volumes: BTreeMap<u64, Vec<u64>>,
}

impl GeoScript {
    pub fn counts(&self) -> EntityCounts {
        EntityCounts {
            points: self.points.len(),
            lines: self.lines.len(),
            surfaces: self.plane_surfaces.len(),
            volumes: self.volumes.len(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Kind {
    Point,
    Line,
    LineLoop,
    PlaneSurface,
    SurfaceLoop,
    Volume,
}

impl Kind {
    fn from_keyword(keyword: &str) -> Option<Self> {
        let words: Vec<&str> = keyword.split_whitespace().collect();
        match words.as_slice() {
            ["Point"] => Some(Kind::Point),
            ["Line"] => Some(Kind::Line),
            ["Line" | "Curve", "Loop"] => Some(Kind::LineLoop),
            ["Plane", "Surface"] => Some(Kind::PlaneSurface),
            ["Surface", "Loop"] => Some(Kind::SurfaceLoop),
            ["Volume"] => Some(Kind::Volume),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Kind::Point => "point",
            Kind::Line => "line",
            Kind::LineLoop => "line loop",
            Kind::PlaneSurface => "plane surface",
            Kind::SurfaceLoop => "surface loop",
            Kind::Volume => "volume",
        }
    }
}

struct Statement<'a> {
    line: usize,
    kind: Kind,
    id: u64,
    values: Vec<&'a str>,
}

pub fn parse_geo(text: &str) -> ParseResult<GeoScript> {
    let mut script = GeoScript::default();
    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let code = match raw.find("//") {
            Some(start) => &raw[..start],
            None => raw,
        }
        .trim();
        if code.is_empty() {
            continue;
        }
        let statement = split_statement(line, code)?;
        script.apply(statement)?;
    }
    Ok(script)
}

// `Keyword(id) = {v, v, ...};`
fn split_statement(line: usize, code: &str) -> ParseResult<Statement<'_>> {
    let malformed = || GeoParseError::Malformed {
        line,
        text: code.to_string(),
    };

    let body = code.strip_suffix(';').ok_or_else(malformed)?;
    let (keyword, rest) = body.split_once('(').ok_or_else(malformed)?;
    let (id, rest) = rest.split_once(')').ok_or_else(malformed)?;
    let list = rest
        .trim()
        .strip_prefix('=')
        .map(str::trim)
        .and_then(|list| list.strip_prefix('{'))
        .and_then(|list| list.strip_suffix('}'))
        .ok_or_else(malformed)?;

    let kind = Kind::from_keyword(keyword).ok_or_else(|| GeoParseError::UnknownEntity {
        line,
        keyword: keyword.trim().to_string(),
    })?;
    let id = parse_tag(line, id.trim())?;
    let values = if list.trim().is_empty() {
        Vec::new()
    } else {
        list.split(',').map(str::trim).collect()
    };

    Ok(Statement {
        line,
        kind,
        id,
        values,
    })
}

impl GeoScript {
    fn apply(&mut self, statement: Statement<'_>) -> ParseResult<()> {
        let Statement {
            line,
            kind,
            id,
            ref values,
        } = statement;

        if self.is_defined(kind, id) {
            return Err(GeoParseError::Duplicate {
                line,
                kind: kind.name(),
                id,
            });
        }

        match kind {
            Kind::Point => {
                // An optional fourth value is the characteristic length.
                if !(3..=4).contains(&values.len()) {
                    return Err(arity(line, kind, "3 or 4", values.len()));
                }
                let mut xyz = [0.0; 3];
                for (slot, token) in xyz.iter_mut().zip(values) {
                    *slot = token.parse().map_err(|_| invalid(line, token))?;
                }
                self.points.insert(id, xyz);
            }
            Kind::Line => {
                if values.len() != 2 {
                    return Err(arity(line, kind, "2", values.len()));
                }
                let start = self.reference(line, Kind::Point, values[0])?;
                let end = self.reference(line, Kind::Point, values[1])?;
                self.lines.insert(id, [start, end]);
            }
            Kind::LineLoop => {
                let refs = self.signed_references(line, kind, Kind::Line, values)?;
                self.line_loops.insert(id, refs);
            }
            Kind::PlaneSurface => {
                let refs = self.references(line, kind, Kind::LineLoop, values)?;
                self.plane_surfaces.insert(id, refs);
            }
            Kind::SurfaceLoop => {
                let refs = self.signed_references(line, kind, Kind::PlaneSurface, values)?;
                self.surface_loops.insert(id, refs);
            }
            Kind::Volume => {
                let refs = self.references(line, kind, Kind::SurfaceLoop, values)?;
                self.volumes.insert(id, refs);
            }
        }
        Ok(())
    }

    fn is_defined(&self, kind: Kind, id: u64) -> bool {
        match kind {
            Kind::Point => self.points.contains_key(&id),
            Kind::Line => self.lines.contains_key(&id),
            Kind::LineLoop => self.line_loops.contains_key(&id),
            Kind::PlaneSurface => self.plane_surfaces.contains_key(&id),
            Kind::SurfaceLoop => self.surface_loops.contains_key(&id),
            Kind::Volume => self.volumes.contains_key(&id),
        }
    }

    fn reference(&self, line: usize, target: Kind, token: &str) -> ParseResult<u64> {
        let id = parse_tag(line, token)?;
        self.ensure_defined(line, target, id)?;
        Ok(id)
    }

    fn references(
        &self,
        line: usize,
        kind: Kind,
        target: Kind,
        tokens: &[&str],
    ) -> ParseResult<Vec<u64>> {
        if tokens.is_empty() {
            return Err(arity(line, kind, "at least 1", 0));
        }
        tokens
            .iter()
            .map(|token| self.reference(line, target, token))
            .collect()
    }

    fn signed_references(
        &self,
        line: usize,
        kind: Kind,
        target: Kind,
        tokens: &[&str],
    ) -> ParseResult<Vec<i64>> {
        if tokens.is_empty() {
            return Err(arity(line, kind, "at least 1", 0));
        }
        tokens
            .iter()
            .map(|token| {
                let signed: i64 = token.parse().map_err(|_| invalid(line, token))?;
                if signed == 0 {
                    return Err(invalid(line, token));
                }
                self.ensure_defined(line, target, signed.unsigned_abs())?;
                Ok(signed)
            })
            .collect()
    }

    fn ensure_defined(&self, line: usize, kind: Kind, id: u64) -> ParseResult<()> {
        if self.is_defined(kind, id) {
            Ok(())
        } else {
            Err(GeoParseError::Undefined {
                line,
                kind: kind.name(),
                id,
            })
        }
    }
}

// Gmsh tags are strictly positive.
fn parse_tag(line: usize, token: &str) -> ParseResult<u64> {
    match token.parse::<u64>() {
        Ok(0) | Err(_) => Err(invalid(line, token)),
        Ok(id) => Ok(id),
    }
}

fn invalid(line: usize, token: &str) -> GeoParseError {
    GeoParseError::InvalidNumber {
        line,
        token: token.to_string(),
    }
}

fn arity(line: usize, kind: Kind, expected: &'static str, found: usize) -> GeoParseError {
    GeoParseError::Arity {
        line,
        kind: kind.name(),
        expected,
        found,
    }
}
