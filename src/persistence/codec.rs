//! Text formats for records and snapshots
//!
//! Records: `<bestScore> <bestCoins>`
//!
//! Snapshot, line oriented but read as a flat token stream:
//! ```text
//! <distance> <coins>
//! <runnerY> <runnerVelocityY> <runnerGrounded(0|1)>
//! <hazardCount>
//! <hazardX> <hazardType>
//! <collectibleCount>
//! <collectibleX> <collectibleY>
//! <flyingHazardCount>
//! <flyingHazardX> <flyingHazardY>
//! ```
//! Floats use the shortest representation that parses back to the same
//! value, so a save/load cycle is exact.

use std::str::{FromStr, SplitWhitespace};

use glam::Vec2;

use super::{PersistError, SessionSnapshot};
use crate::highscores::BestRecords;
use crate::sim::state::GroundHazardKind;

pub fn encode_records(records: &BestRecords) -> String {
    format!("{} {}", records.best_score, records.best_coins)
}

pub fn decode_records(text: &str) -> Result<BestRecords, PersistError> {
    let mut tokens = Tokens::new(text);
    let records = BestRecords::new(tokens.next("best score")?, tokens.next("best coins")?);
    tokens.finish()?;
    Ok(records)
}

pub fn encode_snapshot(snap: &SessionSnapshot) -> String {
    let mut lines = vec![
        format!("{} {}", snap.distance, snap.coins),
        format!(
            "{} {} {}",
            snap.runner_y,
            snap.runner_vel_y,
            u8::from(snap.runner_grounded)
        ),
        snap.ground.len().to_string(),
    ];
    lines.extend(snap.ground.iter().map(|(x, kind)| format!("{x} {}", kind.index())));
    lines.push(snap.collectibles.len().to_string());
    lines.extend(snap.collectibles.iter().map(|p| format!("{} {}", p.x, p.y)));
    lines.push(snap.flying.len().to_string());
    lines.extend(snap.flying.iter().map(|p| format!("{} {}", p.x, p.y)));

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

pub fn decode_snapshot(text: &str) -> Result<SessionSnapshot, PersistError> {
    let mut t = Tokens::new(text);

    let distance = t.next_finite("distance")?;
    if distance < 0.0 {
        return Err(PersistError::malformed(format!("negative distance {distance}")));
    }
    let coins = t.next("coins")?;
    let runner_y = t.next_finite("runner y")?;
    let runner_vel_y = t.next_finite("runner velocity")?;
    let runner_grounded = match t.next::<u8>("runner grounded flag")? {
        0 => false,
        1 => true,
        other => {
            return Err(PersistError::malformed(format!("grounded flag {other}")));
        }
    };

    let count: usize = t.next("hazard count")?;
    let mut ground = Vec::new();
    for _ in 0..count {
        let x = t.next_finite("hazard x")?;
        let index: u32 = t.next("hazard type")?;
        let kind = GroundHazardKind::from_index(index)
            .ok_or_else(|| PersistError::malformed(format!("unknown hazard type {index}")))?;
        ground.push((x, kind));
    }

    let collectibles = t.positions("collectible")?;
    let flying = t.positions("flying hazard")?;
    t.finish()?;

    Ok(SessionSnapshot {
        distance,
        coins,
        runner_y,
        runner_vel_y,
        runner_grounded,
        ground,
        collectibles,
        flying,
    })
}

/// Whitespace token reader with descriptive errors
struct Tokens<'a> {
    inner: SplitWhitespace<'a>,
}

impl<'a> Tokens<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            inner: text.split_whitespace(),
        }
    }

    fn next<T: FromStr>(&mut self, what: &str) -> Result<T, PersistError> {
        let token = self
            .inner
            .next()
            .ok_or_else(|| PersistError::malformed(format!("truncated before {what}")))?;
        token
            .parse()
            .map_err(|_| PersistError::malformed(format!("bad {what}: {token:?}")))
    }

    fn next_finite(&mut self, what: &str) -> Result<f32, PersistError> {
        let value: f32 = self.next(what)?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(PersistError::malformed(format!("non-finite {what}")))
        }
    }

    /// A count followed by that many `x y` pairs
    fn positions(&mut self, what: &str) -> Result<Vec<Vec2>, PersistError> {
        let count: usize = self.next(&format!("{what} count"))?;
        let mut out = Vec::new();
        for _ in 0..count {
            let x = self.next_finite(&format!("{what} x"))?;
            let y = self.next_finite(&format!("{what} y"))?;
            out.push(Vec2::new(x, y));
        }
        Ok(out)
    }

    fn finish(mut self) -> Result<(), PersistError> {
        match self.inner.next() {
            None => Ok(()),
            Some(extra) => Err(PersistError::malformed(format!("trailing data {extra:?}"))),
        }
    }
}
