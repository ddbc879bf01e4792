//! Questions a locked-on enemy asks, answered by socketing one of four orbs.

use bevy::prelude::*;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;

/// Orbs offered per question, exactly one of them correct.
pub const ORB_COUNT: usize = 4;

/// Which family of questions a level asks.
#[derive(Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum QuestionKind {
    #[default]
    Arithmetic,
    Geometry,
    Fractions,
}

/// One question and the values written on its orbs.
#[derive(Clone, Debug, PartialEq)]
pub struct Question {
    pub prompt: String,
    pub answer: f32,
    /// Orb values in socket order
    pub orbs: [f32; ORB_COUNT],
}

impl Question {
    /// Roll a question of `kind` with three distinct wrong answers, shuffled
    /// in with the correct one.
    pub fn generate<R: Rng + ?Sized>(kind: QuestionKind, rng: &mut R) -> Self {
        let (prompt, answer) = match kind {
            QuestionKind::Arithmetic => arithmetic(rng),
            QuestionKind::Geometry => geometry(rng),
            QuestionKind::Fractions => fractions(rng),
        };

        let wrong = wrong_answers(answer, rng);
        let mut orbs = [answer, wrong[0], wrong[1], wrong[2]];
        orbs.shuffle(rng);

        Self {
            prompt,
            answer,
            orbs,
        }
    }

    pub fn is_correct(&self, value: f32) -> bool {
        approx_eq(value, self.answer)
    }

    /// Value on orb `index`, if there is such an orb.
    pub fn orb(&self, index: usize) -> Option<f32> {
        self.orbs.get(index).copied()
    }

    /// Orb labels as shown to the player.
    pub fn orb_labels(&self) -> Vec<String> {
        self.orbs.iter().map(|&value| format_answer(value)).collect()
    }
}

/// The question currently asked, and by which enemy.
#[derive(Resource, Default, Debug)]
pub struct QuestionState {
    pub enemy: Option<Entity>,
    pub current: Option<Question>,
}

impl QuestionState {
    pub fn ask(&mut self, enemy: Entity, question: Question) {
        self.enemy = Some(enemy);
        self.current = Some(question);
    }

    pub fn clear(&mut self) {
        self.enemy = None;
        self.current = None;
    }

    /// The asking enemy and whether `value` answers its question.
    /// `None` when no question is active.
    pub fn judge(&self, value: f32) -> Option<(Entity, bool)> {
        let enemy = self.enemy?;
        let question = self.current.as_ref()?;
        Some((enemy, question.is_correct(value)))
    }
}

/// Whole numbers print without decimals, the rest with at most two.
pub fn format_answer(value: f32) -> String {
    if approx_eq(value, value.round()) {
        return format!("{}", value.round() as i64);
    }
    let fixed = format!("{value:.2}");
    fixed.trim_end_matches('0').trim_end_matches('.').to_string()
}

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() <= 1e-4 * a.abs().max(b.abs()).max(1.0)
}

fn arithmetic<R: Rng + ?Sized>(rng: &mut R) -> (String, f32) {
    match rng.gen_range(0..4) {
        0 => {
            let (a, b) = (rng.gen_range(1..50), rng.gen_range(1..50));
            (format!("{a} + {b} = ?"), (a + b) as f32)
        }
        1 => {
            let a = rng.gen_range(20..100);
            let b = rng.gen_range(1..a);
            (format!("{a} - {b} = ?"), (a - b) as f32)
        }
        2 => {
            let (a, b) = (rng.gen_range(2..12), rng.gen_range(2..12));
            (format!("{a} × {b} = ?"), (a * b) as f32)
        }
        _ => {
            // Built from the quotient so the division is always exact
            let divisor = rng.gen_range(2..10);
            let quotient = rng.gen_range(2..10);
            (format!("{} ÷ {divisor} = ?", divisor * quotient), quotient as f32)
        }
    }
}

fn geometry<R: Rng + ?Sized>(rng: &mut R) -> (String, f32) {
    match rng.gen_range(0..5) {
        0 => {
            let (length, width) = (rng.gen_range(3..10), rng.gen_range(3..10));
            (
                format!("Rectangle: length={length}m, width={width}m. Area?"),
                (length * width) as f32,
            )
        }
        1 => {
            let side = rng.gen_range(4..15);
            (format!("Square: side={side}cm. Perimeter?"), (side * 4) as f32)
        }
        2 => {
            let radius = rng.gen_range(2..8) as f32;
            (
                format!("Circle: radius={radius}m. Area? (π=3.14)"),
                3.14 * radius * radius,
            )
        }
        3 => {
            let (a, b) = (rng.gen_range(100..500), rng.gen_range(100..500));
            (format!("Box A: {a}g. Box B: {b}g. Total mass?"), (a + b) as f32)
        }
        _ => {
            let (l, w, h) = (rng.gen_range(3..8), rng.gen_range(3..8), rng.gen_range(3..8));
            (format!("Box: {l}cm × {w}cm × {h}cm. Volume?"), (l * w * h) as f32)
        }
    }
}

fn fractions<R: Rng + ?Sized>(rng: &mut R) -> (String, f32) {
    match rng.gen_range(0..3) {
        0 => {
            let denom = rng.gen_range(2..9);
            let (a, b) = (rng.gen_range(1..denom), rng.gen_range(1..denom));
            (
                format!("{a}/{denom} + {b}/{denom} = ?"),
                (a + b) as f32 / denom as f32,
            )
        }
        1 => {
            let denom = rng.gen_range(3..9);
            let a = rng.gen_range(2..denom);
            let b = rng.gen_range(1..a);
            (
                format!("{a}/{denom} - {b}/{denom} = ?"),
                (a - b) as f32 / denom as f32,
            )
        }
        _ => {
            let (a, da) = (rng.gen_range(1..5), rng.gen_range(2..6));
            let (b, db) = (rng.gen_range(1..5), rng.gen_range(2..6));
            (
                format!("{a}/{da} × {b}/{db} = ?"),
                (a * b) as f32 / (da * db) as f32,
            )
        }
    }
}

/// Three values near `answer`, distinct from it and from each other.
fn wrong_answers<R: Rng + ?Sized>(answer: f32, rng: &mut R) -> [f32; ORB_COUNT - 1] {
    let mut wrong = [0.0; ORB_COUNT - 1];

    for i in 0..wrong.len() {
        let offset = rng.gen_range(1..5) as f32;
        let mut candidate = if rng.gen_bool(0.5) {
            answer + offset
        } else {
            (answer - offset).max(0.1)
        };

        while approx_eq(candidate, answer) || wrong[..i].iter().any(|&w| approx_eq(w, candidate)) {
            candidate += rng.gen_range(1..3) as f32;
        }
        wrong[i] = candidate;
    }
    wrong
}
