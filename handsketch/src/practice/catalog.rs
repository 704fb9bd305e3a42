//! Built-in template catalog: digits, letters and simple sketches.
//!
//! Geometry is authored in a roughly 400×350 design space and fitted to
//! the canvas when a session starts.

use std::collections::BTreeMap;
use std::fmt;

use super::geometry::Primitive;
use super::template::Template;
use crate::error::{Error, Result};

/// Template family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TemplateKind {
    Digit,
    Letter,
    Sketch,
}

impl TemplateKind {
    pub const ALL: [TemplateKind; 3] = [Self::Digit, Self::Letter, Self::Sketch];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Digit => "digit",
            Self::Letter => "letter",
            Self::Sketch => "sketch",
        }
    }

    /// Parse a kind name.  Accepts "number" as a synonym for "digit".
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "digit" | "number" => Some(Self::Digit),
            "letter" => Some(Self::Letter),
            "sketch" => Some(Self::Sketch),
            _ => None,
        }
    }

    /// Canonical lookup key: letters upper-case, sketches lower-case.
    fn normalize_key(&self, key: &str) -> String {
        match self {
            Self::Letter => key.trim().to_ascii_uppercase(),
            Self::Digit | Self::Sketch => key.trim().to_ascii_lowercase(),
        }
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse a `kind:key` reference such as `letter:a` or `sketch:cat`.
pub fn parse_reference(s: &str) -> Option<(TemplateKind, String)> {
    let (kind, key) = s.split_once(':')?;
    let kind = TemplateKind::parse(kind)?;
    (!key.is_empty()).then(|| (kind, key.to_string()))
}

/// Templates keyed by kind and key.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    templates: BTreeMap<(TemplateKind, String), Template>,
}

impl Catalog {
    /// Empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog with every built-in template.
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        for (key, template) in digits() {
            catalog.insert(TemplateKind::Digit, key, template);
        }
        for (key, template) in letters() {
            catalog.insert(TemplateKind::Letter, key, template);
        }
        for (key, template) in sketches() {
            catalog.insert(TemplateKind::Sketch, key, template);
        }
        catalog
    }

    pub fn insert(&mut self, kind: TemplateKind, key: &str, template: Template) {
        self.templates.insert((kind, kind.normalize_key(key)), template);
    }

    /// Look up a template.  Letter keys are case-insensitive.
    pub fn get(&self, kind: TemplateKind, key: &str) -> Result<&Template> {
        self.templates
            .get(&(kind, kind.normalize_key(key)))
            .ok_or_else(|| Error::TemplateNotFound {
                kind,
                key: key.to_string(),
            })
    }

    /// Keys of one kind, sorted.
    pub fn keys(&self, kind: TemplateKind) -> Vec<&str> {
        self.templates
            .keys()
            .filter(|(k, _)| *k == kind)
            .map(|(_, key)| key.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Catalog listing as an s-expression.
    pub fn list_sexp(&self) -> String {
        let entries: Vec<String> = TemplateKind::ALL
            .iter()
            .map(|kind| {
                let keys: Vec<String> = self
                    .keys(*kind)
                    .iter()
                    .map(|k| format!("\"{}\"", k))
                    .collect();
                format!("(:kind :{} :keys ({}))", kind, keys.join(" "))
            })
            .collect();
        format!("({})", entries.join(" "))
    }
}

// ── Template data ──────────────────────────────────────────

fn line(x1: f64, y1: f64, x2: f64, y2: f64) -> Primitive {
    Primitive::line(x1, y1, x2, y2)
}

fn curve(a: (f64, f64), b: (f64, f64), c: (f64, f64)) -> Primitive {
    Primitive::curve([a, b, c])
}

fn digits() -> Vec<(&'static str, Template)> {
    let d = |key: &'static str, steps: Vec<Primitive>| {
        (key, Template::from_primitives(format!("Digit {}", key), steps))
    };
    vec![
        d("0", vec![Primitive::ellipse(200.0, 150.0, 80.0, 120.0)]),
        d(
            "1",
            vec![
                line(180.0, 100.0, 200.0, 80.0),
                line(200.0, 80.0, 200.0, 220.0),
                line(170.0, 220.0, 230.0, 220.0),
            ],
        ),
        d(
            "2",
            vec![
                curve((160.0, 120.0), (200.0, 80.0), (240.0, 120.0)),
                line(240.0, 120.0, 160.0, 200.0),
                line(160.0, 220.0, 240.0, 220.0),
            ],
        ),
        d(
            "3",
            vec![
                curve((160.0, 100.0), (200.0, 80.0), (240.0, 110.0)),
                line(200.0, 150.0, 230.0, 150.0),
                curve((230.0, 150.0), (240.0, 190.0), (160.0, 220.0)),
            ],
        ),
        d(
            "4",
            vec![
                line(170.0, 80.0, 170.0, 170.0),
                line(170.0, 170.0, 230.0, 170.0),
                line(230.0, 80.0, 230.0, 220.0),
            ],
        ),
        d(
            "5",
            vec![
                line(160.0, 80.0, 230.0, 80.0),
                line(160.0, 80.0, 160.0, 150.0),
                line(160.0, 150.0, 220.0, 150.0),
                curve((220.0, 150.0), (240.0, 190.0), (160.0, 220.0)),
            ],
        ),
        d(
            "6",
            vec![
                curve((230.0, 100.0), (180.0, 80.0), (160.0, 120.0)),
                line(160.0, 120.0, 160.0, 180.0),
                curve((160.0, 180.0), (200.0, 220.0), (240.0, 180.0)),
                curve((240.0, 180.0), (240.0, 150.0), (160.0, 150.0)),
            ],
        ),
        d(
            "7",
            vec![
                line(160.0, 80.0, 240.0, 80.0),
                line(240.0, 80.0, 180.0, 220.0),
            ],
        ),
        d(
            "8",
            vec![
                Primitive::circle(200.0, 120.0, 35.0),
                Primitive::ellipse(200.0, 180.0, 70.0, 80.0),
            ],
        ),
        d(
            "9",
            vec![
                Primitive::circle(200.0, 120.0, 40.0),
                line(240.0, 120.0, 240.0, 180.0),
                curve((240.0, 180.0), (220.0, 220.0), (170.0, 200.0)),
            ],
        ),
    ]
}

fn letters() -> Vec<(&'static str, Template)> {
    let l = |key: &'static str, steps: Vec<Primitive>| {
        (key, Template::from_primitives(format!("Letter {}", key), steps))
    };
    // Shared strokes.
    let stem = || line(170.0, 80.0, 170.0, 220.0);
    let top_bar = || line(170.0, 80.0, 230.0, 80.0);
    let mid_bar = || line(170.0, 150.0, 210.0, 150.0);
    let bowl = || {
        vec![
            line(170.0, 80.0, 220.0, 80.0),
            line(220.0, 80.0, 220.0, 150.0),
            line(220.0, 150.0, 170.0, 150.0),
        ]
    };
    let oval = || Primitive::ellipse(200.0, 150.0, 80.0, 120.0);
    let c_upper = || curve((240.0, 100.0), (170.0, 80.0), (170.0, 150.0));
    let c_lower = || curve((170.0, 150.0), (170.0, 220.0), (240.0, 200.0));

    vec![
        l(
            "A",
            vec![
                line(180.0, 220.0, 200.0, 80.0),
                line(200.0, 80.0, 220.0, 220.0),
                line(190.0, 150.0, 210.0, 150.0),
            ],
        ),
        l(
            "B",
            vec![
                stem(),
                line(170.0, 80.0, 220.0, 80.0),
                curve((220.0, 80.0), (240.0, 110.0), (170.0, 150.0)),
                curve((170.0, 150.0), (240.0, 150.0), (240.0, 190.0)),
                line(240.0, 190.0, 170.0, 220.0),
            ],
        ),
        l("C", vec![c_upper(), c_lower()]),
        l(
            "D",
            vec![
                stem(),
                line(170.0, 80.0, 210.0, 80.0),
                curve((210.0, 80.0), (240.0, 110.0), (240.0, 190.0)),
                line(240.0, 190.0, 170.0, 220.0),
            ],
        ),
        l(
            "E",
            vec![stem(), top_bar(), mid_bar(), line(170.0, 220.0, 230.0, 220.0)],
        ),
        l("F", vec![stem(), top_bar(), mid_bar()]),
        l(
            "G",
            vec![
                c_upper(),
                c_lower(),
                line(240.0, 200.0, 240.0, 150.0),
                line(220.0, 150.0, 240.0, 150.0),
            ],
        ),
        l(
            "H",
            vec![
                stem(),
                line(230.0, 80.0, 230.0, 220.0),
                line(170.0, 150.0, 230.0, 150.0),
            ],
        ),
        l(
            "I",
            vec![
                line(180.0, 80.0, 220.0, 80.0),
                line(200.0, 80.0, 200.0, 220.0),
                line(180.0, 220.0, 220.0, 220.0),
            ],
        ),
        l(
            "J",
            vec![
                top_bar(),
                line(230.0, 80.0, 230.0, 180.0),
                curve((230.0, 180.0), (200.0, 220.0), (170.0, 190.0)),
            ],
        ),
        l(
            "K",
            vec![
                stem(),
                line(170.0, 150.0, 230.0, 80.0),
                line(170.0, 150.0, 230.0, 220.0),
            ],
        ),
        l("L", vec![stem(), line(170.0, 220.0, 230.0, 220.0)]),
        l(
            "M",
            vec![
                line(160.0, 80.0, 160.0, 220.0),
                line(160.0, 80.0, 200.0, 140.0),
                line(200.0, 140.0, 240.0, 80.0),
                line(240.0, 80.0, 240.0, 220.0),
            ],
        ),
        l(
            "N",
            vec![
                stem(),
                line(170.0, 80.0, 230.0, 220.0),
                line(230.0, 80.0, 230.0, 220.0),
            ],
        ),
        l("O", vec![oval()]),
        l("P", [vec![stem()], bowl()].concat()),
        l("Q", vec![oval(), line(220.0, 200.0, 240.0, 220.0)]),
        l(
            "R",
            [vec![stem()], bowl(), vec![line(200.0, 150.0, 230.0, 220.0)]].concat(),
        ),
        l(
            "S",
            vec![
                curve((230.0, 100.0), (170.0, 80.0), (170.0, 130.0)),
                curve((170.0, 130.0), (230.0, 150.0), (230.0, 170.0)),
                curve((230.0, 170.0), (170.0, 220.0), (170.0, 200.0)),
            ],
        ),
        l(
            "T",
            vec![
                line(160.0, 80.0, 240.0, 80.0),
                line(200.0, 80.0, 200.0, 220.0),
            ],
        ),
        l(
            "U",
            vec![
                line(170.0, 80.0, 170.0, 180.0),
                curve((170.0, 180.0), (200.0, 220.0), (230.0, 180.0)),
                line(230.0, 180.0, 230.0, 80.0),
            ],
        ),
        l(
            "V",
            vec![
                line(170.0, 80.0, 200.0, 220.0),
                line(230.0, 80.0, 200.0, 220.0),
            ],
        ),
        l(
            "W",
            vec![
                line(160.0, 80.0, 180.0, 220.0),
                line(180.0, 220.0, 200.0, 160.0),
                line(200.0, 160.0, 220.0, 220.0),
                line(220.0, 220.0, 240.0, 80.0),
            ],
        ),
        l(
            "X",
            vec![
                line(170.0, 80.0, 230.0, 220.0),
                line(230.0, 80.0, 170.0, 220.0),
            ],
        ),
        l(
            "Y",
            vec![
                line(170.0, 80.0, 200.0, 150.0),
                line(230.0, 80.0, 200.0, 150.0),
                line(200.0, 150.0, 200.0, 220.0),
            ],
        ),
        l(
            "Z",
            vec![
                top_bar(),
                line(230.0, 80.0, 170.0, 220.0),
                line(170.0, 220.0, 230.0, 220.0),
            ],
        ),
    ]
}

fn sketches() -> Vec<(&'static str, Template)> {
    vec![
        (
            "cat",
            Template::from_primitives(
                "Cat",
                vec![
                    Primitive::circle(200.0, 150.0, 80.0),
                    Primitive::triangle([(140.0, 80.0), (180.0, 40.0), (220.0, 80.0)]),
                    Primitive::triangle([(280.0, 80.0), (320.0, 40.0), (360.0, 80.0)]),
                    Primitive::circle(170.0, 130.0, 12.0),
                    Primitive::circle(230.0, 130.0, 12.0),
                    Primitive::triangle([(190.0, 150.0), (210.0, 150.0), (200.0, 165.0)]),
                    curve((170.0, 180.0), (200.0, 195.0), (230.0, 180.0)),
                    Primitive::ellipse(200.0, 280.0, 120.0, 140.0),
                ],
            ),
        ),
        (
            "dog",
            Template::from_primitives(
                "Dog",
                vec![
                    Primitive::ellipse(200.0, 150.0, 140.0, 110.0),
                    Primitive::ellipse(150.0, 120.0, 35.0, 70.0),
                    Primitive::ellipse(250.0, 120.0, 35.0, 70.0),
                    Primitive::circle(175.0, 140.0, 10.0),
                    Primitive::circle(225.0, 140.0, 10.0),
                    Primitive::circle(200.0, 165.0, 8.0),
                    curve((170.0, 185.0), (200.0, 200.0), (230.0, 185.0)),
                    Primitive::ellipse(200.0, 280.0, 130.0, 150.0),
                ],
            ),
        ),
        (
            "house",
            Template::from_primitives(
                "House",
                vec![
                    Primitive::rect(100.0, 200.0, 200.0, 140.0),
                    Primitive::triangle([(70.0, 200.0), (200.0, 100.0), (330.0, 200.0)]),
                    Primitive::rect(160.0, 260.0, 60.0, 80.0),
                    Primitive::circle(210.0, 300.0, 4.0),
                    Primitive::rect(120.0, 220.0, 30.0, 30.0),
                    Primitive::rect(250.0, 220.0, 30.0, 30.0),
                    Primitive::rect(270.0, 120.0, 25.0, 50.0),
                ],
            ),
        ),
        (
            "airplane",
            Template::from_primitives(
                "Airplane",
                vec![
                    Primitive::ellipse(200.0, 150.0, 120.0, 30.0),
                    Primitive::rect(140.0, 140.0, 60.0, 15.0),
                    Primitive::rect(200.0, 140.0, 60.0, 15.0),
                    Primitive::triangle([(140.0, 145.0), (140.0, 155.0), (120.0, 150.0)]),
                    Primitive::triangle([(260.0, 145.0), (280.0, 150.0), (260.0, 155.0)]),
                ],
            ),
        ),
        (
            "flower",
            Template::from_primitives(
                "Flower",
                vec![
                    Primitive::circle(200.0, 120.0, 12.0),
                    Primitive::circle(200.0, 95.0, 15.0),
                    Primitive::circle(225.0, 120.0, 15.0),
                    Primitive::circle(200.0, 145.0, 15.0),
                    Primitive::circle(175.0, 120.0, 15.0),
                    line(200.0, 140.0, 200.0, 250.0),
                    Primitive::ellipse(180.0, 200.0, 25.0, 12.0),
                    Primitive::ellipse(220.0, 220.0, 25.0, 12.0),
                ],
            ),
        ),
        (
            "sun",
            Template::from_primitives(
                "Sun",
                vec![
                    Primitive::circle(200.0, 150.0, 40.0),
                    line(200.0, 90.0, 200.0, 110.0),
                    line(228.0, 122.0, 218.0, 132.0),
                    line(260.0, 150.0, 240.0, 150.0),
                    line(228.0, 178.0, 218.0, 168.0),
                    line(200.0, 210.0, 200.0, 190.0),
                    line(172.0, 178.0, 182.0, 168.0),
                    line(140.0, 150.0, 160.0, 150.0),
                    line(172.0, 122.0, 182.0, 132.0),
                    Primitive::circle(188.0, 142.0, 4.0),
                    Primitive::circle(212.0, 142.0, 4.0),
                    curve((185.0, 162.0), (200.0, 170.0), (215.0, 162.0)),
                ],
            ),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_counts() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.keys(TemplateKind::Digit).len(), 10);
        assert_eq!(catalog.keys(TemplateKind::Letter).len(), 26);
        assert_eq!(catalog.keys(TemplateKind::Sketch).len(), 6);
        assert_eq!(catalog.len(), 42);
    }

    #[test]
    fn test_letter_lookup_case_insensitive() {
        let catalog = Catalog::builtin();
        let upper = catalog.get(TemplateKind::Letter, "A").expect("A");
        let lower = catalog.get(TemplateKind::Letter, "a").expect("a");
        assert_eq!(upper, lower);
        assert_eq!(upper.len(), 3);
        assert_eq!(upper.name, "Letter A");
    }

    #[test]
    fn test_sketch_lookup() {
        let catalog = Catalog::builtin();
        let cat = catalog.get(TemplateKind::Sketch, "cat").expect("cat");
        assert_eq!(cat.len(), 8);
        assert_eq!(cat.step(1).map(|s| s.primitive.as_str()), Some("triangle"));
        let sun = catalog.get(TemplateKind::Sketch, "sun").expect("sun");
        assert_eq!(sun.len(), 12);
    }

    #[test]
    fn test_missing_template() {
        let catalog = Catalog::builtin();
        let err = catalog.get(TemplateKind::Digit, "42").unwrap_err();
        assert!(matches!(err, Error::TemplateNotFound { kind: TemplateKind::Digit, .. }));
        assert_eq!(err.to_string(), "template not found: digit \"42\"");
        assert!(catalog.get(TemplateKind::Sketch, "dragon").is_err());
    }

    #[test]
    fn test_steps_in_order() {
        let catalog = Catalog::builtin();
        for kind in TemplateKind::ALL {
            for key in catalog.keys(kind) {
                let t = catalog.get(kind, key).expect("listed key resolves");
                assert!(!t.is_empty(), "{}:{} empty", kind, key);
                for (i, step) in t.steps().iter().enumerate() {
                    assert_eq!(step.order as usize, i + 1);
                }
            }
        }
    }

    #[test]
    fn test_parse_reference() {
        assert_eq!(parse_reference("letter:a"), Some((TemplateKind::Letter, "a".to_string())));
        assert_eq!(parse_reference("number:7"), Some((TemplateKind::Digit, "7".to_string())));
        assert_eq!(parse_reference("sketch:"), None);
        assert_eq!(parse_reference("shape:cat"), None);
        assert_eq!(parse_reference("cat"), None);
    }

    #[test]
    fn test_list_sexp_parses() {
        let sexp = Catalog::builtin().list_sexp();
        assert!(sexp.contains("(:kind :sketch :keys ("));
        assert!(sexp.contains("\"cat\""));
        assert!(lexpr::from_str(&sexp).is_ok());
    }
}
