use super::{DEFAULT_COLOR, Rgba};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Robot,
    Car,
    Pendant,
    Creature,
    Cube,
    Sphere,
    Cylinder,
    Cone,
    Torus,
    Default,
}

// Ordered: composites before basic shapes, earlier group wins on ties
const KEYWORD_GROUPS: &[(&[&str], ShapeKind)] = &[
    (&["robot", "android", "droid"], ShapeKind::Robot),
    (&["car", "vehicle", "automobile"], ShapeKind::Car),
    (&["pendant", "necklace", "jewelry", "jewellery"], ShapeKind::Pendant),
    (&["dragon", "creature", "animal"], ShapeKind::Creature),
    (&["cube", "box", "block"], ShapeKind::Cube),
    (&["sphere", "ball", "globe"], ShapeKind::Sphere),
    (&["cylinder", "tube", "pipe"], ShapeKind::Cylinder),
    (&["cone", "pyramid"], ShapeKind::Cone),
    (&["torus", "donut", "ring"], ShapeKind::Torus),
];

// Expects an already lower-cased prompt
pub fn classify(prompt_lower: &str) -> ShapeKind {
    for (keywords, kind) in KEYWORD_GROUPS {
        if keywords.iter().any(|k| prompt_lower.contains(k)) {
            return *kind;
        }
    }
    ShapeKind::Default
}

const COLOR_TABLE: &[(&str, Rgba)] = &[
    ("red", [255, 0, 0, 255]),
    ("blue", [0, 0, 255, 255]),
    ("green", [0, 255, 0, 255]),
    ("yellow", [255, 255, 0, 255]),
    ("purple", [128, 0, 128, 255]),
    ("orange", [255, 165, 0, 255]),
    ("pink", [255, 192, 203, 255]),
    ("white", [255, 255, 255, 255]),
    ("black", [0, 0, 0, 255]),
    ("gray", [128, 128, 128, 255]),
    ("gold", [255, 215, 0, 255]),
    ("silver", [192, 192, 192, 255]),
];

pub fn extract_color(prompt_lower: &str) -> Rgba {
    for (name, value) in COLOR_TABLE {
        if prompt_lower.contains(name) {
            return *value;
        }
    }
    DEFAULT_COLOR
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn earlier_keyword_group_wins() {
        // robot/android/droid is checked before car/vehicle/automobile
        assert_eq!(classify("a red robot car"), ShapeKind::Robot);
        assert_eq!(classify("car shaped like a donut"), ShapeKind::Car);
    }

    #[test]
    fn unmatched_prompt_falls_to_default() {
        assert_eq!(classify("something abstract"), ShapeKind::Default);
    }

    #[test]
    fn each_group_member_matches() {
        assert_eq!(classify("an android"), ShapeKind::Robot);
        assert_eq!(classify("a vehicle"), ShapeKind::Car);
        assert_eq!(classify("silver necklace charm"), ShapeKind::Pendant);
        assert_eq!(classify("a small animal"), ShapeKind::Creature);
        assert_eq!(classify("wooden block"), ShapeKind::Cube);
        assert_eq!(classify("the globe"), ShapeKind::Sphere);
        assert_eq!(classify("steel pipe"), ShapeKind::Cylinder);
        assert_eq!(classify("a pyramid"), ShapeKind::Cone);
        assert_eq!(classify("glazed donut"), ShapeKind::Torus);
    }

    #[test]
    fn classify_is_idempotent() {
        let prompt = "a shiny robot";
        assert_eq!(classify(prompt), classify(prompt));
        assert_eq!(extract_color(prompt), extract_color(prompt));
    }

    #[test]
    fn earlier_color_wins() {
        assert_eq!(extract_color("red and blue stripes"), [255, 0, 0, 255]);
        assert_eq!(extract_color("blue with red trim"), [255, 0, 0, 255]);
    }

    #[test]
    fn unmatched_color_falls_to_light_blue() {
        assert_eq!(extract_color("a plain shape"), DEFAULT_COLOR);
    }
}
