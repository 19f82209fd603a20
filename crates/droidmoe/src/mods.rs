use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::parser::ParseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mod {
    EZ,
    NF,
    HT,
    HR,
    HD,
    DT,
    NC,
    FL,
    SD,
    PF,
    PR,
}

impl Mod {
    pub fn acronym(&self) -> &'static str {
        match self {
            Mod::EZ => "EZ",
            Mod::NF => "NF",
            Mod::HT => "HT",
            Mod::HR => "HR",
            Mod::HD => "HD",
            Mod::DT => "DT",
            Mod::NC => "NC",
            Mod::FL => "FL",
            Mod::SD => "SD",
            Mod::PF => "PF",
            Mod::PR => "PR",
        }
    }
}

impl Display for Mod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.acronym())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModSet {
    pub acronyms: Vec<Mod>,
    pub speed: f64,
}

impl Default for ModSet {
    fn default() -> Self {
        Self {
            acronyms: Vec::new(),
            speed: 1.0,
        }
    }
}

impl Display for ModSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.acronyms.is_empty() {
            write!(f, "NM")?;
        } else {
            for m in &self.acronyms {
                write!(f, "{}", m)?;
            }
        }
        if self.speed != 1.0 {
            write!(f, " ({}x)", self.speed)?;
        }
        Ok(())
    }
}

/// Maps full mod names to their acronyms. A bare numeric token is a custom
/// speed multiplier and overwrites the previous one; "none" and empty tokens
/// contribute nothing.
pub fn translate<I, S>(names: I) -> Result<ModSet, ParseError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut mods = ModSet::default();
    for name in names {
        let name = name.as_ref();
        match name.to_lowercase().as_str() {
            "easy" => mods.acronyms.push(Mod::EZ),
            "nofail" => mods.acronyms.push(Mod::NF),
            "halftime" => mods.acronyms.push(Mod::HT),
            "hardrock" => mods.acronyms.push(Mod::HR),
            "hidden" => mods.acronyms.push(Mod::HD),
            "doubletime" => mods.acronyms.push(Mod::DT),
            "nightcore" => mods.acronyms.push(Mod::NC),
            "flashlight" => mods.acronyms.push(Mod::FL),
            "suddendeath" => mods.acronyms.push(Mod::SD),
            "perfect" => mods.acronyms.push(Mod::PF),
            "precise" => mods.acronyms.push(Mod::PR),
            "none" | "" => {}
            other => {
                let speed: f64 = other
                    .parse()
                    .map_err(|_| ParseError::UnknownMod(name.to_string()))?;
                if !speed.is_finite() {
                    return Err(ParseError::UnknownMod(name.to_string()));
                }
                mods.speed = speed;
            }
        }
    }
    Ok(mods)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_known_mods() {
        let mods = translate(["Hidden", "HardRock"]).expect("Failed to translate");
        assert_eq!(mods.acronyms, vec![Mod::HD, Mod::HR]);
        assert_eq!(mods.speed, 1.0);
    }

    #[test]
    fn test_translate_preserves_input_order() {
        let mods = translate(["DoubleTime", "Easy", "Flashlight"]).expect("Failed to translate");
        assert_eq!(mods.acronyms, vec![Mod::DT, Mod::EZ, Mod::FL]);
    }

    #[test]
    fn test_translate_is_case_insensitive() {
        let mods = translate(["NIGHTCORE", "suddendeath", "Precise"]).expect("Failed to translate");
        assert_eq!(mods.acronyms, vec![Mod::NC, Mod::SD, Mod::PR]);
    }

    #[test]
    fn test_translate_none_yields_default() {
        let mods = translate(["None"]).expect("Failed to translate");
        assert_eq!(mods, ModSet::default());

        let mods = translate([""]).expect("Failed to translate");
        assert_eq!(mods, ModSet::default());
    }

    #[test]
    fn test_translate_custom_speed() {
        let mods = translate(["Hidden", "1.25"]).expect("Failed to translate");
        assert_eq!(mods.acronyms, vec![Mod::HD]);
        assert_eq!(mods.speed, 1.25);
    }

    #[test]
    fn test_translate_last_speed_wins() {
        let mods = translate(["1.5", "0.75"]).expect("Failed to translate");
        assert!(mods.acronyms.is_empty());
        assert_eq!(mods.speed, 0.75);
    }

    #[test]
    fn test_translate_rejects_unknown_token() {
        let err = translate(["Hidden", "Wobble"]).unwrap_err();
        assert!(matches!(err, ParseError::UnknownMod(ref t) if t == "Wobble"));
    }

    #[test]
    fn test_translate_rejects_non_finite_speed() {
        assert!(translate(["NaN"]).is_err());
        assert!(translate(["inf"]).is_err());
    }

    #[test]
    fn test_modset_display() {
        let mods = translate(["Hidden", "DoubleTime", "1.25"]).expect("Failed to translate");
        assert_eq!(mods.to_string(), "HDDT (1.25x)");
        assert_eq!(ModSet::default().to_string(), "NM");
    }
}
