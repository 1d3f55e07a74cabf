//! # Observation form
//!
//! Cleaned content of the ToO observation form, with every choice field as a closed enum.
//! The form can be deserialized from any serde format (the demo reads TOML); blank fields
//! take the same initial values the form offers.
//!
//! Besides the typed fields this module provides the field-level constraints of the form
//! ([`ObservationForm::field_errors`]) and the program/observation choices built from the
//! settings ([`proposal_choices`], [`observation_choices`]).

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::constants::Degree;
use crate::settings::GemSettings;

macro_rules! form_choice {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $value:tt),+ $(,)? } default $default:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $value)] $variant),+
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$default
            }
        }

        impl $name {
            /// Values accepted by the portal, in form order.
            pub const CHOICES: &'static [&'static str] = &[$($value),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $value),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

form_choice! {
    /// Whether the triggered observation is immediately set to Ready.
    Ready { No => "false", Yes => "true" } default No
}

form_choice! {
    MagnitudeSystem { Vega => "Vega", AB => "AB", Jy => "Jy" } default AB
}

form_choice! {
    BrightnessBand {
        LowerU => "u", U => "U", B => "B", LowerG => "g", V => "V", UC => "UC",
        LowerR => "r", R => "R", LowerI => "i", I => "I", LowerZ => "z", Y => "Y",
        J => "J", H => "H", K => "K", L => "L", M => "M", N => "N", Q => "Q", AP => "AP",
    } default LowerR
}

form_choice! {
    /// Guide-star bands use the catalog names of the Sloan filters (`UP`, `GP`, ...).
    GuideStarBand {
        UP => "UP", U => "U", B => "B", GP => "GP", V => "V", UC => "UC",
        RP => "RP", R => "R", IP => "IP", I => "I", ZP => "ZP", Y => "Y",
        J => "J", H => "H", K => "K", L => "L", M => "M", N => "N", Q => "Q", AP => "AP",
    } default UC
}

form_choice! {
    /// How the position angle is chosen.
    PaMode {
        Flip => "flip",
        Fixed => "fixed",
        Find => "find",
        Parallactic => "parallactic",
    } default Flip
}

form_choice! {
    ElevationType { Unconstrained => "none", Airmass => "airmass", HourAngle => "hourAngle" } default Unconstrained
}

form_choice! {
    Instrument {
        Gmos => "GMOS",
        Gnirs => "GNIRS",
        Nifs => "NIFS",
        Niri6 => "NIRIF/6",
        Niri14 => "NIRIF/14",
        Niri32 => "NIRIF/32",
    } default Gmos
}

form_choice! {
    GuideProbe { Oiwfs => "OIWFS", Pwfs1 => "PWFS1", Pwfs2 => "PWFS2" } default Oiwfs
}

form_choice! {
    IssPort { Side => "side", Up => "up" } default Side
}

form_choice! {
    IfuMode { Off => "none", TwoSlit => "two", OneSlitRed => "red" } default Off
}

form_choice! {
    ImageQuality { P20 => "20", P70 => "70", P85 => "85", Any => "Any" } default Any
}

form_choice! {
    CloudCover { P50 => "50", P70 => "70", P80 => "80", Any => "Any" } default Any
}

form_choice! {
    SkyBackground { P20 => "20", P50 => "50", P80 => "80", Any => "Any" } default Any
}

/// Names of every field of the observation form.
pub const FORM_FIELDS: [&str; 30] = [
    "target_id",
    "obsid",
    "ready",
    "brightness",
    "brightness_band",
    "brightness_system",
    "posangle",
    "group",
    "note",
    "eltype",
    "elmin",
    "elmax",
    "gstarg",
    "gsra",
    "gsdec",
    "gsbrightness",
    "gsbrightness_band",
    "gsbrightness_system",
    "window_start",
    "window_duration",
    "pamode",
    "obsdate",
    "inst",
    "gsprobe",
    "port",
    "ifu",
    "overwrite",
    "iq",
    "cc",
    "sb",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservationForm {
    pub target_id: u64,
    /// Observation id `<program id>-<observation number>`, e.g. `GS-2021A-Q-1-5`.
    pub obsid: String,
    pub ready: Ready,

    pub brightness: Option<f64>,
    pub brightness_band: BrightnessBand,
    pub brightness_system: MagnitudeSystem,

    /// Position angle in degrees, [0, 360].
    pub posangle: Degree,

    pub group: String,
    pub note: String,

    pub eltype: Option<ElevationType>,
    /// Minimum airmass or hour angle, [-5, 5].
    pub elmin: f64,
    /// Maximum airmass or hour angle, [-5, 5].
    pub elmax: f64,

    pub gstarg: String,
    pub gsra: String,
    pub gsdec: String,
    pub gsbrightness: Option<f64>,
    pub gsbrightness_band: GuideStarBand,
    pub gsbrightness_system: MagnitudeSystem,

    /// UT timing window start, date and time.
    pub window_start: String,
    /// Timing window duration in hours, at least 1.
    pub window_duration: Option<u32>,

    pub pamode: PaMode,
    /// UT date and time of the observation, needed by the parallactic PA mode.
    pub obsdate: String,
    pub inst: Instrument,
    pub gsprobe: GuideProbe,
    pub port: IssPort,
    pub ifu: IfuMode,
    /// Redo the guide-star catalog query instead of reusing a previous one.
    pub overwrite: bool,
    pub iq: ImageQuality,
    pub cc: CloudCover,
    pub sb: SkyBackground,
}

impl Default for ObservationForm {
    fn default() -> Self {
        ObservationForm {
            target_id: 0,
            obsid: String::new(),
            ready: Ready::No,
            brightness: None,
            brightness_band: BrightnessBand::default(),
            brightness_system: MagnitudeSystem::AB,
            posangle: 0.0,
            group: String::new(),
            note: String::new(),
            eltype: None,
            elmin: 1.0,
            elmax: 2.0,
            gstarg: String::new(),
            gsra: String::new(),
            gsdec: String::new(),
            gsbrightness: None,
            gsbrightness_band: GuideStarBand::default(),
            gsbrightness_system: MagnitudeSystem::Vega,
            window_start: String::new(),
            window_duration: None,
            pamode: PaMode::default(),
            obsdate: String::new(),
            inst: Instrument::default(),
            gsprobe: GuideProbe::default(),
            port: IssPort::default(),
            ifu: IfuMode::default(),
            overwrite: false,
            iq: ImageQuality::default(),
            cc: CloudCover::default(),
            sb: SkyBackground::default(),
        }
    }
}

fn check_range(
    errors: &mut BTreeMap<String, Vec<String>>,
    field: &str,
    value: f64,
    min: f64,
    max: f64,
) {
    if value < min {
        errors
            .entry(field.to_string())
            .or_default()
            .push(format!("Ensure this value is greater than or equal to {min:?}."));
    } else if value > max {
        errors
            .entry(field.to_string())
            .or_default()
            .push(format!("Ensure this value is less than or equal to {max:?}."));
    }
}

impl ObservationForm {
    /// True when this form carries a field named `field`.
    pub fn has_field(field: &str) -> bool {
        FORM_FIELDS.contains(&field)
    }

    /// Field-level constraints of the form (required fields and numeric bounds).
    ///
    /// Return
    /// ------
    /// * field name → messages, empty when every field is acceptable
    pub fn field_errors(&self) -> BTreeMap<String, Vec<String>> {
        let mut errors: BTreeMap<String, Vec<String>> = BTreeMap::new();

        if self.obsid.trim().is_empty() {
            errors
                .entry("obsid".to_string())
                .or_default()
                .push("This field is required.".to_string());
        }
        check_range(&mut errors, "posangle", self.posangle, 0.0, 360.0);
        check_range(&mut errors, "elmin", self.elmin, -5.0, 5.0);
        check_range(&mut errors, "elmax", self.elmax, -5.0, 5.0);
        if self.window_duration == Some(0) {
            errors
                .entry("window_duration".to_string())
                .or_default()
                .push("Ensure this value is greater than or equal to 1.".to_string());
        }

        errors
    }
}

static PROGRAM_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^G([NS])-\d{2}(\d{2}[AB])-([A-Z]+)-(\d+)$").unwrap());

/// Compact form of a program id: `GS-2021A-Q-1` → `S21AQ1`.
///
/// Program ids that do not follow the semester pattern are returned unchanged.
pub fn short_program_id(program_id: &str) -> String {
    match PROGRAM_ID.captures(program_id) {
        Some(caps) => format!("{}{}{}{}", &caps[1], &caps[2], &caps[3], &caps[4]),
        None => program_id.to_string(),
    }
}

/// Programs offered in the form, as `(value, label)` pairs.
pub fn proposal_choices(settings: &GemSettings) -> Vec<(String, String)> {
    settings
        .programs
        .keys()
        .map(|p| (p.clone(), p.clone()))
        .collect()
}

/// Observations offered in the form, as `(observation id, label)` pairs
///
/// Arguments
/// ---------
/// * `settings`: the program table to read
///
/// Return
/// ------
/// * one entry per configured observation, e.g. `("GS-2021A-Q-1-5", "S21AQ1 - GMOS ToO")`
pub fn observation_choices(settings: &GemSettings) -> Vec<(String, String)> {
    settings
        .programs
        .iter()
        .flat_map(|(program, observations)| {
            let short = short_program_id(program);
            observations.iter().map(move |(obs, label)| {
                (format!("{program}-{obs}"), format!("{short} - {label}"))
            })
        })
        .collect()
}

#[cfg(test)]
mod form_test {
    use super::*;

    #[test]
    fn test_choice_values() {
        assert_eq!(Instrument::Niri14.as_str(), "NIRIF/14");
        assert_eq!(ElevationType::HourAngle.to_string(), "hourAngle");
        assert_eq!(BrightnessBand::default().as_str(), "r");
        assert_eq!(GuideStarBand::default(), GuideStarBand::UC);
        assert_eq!(PaMode::CHOICES, &["flip", "fixed", "find", "parallactic"]);
        assert_eq!(ImageQuality::default().as_str(), "Any");
    }

    #[test]
    fn test_form_defaults_from_toml() {
        let form: ObservationForm = toml::from_str(
            r#"
target_id = 3
obsid = "GS-2021A-Q-1-5"
eltype = "airmass"
pamode = "parallactic"
inst = "NIRIF/6"
iq = "70"
"#,
        )
        .unwrap();
        assert_eq!(form.target_id, 3);
        assert_eq!(form.eltype, Some(ElevationType::Airmass));
        assert_eq!(form.elmin, 1.0);
        assert_eq!(form.elmax, 2.0);
        assert_eq!(form.pamode, PaMode::Parallactic);
        assert_eq!(form.inst, Instrument::Niri6);
        assert_eq!(form.iq, ImageQuality::P70);
        assert_eq!(form.brightness_system, MagnitudeSystem::AB);
        assert_eq!(form.gsbrightness_system, MagnitudeSystem::Vega);
        assert!(form.field_errors().is_empty());
    }

    #[test]
    fn test_field_errors() {
        let form = ObservationForm {
            posangle: 400.0,
            elmin: -6.0,
            window_duration: Some(0),
            ..Default::default()
        };
        let errors = form.field_errors();
        assert_eq!(errors["obsid"], vec!["This field is required."]);
        assert_eq!(
            errors["posangle"],
            vec!["Ensure this value is less than or equal to 360.0."]
        );
        assert_eq!(
            errors["elmin"],
            vec!["Ensure this value is greater than or equal to -5.0."]
        );
        assert!(errors.contains_key("window_duration"));
        assert!(!errors.contains_key("elmax"));
    }

    #[test]
    fn test_observation_choices() {
        let settings = GemSettings::from_toml_str(
            r#"
[programs."GS-2021A-Q-1"]
"5" = "GMOS ToO"
[programs."GN-CAL20210101"]
"1" = "Twilight flats"
"#,
        )
        .unwrap();

        assert_eq!(short_program_id("GS-2021A-Q-1"), "S21AQ1");
        assert_eq!(short_program_id("GN-2022B-DD-104"), "N22BDD104");
        assert_eq!(
            observation_choices(&settings),
            vec![
                (
                    "GN-CAL20210101-1".to_string(),
                    "GN-CAL20210101 - Twilight flats".to_string()
                ),
                ("GS-2021A-Q-1-5".to_string(), "S21AQ1 - GMOS ToO".to_string()),
            ]
        );
        assert_eq!(proposal_choices(&settings).len(), 2);
        assert!(ObservationForm::has_field("gstarg"));
        assert!(!ObservationForm::has_field("elevationMin"));
    }
}
