use std::path::PathBuf;

use gem_too::builder::PayloadBuilder;
use gem_too::form::{ElevationType, GuideProbe, ObservationForm, PaMode, Ready};
use gem_too::gem_errors::GemError;
use gem_too::payload::PayloadValue;
use gem_too::sites::Site;
use gem_too::targets::target_form::TargetForm;

mod common;
use common::{comet_target, settings, sidereal_target, FakeAstrometry};

fn form(obsid: &str) -> ObservationForm {
    ObservationForm {
        obsid: obsid.into(),
        ..Default::default()
    }
}

#[test]
fn test_program_and_observation_number() {
    let settings = settings();
    let astrometry = FakeAstrometry::finding_nothing();
    let builder = PayloadBuilder::new(&settings, &astrometry);

    let payload = builder
        .build(&form("GS-2021A-Q-1-5"), &sidereal_target())
        .unwrap();
    assert_eq!(payload.get_string("prog").unwrap(), "GS-2021A-Q-1");
    assert_eq!(payload.get_string("obsnum").unwrap(), "5");
    assert_eq!(payload.get_string("password").unwrap(), "south-key");
    assert_eq!(payload.get_string("email").unwrap(), "tom@example.org");
    assert_eq!(payload.get_string("target").unwrap(), "SN 2021abc");
    assert_eq!(payload.get("ra"), Some(&PayloadValue::Number(150.0)));
    assert_eq!(payload.get("dec"), Some(&PayloadValue::Number(-45.5)));
    assert_eq!(payload.get_string("ready").unwrap(), "false");
    assert_eq!(payload.get_string("note").unwrap(), "");

    let payload = builder
        .build(&form("GN-2022B-DD-104-12"), &sidereal_target())
        .unwrap();
    assert_eq!(payload.get_string("password").unwrap(), "north-key");
    assert_eq!(astrometry.searches.borrow()[1].site, Site::GeminiNorth);
}

#[test]
fn test_optional_fields_absent_by_default() {
    let settings = settings();
    let astrometry = FakeAstrometry::finding_nothing();
    let payload = PayloadBuilder::new(&settings, &astrometry)
        .build(&form("GS-2021A-Q-1-5"), &sidereal_target())
        .unwrap();

    for key in [
        "mags",
        "group",
        "windowDate",
        "windowTime",
        "windowDuration",
        "elevationType",
        "elevationMin",
        "elevationMax",
        "gstarget",
        "gsra",
        "gsdec",
        "gsmags",
        "gsprobe",
    ] {
        assert!(!payload.contains_key(key), "{key} should be absent");
    }
    // the search settled on its own position angle
    assert_eq!(payload.get_string("posangle").unwrap(), "12.0");
}

#[test]
fn test_brightness_group_window_and_elevation() {
    let settings = settings();
    let astrometry = FakeAstrometry::finding_nothing();
    let form = ObservationForm {
        ready: Ready::Yes,
        note: "urgent follow-up".into(),
        brightness: Some(17.25),
        group: " ToO night 1 ".into(),
        window_start: "2024-06-01T10:00:00".into(),
        window_duration: Some(24),
        eltype: Some(ElevationType::Airmass),
        elmin: 1.0,
        elmax: 1.8,
        ..form("GS-2021A-Q-1-5")
    };

    let payload = PayloadBuilder::new(&settings, &astrometry)
        .build(&form, &sidereal_target())
        .unwrap();
    assert_eq!(payload.get_string("ready").unwrap(), "true");
    assert_eq!(payload.get_string("note").unwrap(), "urgent follow-up");
    assert_eq!(payload.get_string("mags").unwrap(), "17.25/r/AB");
    assert_eq!(payload.get_string("group").unwrap(), "ToO night 1");
    assert_eq!(payload.get_string("windowDate").unwrap(), "2024-06-01");
    assert_eq!(payload.get_string("windowTime").unwrap(), "10:00:00");
    assert_eq!(payload.get_string("windowDuration").unwrap(), "24");
    assert_eq!(payload.get_string("elevationType").unwrap(), "airmass");
    assert_eq!(payload.get_string("elevationMin").unwrap(), "1.0");
    assert_eq!(payload.get_string("elevationMax").unwrap(), "1.8");
}

#[test]
fn test_window_without_duration() {
    let settings = settings();
    let astrometry = FakeAstrometry::finding_nothing();
    let form = ObservationForm {
        window_start: "2024-06-01 10:00".into(),
        ..form("GS-2021A-Q-1-5")
    };
    assert_eq!(
        PayloadBuilder::new(&settings, &astrometry).build(&form, &sidereal_target()),
        Err(GemError::MissingWindowDuration)
    );
}

#[test]
fn test_explicit_guide_star_skips_search() {
    let settings = settings();
    let astrometry = FakeAstrometry::finding_star();
    let form = ObservationForm {
        gstarg: "UCAC4 111-222333".into(),
        gsra: "10:00:01.2".into(),
        gsdec: "-45:30:00.0".into(),
        gsbrightness: Some(14.5),
        gsprobe: GuideProbe::Pwfs2,
        posangle: 90.0,
        ..form("GS-2021A-Q-1-5")
    };

    let payload = PayloadBuilder::new(&settings, &astrometry)
        .build(&form, &sidereal_target())
        .unwrap();
    assert!(astrometry.searches.borrow().is_empty());
    assert!(astrometry.parallactic_calls.borrow().is_empty());
    assert_eq!(payload.get_string("gstarget").unwrap(), "UCAC4 111-222333");
    assert_eq!(payload.get_string("gsra").unwrap(), "10:00:01.2");
    assert_eq!(payload.get_string("gsdec").unwrap(), "-45:30:00.0");
    assert_eq!(payload.get_string("gsmags").unwrap(), "14.5/UC/Vega");
    assert_eq!(payload.get_string("gsprobe").unwrap(), "PWFS2");
    assert_eq!(payload.get_string("posangle").unwrap(), "90.0");
}

#[test]
fn test_found_guide_star() {
    let settings = settings();
    let astrometry = FakeAstrometry::finding_star();
    let form = ObservationForm {
        posangle: 30.0,
        pamode: PaMode::Find,
        ..form("GS-2021A-Q-1-5")
    };

    let payload = PayloadBuilder::new(&settings, &astrometry)
        .build(&form, &sidereal_target())
        .unwrap();
    assert_eq!(payload.get_string("gstarget").unwrap(), "UCAC4 123-456789");
    assert_eq!(payload.get_string("gsra").unwrap(), "10:00:05.123");
    assert_eq!(payload.get_string("gsdec").unwrap(), "-45:31:02.45");
    assert_eq!(payload.get_string("gsmags").unwrap(), "13.25/UC/Vega");
    assert_eq!(payload.get_string("gsprobe").unwrap(), "OIWFS");
    assert_eq!(payload.get_string("posangle").unwrap(), "185.5");

    let searches = astrometry.searches.borrow();
    assert_eq!(searches.len(), 1);
    let query = &searches[0];
    assert_eq!(query.target_name, "SN 2021abc");
    assert_eq!(query.ra, 10.0);
    assert_eq!(query.dec, -45.5);
    assert_eq!(query.position_angle, 30.0);
    assert_eq!(query.pa_mode, PaMode::Find);
    assert_eq!(query.site, Site::GeminiSouth);
    assert_eq!(query.catalog, "UCAC4");
    assert_eq!(query.pad, 7.0);
    assert_eq!(query.min_radius, -1.0);
    assert!(!query.chopping);
}

#[test]
fn test_search_writes_finding_chart_unattended() {
    let settings = settings();
    let astrometry = FakeAstrometry::finding_nothing();
    PayloadBuilder::new(&settings, &astrometry)
        .build(&form("GS-2021A-Q-1-5"), &sidereal_target())
        .unwrap();

    let query = &astrometry.searches.borrow()[0];
    assert_eq!(query.image_dir, PathBuf::from("/srv/tom/media"));
    assert!(query.figure_out);
    assert_eq!(query.figure_file, "default");
    assert!(!query.display);
    assert!(!query.verbose);
}

#[test]
fn test_parallactic_mode() {
    let settings = settings();
    let astrometry = FakeAstrometry::finding_star();
    let form = ObservationForm {
        pamode: PaMode::Parallactic,
        obsdate: "2024-06-01 03:30".into(),
        posangle: 10.0,
        ..form("GS-2021A-Q-1-5")
    };

    let payload = PayloadBuilder::new(&settings, &astrometry)
        .build(&form, &sidereal_target())
        .unwrap();

    let calls = astrometry.parallactic_calls.borrow();
    assert_eq!(
        calls.as_slice(),
        &[(
            10.0,
            -45.5,
            "2024-06-01".to_string(),
            "03:30:00".to_string(),
            Site::GeminiSouth
        )]
    );
    let query = &astrometry.searches.borrow()[0];
    assert_eq!(query.pa_mode, PaMode::Flip);
    assert_eq!(query.position_angle, 42.5);
    assert_eq!(payload.get_string("posangle").unwrap(), "185.5");
}

#[test]
fn test_parallactic_mode_without_date() {
    let settings = settings();
    let astrometry = FakeAstrometry::finding_star();
    let form = ObservationForm {
        pamode: PaMode::Parallactic,
        posangle: 77.0,
        ..form("GS-2021A-Q-1-5")
    };

    let payload = PayloadBuilder::new(&settings, &astrometry)
        .build(&form, &sidereal_target())
        .unwrap();
    assert!(astrometry.parallactic_calls.borrow().is_empty());
    assert!(astrometry.searches.borrow().is_empty());
    assert!(!payload.contains_key("gstarget"));
    assert_eq!(payload.get_string("posangle").unwrap(), "77.0");
}

#[test]
fn test_name_falls_back_to_identifier() {
    let settings = settings();
    let astrometry = FakeAstrometry::finding_nothing();
    let target = TargetForm {
        identifier: "ZTF24aaabcde".into(),
        ra: Some("10:00:00".into()),
        dec: Some("-45:30:00".into()),
        ..Default::default()
    }
    .create(7)
    .unwrap();

    let payload = PayloadBuilder::new(&settings, &astrometry)
        .build(&form("GS-2021A-Q-1-5"), &target)
        .unwrap();
    assert_eq!(payload.get_string("target").unwrap(), "ZTF24aaabcde");
    assert_eq!(payload.get("ra"), Some(&PayloadValue::Number(150.0)));
    assert_eq!(payload.get("dec"), Some(&PayloadValue::Number(-45.5)));
}

#[test]
fn test_build_errors() {
    let settings = settings();
    let astrometry = FakeAstrometry::finding_nothing();
    let builder = PayloadBuilder::new(&settings, &astrometry);

    assert!(matches!(
        builder.build(&form("GS2021AQ15"), &sidereal_target()),
        Err(GemError::InvalidObservationId(_))
    ));
    assert!(matches!(
        builder.build(&form("GX-2021A-Q-1-5"), &sidereal_target()),
        Err(GemError::UnknownSite(_))
    ));
    assert!(matches!(
        builder.build(&form("GS-2021A-Q-1-5"), &comet_target()),
        Err(GemError::NoSiderealCoordinates(_))
    ));

    let mut no_key = common::settings();
    no_key.api_key.remove("GN");
    let payload = PayloadBuilder::new(&no_key, &astrometry)
        .build(&form("GN-2022B-DD-104-1"), &sidereal_target());
    assert!(matches!(payload, Err(GemError::MissingCredential(_))));
}

#[test]
fn test_password_is_not_logged() {
    let settings = settings();
    let astrometry = FakeAstrometry::finding_nothing();
    let payload = PayloadBuilder::new(&settings, &astrometry)
        .build(&form("GS-2021A-Q-1-5"), &sidereal_target())
        .unwrap();
    let debug = format!("{payload:?}");
    assert!(!debug.contains("south-key"));
    assert!(debug.contains("GS-2021A-Q-1"));
}
