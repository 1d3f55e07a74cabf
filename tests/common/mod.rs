#![allow(dead_code)]

use std::cell::RefCell;

use gem_too::astrometry::{Astrometry, GuideStar, GuideStarQuery, GuideStarSelection};
use gem_too::constants::{Degree, Hour};
use gem_too::gem_errors::GemError;
use gem_too::settings::GemSettings;
use gem_too::sites::Site;
use gem_too::targets::{OrbitalElements, SiderealCoordinates, Target, TargetKind};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

pub fn settings() -> GemSettings {
    GemSettings::from_toml_str(
        r#"
user_email = "tom@example.org"
image_dir = "/srv/tom/media"

[api_key]
GS = "south-key"
GN = "north-key"

[programs."GS-2021A-Q-1"]
"5" = "GMOS ToO"
"#,
    )
    .unwrap()
}

/// Settings whose portals both point at `url`.
pub fn settings_with_portal(url: &str) -> GemSettings {
    let mut settings = settings();
    for code in ["GS", "GN"] {
        settings.portal_url.insert(code.to_string(), url.to_string());
    }
    settings
}

pub fn sidereal_target() -> Target {
    Target {
        id: 1,
        identifier: "AT2021abc".into(),
        name: "SN 2021abc".into(),
        designation: "".into(),
        kind: TargetKind::Sidereal(SiderealCoordinates {
            ra: 150.0,
            dec: -45.5,
            epoch: Some(2000.0),
            pm_ra: None,
            pm_dec: None,
            galactic_lng: None,
            galactic_lat: None,
            distance: None,
            distance_err: None,
        }),
    }
}

pub fn comet_target() -> Target {
    Target {
        id: 2,
        identifier: "C/2020 F3".into(),
        name: "NEOWISE".into(),
        designation: "C/2020 F3".into(),
        kind: TargetKind::NonSidereal(OrbitalElements::default()),
    }
}

/// Records every call and answers with canned values.
pub struct FakeAstrometry {
    pub selection: GuideStarSelection,
    pub parallactic: Degree,
    pub searches: RefCell<Vec<GuideStarQuery>>,
    pub parallactic_calls: RefCell<Vec<(Hour, Degree, String, String, Site)>>,
}

impl FakeAstrometry {
    /// A search that finds `UCAC4 123-456789` at PA 185.5.
    pub fn finding_star() -> Self {
        FakeAstrometry {
            selection: GuideStarSelection {
                star: Some(GuideStar {
                    name: "UCAC4 123-456789".into(),
                    ra: "10:00:05.123".into(),
                    dec: "-45:31:02.45".into(),
                    magnitude: 13.25,
                }),
                position_angle: 185.5,
            },
            parallactic: 42.5,
            searches: RefCell::new(Vec::new()),
            parallactic_calls: RefCell::new(Vec::new()),
        }
    }

    /// A search that finds nothing and settles on PA 12.0.
    pub fn finding_nothing() -> Self {
        FakeAstrometry {
            selection: GuideStarSelection::empty(12.0),
            ..Self::finding_star()
        }
    }
}

impl Astrometry for FakeAstrometry {
    fn select_guide_star(&self, query: &GuideStarQuery) -> Result<GuideStarSelection, GemError> {
        self.searches.borrow_mut().push(query.clone());
        Ok(self.selection.clone())
    }

    fn parallactic_angle(
        &self,
        ra: Hour,
        dec: Degree,
        date: &str,
        time: &str,
        site: Site,
    ) -> Result<Degree, GemError> {
        self.parallactic_calls
            .borrow_mut()
            .push((ra, dec, date.to_string(), time.to_string(), site));
        Ok(self.parallactic)
    }
}

/// Answer a single HTTP request on a local port with the given status and body.
///
/// Returns the base URL of the server and a handle resolving to the raw request head.
pub async fn serve_once(status: u16, reason: &str, body: &str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let response = format!(
        "HTTP/1.1 {status} {reason}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&chunk[..n]);
            if request.windows(4).any(|w| w == b"\r\n\r\n") {
                break;
            }
        }
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
        String::from_utf8_lossy(&request).into_owned()
    });

    (format!("http://{addr}"), handle)
}
