/*!
Structs to hold configuration data and global variables.
*/
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;

use crate::{
    pdf::{PdfCfg, PdfConverter, Wkhtmltopdf},
    store::{Records, Store},
};

#[derive(Deserialize)]
struct PdfFile {
    converter: Option<String>,
    page_size: Option<String>,
    margin_top_mm: Option<u32>,
    margin_right_mm: Option<u32>,
    margin_bottom_mm: Option<u32>,
    margin_left_mm: Option<u32>,
    font: Option<String>,
    temp_dir: Option<String>,
}

#[derive(Deserialize)]
struct ConfigFile {
    db_connect_string: Option<String>,
    host: Option<String>,
    port: Option<u16>,
    templates_dir: Option<String>,
    static_dir: Option<String>,
    course_filter: Option<String>,
    session_cookie: Option<String>,
    login_path: Option<String>,
    student_dashboard: Option<String>,
    instructor_dashboard: Option<String>,
    default_instructor_name: Option<String>,
    default_instructor_email: Option<String>,
    pdf: Option<PdfFile>,
}

#[derive(Clone, Debug)]
pub struct Cfg {
    pub db_connect_string: String,
    pub addr: SocketAddr,
    pub templates_dir: PathBuf,
    pub static_dir: PathBuf,
    /// Substring that a course title must contain for its enrollments
    /// and classes to grant access.
    pub course_filter: String,
    /// Name of the cookie holding the session key.
    pub session_cookie: String,
    pub login_path: String,
    pub student_dashboard: String,
    pub instructor_dashboard: String,
    /// Shown when no instructor can be found for the user.
    pub default_instructor_name: String,
    pub default_instructor_email: String,
    pub pdf: PdfCfg,
}

impl std::default::Default for Cfg {
    fn default() -> Self {
        Self {
            db_connect_string: "host=localhost user=mo100 password='mo100' dbname=portal".to_owned(),
            addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 8001),
            templates_dir: PathBuf::from("templates"),
            static_dir: PathBuf::from("static"),
            course_filter: "MO-100".to_owned(),
            session_cookie: "mo100_session".to_owned(),
            login_path: "/login".to_owned(),
            student_dashboard: "/student/dashboard".to_owned(),
            instructor_dashboard: "/instructor/dashboard".to_owned(),
            default_instructor_name: "Course Instructor".to_owned(),
            default_instructor_email: "support@learning-portal.invalid".to_owned(),
            pdf: PdfCfg::default(),
        }
    }
}

impl Cfg {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let path = path.as_ref();
        let file_contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Unable to read config file: {}", &e))?;
        Cfg::from_toml(&file_contents)
    }

    /// Overlay the values in the TOML `text` onto the defaults.
    pub fn from_toml(text: &str) -> Result<Self, String> {
        let cf: ConfigFile = toml::from_str(text)
            .map_err(|e| format!("Unable to deserialize config file: {}", &e))?;

        let mut c = Self::default();

        if let Some(s) = cf.db_connect_string {
            c.db_connect_string = s;
        }
        if let Some(s) = cf.host {
            c.addr.set_ip(
                s.parse().map_err(|e| format!(
                    "Error parsing {:?} as IP address: {}",
                    &s, &e
                ))?
            );
        }
        if let Some(n) = cf.port {
            c.addr.set_port(n);
        }
        if let Some(s) = cf.templates_dir {
            c.templates_dir = PathBuf::from(s);
        }
        if let Some(s) = cf.static_dir {
            c.static_dir = PathBuf::from(s);
        }
        if let Some(s) = cf.course_filter {
            if s.trim().is_empty() {
                return Err("course_filter must not be blank.".to_owned());
            }
            c.course_filter = s;
        }
        if let Some(s) = cf.session_cookie {
            c.session_cookie = s;
        }
        if let Some(s) = cf.login_path {
            c.login_path = s;
        }
        if let Some(s) = cf.student_dashboard {
            c.student_dashboard = s;
        }
        if let Some(s) = cf.instructor_dashboard {
            c.instructor_dashboard = s;
        }
        if let Some(s) = cf.default_instructor_name {
            c.default_instructor_name = s;
        }
        if let Some(s) = cf.default_instructor_email {
            c.default_instructor_email = s;
        }

        if let Some(p) = cf.pdf {
            if let Some(s) = p.converter {
                c.pdf.converter = PathBuf::from(s);
            }
            if let Some(s) = p.page_size {
                c.pdf.page_size = s;
            }
            if let Some(n) = p.margin_top_mm {
                c.pdf.margin_top_mm = n;
            }
            if let Some(n) = p.margin_right_mm {
                c.pdf.margin_right_mm = n;
            }
            if let Some(n) = p.margin_bottom_mm {
                c.pdf.margin_bottom_mm = n;
            }
            if let Some(n) = p.margin_left_mm {
                c.pdf.margin_left_mm = n;
            }
            if let Some(s) = p.font {
                c.pdf.font = s;
            }
            if let Some(s) = p.temp_dir {
                c.pdf.temp_dir = PathBuf::from(s);
            }
        }

        Ok(c)
    }
}

/**
This guy hauls around the configuration and the collaborators every request
needs, and is passed in an `axum::Extension` to the handlers.
*/
pub struct Glob {
    pub cfg: Cfg,
    pub records: Arc<dyn Records>,
    pub converter: Arc<dyn PdfConverter>,
}

impl std::fmt::Debug for Glob {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Glob")
            .field("cfg", &self.cfg)
            .finish_non_exhaustive()
    }
}

/// Reads the configuration file and builds the global state.
///
/// A missing file means running with the defaults. An unreachable database
/// is only warned about, as each request reports its own database trouble.
pub async fn load_configuration<P: AsRef<Path>>(path: P) -> Result<Glob, String> {
    let path = path.as_ref();

    let cfg = if path.exists() {
        let cfg = Cfg::from_file(path)?;
        log::info!("Configuration file read:\n{:#?}", &cfg);
        cfg
    } else {
        log::warn!(
            "Config file {} not found; using default configuration.",
            path.display()
        );
        Cfg::default()
    };

    log::trace!("Checking state of data DB...");
    let store = Store::new(cfg.db_connect_string.clone());
    match store.ping().await {
        Ok(()) => { log::trace!("...data DB okay."); },
        Err(e) => { log::warn!("Data DB not reachable at startup: {}", &e); },
    }

    let converter = Wkhtmltopdf::new(cfg.pdf.clone());

    let glob = Glob {
        cfg,
        records: Arc::new(store),
        converter: Arc::new(converter),
    };

    Ok(glob)
}
